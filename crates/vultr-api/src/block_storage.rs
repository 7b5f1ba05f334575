//! Block storage volumes.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/blocks";

/// A block storage volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStorage {
    /// Volume id
    pub id: String,
    /// Monthly cost in USD
    pub cost: f64,
    /// `active` or `pending`
    pub status: String,
    /// Size in GB
    pub size_gb: u32,
    /// Region id
    pub region: String,
    /// Instance the volume is attached to, empty if detached
    pub attached_to_instance: String,
    /// Creation time
    pub date_created: String,
    /// Label
    pub label: String,
    /// Mount id used inside the guest
    pub mount_id: String,
    /// `high_perf` or `storage_opt`
    pub block_type: String,
}

impl BlockStorage {
    /// Whether the volume is attached to an instance.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.attached_to_instance.is_empty()
    }
}

/// Body for creating a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStorageCreateRequest {
    /// Region id
    pub region: String,
    /// Size in GB
    pub size_gb: u32,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Storage tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
}

/// Body for resizing or relabelling a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStorageUpdateRequest {
    /// New size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u32>,
    /// New label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Serialize)]
struct AttachRequest<'a> {
    instance_id: &'a str,
    live: bool,
}

#[derive(Serialize)]
struct DetachRequest {
    live: bool,
}

/// Handler for `/v2/blocks`.
#[derive(Debug, Clone)]
pub struct BlockStorageService {
    transport: Transport,
}

impl BlockStorageService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a volume.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &BlockStorageCreateRequest,
    ) -> Result<BlockStorage> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "block")
            .await
    }

    /// Fetch one volume.
    pub async fn get(&self, ctx: &RequestContext, block_id: &str) -> Result<BlockStorage> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(block_id)),
                NO_BODY,
                "block",
            )
            .await
    }

    /// Resize or relabel a volume.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        block_id: &str,
        request: &BlockStorageUpdateRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(block_id)),
                Some(request),
            )
            .await
    }

    /// Delete a volume.
    pub async fn delete(&self, ctx: &RequestContext, block_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(block_id)),
                NO_BODY,
            )
            .await
    }

    /// List volumes.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<BlockStorage>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "blocks")
            .await
    }

    /// Attach to an instance. With `live` the instance is not restarted.
    pub async fn attach(
        &self,
        ctx: &RequestContext,
        block_id: &str,
        instance_id: &str,
        live: bool,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/attach", path_segment(block_id)),
                Some(&AttachRequest { instance_id, live }),
            )
            .await
    }

    /// Detach from its instance.
    pub async fn detach(&self, ctx: &RequestContext, block_id: &str, live: bool) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/detach", path_segment(block_id)),
                Some(&DetachRequest { live }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_volume() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/blocks"))
            .and(body_json(json!({"region": "ewr", "size_gb": 50, "label": "data"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "block": {
                    "id": "c1d8e7f6",
                    "cost": 5,
                    "status": "pending",
                    "size_gb": 50,
                    "region": "ewr",
                    "attached_to_instance": "",
                    "label": "data",
                    "block_type": "high_perf"
                }
            })))
            .mount(&server)
            .await;

        let request = BlockStorageCreateRequest {
            region: "ewr".into(),
            size_gb: 50,
            label: Some("data".into()),
            block_type: None,
        };
        let block = BlockStorageService::new(transport(&server))
            .create(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(block.size_gb, 50);
        assert!(!block.is_attached());
    }

    #[tokio::test]
    async fn attach_and_detach_live() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/blocks/vol/attach"))
            .and(body_json(json!({"instance_id": "inst", "live": true})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/blocks/vol/detach"))
            .and(body_json(json!({"live": false})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = BlockStorageService::new(transport(&server));
        service.attach(&ctx(), "vol", "inst", true).await.unwrap();
        service.detach(&ctx(), "vol", false).await.unwrap();
    }

    #[tokio::test]
    async fn update_is_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v2/blocks/vol"))
            .and(body_json(json!({"size_gb": 60})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let request = BlockStorageUpdateRequest {
            size_gb: Some(60),
            label: None,
        };
        BlockStorageService::new(transport(&server))
            .update(&ctx(), "vol", &request)
            .await
            .unwrap();
    }
}
