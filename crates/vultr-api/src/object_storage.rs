//! S3 compatible object storage subscriptions.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/object-storage";

/// An object storage subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorage {
    /// Subscription id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Cluster id
    pub cluster_id: u32,
    /// Region id
    pub region: String,
    /// Label
    pub label: String,
    /// `active` or `pending`
    pub status: String,
    /// S3 endpoint host
    pub s3_hostname: String,
    /// S3 access key
    pub s3_access_key: String,
    /// S3 secret key
    pub s3_secret_key: String,
}

/// A cluster that can host subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorageCluster {
    /// Cluster id
    pub id: u32,
    /// Region id
    pub region: String,
    /// S3 endpoint host
    pub hostname: String,
    /// `yes` or `no`
    pub deploy: String,
}

/// Regenerated S3 credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Keys {
    /// S3 endpoint host
    pub s3_hostname: String,
    /// S3 access key
    pub s3_access_key: String,
    /// S3 secret key
    pub s3_secret_key: String,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    cluster_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

#[derive(Serialize)]
struct LabelRequest<'a> {
    label: &'a str,
}

/// Handler for `/v2/object-storage`.
#[derive(Debug, Clone)]
pub struct ObjectStorageService {
    transport: Transport,
}

impl ObjectStorageService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Subscribe on a cluster.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        cluster_id: u32,
        label: Option<&str>,
    ) -> Result<ObjectStorage> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                PATH,
                Some(&CreateRequest { cluster_id, label }),
                "object_storage",
            )
            .await
    }

    /// Fetch a subscription.
    pub async fn get(&self, ctx: &RequestContext, id: &str) -> Result<ObjectStorage> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(id)),
                NO_BODY,
                "object_storage",
            )
            .await
    }

    /// Relabel a subscription.
    pub async fn update(&self, ctx: &RequestContext, id: &str, label: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(id)),
                Some(&LabelRequest { label }),
            )
            .await
    }

    /// Cancel a subscription.
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<()> {
        self.transport
            .request_empty(ctx, Method::DELETE, &format!("{PATH}/{}", path_segment(id)), NO_BODY)
            .await
    }

    /// List subscriptions.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<ObjectStorage>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "object_storages")
            .await
    }

    /// List clusters.
    pub async fn list_clusters(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<ObjectStorageCluster>> {
        self.transport
            .request_page(ctx, &format!("{PATH}/clusters"), &options.to_pairs(), "clusters")
            .await
    }

    /// Issue new S3 credentials, invalidating the old ones.
    pub async fn regenerate_keys(&self, ctx: &RequestContext, id: &str) -> Result<S3Keys> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/regenerate-keys", path_segment(id)),
                NO_BODY,
                "s3_credentials",
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
    async fn create_subscription() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/object-storage"))
            .and(body_json(json!({"cluster_id": 2, "label": "assets"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "object_storage": {
                    "id": "os1",
                    "cluster_id": 2,
                    "label": "assets",
                    "status": "pending"
                }
            })))
            .mount(&server)
            .await;

        let storage = ObjectStorageService::new(transport(&server))
            .create(&ctx(), 2, Some("assets"))
            .await
            .unwrap();
        assert_eq!(storage.cluster_id, 2);
    }

    #[tokio::test]
    async fn regenerate_keys() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/object-storage/os1/regenerate-keys"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "s3_credentials": {
                    "s3_hostname": "ewr1.vultrobjects.com",
                    "s3_access_key": "AK",
                    "s3_secret_key": "SK"
                }
            })))
            .mount(&server)
            .await;

        let keys = ObjectStorageService::new(transport(&server))
            .regenerate_keys(&ctx(), "os1")
            .await
            .unwrap();
        assert_eq!(keys.s3_access_key, "AK");
    }
}
