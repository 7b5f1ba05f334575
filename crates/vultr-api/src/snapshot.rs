//! Instance snapshots.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::common::parse_timestamp;
use crate::Result;

const PATH: &str = "v2/snapshots";

/// A point-in-time image of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Snapshot id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Description
    pub description: String,
    /// Size in bytes
    pub size: u64,
    /// Compressed size in bytes
    pub compressed_size: u64,
    /// `pending` or `complete`
    pub status: String,
    /// OS id of the source
    pub os_id: u32,
    /// Application id of the source
    pub app_id: u32,
}

impl Snapshot {
    /// Parsed `date_created`.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_created)
    }
}

/// Body for snapshotting an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    /// Source instance
    pub instance_id: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for importing a raw image from a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUrlRequest {
    /// Image URL
    pub url: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    description: &'a str,
}

/// Handler for `/v2/snapshots`.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    transport: Transport,
}

impl SnapshotService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Snapshot an instance.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &SnapshotRequest,
    ) -> Result<Snapshot> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "snapshot")
            .await
    }

    /// Import a snapshot from a URL.
    pub async fn create_from_url(
        &self,
        ctx: &RequestContext,
        request: &SnapshotUrlRequest,
    ) -> Result<Snapshot> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/create-from-url"),
                Some(request),
                "snapshot",
            )
            .await
    }

    /// Fetch one snapshot.
    pub async fn get(&self, ctx: &RequestContext, snapshot_id: &str) -> Result<Snapshot> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(snapshot_id)),
                NO_BODY,
                "snapshot",
            )
            .await
    }

    /// Change the description.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        snapshot_id: &str,
        description: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(snapshot_id)),
                Some(&DescriptionRequest { description }),
            )
            .await
    }

    /// Delete a snapshot.
    pub async fn delete(&self, ctx: &RequestContext, snapshot_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(snapshot_id)),
                NO_BODY,
            )
            .await
    }

    /// List snapshots. `options.description` filters by description.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Snapshot>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "snapshots")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_from_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snapshots/create-from-url"))
            .and(body_json(json!({"url": "https://example.com/disk.raw"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "snapshot": {"id": "snap", "status": "pending", "size": 0}
            })))
            .mount(&server)
            .await;

        let request = SnapshotUrlRequest {
            url: "https://example.com/disk.raw".into(),
            description: None,
        };
        let snapshot = SnapshotService::new(transport(&server))
            .create_from_url(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(snapshot.status, "pending");
        assert!(snapshot.created_at().is_none());
    }

    #[tokio::test]
    async fn list_by_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/snapshots"))
            .and(query_param("description", "nightly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "snapshots": [{"id": "s1", "description": "nightly"}],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let page = SnapshotService::new(transport(&server))
            .list(&ctx(), &ListOptions::new().with_description("nightly"))
            .await
            .unwrap();
        assert_eq!(page.items[0].id, "s1");
    }

    #[tokio::test]
    async fn update_puts_description() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/snapshots/s1"))
            .and(body_json(json!({"description": "weekly"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        SnapshotService::new(transport(&server))
            .update(&ctx(), "s1", "weekly")
            .await
            .unwrap();
    }
}
