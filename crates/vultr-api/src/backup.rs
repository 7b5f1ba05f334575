//! Automatic and manual backups.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::query::QueryParams;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/backups";

/// A stored backup image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backup {
    /// Backup id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Description
    pub description: String,
    /// Size in bytes
    pub size: u64,
    /// `pending` or `complete`
    pub status: String,
}

/// Handler for `/v2/backups`.
#[derive(Debug, Clone)]
pub struct BackupService {
    transport: Transport,
}

impl BackupService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch one backup.
    pub async fn get(&self, ctx: &RequestContext, backup_id: &str) -> Result<Backup> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(backup_id)),
                NO_BODY,
                "backup",
            )
            .await
    }

    /// List backups, optionally only those of one instance.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        instance_id: Option<&str>,
        options: &ListOptions,
    ) -> Result<Page<Backup>> {
        let mut params = QueryParams::new();
        params.push_non_empty("instance_id", instance_id);
        params.extend(options.to_params());
        self.transport
            .request_page(ctx, PATH, &params.into_pairs(), "backups")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_backup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/backups/cb676a46"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "backup": {
                    "id": "cb676a46",
                    "date_created": "2020-10-10T01:56:20+00:00",
                    "description": "nightly",
                    "size": 10000000,
                    "status": "complete"
                }
            })))
            .mount(&server)
            .await;

        let backup = BackupService::new(transport(&server))
            .get(&ctx(), "cb676a46")
            .await
            .unwrap();
        assert_eq!(backup.size, 10_000_000);
        assert_eq!(backup.status, "complete");
    }

    #[tokio::test]
    async fn list_filters_by_instance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/backups"))
            .and(query_param("instance_id", "abc"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "backups": [],
                "meta": {"total": 0, "links": {"next": "", "prev": ""}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = BackupService::new(transport(&server))
            .list(&ctx(), Some("abc"), &ListOptions::new().with_per_page(10))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert!(!page.has_next());
    }
}
