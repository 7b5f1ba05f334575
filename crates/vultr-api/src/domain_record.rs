//! Records inside a DNS domain.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

/// A DNS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRecord {
    /// Record id
    pub id: String,
    /// `A`, `AAAA`, `CNAME`, `MX`, ...
    #[serde(rename = "type")]
    pub record_type: String,
    /// Host name, empty for the apex
    pub name: String,
    /// Record data
    pub data: String,
    /// Priority for MX and SRV
    pub priority: i32,
    /// TTL in seconds
    pub ttl: u32,
}

/// Body for creating or updating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecordRequest {
    /// Record type, such as `A` or `MX`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// Record name, empty for the apex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Record value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Time to live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Priority, MX and SRV only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Handler for `/v2/domains/{domain}/records`.
#[derive(Debug, Clone)]
pub struct DomainRecordService {
    transport: Transport,
}

impl DomainRecordService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn records(domain: &str) -> String {
        format!("v2/domains/{}/records", path_segment(domain))
    }

    /// Add a record.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        domain: &str,
        request: &DomainRecordRequest,
    ) -> Result<DomainRecord> {
        self.transport
            .request_field(ctx, Method::POST, &Self::records(domain), Some(request), "record")
            .await
    }

    /// Fetch a record.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        domain: &str,
        record_id: &str,
    ) -> Result<DomainRecord> {
        let path = format!("{}/{}", Self::records(domain), path_segment(record_id));
        self.transport
            .request_field(ctx, Method::GET, &path, NO_BODY, "record")
            .await
    }

    /// Change a record.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        domain: &str,
        record_id: &str,
        request: &DomainRecordRequest,
    ) -> Result<()> {
        let path = format!("{}/{}", Self::records(domain), path_segment(record_id));
        self.transport
            .request_empty(ctx, Method::PATCH, &path, Some(request))
            .await
    }

    /// Delete a record.
    pub async fn delete(&self, ctx: &RequestContext, domain: &str, record_id: &str) -> Result<()> {
        let path = format!("{}/{}", Self::records(domain), path_segment(record_id));
        self.transport
            .request_empty(ctx, Method::DELETE, &path, NO_BODY)
            .await
    }

    /// List records.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        domain: &str,
        options: &ListOptions,
    ) -> Result<Page<DomainRecord>> {
        self.transport
            .request_page(ctx, &Self::records(domain), &options.to_pairs(), "records")
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
    async fn create_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/domains/example.com/records"))
            .and(body_json(json!({"type": "A", "name": "www", "data": "192.0.2.123", "ttl": 300})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "record": {
                    "id": "r1",
                    "type": "A",
                    "name": "www",
                    "data": "192.0.2.123",
                    "priority": -1,
                    "ttl": 300
                }
            })))
            .mount(&server)
            .await;

        let request = DomainRecordRequest {
            record_type: Some("A".into()),
            name: Some("www".into()),
            data: Some("192.0.2.123".into()),
            ttl: Some(300),
            priority: None,
        };
        let record = DomainRecordService::new(transport(&server))
            .create(&ctx(), "example.com", &request)
            .await
            .unwrap();
        assert_eq!(record.record_type, "A");
        assert_eq!(record.priority, -1);
    }

    #[tokio::test]
    async fn list_records_without_meta() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/domains/example.com/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{"id": "r1", "type": "MX", "priority": 10}]
            })))
            .mount(&server)
            .await;

        let page = DomainRecordService::new(transport(&server))
            .list(&ctx(), "example.com", &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(page.items[0].priority, 10);
        assert!(!page.has_next());
    }
}
