//! Private networks (VPC).

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/vpcs";

/// A private network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc {
    /// VPC id
    pub id: String,
    /// Region id
    pub region: String,
    /// Description
    pub description: String,
    /// IPv4 network address
    pub v4_subnet: String,
    /// Prefix length
    pub v4_subnet_mask: u32,
    /// Creation time
    pub date_created: String,
}

/// Body for creating a VPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcRequest {
    /// Region id
    pub region: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Network address, chosen by the API when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4_subnet: Option<String>,
    /// Prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4_subnet_mask: Option<u32>,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    description: &'a str,
}

/// Handler for `/v2/vpcs`.
#[derive(Debug, Clone)]
pub struct VpcService {
    transport: Transport,
}

impl VpcService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a VPC.
    pub async fn create(&self, ctx: &RequestContext, request: &VpcRequest) -> Result<Vpc> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "vpc")
            .await
    }

    /// Fetch a VPC.
    pub async fn get(&self, ctx: &RequestContext, vpc_id: &str) -> Result<Vpc> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(vpc_id)),
                NO_BODY,
                "vpc",
            )
            .await
    }

    /// Change the description.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
        description: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(vpc_id)),
                Some(&DescriptionRequest { description }),
            )
            .await
    }

    /// Delete a VPC.
    pub async fn delete(&self, ctx: &RequestContext, vpc_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(vpc_id)),
                NO_BODY,
            )
            .await
    }

    /// List VPCs.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Vpc>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "vpcs")
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
    async fn create_vpc() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/vpcs"))
            .and(body_json(json!({
                "region": "ewr",
                "description": "backend",
                "v4_subnet": "10.99.0.0",
                "v4_subnet_mask": 24
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "vpc": {
                    "id": "v1",
                    "region": "ewr",
                    "description": "backend",
                    "v4_subnet": "10.99.0.0",
                    "v4_subnet_mask": 24
                }
            })))
            .mount(&server)
            .await;

        let request = VpcRequest {
            region: "ewr".into(),
            description: Some("backend".into()),
            v4_subnet: Some("10.99.0.0".into()),
            v4_subnet_mask: Some(24),
        };
        let vpc = VpcService::new(transport(&server))
            .create(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(vpc.v4_subnet_mask, 24);
    }

    #[tokio::test]
    async fn update_puts_description() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/vpcs/v1"))
            .and(body_json(json!({"description": "frontend"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        VpcService::new(transport(&server))
            .update(&ctx(), "v1", "frontend")
            .await
            .unwrap();
    }
}
