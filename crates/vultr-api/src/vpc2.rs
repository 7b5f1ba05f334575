//! VPC 2.0 networks and their attached nodes.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/vpc2";

/// A VPC 2.0 network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc2 {
    /// Network id
    pub id: String,
    /// Region id
    pub region: String,
    /// Description
    pub description: String,
    /// Creation time
    pub date_created: String,
    /// Network address
    pub ip_block: String,
    /// Prefix length
    pub prefix_length: u32,
}

/// A server attached to a VPC 2.0 network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc2Node {
    /// Server id
    pub id: String,
    /// Address inside the network
    pub ip_address: String,
    /// MAC address
    pub mac_address: String,
    /// Server description
    pub description: String,
    /// Node type
    #[serde(rename = "type")]
    pub node_type: String,
    /// Attachment state
    pub node_status: String,
}

/// Body for creating a VPC 2.0 network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc2Request {
    /// Region ID
    pub region: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `v4`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_type: Option<String>,
    /// First address of the subnet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<String>,
    /// Subnet prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    description: &'a str,
}

#[derive(Serialize)]
struct NodesRequest<'a> {
    nodes: &'a [String],
}

/// Handler for `/v2/vpc2`.
#[derive(Debug, Clone)]
pub struct Vpc2Service {
    transport: Transport,
}

impl Vpc2Service {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a network.
    pub async fn create(&self, ctx: &RequestContext, request: &Vpc2Request) -> Result<Vpc2> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "vpc")
            .await
    }

    /// Fetch a network.
    pub async fn get(&self, ctx: &RequestContext, vpc_id: &str) -> Result<Vpc2> {
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

    /// Delete a network.
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

    /// List networks.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Vpc2>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "vpcs")
            .await
    }

    /// Servers attached to a network.
    pub async fn list_nodes(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
        options: &ListOptions,
    ) -> Result<Page<Vpc2Node>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/nodes", path_segment(vpc_id)),
                &options.to_pairs(),
                "nodes",
            )
            .await
    }

    /// Attach servers.
    pub async fn attach(&self, ctx: &RequestContext, vpc_id: &str, nodes: &[String]) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/nodes/attach", path_segment(vpc_id)),
                Some(&NodesRequest { nodes }),
            )
            .await
    }

    /// Detach servers.
    pub async fn detach(&self, ctx: &RequestContext, vpc_id: &str, nodes: &[String]) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/nodes/detach", path_segment(vpc_id)),
                Some(&NodesRequest { nodes }),
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
    async fn attach_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/vpc2/net/nodes/attach"))
            .and(body_json(json!({"nodes": ["n1", "n2"]})))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        Vpc2Service::new(transport(&server))
            .attach(&ctx(), "net", &["n1".to_string(), "n2".to_string()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/vpc2/net/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nodes": [{
                    "id": "n1",
                    "ip_address": "10.1.96.3",
                    "type": "vps",
                    "node_status": "attached"
                }],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let page = Vpc2Service::new(transport(&server))
            .list_nodes(&ctx(), "net", &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(page.items[0].node_type, "vps");
        assert_eq!(page.items[0].node_status, "attached");
    }
}
