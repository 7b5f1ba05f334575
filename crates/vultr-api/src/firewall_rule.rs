//! Rules inside a firewall group.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

/// A firewall rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallRule {
    /// Rule number
    pub id: u32,
    /// `v4` or `v6`
    pub ip_type: String,
    /// `accept`
    pub action: String,
    /// `icmp`, `tcp`, `udp` or `gre`
    pub protocol: String,
    /// Port or range, e.g. `8000:8080`
    pub port: String,
    /// Source network address
    pub subnet: String,
    /// Source prefix length
    pub subnet_size: u32,
    /// Source shortcut such as `cloudflare`
    pub source: String,
    /// Free-form note
    pub notes: String,
}

/// Body for creating a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleRequest {
    /// `v4` or `v6`
    pub ip_type: String,
    /// Protocol
    pub protocol: String,
    /// Source network address
    pub subnet: String,
    /// Source prefix length
    pub subnet_size: u32,
    /// Port or range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Source shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Handler for `/v2/firewalls/{group}/rules`.
#[derive(Debug, Clone)]
pub struct FirewallRuleService {
    transport: Transport,
}

impl FirewallRuleService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn rules(group_id: &str) -> String {
        format!("v2/firewalls/{}/rules", path_segment(group_id))
    }

    /// Add a rule.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        request: &FirewallRuleRequest,
    ) -> Result<FirewallRule> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &Self::rules(group_id),
                Some(request),
                "firewall_rule",
            )
            .await
    }

    /// Fetch a rule.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        rule_id: u32,
    ) -> Result<FirewallRule> {
        let path = format!("{}/{rule_id}", Self::rules(group_id));
        self.transport
            .request_field(ctx, Method::GET, &path, NO_BODY, "firewall_rule")
            .await
    }

    /// Delete a rule.
    pub async fn delete(&self, ctx: &RequestContext, group_id: &str, rule_id: u32) -> Result<()> {
        let path = format!("{}/{rule_id}", Self::rules(group_id));
        self.transport
            .request_empty(ctx, Method::DELETE, &path, NO_BODY)
            .await
    }

    /// List rules.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        options: &ListOptions,
    ) -> Result<Page<FirewallRule>> {
        self.transport
            .request_page(ctx, &Self::rules(group_id), &options.to_pairs(), "firewall_rules")
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
    async fn create_rule() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/firewalls/fw1/rules"))
            .and(body_json(json!({
                "ip_type": "v4",
                "protocol": "tcp",
                "subnet": "0.0.0.0",
                "subnet_size": 0,
                "port": "22"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "firewall_rule": {
                    "id": 1,
                    "ip_type": "v4",
                    "action": "accept",
                    "protocol": "tcp",
                    "port": "22",
                    "subnet": "0.0.0.0",
                    "subnet_size": 0
                }
            })))
            .mount(&server)
            .await;

        let request = FirewallRuleRequest {
            ip_type: "v4".into(),
            protocol: "tcp".into(),
            subnet: "0.0.0.0".into(),
            subnet_size: 0,
            port: Some("22".into()),
            source: None,
            notes: None,
        };
        let rule = FirewallRuleService::new(transport(&server))
            .create(&ctx(), "fw1", &request)
            .await
            .unwrap();
        assert_eq!(rule.id, 1);
        assert_eq!(rule.action, "accept");
    }

    #[tokio::test]
    async fn delete_rule_by_number() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/firewalls/fw1/rules/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        FirewallRuleService::new(transport(&server))
            .delete(&ctx(), "fw1", 3)
            .await
            .unwrap();
    }
}
