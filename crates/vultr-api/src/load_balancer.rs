//! Load balancers with their forwarding and firewall rules.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/load-balancers";

/// A load balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    /// Load balancer id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Region id
    pub region: String,
    /// Label
    pub label: String,
    /// `active` or `pending`
    pub status: String,
    /// Public IPv4 address
    pub ipv4: String,
    /// Public IPv6 address
    pub ipv6: String,
    /// Number of balancing nodes
    pub nodes: u32,
    /// Balancing and session settings
    pub generic_info: GenericInfo,
    /// Backend health check
    pub health_check: HealthCheck,
    /// Whether a TLS certificate is installed
    pub has_ssl: bool,
    /// Backend instance ids
    pub instances: Vec<String>,
    /// Forwarding rules
    pub forwarding_rules: Vec<ForwardingRule>,
    /// Firewall rules
    pub firewall_rules: Vec<LbFirewallRule>,
}

/// Balancing and session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericInfo {
    /// `roundrobin` or `leastconn`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<String>,
    /// Redirect HTTP to HTTPS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    /// Use the PROXY protocol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<bool>,
    /// Attached VPC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<String>,
    /// Sticky session settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky_sessions: Option<StickySessions>,
}

/// Cookie based session affinity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickySessions {
    /// Cookie name
    pub cookie_name: String,
}

/// Backend health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheck {
    /// Protocol checked, `http` or `tcp`
    pub protocol: String,
    /// Port checked
    pub port: u32,
    /// HTTP path checked
    pub path: String,
    /// Seconds between checks
    pub check_interval: u32,
    /// Seconds to wait for a response
    pub response_timeout: u32,
    /// Failures before a node is marked unhealthy
    pub unhealthy_threshold: u32,
    /// Successes before a node is marked healthy
    pub healthy_threshold: u32,
}

/// Maps a frontend port to a backend port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingRule {
    /// Rule id, empty in requests
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Frontend protocol
    pub frontend_protocol: String,
    /// Frontend port
    pub frontend_port: u32,
    /// Backend protocol
    pub backend_protocol: String,
    /// Backend port
    pub backend_port: u32,
}

/// Source restriction on a load balancer port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LbFirewallRule {
    /// Rule id, empty in requests
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Port
    pub port: u32,
    /// Allowed source, CIDR or `cloudflare`
    pub source: String,
    /// `v4` or `v6`
    pub ip_type: String,
}

/// Body for creating or updating a load balancer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerRequest {
    /// Region ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `roundrobin` or `leastconn`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balancing_algorithm: Option<String>,
    /// Redirect HTTP to HTTPS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_redirect: Option<bool>,
    /// Enable the PROXY protocol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_protocol: Option<bool>,
    /// Number of balancer nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<u32>,
    /// Backend health check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    /// Frontend to backend port mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarding_rules: Option<Vec<ForwardingRule>>,
    /// Inbound firewall rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_rules: Option<Vec<LbFirewallRule>>,
    /// Cookie based session affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky_session: Option<StickySessions>,
    /// Instance IDs behind the balancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<Vec<String>>,
    /// VPC to place the balancer in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc: Option<String>,
}

/// Handler for `/v2/load-balancers`.
#[derive(Debug, Clone)]
pub struct LoadBalancerService {
    transport: Transport,
}

impl LoadBalancerService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn forwarding_rule(lb_id: &str, rule_id: &str) -> String {
        format!(
            "{PATH}/{}/forwarding-rules/{}",
            path_segment(lb_id),
            path_segment(rule_id)
        )
    }

    fn firewall_rule(lb_id: &str, rule_id: &str) -> String {
        format!(
            "{PATH}/{}/firewall-rules/{}",
            path_segment(lb_id),
            path_segment(rule_id)
        )
    }

    /// Create a load balancer.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &LoadBalancerRequest,
    ) -> Result<LoadBalancer> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "load_balancer")
            .await
    }

    /// Fetch a load balancer.
    pub async fn get(&self, ctx: &RequestContext, lb_id: &str) -> Result<LoadBalancer> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(lb_id)),
                NO_BODY,
                "load_balancer",
            )
            .await
    }

    /// Change a load balancer.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        request: &LoadBalancerRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(lb_id)),
                Some(request),
            )
            .await
    }

    /// Delete a load balancer.
    pub async fn delete(&self, ctx: &RequestContext, lb_id: &str) -> Result<()> {
        self.transport
            .request_empty(ctx, Method::DELETE, &format!("{PATH}/{}", path_segment(lb_id)), NO_BODY)
            .await
    }

    /// List load balancers.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<LoadBalancer>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "load_balancers")
            .await
    }

    /// List forwarding rules.
    pub async fn list_forwarding_rules(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        options: &ListOptions,
    ) -> Result<Page<ForwardingRule>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/forwarding-rules", path_segment(lb_id)),
                &options.to_pairs(),
                "forwarding_rules",
            )
            .await
    }

    /// Add a forwarding rule.
    pub async fn create_forwarding_rule(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        rule: &ForwardingRule,
    ) -> Result<ForwardingRule> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/forwarding-rules", path_segment(lb_id)),
                Some(rule),
                "forwarding_rule",
            )
            .await
    }

    /// Fetch a forwarding rule.
    pub async fn get_forwarding_rule(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        rule_id: &str,
    ) -> Result<ForwardingRule> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &Self::forwarding_rule(lb_id, rule_id),
                NO_BODY,
                "forwarding_rule",
            )
            .await
    }

    /// Delete a forwarding rule.
    pub async fn delete_forwarding_rule(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        rule_id: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &Self::forwarding_rule(lb_id, rule_id),
                NO_BODY,
            )
            .await
    }

    /// List firewall rules.
    pub async fn list_firewall_rules(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        options: &ListOptions,
    ) -> Result<Page<LbFirewallRule>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/firewall-rules", path_segment(lb_id)),
                &options.to_pairs(),
                "firewall_rules",
            )
            .await
    }

    /// Fetch a firewall rule.
    pub async fn get_firewall_rule(
        &self,
        ctx: &RequestContext,
        lb_id: &str,
        rule_id: &str,
    ) -> Result<LbFirewallRule> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &Self::firewall_rule(lb_id, rule_id),
                NO_BODY,
                "firewall_rule",
            )
            .await
    }
}
