//! Firewall groups.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/firewalls";

/// A named set of firewall rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallGroup {
    /// Group id
    pub id: String,
    /// Description
    pub description: String,
    /// Creation time
    pub date_created: String,
    /// Last modification time
    pub date_modified: String,
    /// Instances using the group
    pub instance_count: u32,
    /// Rules in the group
    pub rule_count: u32,
    /// Rule limit
    pub max_rule_count: u32,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Handler for `/v2/firewalls`.
#[derive(Debug, Clone)]
pub struct FirewallGroupService {
    transport: Transport,
}

impl FirewallGroupService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a group.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        description: Option<&str>,
    ) -> Result<FirewallGroup> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                PATH,
                Some(&DescriptionRequest { description }),
                "firewall_group",
            )
            .await
    }

    /// Fetch a group.
    pub async fn get(&self, ctx: &RequestContext, group_id: &str) -> Result<FirewallGroup> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(group_id)),
                NO_BODY,
                "firewall_group",
            )
            .await
    }

    /// Change the description.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        description: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(group_id)),
                Some(&DescriptionRequest {
                    description: Some(description),
                }),
            )
            .await
    }

    /// Delete a group.
    pub async fn delete(&self, ctx: &RequestContext, group_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(group_id)),
                NO_BODY,
            )
            .await
    }

    /// List groups.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<FirewallGroup>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "firewall_groups")
            .await
    }
}
