//! Startup scripts run on first boot or via iPXE.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/startup-scripts";

/// A stored startup script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupScript {
    /// Script id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Last modification time
    pub date_modified: String,
    /// Name
    pub name: String,
    /// `boot` or `pxe`
    #[serde(rename = "type")]
    pub script_type: String,
    /// Base64 script body
    pub script: String,
}

/// Body for creating or updating a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupScriptRequest {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base64 script body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// `boot` or `pxe`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,
}

/// Handler for `/v2/startup-scripts`.
#[derive(Debug, Clone)]
pub struct StartupScriptService {
    transport: Transport,
}

impl StartupScriptService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Store a script.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &StartupScriptRequest,
    ) -> Result<StartupScript> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "startup_script")
            .await
    }

    /// Fetch a script.
    pub async fn get(&self, ctx: &RequestContext, script_id: &str) -> Result<StartupScript> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(script_id)),
                NO_BODY,
                "startup_script",
            )
            .await
    }

    /// Change a script.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        script_id: &str,
        request: &StartupScriptRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(script_id)),
                Some(request),
            )
            .await
    }

    /// Delete a script.
    pub async fn delete(&self, ctx: &RequestContext, script_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(script_id)),
                NO_BODY,
            )
            .await
    }

    /// List scripts.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<StartupScript>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "startup_scripts")
            .await
    }
}
