//! Sub-users of the account.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/users";

/// An account user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Whether API access is enabled
    pub api_enabled: bool,
    /// Granted permissions
    pub acls: Vec<String>,
    /// API key, only returned on creation
    pub api_key: String,
}

/// Body for creating or updating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Whether the user may use the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_enabled: Option<bool>,
    /// Permissions granted to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acls: Option<Vec<String>>,
}

/// Handler for `/v2/users`.
#[derive(Debug, Clone)]
pub struct UserService {
    transport: Transport,
}

impl UserService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Invite a user.
    pub async fn create(&self, ctx: &RequestContext, request: &UserRequest) -> Result<User> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "user")
            .await
    }

    /// Fetch a user.
    pub async fn get(&self, ctx: &RequestContext, user_id: &str) -> Result<User> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(user_id)),
                NO_BODY,
                "user",
            )
            .await
    }

    /// Change a user.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        request: &UserRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(user_id)),
                Some(request),
            )
            .await
    }

    /// Remove a user.
    pub async fn delete(&self, ctx: &RequestContext, user_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(user_id)),
                NO_BODY,
            )
            .await
    }

    /// List users.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<User>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "users")
            .await
    }
}
