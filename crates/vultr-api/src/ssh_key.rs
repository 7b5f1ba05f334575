//! SSH keys installed on new servers.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/ssh-keys";

/// A stored public key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKey {
    /// Key id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Name
    pub name: String,
    /// Public key in OpenSSH format
    pub ssh_key: String,
}

/// Body for creating or updating a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKeyRequest {
    /// Name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
}

/// Handler for `/v2/ssh-keys`.
#[derive(Debug, Clone)]
pub struct SshKeyService {
    transport: Transport,
}

impl SshKeyService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Store a key.
    pub async fn create(&self, ctx: &RequestContext, request: &SshKeyRequest) -> Result<SshKey> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "ssh_key")
            .await
    }

    /// Fetch a key.
    pub async fn get(&self, ctx: &RequestContext, key_id: &str) -> Result<SshKey> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(key_id)),
                NO_BODY,
                "ssh_key",
            )
            .await
    }

    /// Rename or replace a key.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        key_id: &str,
        request: &SshKeyRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(key_id)),
                Some(request),
            )
            .await
    }

    /// Delete a key.
    pub async fn delete(&self, ctx: &RequestContext, key_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(key_id)),
                NO_BODY,
            )
            .await
    }

    /// List keys.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<SshKey>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "ssh_keys")
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
    async fn create_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/ssh-keys"))
            .and(body_json(json!({"name": "laptop", "ssh_key": "ssh-ed25519 AAAA"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ssh_key": {"id": "k1", "name": "laptop", "ssh_key": "ssh-ed25519 AAAA"}
            })))
            .mount(&server)
            .await;

        let request = SshKeyRequest {
            name: Some("laptop".into()),
            ssh_key: Some("ssh-ed25519 AAAA".into()),
        };
        let key = SshKeyService::new(transport(&server))
            .create(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(key.id, "k1");
    }

    #[tokio::test]
    async fn delete_key() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v2/ssh-keys/k1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        SshKeyService::new(transport(&server))
            .delete(&ctx(), "k1")
            .await
            .unwrap();
    }
}
