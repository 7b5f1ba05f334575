//! Uploaded and public ISO images.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/iso";

/// An ISO in the account's library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Iso {
    /// ISO id
    pub id: String,
    /// Upload time
    pub date_created: String,
    /// File name
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// MD5 checksum
    pub md5sum: String,
    /// SHA-512 checksum
    pub sha512sum: String,
    /// `pending` or `complete`
    pub status: String,
}

/// A public ISO offered by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicIso {
    /// ISO id
    pub id: String,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// MD5 checksum
    pub md5sum: String,
}

#[derive(Serialize)]
struct IsoRequest<'a> {
    url: &'a str,
}

/// Handler for `/v2/iso`.
#[derive(Debug, Clone)]
pub struct IsoService {
    transport: Transport,
}

impl IsoService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Download an ISO from `url` into the library.
    pub async fn create(&self, ctx: &RequestContext, url: &str) -> Result<Iso> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(&IsoRequest { url }), "iso")
            .await
    }

    /// Fetch one ISO.
    pub async fn get(&self, ctx: &RequestContext, iso_id: &str) -> Result<Iso> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(iso_id)),
                NO_BODY,
                "iso",
            )
            .await
    }

    /// Delete an ISO.
    pub async fn delete(&self, ctx: &RequestContext, iso_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(iso_id)),
                NO_BODY,
            )
            .await
    }

    /// List the library.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Iso>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "isos")
            .await
    }

    /// List public ISOs.
    pub async fn list_public(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<PublicIso>> {
        self.transport
            .request_page(ctx, "v2/iso-public", &options.to_pairs(), "public_isos")
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
    async fn create_iso_from_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/iso"))
            .and(body_json(json!({"url": "https://example.com/alpine.iso"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "iso": {"id": "iso1", "filename": "alpine.iso", "status": "pending"}
            })))
            .mount(&server)
            .await;

        let iso = IsoService::new(transport(&server))
            .create(&ctx(), "https://example.com/alpine.iso")
            .await
            .unwrap();
        assert_eq!(iso.filename, "alpine.iso");
    }

    #[tokio::test]
    async fn list_public_isos() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/iso-public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_isos": [{"id": "p1", "name": "CentOS 7", "description": "7 x86_64 Minimal"}]
            })))
            .mount(&server)
            .await;

        let page = IsoService::new(transport(&server))
            .list_public(&ctx(), &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(page.items[0].name, "CentOS 7");
        assert_eq!(page.meta.total, 0);
    }
}
