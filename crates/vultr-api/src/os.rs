//! Operating system images.

use serde::{Deserialize, Serialize};
use vultr_core::{ListOptions, Page, RequestContext, Transport};

use crate::Result;

/// An operating system that can be installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Os {
    /// OS id
    pub id: u32,
    /// Name
    pub name: String,
    /// Architecture
    pub arch: String,
    /// Family
    pub family: String,
}

/// Handler for `/v2/os`.
#[derive(Debug, Clone)]
pub struct OsService {
    transport: Transport,
}

impl OsService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List operating systems.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Os>> {
        self.transport
            .request_page(ctx, "v2/os", &options.to_pairs(), "os")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_os() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/os"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "os": [{"id": 127, "name": "CentOS 6 x64", "arch": "x64", "family": "centos"}],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let page = OsService::new(transport(&server))
            .list(&ctx(), &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items[0].id, 127);
        assert_eq!(page.items[0].family, "centos");
    }
}
