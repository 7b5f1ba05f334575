//! One-click and marketplace applications.

use serde::{Deserialize, Serialize};
use vultr_core::{ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/applications";

/// An installable application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    /// Application id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Short name
    pub short_name: String,
    /// Name used in deploy forms
    pub deploy_name: String,
    /// `one-click` or `marketplace`
    #[serde(rename = "type")]
    pub app_type: String,
    /// Marketplace vendor
    pub vendor: String,
    /// Marketplace image id
    pub image_id: String,
}

/// Handler for `/v2/applications`.
#[derive(Debug, Clone)]
pub struct ApplicationService {
    transport: Transport,
}

impl ApplicationService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List available applications.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Application>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "applications")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_applications_with_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/applications"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "applications": [{
                    "id": 1,
                    "name": "LEMP",
                    "short_name": "lemp",
                    "deploy_name": "LEMP on CentOS 6 x64",
                    "type": "one-click",
                    "vendor": "",
                    "image_id": ""
                }],
                "meta": {"total": 29, "links": {"next": "bmV4dF9fMg==", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let page = ApplicationService::new(transport(&server))
            .list(&ctx(), &ListOptions::new().with_per_page(1))
            .await
            .unwrap();
        assert_eq!(page.items[0].app_type, "one-click");
        assert_eq!(page.meta.total, 29);
        assert!(page.has_next());
    }
}
