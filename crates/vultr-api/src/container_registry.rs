//! Container registries.
//!
//! Unlike the other resource families, single-object responses here are not
//! wrapped in an envelope: the body is the resource itself.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::query::QueryParams;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/registry";

/// A container registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Registry id
    pub id: String,
    /// Registry name
    pub name: String,
    /// Push/pull URN
    pub urn: String,
    /// Storage usage
    pub storage: RegistryStorage,
    /// Creation time
    pub date_created: String,
    /// Whether anonymous pulls are allowed
    pub public: bool,
    /// Root user credentials
    pub root_user: RegistryUser,
    /// Metadata such as region and subscription
    pub metadata: RegistryMetadata,
}

/// Storage used by a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryStorage {
    /// Used space
    pub used: RegistryStorageSize,
    /// Allowed space
    pub allowed: RegistryStorageSize,
}

/// A storage size in several units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryStorageSize {
    /// Size in MB
    pub mb: String,
    /// Last update time
    pub updated_at: String,
}

/// Registry root user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryUser {
    /// User ID
    pub id: u64,
    /// Username
    pub username: String,
    /// Password
    pub password: String,
    /// Whether this is the registry root user
    pub root: bool,
    /// When the entry was added
    pub added_at: String,
    /// When the entry last changed
    pub updated_at: String,
}

/// Registry region and subscription details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryMetadata {
    /// Region
    pub region: RegistryRegion,
}

/// A region offering registries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryRegion {
    /// Region ID
    pub id: u64,
    /// Region name
    pub name: String,
    /// Registry URN
    pub urn: String,
    /// Registry endpoint for this region
    pub base_url: String,
    /// Whether images are publicly readable
    pub public: bool,
    /// When the entry was added
    pub added_at: String,
    /// When the entry last changed
    pub updated_at: String,
}

/// An image repository inside a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Full name, `registry/image`
    pub name: String,
    /// Image name
    pub image: String,
    /// Description
    pub description: String,
    /// Creation time
    pub added_at: String,
    /// Last update time
    pub updated_at: String,
    /// Pull count
    pub pull_count: u64,
    /// Number of artifacts
    pub artifact_count: u64,
}

/// A registry plan with its limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPlan {
    /// Display name
    pub vanity_name: String,
    /// Storage limit in MB
    pub max_storage_mb: u64,
    /// Monthly price in USD
    pub monthly_price: u64,
}

/// Docker `config.json` contents with an auth entry for the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerCredentials {
    /// Per-host auth entries
    pub auths: BTreeMap<String, DockerAuth>,
}

/// One auth entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerAuth {
    /// Base64 `user:password`
    pub auth: String,
}

/// Body for creating a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCreateRequest {
    /// Registry name
    pub name: String,
    /// Allow anonymous pulls
    pub public: bool,
    /// Region name
    pub region: String,
    /// Plan id
    pub plan: String,
}

/// Body for updating a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryUpdateRequest {
    /// Allow anonymous pulls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    /// Plan id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    description: &'a str,
}

/// Handler for `/v2/registry`.
#[derive(Debug, Clone)]
pub struct ContainerRegistryService {
    transport: Transport,
}

impl ContainerRegistryService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Create a registry.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &RegistryCreateRequest,
    ) -> Result<Registry> {
        self.transport
            .request_json(ctx, Method::POST, PATH, &[], Some(request))
            .await
    }

    /// Fetch a registry.
    pub async fn get(&self, ctx: &RequestContext, registry_id: &str) -> Result<Registry> {
        self.transport
            .request_json(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(registry_id)),
                &[],
                NO_BODY,
            )
            .await
    }

    /// Update a registry.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        request: &RegistryUpdateRequest,
    ) -> Result<Registry> {
        self.transport
            .request_json(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(registry_id)),
                &[],
                Some(request),
            )
            .await
    }

    /// Delete a registry.
    pub async fn delete(&self, ctx: &RequestContext, registry_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(registry_id)),
                NO_BODY,
            )
            .await
    }

    /// List registries.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Registry>> {
        self.transport
            .request_page(ctx, "v2/registries", &options.to_pairs(), "registries")
            .await
    }

    /// List repositories in a registry.
    pub async fn list_repositories(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        options: &ListOptions,
    ) -> Result<Page<Repository>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/repositories", path_segment(registry_id)),
                &options.to_pairs(),
                "repositories",
            )
            .await
    }

    /// Fetch a repository.
    pub async fn get_repository(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        image: &str,
    ) -> Result<Repository> {
        self.transport
            .request_json(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/repository/{}", path_segment(registry_id), path_segment(image)),
                &[],
                NO_BODY,
            )
            .await
    }

    /// Change a repository's description.
    pub async fn update_repository(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        image: &str,
        description: &str,
    ) -> Result<Repository> {
        self.transport
            .request_json(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}/repository/{}", path_segment(registry_id), path_segment(image)),
                &[],
                Some(&DescriptionRequest { description }),
            )
            .await
    }

    /// Delete a repository and its images.
    pub async fn delete_repository(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        image: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}/repository/{}", path_segment(registry_id), path_segment(image)),
                NO_BODY,
            )
            .await
    }

    /// Issue Docker credentials. `expiry_seconds` of `None` means they never
    /// expire; `read_write` grants push access.
    pub async fn create_docker_credentials(
        &self,
        ctx: &RequestContext,
        registry_id: &str,
        expiry_seconds: Option<u64>,
        read_write: bool,
    ) -> Result<DockerCredentials> {
        let mut params = QueryParams::new();
        params.push_opt("expiry_seconds", expiry_seconds);
        params.push("read_write", read_write);
        self.transport
            .request_json(
                ctx,
                Method::OPTIONS,
                &format!("{PATH}/{}/docker-credentials", path_segment(registry_id)),
                &params.into_pairs(),
                NO_BODY,
            )
            .await
    }

    /// Regions offering registries.
    pub async fn list_regions(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<RegistryRegion>> {
        self.transport
            .request_page(ctx, &format!("{PATH}/region/list"), &options.to_pairs(), "regions")
            .await
    }

    /// Plans keyed by plan id.
    pub async fn list_plans(&self, ctx: &RequestContext) -> Result<BTreeMap<String, RegistryPlan>> {
        self.transport
            .request_field(ctx, Method::GET, &format!("{PATH}/plan/list"), NO_BODY, "plans")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_registry_is_not_enveloped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/registry/reg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "reg1",
                "name": "acme",
                "urn": "sjc.vultrcr.com/acme",
                "public": false,
                "storage": {"used": {"mb": "0.00"}, "allowed": {"mb": "20480.00"}},
                "root_user": {"id": 1, "username": "root", "root": true},
                "metadata": {
                    "region": {"id": 1, "name": "sjc", "base_url": "https://sjc.vultrcr.com"}
                }
            })))
            .mount(&server)
            .await;

        let registry = ContainerRegistryService::new(transport(&server))
            .get(&ctx(), "reg1")
            .await
            .unwrap();
        assert_eq!(registry.urn, "sjc.vultrcr.com/acme");
        assert_eq!(registry.storage.allowed.mb, "20480.00");
        assert!(registry.root_user.root);
        assert_eq!(registry.metadata.region.name, "sjc");
    }

    #[tokio::test]
    async fn create_registry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/registry"))
            .and(body_json(json!({
                "name": "acme",
                "public": true,
                "region": "sjc",
                "plan": "start_up"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "reg2",
                "name": "acme",
                "public": true
            })))
            .mount(&server)
            .await;

        let request = RegistryCreateRequest {
            name: "acme".into(),
            public: true,
            region: "sjc".into(),
            plan: "start_up".into(),
        };
        let registry = ContainerRegistryService::new(transport(&server))
            .create(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(registry.id, "reg2");
    }

    #[tokio::test]
    async fn docker_credentials_use_options_method() {
        let server = MockServer::start().await;
        Mock::given(method("OPTIONS"))
            .and(path("/v2/registry/reg1/docker-credentials"))
            .and(query_param("expiry_seconds", "3600"))
            .and(query_param("read_write", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "auths": {"sjc.vultrcr.com": {"auth": "cm9vdDpzZWNyZXQ="}}
            })))
            .mount(&server)
            .await;

        let creds = ContainerRegistryService::new(transport(&server))
            .create_docker_credentials(&ctx(), "reg1", Some(3600), true)
            .await
            .unwrap();
        assert_eq!(creds.auths["sjc.vultrcr.com"].auth, "cm9vdDpzZWNyZXQ=");
    }

    #[tokio::test]
    async fn plans_are_keyed_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/registry/plan/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "plans": {
                    "start_up": {
                        "vanity_name": "Start Up",
                        "max_storage_mb": 10240,
                        "monthly_price": 5
                    },
                    "business": {
                        "vanity_name": "Business",
                        "max_storage_mb": 102_400,
                        "monthly_price": 20
                    }
                }
            })))
            .mount(&server)
            .await;

        let plans = ContainerRegistryService::new(transport(&server))
            .list_plans(&ctx())
            .await
            .unwrap();
        assert_eq!(plans["business"].monthly_price, 20);
        assert_eq!(plans.len(), 2);
    }
}
