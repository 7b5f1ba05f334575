//! Vultr Kubernetes Engine clusters and node pools.
//!
//! Cluster operations live under `/v2/kubernetes/clusters`; node pools are
//! addressed through their cluster.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/kubernetes/clusters";

/// A managed Kubernetes cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    /// Cluster id
    pub id: String,
    /// Label
    pub label: String,
    /// Creation time
    pub date_created: String,
    /// Pod network
    pub cluster_subnet: String,
    /// Service network
    pub service_subnet: String,
    /// Control plane address
    pub ip: String,
    /// Control plane endpoint
    pub endpoint: String,
    /// Kubernetes version
    pub version: String,
    /// Region id
    pub region: String,
    /// `active` or `pending`
    pub status: String,
    /// Node pools
    pub node_pools: Vec<NodePool>,
}

/// A group of identical worker nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePool {
    /// Pool id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Last update time
    pub date_updated: String,
    /// Label
    pub label: String,
    /// Plan of each node
    pub plan: String,
    /// Pool status
    pub status: String,
    /// Desired node count
    pub node_quantity: u32,
    /// Autoscaler lower bound
    pub min_nodes: u32,
    /// Autoscaler upper bound
    pub max_nodes: u32,
    /// Whether the autoscaler is on
    pub auto_scaler: bool,
    /// Tag applied to nodes
    pub tag: String,
    /// Nodes in the pool
    pub nodes: Vec<Node>,
}

/// A worker node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Node id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Label
    pub label: String,
    /// Node status
    pub status: String,
}

/// Body for creating a node pool, also used inline when creating a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePoolRequest {
    /// Number of nodes
    pub node_quantity: u32,
    /// Label
    pub label: String,
    /// Plan for every node in the pool
    pub plan: String,
    /// Tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Enable the cluster autoscaler for this pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scaler: Option<bool>,
    /// Autoscaler lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<u32>,
    /// Autoscaler upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<u32>,
}

/// Body for resizing or retagging a node pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePoolUpdateRequest {
    /// Number of nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_quantity: Option<u32>,
    /// Tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Enable the cluster autoscaler for this pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_scaler: Option<bool>,
    /// Autoscaler lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<u32>,
    /// Autoscaler upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<u32>,
}

/// Body for creating a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRequest {
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Region id
    pub region: String,
    /// Kubernetes version, see [`KubernetesService::get_versions`]
    pub version: String,
    /// Initial node pools
    pub node_pools: Vec<NodePoolRequest>,
}

/// Resources created alongside a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterResources {
    /// Block storage volumes
    pub block_storage: Vec<ClusterResource>,
    /// Load balancers
    pub load_balancer: Vec<ClusterResource>,
}

/// One linked resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterResource {
    /// Resource ID
    pub id: String,
    /// Label
    pub label: String,
    /// Creation time
    pub date_created: String,
    /// Status
    pub status: String,
}

#[derive(Serialize)]
struct LabelRequest<'a> {
    label: &'a str,
}

#[derive(Serialize)]
struct UpgradeRequest<'a> {
    upgrade_version: &'a str,
}

/// Handler for `/v2/kubernetes`.
#[derive(Debug, Clone)]
pub struct KubernetesService {
    transport: Transport,
}

impl KubernetesService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn cluster(cluster_id: &str) -> String {
        format!("{PATH}/{}", path_segment(cluster_id))
    }

    fn pools(cluster_id: &str) -> String {
        format!("{PATH}/{}/node-pools", path_segment(cluster_id))
    }

    /// Create a cluster.
    pub async fn create_cluster(
        &self,
        ctx: &RequestContext,
        request: &ClusterRequest,
    ) -> Result<Cluster> {
        debug!(region = %request.region, version = %request.version, "Creating Kubernetes cluster");
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "vke_cluster")
            .await
    }

    /// Fetch a cluster.
    pub async fn get_cluster(&self, ctx: &RequestContext, cluster_id: &str) -> Result<Cluster> {
        self.transport
            .request_field(ctx, Method::GET, &Self::cluster(cluster_id), NO_BODY, "vke_cluster")
            .await
    }

    /// List clusters.
    pub async fn list_clusters(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Cluster>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "vke_clusters")
            .await
    }

    /// Relabel a cluster.
    pub async fn update_cluster(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        label: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &Self::cluster(cluster_id),
                Some(&LabelRequest { label }),
            )
            .await
    }

    /// Delete a cluster, leaving linked resources in place.
    pub async fn delete_cluster(&self, ctx: &RequestContext, cluster_id: &str) -> Result<()> {
        self.transport
            .request_empty(ctx, Method::DELETE, &Self::cluster(cluster_id), NO_BODY)
            .await
    }

    /// Delete a cluster together with its volumes and load balancers.
    pub async fn delete_cluster_with_resources(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}/delete-with-linked-resources", path_segment(cluster_id)),
                NO_BODY,
            )
            .await
    }

    /// Resources the cluster has created.
    pub async fn get_resources(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
    ) -> Result<ClusterResources> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/resources", path_segment(cluster_id)),
                NO_BODY,
                "resources",
            )
            .await
    }

    /// Base64 encoded kubeconfig.
    pub async fn get_kubeconfig(&self, ctx: &RequestContext, cluster_id: &str) -> Result<String> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/config", path_segment(cluster_id)),
                NO_BODY,
                "kube_config",
            )
            .await
    }

    /// Kubernetes versions available for new clusters.
    pub async fn get_versions(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        self.transport
            .request_field(ctx, Method::GET, "v2/kubernetes/versions", NO_BODY, "versions")
            .await
    }

    /// Versions a cluster can upgrade to.
    pub async fn get_upgrades(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
    ) -> Result<Vec<String>> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/available-upgrades", path_segment(cluster_id)),
                NO_BODY,
                "available_upgrades",
            )
            .await
    }

    /// Start an upgrade to `version`.
    pub async fn upgrade(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        version: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/upgrades", path_segment(cluster_id)),
                Some(&UpgradeRequest {
                    upgrade_version: version,
                }),
            )
            .await
    }

    /// Add a node pool.
    pub async fn create_node_pool(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        request: &NodePoolRequest,
    ) -> Result<NodePool> {
        self.transport
            .request_field(ctx, Method::POST, &Self::pools(cluster_id), Some(request), "node_pool")
            .await
    }

    /// List node pools.
    pub async fn list_node_pools(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        options: &ListOptions,
    ) -> Result<Page<NodePool>> {
        self.transport
            .request_page(ctx, &Self::pools(cluster_id), &options.to_pairs(), "node_pools")
            .await
    }

    /// Fetch a node pool.
    pub async fn get_node_pool(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        pool_id: &str,
    ) -> Result<NodePool> {
        let path = format!("{}/{}", Self::pools(cluster_id), path_segment(pool_id));
        self.transport
            .request_field(ctx, Method::GET, &path, NO_BODY, "node_pool")
            .await
    }

    /// Resize or retag a node pool.
    pub async fn update_node_pool(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        pool_id: &str,
        request: &NodePoolUpdateRequest,
    ) -> Result<NodePool> {
        let path = format!("{}/{}", Self::pools(cluster_id), path_segment(pool_id));
        self.transport
            .request_field(ctx, Method::PATCH, &path, Some(request), "node_pool")
            .await
    }

    /// Delete a node pool.
    pub async fn delete_node_pool(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        pool_id: &str,
    ) -> Result<()> {
        let path = format!("{}/{}", Self::pools(cluster_id), path_segment(pool_id));
        self.transport
            .request_empty(ctx, Method::DELETE, &path, NO_BODY)
            .await
    }

    /// Remove one node from a pool.
    pub async fn delete_node_pool_instance(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        pool_id: &str,
        node_id: &str,
    ) -> Result<()> {
        let path = format!(
            "{}/{}/nodes/{}",
            Self::pools(cluster_id),
            path_segment(pool_id),
            path_segment(node_id)
        );
        self.transport
            .request_empty(ctx, Method::DELETE, &path, NO_BODY)
            .await
    }

    /// Replace one node with a fresh one.
    pub async fn recycle_node_pool_instance(
        &self,
        ctx: &RequestContext,
        cluster_id: &str,
        pool_id: &str,
        node_id: &str,
    ) -> Result<()> {
        let path = format!(
            "{}/{}/nodes/{}/recycle",
            Self::pools(cluster_id),
            path_segment(pool_id),
            path_segment(node_id)
        );
        self.transport
            .request_empty(ctx, Method::POST, &path, NO_BODY)
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
    async fn create_cluster_with_pool() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/kubernetes/clusters"))
            .and(body_json(json!({
                "label": "prod",
                "region": "ewr",
                "version": "v1.29.2+1",
                "node_pools": [{"node_quantity": 3, "label": "workers", "plan": "vc2-2c-4gb"}]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "vke_cluster": {
                    "id": "k1",
                    "label": "prod",
                    "region": "ewr",
                    "status": "pending",
                    "node_pools": [{"id": "np1", "node_quantity": 3, "nodes": [{"id": "n1"}]}]
                }
            })))
            .mount(&server)
            .await;

        let request = ClusterRequest {
            label: Some("prod".into()),
            region: "ewr".into(),
            version: "v1.29.2+1".into(),
            node_pools: vec![NodePoolRequest {
                node_quantity: 3,
                label: "workers".into(),
                plan: "vc2-2c-4gb".into(),
                ..NodePoolRequest::default()
            }],
        };
        let cluster = KubernetesService::new(transport(&server))
            .create_cluster(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(cluster.node_pools[0].nodes[0].id, "n1");
    }

    #[tokio::test]
    async fn kubeconfig_and_versions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/kubernetes/clusters/k1/config"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"kube_config": "YXBpVmVyc2lvbjogdjEK"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/kubernetes/versions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"versions": ["v1.29.2+1", "v1.28.7+1"]})),
            )
            .mount(&server)
            .await;

        let service = KubernetesService::new(transport(&server));
        assert_eq!(service.get_kubeconfig(&ctx(), "k1").await.unwrap(), "YXBpVmVyc2lvbjogdjEK");
        assert_eq!(service.get_versions(&ctx()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn kubeconfig_without_kube_config_key_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/kubernetes/clusters/k1/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"config": "eA=="})))
            .mount(&server)
            .await;

        let err = KubernetesService::new(transport(&server))
            .get_kubeconfig(&ctx(), "k1")
            .await
            .unwrap_err();
        assert!(matches!(err, vultr_core::Error::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn upgrade_and_recycle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/kubernetes/clusters/k1/upgrades"))
            .and(body_json(json!({"upgrade_version": "v1.30.0+1"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/kubernetes/clusters/k1/node-pools/np1/nodes/n1/recycle"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = KubernetesService::new(transport(&server));
        service.upgrade(&ctx(), "k1", "v1.30.0+1").await.unwrap();
        service
            .recycle_node_pool_instance(&ctx(), "k1", "np1", "n1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_node_pool_returns_pool() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v2/kubernetes/clusters/k1/node-pools/np1"))
            .and(body_json(json!({"node_quantity": 5})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "node_pool": {"id": "np1", "node_quantity": 5}
            })))
            .mount(&server)
            .await;

        let request = NodePoolUpdateRequest {
            node_quantity: Some(5),
            ..NodePoolUpdateRequest::default()
        };
        let pool = KubernetesService::new(transport(&server))
            .update_node_pool(&ctx(), "k1", "np1", &request)
            .await
            .unwrap();
        assert_eq!(pool.node_quantity, 5);
    }
}
