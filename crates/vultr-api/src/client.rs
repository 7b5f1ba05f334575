//! Unified client exposing every resource handler over one transport.

use std::path::PathBuf;

use reqwest::Client;
use tracing::info;
use vultr_core::{ClientConfig, Transport, TransportBuilder, VultrConfig};

use crate::account::AccountService;
use crate::application::ApplicationService;
use crate::backup::BackupService;
use crate::bare_metal::BareMetalService;
use crate::billing::BillingService;
use crate::block_storage::BlockStorageService;
use crate::container_registry::ContainerRegistryService;
use crate::database::DatabaseService;
use crate::domain::DomainService;
use crate::domain_record::DomainRecordService;
use crate::firewall_group::FirewallGroupService;
use crate::firewall_rule::FirewallRuleService;
use crate::instance::InstanceService;
use crate::iso::IsoService;
use crate::kubernetes::KubernetesService;
use crate::legacy::LegacyService;
use crate::load_balancer::LoadBalancerService;
use crate::object_storage::ObjectStorageService;
use crate::os::OsService;
use crate::plan::PlanService;
use crate::region::RegionService;
use crate::reserved_ip::ReservedIpService;
use crate::snapshot::SnapshotService;
use crate::ssh_key::SshKeyService;
use crate::startup_script::StartupScriptService;
use crate::user::UserService;
use crate::vpc::VpcService;
use crate::vpc2::Vpc2Service;
use crate::Result;

/// Entry point to the Vultr API.
///
/// Cloning is cheap; every handler shares the same connection pool.
#[derive(Debug, Clone)]
pub struct VultrClient {
    transport: Transport,
    account: AccountService,
    applications: ApplicationService,
    backups: BackupService,
    bare_metal: BareMetalService,
    billing: BillingService,
    block_storage: BlockStorageService,
    container_registry: ContainerRegistryService,
    databases: DatabaseService,
    domains: DomainService,
    domain_records: DomainRecordService,
    firewall_groups: FirewallGroupService,
    firewall_rules: FirewallRuleService,
    instances: InstanceService,
    isos: IsoService,
    kubernetes: KubernetesService,
    legacy: LegacyService,
    load_balancers: LoadBalancerService,
    object_storage: ObjectStorageService,
    os: OsService,
    plans: PlanService,
    regions: RegionService,
    reserved_ips: ReservedIpService,
    snapshots: SnapshotService,
    ssh_keys: SshKeyService,
    startup_scripts: StartupScriptService,
    users: UserService,
    vpcs: VpcService,
    vpc2: Vpc2Service,
}

impl VultrClient {
    /// Client against the public API using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Start configuring a client.
    pub fn builder(api_key: impl Into<String>) -> VultrClientBuilder {
        VultrClientBuilder::new(api_key)
    }

    /// Client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &VultrConfig) -> Result<Self> {
        Ok(Self::from_transport(Transport::from_config(config)?))
    }

    /// Client over an already configured transport.
    #[must_use]
    pub fn from_transport(transport: Transport) -> Self {
        info!(base_url = %transport.base_url(), "Initializing Vultr client");
        Self {
            account: AccountService::new(transport.clone()),
            applications: ApplicationService::new(transport.clone()),
            backups: BackupService::new(transport.clone()),
            bare_metal: BareMetalService::new(transport.clone()),
            billing: BillingService::new(transport.clone()),
            block_storage: BlockStorageService::new(transport.clone()),
            container_registry: ContainerRegistryService::new(transport.clone()),
            databases: DatabaseService::new(transport.clone()),
            domains: DomainService::new(transport.clone()),
            domain_records: DomainRecordService::new(transport.clone()),
            firewall_groups: FirewallGroupService::new(transport.clone()),
            firewall_rules: FirewallRuleService::new(transport.clone()),
            instances: InstanceService::new(transport.clone()),
            isos: IsoService::new(transport.clone()),
            kubernetes: KubernetesService::new(transport.clone()),
            legacy: LegacyService::new(transport.clone()),
            load_balancers: LoadBalancerService::new(transport.clone()),
            object_storage: ObjectStorageService::new(transport.clone()),
            os: OsService::new(transport.clone()),
            plans: PlanService::new(transport.clone()),
            regions: RegionService::new(transport.clone()),
            reserved_ips: ReservedIpService::new(transport.clone()),
            snapshots: SnapshotService::new(transport.clone()),
            ssh_keys: SshKeyService::new(transport.clone()),
            startup_scripts: StartupScriptService::new(transport.clone()),
            users: UserService::new(transport.clone()),
            vpcs: VpcService::new(transport.clone()),
            vpc2: Vpc2Service::new(transport.clone()),
            transport,
        }
    }

    /// The shared transport, for endpoints without a typed handler.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Account information.
    #[must_use]
    pub const fn account(&self) -> &AccountService {
        &self.account
    }

    /// Applications.
    #[must_use]
    pub const fn applications(&self) -> &ApplicationService {
        &self.applications
    }

    /// Backups.
    #[must_use]
    pub const fn backups(&self) -> &BackupService {
        &self.backups
    }

    /// Bare metal servers.
    #[must_use]
    pub const fn bare_metal(&self) -> &BareMetalService {
        &self.bare_metal
    }

    /// Billing.
    #[must_use]
    pub const fn billing(&self) -> &BillingService {
        &self.billing
    }

    /// Block storage.
    #[must_use]
    pub const fn block_storage(&self) -> &BlockStorageService {
        &self.block_storage
    }

    /// Container registries.
    #[must_use]
    pub const fn container_registry(&self) -> &ContainerRegistryService {
        &self.container_registry
    }

    /// Managed databases.
    #[must_use]
    pub const fn databases(&self) -> &DatabaseService {
        &self.databases
    }

    /// DNS domains.
    #[must_use]
    pub const fn domains(&self) -> &DomainService {
        &self.domains
    }

    /// DNS records.
    #[must_use]
    pub const fn domain_records(&self) -> &DomainRecordService {
        &self.domain_records
    }

    /// Firewall groups.
    #[must_use]
    pub const fn firewall_groups(&self) -> &FirewallGroupService {
        &self.firewall_groups
    }

    /// Firewall rules.
    #[must_use]
    pub const fn firewall_rules(&self) -> &FirewallRuleService {
        &self.firewall_rules
    }

    /// Instances.
    #[must_use]
    pub const fn instances(&self) -> &InstanceService {
        &self.instances
    }

    /// ISO images.
    #[must_use]
    pub const fn isos(&self) -> &IsoService {
        &self.isos
    }

    /// Kubernetes.
    #[must_use]
    pub const fn kubernetes(&self) -> &KubernetesService {
        &self.kubernetes
    }

    /// Legacy `v1` endpoints.
    #[must_use]
    pub const fn legacy(&self) -> &LegacyService {
        &self.legacy
    }

    /// Load balancers.
    #[must_use]
    pub const fn load_balancers(&self) -> &LoadBalancerService {
        &self.load_balancers
    }

    /// Object storage.
    #[must_use]
    pub const fn object_storage(&self) -> &ObjectStorageService {
        &self.object_storage
    }

    /// Operating systems.
    #[must_use]
    pub const fn os(&self) -> &OsService {
        &self.os
    }

    /// Plans.
    #[must_use]
    pub const fn plans(&self) -> &PlanService {
        &self.plans
    }

    /// Regions.
    #[must_use]
    pub const fn regions(&self) -> &RegionService {
        &self.regions
    }

    /// Reserved IPs.
    #[must_use]
    pub const fn reserved_ips(&self) -> &ReservedIpService {
        &self.reserved_ips
    }

    /// Snapshots.
    #[must_use]
    pub const fn snapshots(&self) -> &SnapshotService {
        &self.snapshots
    }

    /// SSH keys.
    #[must_use]
    pub const fn ssh_keys(&self) -> &SshKeyService {
        &self.ssh_keys
    }

    /// Startup scripts.
    #[must_use]
    pub const fn startup_scripts(&self) -> &StartupScriptService {
        &self.startup_scripts
    }

    /// Users.
    #[must_use]
    pub const fn users(&self) -> &UserService {
        &self.users
    }

    /// VPCs.
    #[must_use]
    pub const fn vpcs(&self) -> &VpcService {
        &self.vpcs
    }

    /// VPC 2.0 networks.
    #[must_use]
    pub const fn vpc2(&self) -> &Vpc2Service {
        &self.vpc2
    }
}

/// Builder for [`VultrClient`].
#[derive(Debug)]
pub struct VultrClientBuilder {
    inner: TransportBuilder,
}

impl VultrClientBuilder {
    /// Builder for `api_key` against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            inner: TransportBuilder::new(api_key),
        }
    }

    /// Override the API root, e.g. for a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.inner = self.inner.with_base_url(base_url);
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner = self.inner.with_user_agent(user_agent);
        self
    }

    /// Tune timeouts and pooling.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Toggle TLS certificate verification.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.inner = self.inner.with_tls_verify(verify);
        self
    }

    /// Trust an extra CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.inner = self.inner.with_ca_cert(path);
        self
    }

    /// Use a caller-supplied HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.inner = self.inner.with_http_client(client);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the CA certificate cannot
    /// be read, or the HTTP client cannot be built.
    pub fn build(self) -> Result<VultrClient> {
        Ok(VultrClient::from_transport(self.inner.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vultr_core::{ListOptions, RequestContext};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn handlers_share_the_configured_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .and(header("authorization", "Bearer abc123"))
            .and(header("user-agent", "acme-tool/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account": {"name": "Acme"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/regions"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "regions": [{"id": "ewr"}],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let client = VultrClient::builder("abc123")
            .with_base_url(server.uri())
            .with_user_agent("acme-tool/1.0")
            .build()
            .unwrap();
        let ctx = RequestContext::background();

        assert_eq!(client.account().get(&ctx).await.unwrap().name, "Acme");
        let regions = client.regions().list(&ctx, &ListOptions::new()).await.unwrap();
        assert_eq!(regions.items[0].id, "ewr");
        assert_eq!(client.transport().user_agent(), "acme-tool/1.0");
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = VultrConfig::new("abc123")
            .unwrap()
            .with_base_url("http://localhost:9000/api")
            .unwrap();
        let client = VultrClient::from_config(&config).unwrap();
        assert_eq!(client.transport().base_url().as_str(), "http://localhost:9000/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = VultrClient::builder("abc123")
            .with_base_url("not a url")
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
