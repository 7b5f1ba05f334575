//! Bare metal servers.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vultr_core::client::NO_BODY;
use vultr_core::query::QueryParams;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::common::{
    parse_timestamp, Bandwidth, Ipv4, Ipv6, ReinstallRequest, UpgradeType, Upgrades, UserData,
};
use crate::Result;

const PATH: &str = "v2/bare-metals";

/// A dedicated physical server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BareMetal {
    /// Server id
    pub id: String,
    /// OS name
    pub os: String,
    /// RAM description, e.g. `32768 MB`
    pub ram: String,
    /// Disk description
    pub disk: String,
    /// Primary IPv4 address
    pub main_ip: String,
    /// CPU count
    pub cpu_count: u32,
    /// Region id
    pub region: String,
    /// Plan id
    pub plan: String,
    /// Creation time
    pub date_created: String,
    /// Server status
    pub status: String,
    /// IPv4 netmask
    pub netmask_v4: String,
    /// IPv4 gateway
    pub gateway_v4: String,
    /// IPv6 network
    pub v6_network: String,
    /// Primary IPv6 address
    pub v6_main_ip: String,
    /// IPv6 prefix length
    pub v6_network_size: u32,
    /// MAC address
    pub mac_address: u64,
    /// Label
    pub label: String,
    /// Tags
    pub tags: Vec<String>,
    /// OS id
    pub os_id: u32,
    /// Application id
    pub app_id: u32,
    /// Marketplace image id
    pub image_id: String,
    /// Enabled features
    pub features: Vec<String>,
}

impl BareMetal {
    /// Parsed `date_created`.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_created)
    }
}

/// Body for creating a bare metal server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BareMetalCreateRequest {
    /// Region ID
    pub region: String,
    /// Plan ID
    pub plan: String,
    /// Operating system ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_id: Option<u32>,
    /// Snapshot to restore from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    /// Marketplace application to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u32>,
    /// Marketplace image ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Startup script to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    /// Enable IPv6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// SSH keys to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sshkey_id: Option<Vec<String>>,
    /// Base64 encoded cloud-init data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Send the activation email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_email: Option<bool>,
    /// Hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Reserved IPv4 to use as the main address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_ipv4: Option<String>,
    /// Keep booting from PXE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_pxe: Option<bool>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl BareMetalCreateRequest {
    /// Request with the required fields set.
    #[must_use]
    pub fn new(region: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            plan: plan.into(),
            ..Self::default()
        }
    }
}

/// Body for updating a bare metal server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BareMetalUpdateRequest {
    /// Base64 encoded cloud-init data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Operating system ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_id: Option<u32>,
    /// Marketplace application to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u32>,
    /// Marketplace image ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Enable IPv6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Serialize)]
struct BareMetalIds<'a> {
    baremetal_ids: &'a [String],
}

/// Handler for `/v2/bare-metals`.
#[derive(Debug, Clone)]
pub struct BareMetalService {
    transport: Transport,
}

impl BareMetalService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Provision a server.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &BareMetalCreateRequest,
    ) -> Result<BareMetal> {
        debug!(region = %request.region, plan = %request.plan, "Creating bare metal server");
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "bare_metal")
            .await
    }

    /// Fetch one server.
    pub async fn get(&self, ctx: &RequestContext, server_id: &str) -> Result<BareMetal> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(server_id)),
                NO_BODY,
                "bare_metal",
            )
            .await
    }

    /// Update a server and return its new state.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        request: &BareMetalUpdateRequest,
    ) -> Result<BareMetal> {
        self.transport
            .request_field(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(server_id)),
                Some(request),
                "bare_metal",
            )
            .await
    }

    /// Destroy a server.
    pub async fn delete(&self, ctx: &RequestContext, server_id: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(server_id)),
                NO_BODY,
            )
            .await
    }

    /// List servers.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<BareMetal>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "bare_metals")
            .await
    }

    /// Daily bandwidth usage.
    pub async fn get_bandwidth(&self, ctx: &RequestContext, server_id: &str) -> Result<Bandwidth> {
        self.get_sub(ctx, server_id, "bandwidth", "bandwidth").await
    }

    /// Cloud-init user data.
    pub async fn get_user_data(&self, ctx: &RequestContext, server_id: &str) -> Result<UserData> {
        self.get_sub(ctx, server_id, "user-data", "user_data").await
    }

    /// Upgrade paths available to the server.
    pub async fn get_upgrades(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        upgrade_type: Option<UpgradeType>,
    ) -> Result<Upgrades> {
        let mut params = QueryParams::new();
        params.push_opt("type", upgrade_type.map(UpgradeType::as_str));
        let request = self.transport.build_request(
            Method::GET,
            &format!("{PATH}/{}/upgrades", path_segment(server_id)),
            &params.into_pairs(),
            NO_BODY,
        )?;
        self.transport.send_field(ctx, request, "upgrades").await
    }

    /// IPv4 addresses.
    pub async fn list_ipv4(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        options: &ListOptions,
    ) -> Result<Page<Ipv4>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/ipv4", path_segment(server_id)),
                &options.to_pairs(),
                "ipv4s",
            )
            .await
    }

    /// IPv6 networks.
    pub async fn list_ipv6(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        options: &ListOptions,
    ) -> Result<Page<Ipv6>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/ipv6", path_segment(server_id)),
                &options.to_pairs(),
                "ipv6s",
            )
            .await
    }

    /// Power on.
    pub async fn start(&self, ctx: &RequestContext, server_id: &str) -> Result<()> {
        self.action(ctx, server_id, "start").await
    }

    /// Power off.
    pub async fn halt(&self, ctx: &RequestContext, server_id: &str) -> Result<()> {
        self.action(ctx, server_id, "halt").await
    }

    /// Reboot.
    pub async fn reboot(&self, ctx: &RequestContext, server_id: &str) -> Result<()> {
        self.action(ctx, server_id, "reboot").await
    }

    /// Reinstall the OS. All data on the server is lost.
    pub async fn reinstall(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        request: &ReinstallRequest,
    ) -> Result<BareMetal> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/reinstall", path_segment(server_id)),
                Some(request),
                "bare_metal",
            )
            .await
    }

    /// Power on several servers.
    pub async fn mass_start(&self, ctx: &RequestContext, server_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, server_ids, "start").await
    }

    /// Power off several servers.
    pub async fn mass_halt(&self, ctx: &RequestContext, server_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, server_ids, "halt").await
    }

    /// Reboot several servers.
    pub async fn mass_reboot(&self, ctx: &RequestContext, server_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, server_ids, "reboot").await
    }

    async fn get_sub<T>(
        &self,
        ctx: &RequestContext,
        server_id: &str,
        sub: &str,
        key: &str,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/{sub}", path_segment(server_id)),
                NO_BODY,
                key,
            )
            .await
    }

    async fn action(&self, ctx: &RequestContext, server_id: &str, action: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/{action}", path_segment(server_id)),
                NO_BODY,
            )
            .await
    }

    async fn mass_action(
        &self,
        ctx: &RequestContext,
        baremetal_ids: &[String],
        action: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{action}"),
                Some(&BareMetalIds { baremetal_ids }),
            )
            .await
    }
}
