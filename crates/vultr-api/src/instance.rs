//! Cloud compute instances.
//!
//! Covers the instance lifecycle (create, update, delete, power actions,
//! reinstall), attached networks and addresses, backups, ISO mounts and the
//! read-only views such as bandwidth and neighbors.

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

const PATH: &str = "v2/instances";

/// A virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    /// Instance id
    pub id: String,
    /// OS name
    pub os: String,
    /// RAM in MB
    pub ram: u32,
    /// Disk in GB
    pub disk: u32,
    /// Primary IPv4 address
    pub main_ip: String,
    /// vCPUs
    pub vcpu_count: u32,
    /// Region id
    pub region: String,
    /// Plan id
    pub plan: String,
    /// Creation time
    pub date_created: String,
    /// `active`, `pending`, `suspended` or `closed`
    pub status: String,
    /// Monthly transfer allowance in GB
    pub allowed_bandwidth: u32,
    /// IPv4 netmask
    pub netmask_v4: String,
    /// IPv4 gateway
    pub gateway_v4: String,
    /// `running` or `stopped`
    pub power_status: String,
    /// `none`, `locked`, `installingbooting` or `ok`
    pub server_status: String,
    /// IPv6 network
    pub v6_network: String,
    /// Primary IPv6 address
    pub v6_main_ip: String,
    /// IPv6 prefix length
    pub v6_network_size: u32,
    /// Label
    pub label: String,
    /// Private network address
    pub internal_ip: String,
    /// Console URL
    pub kvm: String,
    /// Hostname
    pub hostname: String,
    /// Single tag, superseded by `tags`
    pub tag: String,
    /// Tags
    pub tags: Vec<String>,
    /// OS id
    pub os_id: u32,
    /// Application id
    pub app_id: u32,
    /// Marketplace image id
    pub image_id: String,
    /// Firewall group id
    pub firewall_group_id: String,
    /// Enabled features such as `auto_backups` and `ipv6`
    pub features: Vec<String>,
}

impl Instance {
    /// Parsed `date_created`.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_created)
    }

    /// Whether the instance is powered on.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.power_status == "running"
    }
}

/// Body for creating an instance.
///
/// `region` and `plan` are required; one of `os_id`, `iso_id`,
/// `snapshot_id`, `app_id` or `image_id` selects what gets installed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceCreateRequest {
    /// Region id
    pub region: String,
    /// Plan id
    pub plan: String,
    /// Operating system ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_id: Option<u32>,
    /// ISO to boot from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_id: Option<String>,
    /// Snapshot to restore from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    /// Marketplace application to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u32>,
    /// Marketplace image ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// Startup script to run on first boot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    /// iPXE chain URL, used with the custom OS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipxe_chain_url: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// SSH key ids to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sshkey_id: Option<Vec<String>>,
    /// `enabled` or `disabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<String>,
    /// Enable IPv6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Create without a public IPv4 address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_public_ipv4: Option<bool>,
    /// Attach to the default VPC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_vpc: Option<bool>,
    /// VPC ids to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_vpc: Option<Vec<String>>,
    /// VPC 2.0 ids to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_vpc2: Option<Vec<String>>,
    /// Base64 cloud-init user data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Enable DDoS protection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddos_protection: Option<bool>,
    /// Send the activation email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_email: Option<bool>,
    /// Firewall group to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_group_id: Option<String>,
    /// Reserved IPv4 id to use as the primary address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_ipv4: Option<String>,
}

impl InstanceCreateRequest {
    /// Request with the two required fields set.
    #[must_use]
    pub fn new(region: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            plan: plan.into(),
            ..Self::default()
        }
    }
}

/// Body for updating an instance. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceUpdateRequest {
    /// Plan to upgrade to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Operating system ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_id: Option<u32>,
    /// Marketplace application to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u32>,
    /// Marketplace image ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    /// `enabled` or `disabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<String>,
    /// Firewall group to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_group_id: Option<String>,
    /// Enable IPv6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    /// Base64 encoded cloud-init data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Enable DDoS protection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddos_protection: Option<bool>,
    /// Attach to the default VPC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_vpc: Option<bool>,
    /// VPCs to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_vpc: Option<Vec<String>>,
    /// VPCs to detach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detach_vpc: Option<Vec<String>>,
}

/// Private network attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcInfo {
    /// VPC id
    pub id: String,
    /// Interface MAC address
    pub mac_address: String,
    /// Address inside the VPC
    pub ip_address: String,
}

/// Automatic backup schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupSchedule {
    /// Whether backups are enabled
    pub enabled: bool,
    /// `daily`, `weekly`, `monthly` or `daily_alt_even`/`daily_alt_odd`
    #[serde(rename = "type")]
    pub schedule_type: String,
    /// Next run time
    pub next_scheduled_time_utc: String,
    /// Hour of day, UTC
    pub hour: u32,
    /// Day of week, 1 = Sunday
    pub dow: u32,
    /// Day of month
    pub dom: u32,
}

/// Body for setting the backup schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupScheduleRequest {
    /// Schedule type
    #[serde(rename = "type")]
    pub schedule_type: String,
    /// UTC hour the backup starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    /// Day of week for weekly backups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dow: Option<u32>,
    /// Day of month for monthly backups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<u32>,
}

/// Source to restore an instance from. Exactly one should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRequest {
    /// Backup to restore from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<String>,
    /// Snapshot to restore from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

/// Progress of a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreStatus {
    /// What is being restored
    pub restore_type: String,
    /// Backup or snapshot id
    pub restore_id: String,
    /// Restore state
    pub status: String,
}

/// State of the ISO mounted on an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoStatus {
    /// `ready`, `isomounting` or `isounmounting`
    pub state: String,
    /// Mounted ISO id
    pub iso_id: String,
}

#[derive(Serialize)]
struct InstanceIds<'a> {
    instance_ids: &'a [String],
}

#[derive(Serialize)]
struct VpcRequest<'a> {
    vpc_id: &'a str,
}

#[derive(Serialize)]
struct IsoRequest<'a> {
    iso_id: &'a str,
}

#[derive(Serialize)]
struct Ipv4Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    reboot: Option<bool>,
}

/// Handler for `/v2/instances`.
#[derive(Debug, Clone)]
pub struct InstanceService {
    transport: Transport,
}

impl InstanceService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn item(id: &str) -> String {
        format!("{PATH}/{}", path_segment(id))
    }

    /// Create an instance.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &InstanceCreateRequest,
    ) -> Result<Instance> {
        debug!(region = %request.region, plan = %request.plan, "Creating instance");
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "instance")
            .await
    }

    /// Fetch one instance.
    pub async fn get(&self, ctx: &RequestContext, instance_id: &str) -> Result<Instance> {
        self.transport
            .request_field(ctx, Method::GET, &Self::item(instance_id), NO_BODY, "instance")
            .await
    }

    /// Update an instance and return its new state.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        request: &InstanceUpdateRequest,
    ) -> Result<Instance> {
        self.transport
            .request_field(ctx, Method::PATCH, &Self::item(instance_id), Some(request), "instance")
            .await
    }

    /// Destroy an instance.
    pub async fn delete(&self, ctx: &RequestContext, instance_id: &str) -> Result<()> {
        self.transport
            .request_empty(ctx, Method::DELETE, &Self::item(instance_id), NO_BODY)
            .await
    }

    /// List instances. `options` carries the cursor and the label, tag,
    /// region and main IP filters.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Instance>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "instances")
            .await
    }

    /// Power on.
    pub async fn start(&self, ctx: &RequestContext, instance_id: &str) -> Result<()> {
        self.action(ctx, instance_id, "start").await
    }

    /// Power off.
    pub async fn halt(&self, ctx: &RequestContext, instance_id: &str) -> Result<()> {
        self.action(ctx, instance_id, "halt").await
    }

    /// Reboot.
    pub async fn reboot(&self, ctx: &RequestContext, instance_id: &str) -> Result<()> {
        self.action(ctx, instance_id, "reboot").await
    }

    async fn action(&self, ctx: &RequestContext, instance_id: &str, action: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/{action}", path_segment(instance_id)),
                NO_BODY,
            )
            .await
    }

    /// Reinstall the OS, optionally setting a new hostname.
    pub async fn reinstall(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        request: &ReinstallRequest,
    ) -> Result<Instance> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/reinstall", path_segment(instance_id)),
                Some(request),
                "instance",
            )
            .await
    }

    /// Power on several instances.
    pub async fn mass_start(&self, ctx: &RequestContext, instance_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, instance_ids, "start").await
    }

    /// Power off several instances.
    pub async fn mass_halt(&self, ctx: &RequestContext, instance_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, instance_ids, "halt").await
    }

    /// Reboot several instances.
    pub async fn mass_reboot(&self, ctx: &RequestContext, instance_ids: &[String]) -> Result<()> {
        self.mass_action(ctx, instance_ids, "reboot").await
    }

    async fn mass_action(
        &self,
        ctx: &RequestContext,
        instance_ids: &[String],
        action: &str,
    ) -> Result<()> {
        let body = InstanceIds { instance_ids };
        self.transport
            .request_empty(ctx, Method::POST, &format!("{PATH}/{action}"), Some(&body))
            .await
    }

    /// Daily bandwidth usage.
    pub async fn get_bandwidth(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<Bandwidth> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/bandwidth", path_segment(instance_id)),
                NO_BODY,
                "bandwidth",
            )
            .await
    }

    /// Ids of instances sharing the same host.
    pub async fn get_neighbors(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<Vec<String>> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/neighbors", path_segment(instance_id)),
                NO_BODY,
                "neighbors",
            )
            .await
    }

    /// VPCs attached to an instance.
    pub async fn list_vpcs(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        options: &ListOptions,
    ) -> Result<Page<VpcInfo>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/vpcs", path_segment(instance_id)),
                &options.to_pairs(),
                "vpcs",
            )
            .await
    }

    /// Attach a VPC.
    pub async fn attach_vpc(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        vpc_id: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/vpcs/attach", path_segment(instance_id)),
                Some(&VpcRequest { vpc_id }),
            )
            .await
    }

    /// Detach a VPC.
    pub async fn detach_vpc(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        vpc_id: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/vpcs/detach", path_segment(instance_id)),
                Some(&VpcRequest { vpc_id }),
            )
            .await
    }

    /// IPv4 addresses. `public_network` set to true limits the list to public
    /// addresses.
    pub async fn list_ipv4(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        public_network: Option<bool>,
        options: &ListOptions,
    ) -> Result<Page<Ipv4>> {
        let mut params = QueryParams::new();
        params.push_opt("public_network", public_network);
        params.extend(options.to_params());
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/ipv4", path_segment(instance_id)),
                &params.into_pairs(),
                "ipv4s",
            )
            .await
    }

    /// Add an IPv4 address, optionally rebooting to apply it.
    pub async fn create_ipv4(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        reboot: Option<bool>,
    ) -> Result<Ipv4> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/ipv4", path_segment(instance_id)),
                Some(&Ipv4Request { reboot }),
                "ipv4",
            )
            .await
    }

    /// Remove an IPv4 address.
    pub async fn delete_ipv4(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        ip: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}/ipv4/{}", path_segment(instance_id), path_segment(ip)),
                NO_BODY,
            )
            .await
    }

    /// IPv6 networks.
    pub async fn list_ipv6(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        options: &ListOptions,
    ) -> Result<Page<Ipv6>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/ipv6", path_segment(instance_id)),
                &options.to_pairs(),
                "ipv6s",
            )
            .await
    }

    /// Current backup schedule.
    pub async fn get_backup_schedule(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<BackupSchedule> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/backup-schedule", path_segment(instance_id)),
                NO_BODY,
                "backup_schedule",
            )
            .await
    }

    /// Replace the backup schedule.
    pub async fn set_backup_schedule(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        request: &BackupScheduleRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/backup-schedule", path_segment(instance_id)),
                Some(request),
            )
            .await
    }

    /// Restore from a backup or snapshot.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        request: &RestoreRequest,
    ) -> Result<RestoreStatus> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/restore", path_segment(instance_id)),
                Some(request),
                "status",
            )
            .await
    }

    /// Cloud-init user data.
    pub async fn get_user_data(&self, ctx: &RequestContext, instance_id: &str) -> Result<UserData> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/user-data", path_segment(instance_id)),
                NO_BODY,
                "user_data",
            )
            .await
    }

    /// Upgrade paths available to the instance.
    pub async fn get_upgrades(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        upgrade_type: Option<UpgradeType>,
    ) -> Result<Upgrades> {
        let mut params = QueryParams::new();
        params.push_opt("type", upgrade_type.map(UpgradeType::as_str));
        let request = self.transport.build_request(
            Method::GET,
            &format!("{PATH}/{}/upgrades", path_segment(instance_id)),
            &params.into_pairs(),
            NO_BODY,
        )?;
        self.transport.send_field(ctx, request, "upgrades").await
    }

    /// Mount an ISO.
    pub async fn attach_iso(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
        iso_id: &str,
    ) -> Result<IsoStatus> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/iso/attach", path_segment(instance_id)),
                Some(&IsoRequest { iso_id }),
                "iso_status",
            )
            .await
    }

    /// Unmount the current ISO.
    pub async fn detach_iso(&self, ctx: &RequestContext, instance_id: &str) -> Result<IsoStatus> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/iso/detach", path_segment(instance_id)),
                NO_BODY,
                "iso_status",
            )
            .await
    }

    /// ISO mount state.
    pub async fn get_iso_status(
        &self,
        ctx: &RequestContext,
        instance_id: &str,
    ) -> Result<IsoStatus> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/iso", path_segment(instance_id)),
                NO_BODY,
                "iso_status",
            )
            .await
    }
}
