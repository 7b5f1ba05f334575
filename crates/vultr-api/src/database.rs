//! Managed databases.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::query::QueryParams;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/databases";

/// A database plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabasePlan {
    /// Plan id
    pub id: String,
    /// Node count
    pub number_of_nodes: u32,
    /// Plan family
    #[serde(rename = "type")]
    pub plan_type: String,
    /// vCPUs per node
    pub vcpu_count: u32,
    /// RAM in MB
    pub ram: u32,
    /// Disk in GB
    pub disk: u32,
    /// Monthly price in USD
    pub monthly_cost: f64,
    /// Regions where the plan is sold
    pub locations: Vec<String>,
}

/// A managed database cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    /// Database id
    pub id: String,
    /// Creation time
    pub date_created: String,
    /// Plan id
    pub plan: String,
    /// Disk in GB
    pub plan_disk: u32,
    /// RAM in MB
    pub plan_ram: u32,
    /// vCPUs
    pub plan_vcpus: u32,
    /// Replica nodes
    pub plan_replicas: u32,
    /// Region id
    pub region: String,
    /// `Running`, `Rebuilding`, ...
    pub status: String,
    /// Label
    pub label: String,
    /// Tag
    pub tag: String,
    /// `mysql`, `pg` or `redis`
    pub database_engine: String,
    /// Engine major version
    pub database_engine_version: String,
    /// Connection host
    pub host: String,
    /// Admin user
    pub user: String,
    /// Admin password
    pub password: String,
    /// Default database
    pub dbname: String,
    /// Connection port
    pub port: String,
    /// Maintenance day of week
    pub maintenance_dow: String,
    /// Maintenance time
    pub maintenance_time: String,
    /// Trusted source addresses
    pub trusted_ips: Vec<String>,
}

/// Body for creating or updating a database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRequest {
    /// Engine, such as `pg` or `mysql`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_engine: Option<String>,
    /// Engine major version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_engine_version: Option<String>,
    /// Region ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Plan ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// VPC to place the cluster in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    /// Day of week for maintenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_dow: Option<String>,
    /// Maintenance start time, `HH:00`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_time: Option<String>,
    /// Addresses allowed to connect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_ips: Option<Vec<String>>,
}

/// Resource usage of a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseUsage {
    /// Disk usage
    pub disk: UsageMetric,
    /// Memory usage
    pub memory: UsageMetric,
    /// CPU usage
    pub cpu: CpuUsage,
}

/// Used versus available amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageMetric {
    /// Amount in use
    pub current_gb: f64,
    /// Capacity
    pub max_gb: f64,
    /// Share in use
    pub percentage: f64,
}

/// CPU utilisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    /// Share in use
    pub percentage: f64,
}

/// A database user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseUser {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
    /// MySQL authentication plugin
    pub encryption: String,
}

/// Body for creating or updating a database user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUserRequest {
    /// Username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password, generated when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Password encryption, MySQL only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,
}

/// A logical database inside a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalDatabase {
    /// Name
    pub name: String,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

/// Filters for [`DatabaseService::list_plans`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanFilter {
    /// Engine
    pub engine: Option<String>,
    /// Node count
    pub nodes: Option<u32>,
    /// Region id
    pub region: Option<String>,
}

/// Handler for `/v2/databases`.
#[derive(Debug, Clone)]
pub struct DatabaseService {
    transport: Transport,
}

impl DatabaseService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    fn item(database_id: &str) -> String {
        format!("{PATH}/{}", path_segment(database_id))
    }

    fn user(database_id: &str, username: &str) -> String {
        format!(
            "{PATH}/{}/users/{}",
            path_segment(database_id),
            path_segment(username)
        )
    }

    fn db(database_id: &str, name: &str) -> String {
        format!("{PATH}/{}/dbs/{}", path_segment(database_id), path_segment(name))
    }

    /// List plans, optionally filtered.
    pub async fn list_plans(
        &self,
        ctx: &RequestContext,
        filter: &PlanFilter,
    ) -> Result<Page<DatabasePlan>> {
        let mut params = QueryParams::new();
        params.push_non_empty("engine", filter.engine.as_deref());
        params.push_opt("nodes", filter.nodes);
        params.push_non_empty("region", filter.region.as_deref());
        self.transport
            .request_page(ctx, &format!("{PATH}/plans"), &params.into_pairs(), "plans")
            .await
    }

    /// List databases. `options.label`, `options.tag` and `options.region`
    /// filter the result.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Database>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "databases")
            .await
    }

    /// Create a database.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &DatabaseRequest,
    ) -> Result<Database> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "database")
            .await
    }

    /// Fetch a database.
    pub async fn get(&self, ctx: &RequestContext, database_id: &str) -> Result<Database> {
        self.transport
            .request_field(ctx, Method::GET, &Self::item(database_id), NO_BODY, "database")
            .await
    }

    /// Update a database.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        request: &DatabaseRequest,
    ) -> Result<Database> {
        self.transport
            .request_field(ctx, Method::PUT, &Self::item(database_id), Some(request), "database")
            .await
    }

    /// Destroy a database.
    pub async fn delete(&self, ctx: &RequestContext, database_id: &str) -> Result<()> {
        self.transport
            .request_empty(ctx, Method::DELETE, &Self::item(database_id), NO_BODY)
            .await
    }

    /// Disk, memory and CPU usage.
    pub async fn get_usage(
        &self,
        ctx: &RequestContext,
        database_id: &str,
    ) -> Result<DatabaseUsage> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/usage", path_segment(database_id)),
                NO_BODY,
                "usage",
            )
            .await
    }

    /// List users.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        options: &ListOptions,
    ) -> Result<Page<DatabaseUser>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/users", path_segment(database_id)),
                &options.to_pairs(),
                "users",
            )
            .await
    }

    /// Create a user.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        request: &DatabaseUserRequest,
    ) -> Result<DatabaseUser> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/users", path_segment(database_id)),
                Some(request),
                "user",
            )
            .await
    }

    /// Fetch a user.
    pub async fn get_user(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        username: &str,
    ) -> Result<DatabaseUser> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &Self::user(database_id, username),
                NO_BODY,
                "user",
            )
            .await
    }

    /// Change a user's password or encryption.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        username: &str,
        request: &DatabaseUserRequest,
    ) -> Result<DatabaseUser> {
        self.transport
            .request_field(
                ctx,
                Method::PUT,
                &Self::user(database_id, username),
                Some(request),
                "user",
            )
            .await
    }

    /// Remove a user.
    pub async fn delete_user(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        username: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &Self::user(database_id, username),
                NO_BODY,
            )
            .await
    }

    /// List logical databases.
    pub async fn list_dbs(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        options: &ListOptions,
    ) -> Result<Page<LogicalDatabase>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/{}/dbs", path_segment(database_id)),
                &options.to_pairs(),
                "dbs",
            )
            .await
    }

    /// Create a logical database.
    pub async fn create_db(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        name: &str,
    ) -> Result<LogicalDatabase> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/dbs", path_segment(database_id)),
                Some(&NameRequest { name }),
                "db",
            )
            .await
    }

    /// Fetch a logical database.
    pub async fn get_db(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        name: &str,
    ) -> Result<LogicalDatabase> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &Self::db(database_id, name),
                NO_BODY,
                "db",
            )
            .await
    }

    /// Drop a logical database.
    pub async fn delete_db(
        &self,
        ctx: &RequestContext,
        database_id: &str,
        name: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &Self::db(database_id, name),
                NO_BODY,
            )
            .await
    }

    /// Pending maintenance updates.
    pub async fn list_maintenance_updates(
        &self,
        ctx: &RequestContext,
        database_id: &str,
    ) -> Result<Vec<String>> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/maintenance", path_segment(database_id)),
                NO_BODY,
                "available_updates",
            )
            .await
    }

    /// Apply pending maintenance now. Returns the provider's status message.
    pub async fn start_maintenance(
        &self,
        ctx: &RequestContext,
        database_id: &str,
    ) -> Result<String> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/maintenance", path_segment(database_id)),
                NO_BODY,
                "message",
            )
            .await
    }
}
