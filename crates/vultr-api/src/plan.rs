//! Compute and bare metal plans.

use serde::{Deserialize, Serialize};
use vultr_core::query::QueryParams;
use vultr_core::{ListOptions, Page, RequestContext, Transport};

use crate::Result;

/// A cloud compute plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// Plan id, e.g. `vc2-1c-1gb`
    pub id: String,
    /// vCPUs
    pub vcpu_count: u32,
    /// RAM in MB
    pub ram: u32,
    /// Disk in GB
    pub disk: u32,
    /// Number of disks
    pub disk_count: u32,
    /// Monthly transfer in GB
    pub bandwidth: u32,
    /// Monthly price in USD
    pub monthly_cost: f64,
    /// Plan family
    #[serde(rename = "type")]
    pub plan_type: String,
    /// Regions where the plan is sold
    pub locations: Vec<String>,
}

/// A bare metal plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BareMetalPlan {
    /// Plan id
    pub id: String,
    /// Physical CPUs
    pub cpu_count: u32,
    /// CPU model
    pub cpu_model: String,
    /// CPU threads
    pub cpu_threads: u32,
    /// RAM in MB
    pub ram: u32,
    /// Disk in GB
    pub disk: u32,
    /// Number of disks
    pub disk_count: u32,
    /// Monthly transfer in GB
    pub bandwidth: u32,
    /// Monthly price in USD
    pub monthly_cost: f64,
    /// Plan family
    #[serde(rename = "type")]
    pub plan_type: String,
    /// Regions where the plan is sold
    pub locations: Vec<String>,
}

/// Handler for `/v2/plans` and `/v2/plans-metal`.
#[derive(Debug, Clone)]
pub struct PlanService {
    transport: Transport,
}

impl PlanService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List compute plans. `plan_type` (`vc2`, `vhf`, `vdc`, ...) and `os`
    /// narrow the result when given.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        plan_type: Option<&str>,
        os: Option<&str>,
        options: &ListOptions,
    ) -> Result<Page<Plan>> {
        let mut params = QueryParams::new();
        params.push_non_empty("type", plan_type);
        params.push_non_empty("os", os);
        params.extend(options.to_params());
        self.transport
            .request_page(ctx, "v2/plans", &params.into_pairs(), "plans")
            .await
    }

    /// List bare metal plans.
    pub async fn list_bare_metal(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<BareMetalPlan>> {
        self.transport
            .request_page(ctx, "v2/plans-metal", &options.to_pairs(), "plans_metal")
            .await
    }
}
