//! Regions and per-region plan availability.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::query::QueryParams;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/regions";

/// A datacenter location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    /// Region id, e.g. `ewr`
    pub id: String,
    /// City
    pub city: String,
    /// Country code
    pub country: String,
    /// Continent
    pub continent: String,
    /// Features offered in the region
    pub options: Vec<String>,
}

/// Handler for `/v2/regions`.
#[derive(Debug, Clone)]
pub struct RegionService {
    transport: Transport,
}

impl RegionService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List regions.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Region>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "regions")
            .await
    }

    /// Plan ids deployable in `region_id`, optionally restricted to a plan type
    /// such as `vc2` or `vbm`.
    pub async fn availability(
        &self,
        ctx: &RequestContext,
        region_id: &str,
        plan_type: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut params = QueryParams::new();
        params.push_non_empty("type", plan_type);
        let request = self.transport.build_request(
            Method::GET,
            &format!("{PATH}/{}/availability", path_segment(region_id)),
            &params.into_pairs(),
            vultr_core::client::NO_BODY,
        )?;
        self.transport
            .send_field(ctx, request, "available_plans")
            .await
    }
}
