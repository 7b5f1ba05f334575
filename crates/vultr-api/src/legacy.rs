//! Legacy `v1` endpoints.
//!
//! These take URL-form bodies and answer with bare, un-enveloped JSON.
//! Numeric account values are returned as strings by this API generation.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{RequestContext, Transport};

use crate::Result;

/// Account summary from `v1/account/info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyAccountInfo {
    /// Balance
    pub balance: String,
    /// Charges accrued this period
    pub pending_charges: String,
    /// Date of the last payment
    pub last_payment_date: String,
    /// Amount of the last payment
    pub last_payment_amount: String,
}

/// A DNS domain as listed by `v1/dns/list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDnsDomain {
    /// Domain name
    pub domain: String,
    /// Creation time, `YYYY-MM-DD HH:MM:SS`
    pub date_created: String,
}

#[derive(Serialize)]
struct CreateDomainForm<'a> {
    domain: &'a str,
    serverip: &'a str,
}

#[derive(Serialize)]
struct DomainForm<'a> {
    domain: &'a str,
}

#[derive(Serialize)]
struct LabelForm<'a> {
    #[serde(rename = "SUBID")]
    subid: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct TagForm<'a> {
    #[serde(rename = "SUBID")]
    subid: &'a str,
    tag: &'a str,
}

/// Handler for the form-encoded `v1` API.
#[derive(Debug, Clone)]
pub struct LegacyService {
    transport: Transport,
}

impl LegacyService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    async fn post_form<B>(&self, ctx: &RequestContext, path: &str, form: &B) -> Result<()>
    where
        B: Serialize,
    {
        let request = self
            .transport
            .build_form_request(Method::POST, path, &[], Some(form))?;
        self.transport.send_empty(ctx, request).await
    }

    /// Account balance and charges.
    pub async fn account_info(&self, ctx: &RequestContext) -> Result<LegacyAccountInfo> {
        self.transport
            .request_json(ctx, Method::GET, "v1/account/info", &[], NO_BODY)
            .await
    }

    /// Domains hosted on the account.
    pub async fn list_dns_domains(&self, ctx: &RequestContext) -> Result<Vec<LegacyDnsDomain>> {
        self.transport
            .request_json(ctx, Method::GET, "v1/dns/list", &[], NO_BODY)
            .await
    }

    /// Create a domain with a default A record pointing at `server_ip`.
    pub async fn create_dns_domain(
        &self,
        ctx: &RequestContext,
        domain: &str,
        server_ip: &str,
    ) -> Result<()> {
        self.post_form(
            ctx,
            "v1/dns/create_domain",
            &CreateDomainForm {
                domain,
                serverip: server_ip,
            },
        )
        .await
    }

    /// Delete a domain.
    pub async fn delete_dns_domain(&self, ctx: &RequestContext, domain: &str) -> Result<()> {
        self.post_form(ctx, "v1/dns/delete_domain", &DomainForm { domain })
            .await
    }

    /// Set a server's label.
    pub async fn set_server_label(
        &self,
        ctx: &RequestContext,
        subid: &str,
        label: &str,
    ) -> Result<()> {
        self.post_form(ctx, "v1/server/label_set", &LabelForm { subid, label })
            .await
    }

    /// Set a server's tag.
    pub async fn set_server_tag(&self, ctx: &RequestContext, subid: &str, tag: &str) -> Result<()> {
        self.post_form(ctx, "v1/server/tag_set", &TagForm { subid, tag })
            .await
    }
}
