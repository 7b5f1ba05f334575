//! Billing history and invoices.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/billing";

/// A line in the billing history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    /// Entry id
    pub id: u64,
    /// Entry date
    pub date: String,
    /// `invoice` or `payment`
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Description
    pub description: String,
    /// Amount
    pub amount: f64,
    /// Balance after the entry
    pub balance: f64,
}

/// An invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    /// Invoice id
    pub id: u64,
    /// Invoice date
    pub date: String,
    /// Description
    pub description: String,
    /// Amount
    pub amount: f64,
    /// Balance after the invoice
    pub balance: f64,
}

/// A charge on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceItem {
    /// Description
    pub description: String,
    /// Product name
    pub product: String,
    /// Start of the billed period
    pub start_date: String,
    /// End of the billed period
    pub end_date: String,
    /// Units billed
    pub units: f64,
    /// Unit type
    pub unit_type: String,
    /// Price per unit
    pub unit_price: f64,
    /// Total
    pub total: f64,
}

/// Handler for `/v2/billing`.
#[derive(Debug, Clone)]
pub struct BillingService {
    transport: Transport,
}

impl BillingService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List billing history.
    pub async fn list_history(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<History>> {
        self.transport
            .request_page(ctx, &format!("{PATH}/history"), &options.to_pairs(), "billing_history")
            .await
    }

    /// List invoices.
    pub async fn list_invoices(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<Invoice>> {
        self.transport
            .request_page(ctx, &format!("{PATH}/invoices"), &options.to_pairs(), "billing_invoices")
            .await
    }

    /// Fetch one invoice.
    pub async fn get_invoice(&self, ctx: &RequestContext, invoice_id: &str) -> Result<Invoice> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/invoices/{}", path_segment(invoice_id)),
                NO_BODY,
                "billing_invoice",
            )
            .await
    }

    /// List the charges on an invoice.
    pub async fn list_invoice_items(
        &self,
        ctx: &RequestContext,
        invoice_id: &str,
        options: &ListOptions,
    ) -> Result<Page<InvoiceItem>> {
        self.transport
            .request_page(
                ctx,
                &format!("{PATH}/invoices/{}/items", path_segment(invoice_id)),
                &options.to_pairs(),
                "invoice_items",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/billing/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "billing_history": [{
                    "id": 5317720,
                    "date": "2018-04-01T00:30:05+00:00",
                    "type": "invoice",
                    "description": "Invoice #5317720",
                    "amount": 2.33,
                    "balance": -497.67
                }],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let page = BillingService::new(transport(&server))
            .list_history(&ctx(), &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(page.items[0].entry_type, "invoice");
    }

    #[tokio::test]
    async fn get_invoice_and_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/billing/invoices/123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "billing_invoice": {"id": 123456, "amount": 2.33}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/billing/invoices/123456/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "invoice_items": [{"description": "1.1.1.1 (1024 MB)", "units": 720, "total": 5}],
                "meta": {"total": 1, "links": {"next": "", "prev": ""}}
            })))
            .mount(&server)
            .await;

        let billing = BillingService::new(transport(&server));
        let invoice = billing.get_invoice(&ctx(), "123456").await.unwrap();
        assert_eq!(invoice.id, 123_456);
        let items = billing
            .list_invoice_items(&ctx(), "123456", &ListOptions::new())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert!((items.items[0].units - 720.0).abs() < f64::EPSILON);
    }
}
