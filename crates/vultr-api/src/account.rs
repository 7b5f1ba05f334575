//! Account information.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/account";

/// Account details and balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Account holder name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Permissions granted to the API key
    pub acls: Vec<String>,
    /// Current balance, negative when in credit
    pub balance: f64,
    /// Charges accrued this period
    pub pending_charges: f64,
    /// Date of the last payment
    pub last_payment_date: String,
    /// Amount of the last payment
    pub last_payment_amount: f64,
}

/// Handler for `/v2/account`.
#[derive(Debug, Clone)]
pub struct AccountService {
    transport: Transport,
}

impl AccountService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch the account that owns the API key.
    pub async fn get(&self, ctx: &RequestContext) -> Result<Account> {
        self.transport
            .request_field(ctx, Method::GET, PATH, NO_BODY, "account")
            .await
    }
}
