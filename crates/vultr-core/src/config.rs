//! Configuration structures for Vultr clients.
//!
//! [`VultrConfig`] is an explicitly constructed, immutable description of the
//! endpoint and credential a client talks to. It is validated on creation and
//! can be deserialized from any serde format the caller chooses.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com/";

/// Configuration for a Vultr client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VultrConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as a bearer token
    #[validate(length(min = 1))]
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Override for the `User-Agent` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,

    /// Client-wide request timeout in seconds; unset leaves timing to the
    /// per-call context
    #[validate(range(min = 1, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

impl VultrConfig {
    /// Create a configuration for the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            user_agent: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: None,
        };

        config.check()?;
        Ok(config)
    }

    /// Point the configuration at a different endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, Error> {
        self.base_url = base_url.into();
        self.check()?;
        Ok(self)
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set a client-wide request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Get the client-wide request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Parse the base URL, forcing a trailing slash so relative paths append.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        parse_base_url(&self.base_url)
    }
}

/// Parse a base URL so that joining a relative path appends to it.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the URL cannot be parsed or cannot act
/// as a base.
pub fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let mut url =
        Url::parse(raw).map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::ConfigError(format!("Invalid base URL: {raw}")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
