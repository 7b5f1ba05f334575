//! Types shared by several resource families.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parse the RFC 3339 timestamps the API uses for `date_created` and friends.
///
/// Returns `None` for empty or malformed values.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Traffic for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandwidthUsage {
    /// Bytes received
    pub incoming_bytes: u64,
    /// Bytes sent
    pub outgoing_bytes: u64,
}

/// Daily traffic keyed by `YYYY-MM-DD`.
pub type Bandwidth = BTreeMap<String, BandwidthUsage>;

/// Base64 encoded cloud-init user data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    /// Base64 payload
    pub data: String,
}

/// IPv4 address attached to a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipv4 {
    /// Address
    pub ip: String,
    /// Netmask
    pub netmask: String,
    /// Gateway
    pub gateway: String,
    /// `main_ip` or `secondary_ip`
    #[serde(rename = "type")]
    pub ip_type: String,
    /// Reverse DNS name
    pub reverse: String,
}

/// IPv6 network attached to a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipv6 {
    /// Address
    pub ip: String,
    /// Network
    pub network: String,
    /// Prefix length
    pub network_size: u32,
    /// Address type
    #[serde(rename = "type")]
    pub ip_type: String,
}

/// Upgrade paths available for a server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    /// Applications that can be installed
    pub applications: Vec<crate::application::Application>,
    /// Operating systems that can be installed
    pub os: Vec<crate::os::Os>,
    /// Plan ids the server can move to
    pub plans: Vec<String>,
}

/// Which upgrade paths to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeType {
    /// Every kind of upgrade
    All,
    /// Applications only
    Applications,
    /// Operating systems only
    Os,
    /// Plans only
    Plans,
}

impl UpgradeType {
    /// Query value for the `type` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Applications => "applications",
            Self::Os => "os",
            Self::Plans => "plans",
        }
    }
}

/// Request body for reinstalling a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinstallRequest {
    /// Hostname to assign after reinstall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parse_timestamp_accepts_offsets() {
        let ts = parse_timestamp("2020-10-10T01:56:20+00:00").unwrap();
        assert_eq!(ts.year(), 2020);
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn bandwidth_decodes_by_day() {
        let json = r#"{
            "2024-01-01": {"incoming_bytes": 10, "outgoing_bytes": 20},
            "2024-01-02": {}
        }"#;
        let bandwidth: Bandwidth = serde_json::from_str(json).unwrap();
        assert_eq!(bandwidth["2024-01-01"].outgoing_bytes, 20);
        assert_eq!(bandwidth["2024-01-02"], BandwidthUsage::default());
    }
}
