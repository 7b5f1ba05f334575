//! DNS domains, their SOA record and DNSSEC.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/domains";

/// A hosted zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    /// Domain name
    pub domain: String,
    /// Creation time
    pub date_created: String,
    /// `enabled` or `disabled`
    pub dns_sec: String,
}

/// Body for creating a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequest {
    /// Domain name
    pub domain: String,
    /// Address for the default A record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// `enabled` or `disabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_sec: Option<String>,
}

/// Start of authority settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Soa {
    /// Primary nameserver
    pub nsprimary: String,
    /// Contact email
    pub email: String,
}

/// Body for updating the SOA record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaUpdateRequest {
    /// Primary nameserver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nsprimary: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize)]
struct DnsSecRequest<'a> {
    dns_sec: &'a str,
}

/// Handler for `/v2/domains`.
#[derive(Debug, Clone)]
pub struct DomainService {
    transport: Transport,
}

impl DomainService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List domains.
    pub async fn list(&self, ctx: &RequestContext, options: &ListOptions) -> Result<Page<Domain>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "domains")
            .await
    }

    /// Create a domain.
    pub async fn create(&self, ctx: &RequestContext, request: &DomainRequest) -> Result<Domain> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "domain")
            .await
    }

    /// Fetch a domain.
    pub async fn get(&self, ctx: &RequestContext, domain: &str) -> Result<Domain> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(domain)),
                NO_BODY,
                "domain",
            )
            .await
    }

    /// Enable or disable DNSSEC. `dns_sec` is `enabled` or `disabled`.
    pub async fn update(&self, ctx: &RequestContext, domain: &str, dns_sec: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PUT,
                &format!("{PATH}/{}", path_segment(domain)),
                Some(&DnsSecRequest { dns_sec }),
            )
            .await
    }

    /// Delete a domain and all its records.
    pub async fn delete(&self, ctx: &RequestContext, domain: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(domain)),
                NO_BODY,
            )
            .await
    }

    /// SOA settings.
    pub async fn get_soa(&self, ctx: &RequestContext, domain: &str) -> Result<Soa> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/soa", path_segment(domain)),
                NO_BODY,
                "dns_soa",
            )
            .await
    }

    /// Change SOA settings.
    pub async fn update_soa(
        &self,
        ctx: &RequestContext,
        domain: &str,
        request: &SoaUpdateRequest,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}/soa", path_segment(domain)),
                Some(request),
            )
            .await
    }

    /// DS and DNSKEY records for the zone.
    pub async fn get_dnssec(&self, ctx: &RequestContext, domain: &str) -> Result<Vec<String>> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}/dnssec", path_segment(domain)),
                NO_BODY,
                "dns_sec",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ctx, transport};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn create_domain_with_default_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/domains"))
            .and(body_json(json!({"domain": "example.com", "ip": "192.0.2.123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "domain": {
                    "domain": "example.com",
                    "date_created": "2020-10-10T01:56:20+00:00",
                    "dns_sec": "disabled"
                }
            })))
            .mount(&server)
            .await;

        let request = DomainRequest {
            domain: "example.com".into(),
            ip: Some("192.0.2.123".into()),
            dns_sec: None,
        };
        let domain = DomainService::new(transport(&server))
            .create(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(domain.dns_sec, "disabled");
    }

    #[tokio::test]
    async fn soa_and_dnssec() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/domains/example.com/soa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dns_soa": {"nsprimary": "ns1.vultr.com", "email": "admin@example.com"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/domains/example.com/dnssec"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dns_sec": [
                    "example.com IN DNSKEY 257 3 13 kRrxANp7YTGqVbaWtMy8hhsK0jcG4ajjICZKMb4f",
                    "example.com IN DS 27933 13 1 2d9ac457e5c11a104e25d971d0a6254562bddde7"
                ]
            })))
            .mount(&server)
            .await;

        let service = DomainService::new(transport(&server));
        let soa = service.get_soa(&ctx(), "example.com").await.unwrap();
        assert_eq!(soa.nsprimary, "ns1.vultr.com");
        let keys = service.get_dnssec(&ctx(), "example.com").await.unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys[1].contains(" IN DS "));
    }

    #[tokio::test]
    async fn update_toggles_dnssec() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2/domains/example.com"))
            .and(body_json(json!({"dns_sec": "enabled"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        DomainService::new(transport(&server))
            .update(&ctx(), "example.com", "enabled")
            .await
            .unwrap();
    }
}
