//! Reserved IP addresses that survive instance destruction.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use vultr_core::client::NO_BODY;
use vultr_core::{path_segment, ListOptions, Page, RequestContext, Transport};

use crate::Result;

const PATH: &str = "v2/reserved-ips";

/// A reserved address or subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedIp {
    /// Reservation id
    pub id: String,
    /// Region id
    pub region: String,
    /// `v4` or `v6`
    pub ip_type: String,
    /// Subnet address
    pub subnet: String,
    /// Prefix length
    pub subnet_size: u32,
    /// Label
    pub label: String,
    /// Instance the address is attached to
    pub instance_id: String,
}

/// Body for reserving an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedIpRequest {
    /// Region id
    pub region: String,
    /// `v4` or `v6`
    pub ip_type: String,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Body for turning an instance address into a reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedIpConvertRequest {
    /// Address currently on an instance
    pub ip_address: String,
    /// Label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Serialize)]
struct LabelRequest<'a> {
    label: &'a str,
}

#[derive(Serialize)]
struct AttachRequest<'a> {
    instance_id: &'a str,
}

/// Handler for `/v2/reserved-ips`.
#[derive(Debug, Clone)]
pub struct ReservedIpService {
    transport: Transport,
}

impl ReservedIpService {
    /// Create the handler.
    #[must_use]
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Reserve an address.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: &ReservedIpRequest,
    ) -> Result<ReservedIp> {
        self.transport
            .request_field(ctx, Method::POST, PATH, Some(request), "reserved_ip")
            .await
    }

    /// Fetch a reservation.
    pub async fn get(&self, ctx: &RequestContext, reserved_ip: &str) -> Result<ReservedIp> {
        self.transport
            .request_field(
                ctx,
                Method::GET,
                &format!("{PATH}/{}", path_segment(reserved_ip)),
                NO_BODY,
                "reserved_ip",
            )
            .await
    }

    /// Relabel a reservation.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        reserved_ip: &str,
        label: &str,
    ) -> Result<ReservedIp> {
        self.transport
            .request_field(
                ctx,
                Method::PATCH,
                &format!("{PATH}/{}", path_segment(reserved_ip)),
                Some(&LabelRequest { label }),
                "reserved_ip",
            )
            .await
    }

    /// Release a reservation.
    pub async fn delete(&self, ctx: &RequestContext, reserved_ip: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::DELETE,
                &format!("{PATH}/{}", path_segment(reserved_ip)),
                NO_BODY,
            )
            .await
    }

    /// List reservations.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<Page<ReservedIp>> {
        self.transport
            .request_page(ctx, PATH, &options.to_pairs(), "reserved_ips")
            .await
    }

    /// Attach to an instance.
    pub async fn attach(
        &self,
        ctx: &RequestContext,
        reserved_ip: &str,
        instance_id: &str,
    ) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/attach", path_segment(reserved_ip)),
                Some(&AttachRequest { instance_id }),
            )
            .await
    }

    /// Detach from its instance.
    pub async fn detach(&self, ctx: &RequestContext, reserved_ip: &str) -> Result<()> {
        self.transport
            .request_empty(
                ctx,
                Method::POST,
                &format!("{PATH}/{}/detach", path_segment(reserved_ip)),
                NO_BODY,
            )
            .await
    }

    /// Convert an instance address into a reservation.
    pub async fn convert(
        &self,
        ctx: &RequestContext,
        request: &ReservedIpConvertRequest,
    ) -> Result<ReservedIp> {
        self.transport
            .request_field(
                ctx,
                Method::POST,
                &format!("{PATH}/convert"),
                Some(request),
                "reserved_ip",
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
    async fn convert_address() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/reserved-ips/convert"))
            .and(body_json(json!({"ip_address": "192.0.2.1", "label": "edge"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "reserved_ip": {
                    "id": "r1",
                    "region": "ewr",
                    "ip_type": "v4",
                    "subnet": "192.0.2.1",
                    "subnet_size": 32,
                    "label": "edge",
                    "instance_id": "inst"
                }
            })))
            .mount(&server)
            .await;

        let request = ReservedIpConvertRequest {
            ip_address: "192.0.2.1".into(),
            label: Some("edge".into()),
        };
        let ip = ReservedIpService::new(transport(&server))
            .convert(&ctx(), &request)
            .await
            .unwrap();
        assert_eq!(ip.subnet_size, 32);
        assert_eq!(ip.instance_id, "inst");
    }

    #[tokio::test]
    async fn attach_and_detach() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/reserved-ips/r1/attach"))
            .and(body_json(json!({"instance_id": "inst"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/reserved-ips/r1/detach"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = ReservedIpService::new(transport(&server));
        service.attach(&ctx(), "r1", "inst").await.unwrap();
        service.detach(&ctx(), "r1").await.unwrap();
    }
}
