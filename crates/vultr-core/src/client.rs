//! HTTP transport shared by every resource handler.
//!
//! The [`Transport`] owns the only HTTP mechanics in the workspace:
//!
//! 1. **Build** a request from a relative path, ordered query pairs and an
//!    optional body. [`Transport::build_request`] encodes bodies as JSON for
//!    the current `v2` endpoints; [`Transport::build_form_request`] encodes
//!    them as URL-encoded forms for the legacy `v1` endpoints.
//! 2. **Execute** it under a [`RequestContext`], attaching the bearer
//!    credential and user agent.
//! 3. **Decode** the [`ApiResponse`] into a typed target, or into an
//!    [`Error`] when the provider rejected the call.
//!
//! Each call makes exactly one attempt. The transport holds only immutable
//! configuration and is cheap to clone and share between tasks.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, ClientBuilder, Method, Request, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{parse_base_url, VultrConfig, DEFAULT_BASE_URL};
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::pagination::{Meta, Page};
use crate::path::is_unresolvable;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("vultr-rs/", env!("CARGO_PKG_VERSION"));

/// Default idle timeout for connection pools (seconds)
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default TCP connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Typed `None` for requests without a body.
pub const NO_BODY: Option<&()> = None;

/// How a request body is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/json`, used by current endpoints
    Json,
    /// `application/x-www-form-urlencoded`, used by legacy endpoints
    Form,
}

impl BodyEncoding {
    /// The `Content-Type` header value for this encoding.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => JSON_CONTENT_TYPE,
            Self::Form => FORM_CONTENT_TYPE,
        }
    }

    /// Serialize `body` with this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the value cannot be represented.
    pub fn encode<B>(self, body: &B) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        match self {
            Self::Json => serde_json::to_vec(body).map_err(|e| Error::Encoding(e.to_string())),
            Self::Form => serde_urlencoded::to_string(body)
                .map(String::into_bytes)
                .map_err(|e| Error::Encoding(e.to_string())),
        }
    }
}

/// HTTP client configuration.
///
/// Tunes the underlying connection pool. No retry policy exists; a request
/// timeout is only applied when set explicitly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Client-wide request timeout
    pub timeout: Option<Duration>,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Transport`].
#[derive(Debug)]
pub struct TransportBuilder {
    api_key: SecretString,
    base_url: String,
    user_agent: String,
    http_config: ClientConfig,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
    http_client: Option<Client>,
}

impl TransportBuilder {
    /// Start a builder for the default endpoint with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_config: ClientConfig::new(),
            tls_verify: true,
            tls_ca_cert: None,
            http_client: None,
        }
    }

    /// Start a builder from a validated [`VultrConfig`].
    #[must_use]
    pub fn from_config(config: &VultrConfig) -> Self {
        let mut builder = Self::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_tls_verify(config.tls_verify);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.with_user_agent(user_agent.clone());
        }
        if let Some(path) = &config.tls_ca_cert {
            builder = builder.with_ca_cert(path.clone());
        }
        if let Some(timeout) = config.timeout() {
            builder.http_config = builder.http_config.with_timeout(timeout);
        }
        builder
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Use a preconfigured `reqwest` client instead of building one.
    ///
    /// TLS and pool settings on this builder are ignored when set.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Finalise the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for an invalid base URL, a credential or
    /// user agent that cannot be sent as a header, or a TLS setup failure.
    pub fn build(self) -> Result<Transport> {
        let base_url = parse_base_url(&self.base_url)?;

        let bearer = format!("Bearer {}", self.api_key.expose_secret());
        let mut authorization = HeaderValue::from_str(&bearer).map_err(|_| {
            Error::ConfigError("API key contains characters not allowed in a header".into())
        })?;
        authorization.set_sensitive(true);

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|err| Error::ConfigError(format!("Invalid user agent: {err}")))?;

        let log_requests = self.http_config.enable_logging;
        let http = match self.http_client {
            Some(client) => client,
            None => build_http_client(
                &self.http_config,
                self.tls_verify,
                self.tls_ca_cert.as_ref(),
            )?,
        };

        Ok(Transport {
            http,
            base_url,
            authorization,
            user_agent,
            log_requests,
        })
    }
}

fn build_http_client(
    config: &ClientConfig,
    tls_verify: bool,
    ca_cert: Option<&PathBuf>,
) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .gzip(config.enable_compression);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if !tls_verify {
        warn!("TLS verification disabled for Vultr client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(ca_cert) = ca_cert {
        debug!("loading CA certificate from {}", ca_cert.display());
        let bytes = std::fs::read(ca_cert).map_err(|err| {
            Error::ConfigError(format!(
                "Failed to read CA certificate {}: {err}",
                ca_cert.display()
            ))
        })?;
        let cert = reqwest::Certificate::from_pem(&bytes)
            .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
}

/// Request builder, executor and decoder for the Vultr API.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    base_url: Url,
    authorization: HeaderValue,
    user_agent: HeaderValue,
    log_requests: bool,
}

impl Transport {
    /// Transport for the default endpoint with default settings.
    ///
    /// # Errors
    ///
    /// See [`TransportBuilder::build`].
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        TransportBuilder::new(api_key).build()
    }

    /// Start a builder.
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> TransportBuilder {
        TransportBuilder::new(api_key)
    }

    /// Transport described by a [`VultrConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &VultrConfig) -> Result<Self> {
        config.check()?;
        TransportBuilder::from_config(config).build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Build a request whose body, if any, is encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the body cannot be serialized and
    /// [`Error::InvalidEndpoint`] if `path` cannot be resolved.
    pub fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        self.build_with_encoding(method, path, query, body, BodyEncoding::Json)
    }

    /// Build a request whose body, if any, is URL-form encoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if the body cannot be serialized as a flat
    /// form and [`Error::InvalidEndpoint`] if `path` cannot be resolved.
    pub fn build_form_request<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        self.build_with_encoding(method, path, query, body, BodyEncoding::Form)
    }

    /// Build a request with an explicit body encoding.
    ///
    /// # Errors
    ///
    /// See [`Transport::build_request`].
    pub fn build_with_encoding<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
        encoding: BodyEncoding,
    ) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        // Encode first so a bad body never produces a half-built request.
        let payload = body.map(|b| encoding.encode(b)).transpose()?;

        let mut url = self.resolve(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut request = Request::new(method, url);
        if let Some(bytes) = payload {
            request.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static(encoding.content_type()),
            );
            *request.body_mut() = Some(bytes.into());
        }
        Ok(request)
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(is_unresolvable) {
            return Err(Error::InvalidEndpoint(format!(
                "API path `{path}` has an empty or dot segment"
            )));
        }
        self.base_url
            .join(relative)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
    }

    /// Send a request and read the full response.
    ///
    /// Non-2xx statuses are not errors at this stage; they are interpreted by
    /// the decode step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Context`] if `ctx` is done before or during the call,
    /// and [`Error::Transport`] if the request cannot be delivered.
    pub async fn execute(&self, ctx: &RequestContext, mut request: Request) -> Result<ApiResponse> {
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let method = request.method().clone();
        let path = request.url().path().to_string();
        if self.log_requests {
            debug!(%method, %path, "Sending Vultr API request");
        }

        let http = &self.http;
        let outcome = ctx
            .run(async move {
                let response = http.execute(request).await?;
                let status = response.status();
                let body = response.bytes().await?;
                Ok::<_, reqwest::Error>(ApiResponse::new(status, body.to_vec()))
            })
            .await;

        match outcome {
            Err(reason) => {
                debug!(%method, %path, %reason, "Vultr API request aborted by context");
                Err(Error::Context(reason))
            }
            Ok(Err(err)) => Err(Error::from(err)),
            Ok(Ok(response)) => {
                if self.log_requests {
                    debug!(
                        %method,
                        %path,
                        status = response.status.as_u16(),
                        "Received Vultr API response"
                    );
                }
                Ok(response)
            }
        }
    }

    /// Execute and decode the whole body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute`] and [`ApiResponse::decode`].
    pub async fn send<T>(&self, ctx: &RequestContext, request: Request) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(ctx, request).await?.decode()
    }

    /// Execute and decode the value under `key` into `T`.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute`] and [`ApiResponse::decode_field`].
    pub async fn send_field<T>(
        &self,
        ctx: &RequestContext,
        request: Request,
        key: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(ctx, request).await?.decode_field(key)
    }

    /// Execute and decode a list envelope keyed by `key`.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute`] and [`ApiResponse::decode_page`].
    pub async fn send_page<T>(
        &self,
        ctx: &RequestContext,
        request: Request,
        key: &str,
    ) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        self.execute(ctx, request).await?.decode_page(key)
    }

    /// Execute a request that answers without a body.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute`] and [`ApiResponse::check`].
    pub async fn send_empty(&self, ctx: &RequestContext, request: Request) -> Result<()> {
        self.execute(ctx, request).await?.check()
    }

    /// JSON request whose response is the bare resource.
    ///
    /// # Errors
    ///
    /// Any error of the build, execute or decode steps.
    pub async fn request_json<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(method, path, query, body)?;
        self.send(ctx, request).await
    }

    /// JSON request whose response wraps the resource under `key`.
    ///
    /// # Errors
    ///
    /// Any error of the build, execute or decode steps.
    pub async fn request_field<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
        key: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(method, path, &[], body)?;
        self.send_field(ctx, request, key).await
    }

    /// `GET` a list envelope keyed by `key`.
    ///
    /// # Errors
    ///
    /// Any error of the build, execute or decode steps.
    pub async fn request_page<T>(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&'static str, String)],
        key: &str,
    ) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::GET, path, query, NO_BODY)?;
        self.send_page(ctx, request, key).await
    }

    /// JSON request whose response carries no body.
    ///
    /// # Errors
    ///
    /// Any error of the build, execute or check steps.
    pub async fn request_empty<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, &[], body)?;
        self.send_empty(ctx, request).await
    }
}

/// Status and raw body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Wrap a status and body.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Succeed on 2xx, otherwise return the provider's error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] or [`Error::Http`] for non-2xx statuses.
    pub fn check(&self) -> Result<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(Error::from_response(self.status.as_u16(), &self.body))
        }
    }

    /// Decode the whole body into `T`.
    ///
    /// Object members that are absent or `null` take their default when `T`
    /// declares one.
    ///
    /// # Errors
    ///
    /// Returns the provider error for non-2xx statuses and
    /// [`Error::Decode`] when a 2xx body does not match `T`.
    pub fn decode<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.check()?;
        let value = serde_json::from_slice(&self.body).map_err(|err| self.decode_error(&err))?;
        self.decode_value(value)
    }

    /// Decode the value stored under `key` of a JSON object body.
    ///
    /// # Errors
    ///
    /// As [`ApiResponse::decode`]; a missing key is also a decode error.
    pub fn decode_field<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut envelope = self.decode_object()?;
        let value = envelope
            .remove(key)
            .ok_or_else(|| Error::Decode(format!("response has no `{key}` field")))?;
        self.decode_value(value)
    }

    /// Decode a list envelope: the items under `key` plus `meta`.
    ///
    /// A missing or null collection is an empty page and a missing `meta`
    /// block is default metadata.
    ///
    /// # Errors
    ///
    /// As [`ApiResponse::decode`].
    pub fn decode_page<T>(&self, key: &str) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let mut envelope = self.decode_object()?;
        let items = match envelope.remove(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => self.decode_value(value)?,
        };
        let meta = match envelope.remove("meta") {
            None | Some(Value::Null) => Meta::default(),
            Some(value) => self.decode_value(value)?,
        };
        Ok(Page { items, meta })
    }

    fn decode_object(&self) -> Result<serde_json::Map<String, Value>> {
        self.decode()
    }

    fn decode_value<T>(&self, mut value: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        strip_nulls(&mut value);
        serde_json::from_value(value).map_err(|err| self.decode_error(&err))
    }

    fn decode_error(&self, err: &serde_json::Error) -> Error {
        warn!(status = self.status.as_u16(), error = %err, "Failed to decode Vultr API response");
        Error::Decode(err.to_string())
    }
}

/// Remove `null` object members at every depth so they decode as absent.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}
