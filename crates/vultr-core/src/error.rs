//! Error types for Vultr API operations.
//!
//! Every call either fully succeeds or returns exactly one of these errors.
//! The variants separate failures raised before a request leaves the process
//! (encoding, invalid endpoint), failures caused by the caller's context,
//! network failures, and rejections reported by the provider.

use serde::Deserialize;
use thiserror::Error;

/// Reason a [`RequestContext`](crate::RequestContext) stopped a call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextError {
    /// The caller cancelled the context
    #[error("context canceled")]
    Canceled,

    /// The context deadline passed before the call completed
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Main error type for Vultr operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encoding(String),

    /// The caller's context was cancelled or timed out
    #[error("Request aborted: {0}")]
    Context(ContextError),

    /// Non-2xx response whose body is not a provider error document
    #[error("HTTP error: status {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// Non-2xx response with a structured provider error body
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider supplied message
        message: String,
        /// Any additional fields of the error body
        details: Option<serde_json::Value>,
    },

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be delivered or the response could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// A path or base URL could not be turned into a request URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for Vultr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error document returned by the API on failure.
///
/// The provider answers rejected requests with `{"error": "...", "status": N}`.
/// Fields other than `error` and `status` are kept as details.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    /// Human-readable error message
    pub error: String,
    /// Status echoed by the provider, not always numeric
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    /// Remaining fields of the document
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Error {
    /// Interpret a non-2xx response body.
    ///
    /// Returns [`Error::Api`] when the body is a provider error document and
    /// [`Error::Http`] otherwise. The status is always taken from the HTTP
    /// status line, never from the body.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => {
                let details = if parsed.extra.is_empty() {
                    None
                } else {
                    Some(serde_json::Value::Object(parsed.extra))
                };
                Self::Api {
                    status,
                    message: parsed.error,
                    details,
                }
            }
            Err(_) => Self::Http { status },
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "ENCODING_ERROR",
            Self::Context(ContextError::Canceled) => "CONTEXT_CANCELED",
            Self::Context(ContextError::DeadlineExceeded) => "CONTEXT_DEADLINE_EXCEEDED",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// HTTP status carried by the error, if the provider answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the caller's context stopped the call.
    #[must_use]
    pub const fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }

    /// Returns true when the provider answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::ConfigError(_) | Self::Transport(_)
        )
    }
}

impl From<ContextError> for Error {
    fn from(err: ContextError) -> Self {
        Self::Context(err)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
