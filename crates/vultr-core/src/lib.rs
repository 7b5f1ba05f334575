//! # vultr-core
//!
//! Shared request transport for the Vultr REST API.
//!
//! This crate builds HTTP requests against the Vultr endpoints, executes them
//! under a cancellable [`RequestContext`], and decodes JSON envelopes into
//! typed results. Resource handlers live in the `vultr-api` crate and contain
//! no HTTP mechanics of their own.
//!
//! ## Modules
//!
//! - [`client`] - HTTP client tuning, the [`Transport`] and its responses
//! - [`config`] - Validated client configuration
//! - [`context`] - Per-call cancellation and deadlines
//! - [`error`] - Error taxonomy and provider error bodies
//! - [`pagination`] - Cursor-based list options and metadata
//! - [`path`] - Escaping of IDs placed in request paths
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod pagination;
pub mod path;
pub mod query;

// Re-export commonly used types
pub use client::{ApiResponse, ClientConfig, Transport, TransportBuilder};
pub use config::VultrConfig;
pub use context::RequestContext;
pub use error::{ContextError, Error, Result};
pub use pagination::{Links, ListOptions, Meta, Page};
pub use path::path_segment;
