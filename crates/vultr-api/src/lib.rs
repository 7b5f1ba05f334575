//! Typed resource handlers for the Vultr REST API.
//!
//! Every resource family (instances, bare metal, block storage, DNS,
//! Kubernetes, databases, ...) gets a handler whose methods map one endpoint
//! each onto the shared [`vultr_core::Transport`]. [`VultrClient`] builds the
//! transport once and hands it to every handler.
//!
//! ```no_run
//! use vultr_api::{ListOptions, RequestContext, VultrClient};
//!
//! # async fn run() -> vultr_api::Result<()> {
//! let client = VultrClient::new("api-key")?;
//! let ctx = RequestContext::background();
//! let mut options = ListOptions::new().with_per_page(50);
//! loop {
//!     let page = client.instances().list(&ctx, &options).await?;
//!     for instance in &page.items {
//!         println!("{} {}", instance.id, instance.label);
//!     }
//!     match options.next_page(&page.meta) {
//!         Some(next) => options = next,
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod account;
pub mod application;
pub mod backup;
pub mod bare_metal;
pub mod billing;
pub mod block_storage;
pub mod client;
pub mod common;
pub mod container_registry;
pub mod database;
pub mod domain;
pub mod domain_record;
pub mod firewall_group;
pub mod firewall_rule;
pub mod instance;
pub mod iso;
pub mod kubernetes;
pub mod legacy;
pub mod load_balancer;
pub mod object_storage;
pub mod os;
pub mod plan;
pub mod region;
pub mod reserved_ip;
pub mod snapshot;
pub mod ssh_key;
pub mod startup_script;
pub mod user;
pub mod vpc;
pub mod vpc2;

pub use client::{VultrClient, VultrClientBuilder};
pub use vultr_core::{
    ClientConfig, ContextError, Error, ListOptions, Meta, Page, RequestContext, Transport,
    VultrConfig,
};

/// Convenient result alias that reuses the shared Vultr error type.
pub type Result<T> = vultr_core::Result<T>;

#[cfg(test)]
pub(crate) mod test_support {
    use vultr_core::{RequestContext, Transport};
    use wiremock::MockServer;

    pub(crate) fn transport(server: &MockServer) -> Transport {
        Transport::builder("test-key")
            .with_base_url(server.uri())
            .build()
            .unwrap()
    }

    pub(crate) fn ctx() -> RequestContext {
        RequestContext::background()
    }
}
