//! Muninn - Endpoint discovery and caching for cluster-hosted applications
//!
//! This crate resolves the HTTP service endpoint of a running
//! distributed application: it asks the cluster resource manager where
//! the application master is, follows the proxy's refresh redirects to
//! the service root, negotiates the API version, and caches the result
//! in a bounded, security-aware LRU cache so repeated lookups stay off
//! the network.
//!
//! # Resolution Example
//!
//! ```rust,no_run
//! use muninn::Muninn;
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let resolver = Muninn::builder()
//!         .cluster_manager("http://rm:8088")
//!         .security_enabled(true)
//!         .build()?;
//!
//!     let info = resolver.resolve("application_1700000000000_0001").await?;
//!     println!("{} speaks {}", info.tracking_url, info.api_version);
//!     Ok(())
//! }
//! ```
//!
//! # Resource Example
//!
//! ```rust,no_run
//! use muninn::{Muninn, ServiceClient};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> muninn::Result<()> {
//!     let resolver = Muninn::builder()
//!         .cluster_manager("http://rm:8088")
//!         .build()?;
//!
//!     // The client picks up the version and security filters the
//!     // endpoint requires.
//!     let client = ServiceClient::new();
//!     let master = resolver
//!         .master_resource(&client, "application_1700000000000_0001")
//!         .await?;
//!
//!     let plan: Value = master.path("physicalPlan")?.get_json().await?;
//!     println!("{plan}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod cluster;
pub mod convert;
pub mod error;
pub mod resolver;
pub mod telemetry;
pub mod types;
pub mod ws;

// Re-export main types at crate root
pub use client::{
    AppResource, RequestFilter, SECURITY_FILTER_ID, SecurityHeaderFilter, ServiceClient,
};
pub use cluster::{ClusterClient, RestClusterClient};
pub use convert::{
    SUPPORTED_VERSIONS, VERSION_FILTER_ID, VersionConversionFilter, VersionConverter, converter_for,
};
pub use error::{MuninnError, Result};
pub use resolver::{
    DEFAULT_CACHE_CAPACITY, EndpointCache, EndpointResolver, Muninn, MuninnBuilder, ResolverConfig,
};
pub use types::{DEFAULT_TOKEN_EXPIRY, EndpointInfo, SecurityContext};
