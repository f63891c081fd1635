//! Cluster resource manager clients.
//!
//! The resolver needs one fact from the cluster: which host currently
//! serves a given application's web interface. [`ClusterClient`] is
//! that seam; [`RestClusterClient`] implements it against the
//! manager's REST API. Tests and embedders with their own manager
//! integration supply their own implementation.

mod rest;

pub use rest::RestClusterClient;

use async_trait::async_trait;

use crate::Result;

/// Source of application tracking URLs.
///
/// Implementations answer exactly one question: where is the master of
/// this application serving its web interface right now. The resolver
/// treats any failure here as terminal for the attempt; it never
/// retries a cluster lookup.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Client name, used in logs.
    fn name(&self) -> &str;

    /// The tracking URL the cluster currently reports for `app_id`.
    ///
    /// Managers report finished or unknown applications with an empty
    /// URL rather than an error; the resolver rejects blank URLs, so
    /// implementations may pass them through as-is.
    async fn tracking_url(&self, app_id: &str) -> Result<String>;
}
