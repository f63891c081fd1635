//! Builder for configuring resolver instances

use std::sync::Arc;
use std::time::Duration;

use super::{EndpointResolver, ResolverConfig};
use crate::client::ServiceClient;
use crate::cluster::{ClusterClient, RestClusterClient};
use crate::{MuninnError, Result};

/// Main entry point for creating resolver instances.
///
/// ```rust,no_run
/// # use muninn::Muninn;
/// # fn main() -> muninn::Result<()> {
/// let resolver = Muninn::builder()
///     .cluster_manager("http://rm:8088")
///     .security_enabled(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring a resolver.
    pub fn builder() -> MuninnBuilder {
        MuninnBuilder::new()
    }
}

/// Builder for configuring resolver instances.
pub struct MuninnBuilder {
    cluster: Option<Arc<dyn ClusterClient>>,
    cluster_manager_url: Option<String>,
    config: ResolverConfig,
    timeout_secs: Option<u64>,
    http: Option<reqwest::Client>,
}

impl MuninnBuilder {
    pub fn new() -> Self {
        Self {
            cluster: None,
            cluster_manager_url: None,
            config: ResolverConfig::default(),
            timeout_secs: None,
            http: None,
        }
    }

    /// Use an existing cluster client.
    ///
    /// Takes precedence over [`cluster_manager`](Self::cluster_manager).
    pub fn cluster(mut self, cluster: Arc<dyn ClusterClient>) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Look up applications through the cluster manager's REST API at
    /// this base URL.
    pub fn cluster_manager(mut self, base_url: impl Into<String>) -> Self {
        self.cluster_manager_url = Some(base_url.into());
        self
    }

    /// Set the root path applications are stored under.
    pub fn apps_root(mut self, root: impl Into<String>) -> Self {
        self.config = self.config.apps_root(root);
        self
    }

    /// Enable or disable security token capture.
    pub fn security_enabled(mut self, enabled: bool) -> Self {
        self.config = self.config.security_enabled(enabled);
        self
    }

    /// Set the lifetime applied to captured tokens.
    pub fn token_expiry(mut self, expiry: Duration) -> Self {
        self.config = self.config.token_expiry(expiry);
        self
    }

    /// Set the endpoint cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.cache_capacity(capacity);
        self
    }

    /// Request timeout for probe and cluster traffic, in seconds.
    /// Default: 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Use an existing `reqwest::Client` for all traffic.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the resolver.
    ///
    /// Fails with [`MuninnError::NoCluster`] when neither
    /// [`cluster`](Self::cluster) nor
    /// [`cluster_manager`](Self::cluster_manager) was configured.
    pub fn build(self) -> Result<EndpointResolver> {
        let timeout_secs = self.timeout_secs.unwrap_or(30);
        let http = match self.http {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|e| {
                    MuninnError::Configuration(format!("failed to build HTTP client: {e}"))
                })?,
        };

        let cluster: Arc<dyn ClusterClient> = match (self.cluster, self.cluster_manager_url) {
            (Some(cluster), _) => cluster,
            (None, Some(url)) => Arc::new(RestClusterClient::with_http_client(url, http.clone())),
            (None, None) => return Err(MuninnError::NoCluster),
        };

        Ok(EndpointResolver::with_http_client(
            cluster,
            self.config,
            ServiceClient::with_http_client(http),
        ))
    }
}

impl Default for MuninnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
