//! Endpoint resolution with a security-aware, time-limited cache.
//!
//! [`EndpointResolver`] turns an application id into the application's
//! HTTP service endpoint: cluster manager lookup, a bounded probe
//! through the proxy's refresh redirects, version discovery, and the
//! master info fetch. Results land in a bounded LRU cache, so repeated
//! lookups cost no I/O until the entry is displaced, invalidated, or
//! its security token expires.
//!
//! # Architecture
//!
//! The resolver owns a private [`ServiceClient`] for probing (its
//! filter chain stays empty; probe URLs are whatever the proxy says,
//! not native-dialect paths). Caller-facing resource handles from
//! [`master_resource`](EndpointResolver::master_resource) ride the
//! caller's own client, which gets the version and security filters
//! the endpoint requires.
//!
//! # Locking
//!
//! One async mutex guards the cache and is held across the whole
//! check-resolve-update sequence, for all callers and all ids.
//! Resolutions are rare (cold start, token refresh), and holding the
//! lock across the fetch means concurrent callers of one id share a
//! single probe instead of stampeding. The cost is that resolutions
//! of unrelated ids serialize too; callers needing cross-id
//! parallelism would need per-id locks here, at the price of losing
//! duplicate-probe suppression.

mod builder;
mod cache;
mod probe;

pub use builder::{Muninn, MuninnBuilder};
pub use cache::{DEFAULT_CACHE_CAPACITY, EndpointCache};

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::client::{AppResource, SecurityHeaderFilter, ServiceClient};
use crate::cluster::ClusterClient;
use crate::convert::VersionConversionFilter;
use crate::telemetry;
use crate::types::{DEFAULT_TOKEN_EXPIRY, EndpointInfo, SecurityContext};
use crate::ws::{MASTER_PATH, WS_PATH, WS_VERSION};
use crate::{MuninnError, Result};

/// Configuration for an [`EndpointResolver`].
///
/// ```rust
/// # use muninn::ResolverConfig;
/// # use std::time::Duration;
/// let config = ResolverConfig::new()
///     .security_enabled(true)
///     .token_expiry(Duration::from_secs(900));
/// ```
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Root path applications are stored under, used by the
    /// [`app_path`](EndpointResolver::app_path) fallback. Default: `/apps`.
    pub apps_root: String,
    /// Whether the cluster issues security tokens. Default: false.
    pub security_enabled: bool,
    /// Lifetime applied to captured tokens. Default: 1 hour.
    pub token_expiry: Duration,
    /// Endpoint cache capacity. Default: 100.
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            apps_root: "/apps".to_string(),
            security_enabled: false,
            token_expiry: DEFAULT_TOKEN_EXPIRY,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ResolverConfig {
    /// Create a config with the defaults above.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root path applications are stored under.
    pub fn apps_root(mut self, root: impl Into<String>) -> Self {
        self.apps_root = root.into();
        self
    }

    /// Enable or disable security token capture.
    pub fn security_enabled(mut self, enabled: bool) -> Self {
        self.security_enabled = enabled;
        self
    }

    /// Set the lifetime applied to captured tokens.
    pub fn token_expiry(mut self, expiry: Duration) -> Self {
        self.token_expiry = expiry;
        self
    }

    /// Set the endpoint cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

// ============================================================================
// Wire shapes
// ============================================================================

/// Root payload of the application web service.
#[derive(Debug, Deserialize)]
struct ServiceRoot {
    version: String,
}

/// Info payload of the master service.
#[derive(Debug, Deserialize)]
struct MasterInfo {
    #[serde(rename = "appMasterTrackingUrl")]
    app_master_tracking_url: String,
    #[serde(rename = "appPath")]
    app_path: String,
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves and caches application service endpoints.
///
/// See the [module docs](self) for the resolution sequence and the
/// locking design.
pub struct EndpointResolver {
    cluster: Arc<dyn ClusterClient>,
    http: ServiceClient,
    config: ResolverConfig,
    cache: Mutex<EndpointCache>,
}

impl EndpointResolver {
    /// Create a resolver over a cluster client with default configuration.
    pub fn new(cluster: Arc<dyn ClusterClient>) -> Self {
        Self::with_config(cluster, ResolverConfig::default())
    }

    /// Create a resolver with explicit configuration.
    pub fn with_config(cluster: Arc<dyn ClusterClient>, config: ResolverConfig) -> Self {
        Self::with_http_client(cluster, config, ServiceClient::new())
    }

    /// Create a resolver probing through an existing [`ServiceClient`].
    pub fn with_http_client(
        cluster: Arc<dyn ClusterClient>,
        config: ResolverConfig,
        http: ServiceClient,
    ) -> Self {
        let cache = Mutex::new(EndpointCache::new(config.cache_capacity));
        Self {
            cluster,
            http,
            config,
            cache,
        }
    }

    /// Resolve the service endpoint for `app_id`.
    ///
    /// Returns the cached record while it is valid; otherwise runs the
    /// full resolution sequence and caches the result. Nothing is
    /// cached on failure, and a failed attempt is not retried here.
    #[instrument(skip(self), fields(operation = "resolve"))]
    pub async fn resolve(&self, app_id: &str) -> Result<EndpointInfo> {
        // Held across the fetch; see the module docs on locking.
        let mut cache = self.cache.lock().await;

        if let Some(info) = cache.get(app_id) {
            debug!(app_id, "endpoint cache hit");
            return Ok(info);
        }

        let start = Instant::now();
        match self.fetch_endpoint(app_id).await {
            Ok(info) => {
                cache.insert(app_id, info.clone());
                Self::record_resolution(start, true);
                Ok(info)
            }
            Err(e) => {
                warn!(app_id, error = %e, "endpoint resolution failed");
                Self::record_resolution(start, false);
                Err(e)
            }
        }
    }

    /// The cold path: cluster lookup, probe, version and info fetch.
    async fn fetch_endpoint(&self, app_id: &str) -> Result<EndpointInfo> {
        let tracking_url = self.cluster.tracking_url(app_id).await.map_err(|e| {
            warn!(app_id, cluster = self.cluster.name(), error = %e, "cluster lookup failed");
            MuninnError::NotLocatable(app_id.to_string())
        })?;
        if tracking_url.trim().is_empty() {
            return Err(MuninnError::NotLocatable(app_id.to_string()));
        }

        let start_url = probe::probe_url(&tracking_url);
        let outcome =
            probe::follow_refresh_chain(&self.http, &start_url, self.config.security_enabled)
                .await?;

        let root: ServiceRoot = serde_json::from_str(&outcome.body)?;

        // The info fetch speaks whatever version the server reported,
        // so no conversion is involved on this path.
        let info_url = format!("{}/{}/{MASTER_PATH}/info", outcome.final_url, root.version);
        let master: MasterInfo = self.http.get_json(&info_url).await?;

        debug!(
            app_id,
            tracking_url = %master.app_master_tracking_url,
            version = %root.version,
            "resolved endpoint"
        );

        let mut info = EndpointInfo::new(
            master.app_master_tracking_url,
            root.version,
            master.app_path,
        );
        if let Some(token) = outcome.token {
            info = info
                .with_security(SecurityContext::new(token).with_expiry(self.config.token_expiry));
        }
        Ok(info)
    }

    /// API version of the application's service.
    #[instrument(skip(self), fields(operation = "version"))]
    pub async fn version(&self, app_id: &str) -> Result<String> {
        Ok(self.resolve(app_id).await?.api_version)
    }

    /// Server-side storage path for the application.
    ///
    /// Resolution failure degrades to the conventional layout,
    /// `<apps_root>/<app_id>`: always a usable guess, never an error.
    #[instrument(skip(self), fields(operation = "app_path"))]
    pub async fn app_path(&self, app_id: &str) -> String {
        match self.resolve(app_id).await {
            Ok(info) => info.app_path,
            Err(e) => {
                debug!(app_id, error = %e, "falling back to conventional app path");
                format!("{}/{app_id}", self.config.apps_root)
            }
        }
    }

    /// Root path applications are stored under.
    pub fn apps_root(&self) -> &str {
        &self.config.apps_root
    }

    /// Drop the cached record for `app_id`, if present.
    ///
    /// The next [`resolve`](Self::resolve) performs a full resolution.
    /// Returns whether a record was dropped.
    #[instrument(skip(self), fields(operation = "invalidate"))]
    pub async fn invalidate(&self, app_id: &str) -> bool {
        self.cache.lock().await.remove(app_id).is_some()
    }

    /// Number of cached endpoint records.
    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Resolve `app_id` and hand back its master service resource on
    /// `client`.
    ///
    /// Ensures the client carries the filters the endpoint requires: a
    /// version-conversion filter matching the service's API version,
    /// and a security-header filter when a token was captured. Filters
    /// are keyed, so calling this repeatedly on one client never
    /// stacks duplicates; a refreshed token replaces the stale filter.
    #[instrument(skip(self, client), fields(operation = "master_resource"))]
    pub async fn master_resource(
        &self,
        client: &ServiceClient,
        app_id: &str,
    ) -> Result<AppResource> {
        let info = self.resolve(app_id).await?;

        client.ensure_filter(Arc::new(VersionConversionFilter::for_version(
            &info.api_version,
        )?))?;
        if let Some(security) = &info.security {
            client.ensure_filter(Arc::new(SecurityHeaderFilter::new(&security.token)?))?;
        }

        let url = format!(
            "{}{WS_PATH}/{WS_VERSION}/{MASTER_PATH}",
            probe::http_base(&info.tracking_url)
        )
        .parse()
        .map_err(|e| MuninnError::Protocol(format!("invalid master URL for {app_id}: {e}")))?;

        Ok(AppResource::new(client.clone(), url))
    }

    fn record_resolution(start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::RESOLUTION_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_conventions() {
        let config = ResolverConfig::default();
        assert_eq!(config.apps_root, "/apps");
        assert!(!config.security_enabled);
        assert_eq!(config.token_expiry, Duration::from_secs(3600));
        assert_eq!(config.cache_capacity, 100);
    }

    #[test]
    fn service_root_parses_version() {
        let root: ServiceRoot = serde_json::from_str(r#"{"version": "v2"}"#).unwrap();
        assert_eq!(root.version, "v2");
    }

    #[test]
    fn master_info_parses_wire_names() {
        let info: MasterInfo = serde_json::from_str(
            r#"{"appMasterTrackingUrl": "host-3:9090", "appPath": "/apps/app-7"}"#,
        )
        .unwrap();
        assert_eq!(info.app_master_tracking_url, "host-3:9090");
        assert_eq!(info.app_path, "/apps/app-7");
    }

    #[test]
    fn master_info_rejects_missing_fields() {
        assert!(serde_json::from_str::<MasterInfo>(r#"{"appPath": "/apps/app-7"}"#).is_err());
    }
}
