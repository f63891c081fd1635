//! Resolved endpoint records and their security lifetime.

use std::time::{Duration, Instant};

/// Default lifetime of a captured security token.
pub const DEFAULT_TOKEN_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Security state captured while resolving an application on a secure
/// cluster.
///
/// A context is a snapshot: it records the token and the moment it was
/// captured, and reports expiry lazily through [`is_expired`]. Nothing
/// refreshes a context in place; an expired one is discarded together
/// with its cache entry and a fresh resolution captures a new token.
///
/// [`is_expired`]: SecurityContext::is_expired
#[derive(Debug, Clone)]
pub struct SecurityContext {
    /// Opaque token value from the service's auth cookie.
    pub token: String,
    /// When the token was captured.
    pub issued_at: Instant,
    /// Lifetime after which the token is considered stale.
    pub expiry: Duration,
}

impl SecurityContext {
    /// Create a context for a token captured now, with the default expiry.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: Instant::now(),
            expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }

    /// Override the token lifetime.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Whether the token's lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        self.issued_at.elapsed() >= self.expiry
    }
}

/// A resolved application endpoint.
///
/// Immutable once constructed; a changed endpoint (restarted master,
/// refreshed token) is represented by a new record displacing this one
/// in the cache, never by mutation.
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// Host and port of the application master's web interface.
    pub tracking_url: String,
    /// API version reported by the service's root endpoint.
    pub api_version: String,
    /// Server-side storage path for the application.
    pub app_path: String,
    /// Security state, present only when the cluster has security
    /// enabled and a token was captured.
    pub security: Option<SecurityContext>,
}

impl EndpointInfo {
    /// Create a record with no security context.
    pub fn new(
        tracking_url: impl Into<String>,
        api_version: impl Into<String>,
        app_path: impl Into<String>,
    ) -> Self {
        Self {
            tracking_url: tracking_url.into(),
            api_version: api_version.into(),
            app_path: app_path.into(),
            security: None,
        }
    }

    /// Attach a security context.
    pub fn with_security(mut self, security: SecurityContext) -> Self {
        self.security = Some(security);
        self
    }

    /// Whether this record carries an expired security context.
    ///
    /// Records without security never expire.
    pub fn is_expired(&self) -> bool {
        self.security.as_ref().is_some_and(SecurityContext::is_expired)
    }
}
