//! Web-service wire contract shared by the resolver and its filters.
//!
//! Every application master serves its REST API under [`WS_PATH`],
//! with versioned sub-trees below it and the master service at
//! `/ws/<version>/master`.

/// Root path of the application web service, appended to the tracking URL.
pub const WS_PATH: &str = "/ws";

/// API version this crate speaks natively. Resource handles are always
/// built against this version; older servers are bridged by the
/// version-conversion filter.
pub const WS_VERSION: &str = "v2";

/// Path segment of the master service.
pub const MASTER_PATH: &str = "master";

/// Name of the response cookie carrying the security token on secure
/// clusters.
pub const TOKEN_COOKIE: &str = "muninn-app-auth";

/// Maximum number of refresh redirects followed during a probe before
/// the resolution is abandoned.
pub const MAX_REDIRECTS: usize = 5;
