//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: outcome, "ok" or "error"
//! - `reason`: eviction cause, "capacity", "expired" or "invalidated"

/// Total endpoint resolutions that went to the network (cache misses
/// and expired entries; cache hits are not counted here).
///
/// Labels: `status` ("ok" | "error").
pub const RESOLUTIONS_TOTAL: &str = "muninn_resolutions_total";

/// Wall-clock duration of a network resolution in seconds, measured
/// from cluster lookup to cache insert.
///
/// Labels: none.
pub const RESOLUTION_DURATION_SECONDS: &str = "muninn_resolution_duration_seconds";

/// Total endpoint cache hits.
///
/// Labels: none.
pub const CACHE_HITS_TOTAL: &str = "muninn_cache_hits_total";

/// Total endpoint cache misses. An expired entry counts as a miss.
///
/// Labels: none.
pub const CACHE_MISSES_TOTAL: &str = "muninn_cache_misses_total";

/// Total entries removed from the endpoint cache.
///
/// Labels: `reason` ("capacity" | "expired" | "invalidated").
pub const CACHE_EVICTIONS_TOTAL: &str = "muninn_cache_evictions_total";

/// Total redirect hops followed while probing tracking URLs.
///
/// Labels: none.
pub const REDIRECTS_TOTAL: &str = "muninn_redirects_total";
