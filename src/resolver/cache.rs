//! Bounded LRU cache of resolved endpoints.
//!
//! One entry per application id, capacity-bounded with
//! least-recently-used eviction. Reads promote. A read that finds an
//! entry whose security context has expired drops the entry and
//! reports a miss, so expiry costs nothing until someone asks.
//!
//! The cache is not internally synchronized; the resolver serializes
//! every access behind its own lock.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::telemetry;
use crate::types::EndpointInfo;

/// Default number of applications the cache holds.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Bounded map of application id to resolved endpoint.
pub struct EndpointCache {
    entries: LruCache<String, EndpointInfo>,
}

impl EndpointCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up `app_id`, promoting it to most recently used.
    ///
    /// An entry with an expired security context is evicted and
    /// reported as a miss; the caller re-resolves and re-inserts.
    pub fn get(&mut self, app_id: &str) -> Option<EndpointInfo> {
        let expired = self.entries.get(app_id).map(EndpointInfo::is_expired);
        match expired {
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            Some(true) => {
                self.entries.pop(app_id);
                debug!(app_id, "dropped expired endpoint record");
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "expired")
                    .increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            Some(false) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                self.entries.get(app_id).cloned()
            }
        }
    }

    /// Insert or replace the record for `app_id`.
    ///
    /// Inserting a new id at capacity evicts the least recently used
    /// entry; replacing an existing id never evicts.
    pub fn insert(&mut self, app_id: impl Into<String>, info: EndpointInfo) {
        let app_id = app_id.into();
        if let Some((victim, _)) = self.entries.push(app_id.clone(), info)
            && victim != app_id
        {
            debug!(app_id = %victim, "evicted least recently used endpoint record");
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "capacity")
                .increment(1);
        }
    }

    /// Drop the record for `app_id`, if present.
    pub fn remove(&mut self, app_id: &str) -> Option<EndpointInfo> {
        let removed = self.entries.pop(app_id);
        if removed.is_some() {
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "invalidated")
                .increment(1);
        }
        removed
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists, without promoting it.
    pub fn contains(&self, app_id: &str) -> bool {
        self.entries.contains(app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecurityContext;
    use std::time::Duration;

    fn info(tracking_url: &str) -> EndpointInfo {
        EndpointInfo::new(tracking_url, "v2", "/apps/x")
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut cache = EndpointCache::new(10);
        cache.insert("app-1", info("host-1:1"));

        let found = cache.get("app-1").unwrap();
        assert_eq!(found.tracking_url, "host-1:1");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_promotes_against_eviction() {
        let mut cache = EndpointCache::new(2);
        cache.insert("app-1", info("host-1:1"));
        cache.insert("app-2", info("host-2:2"));

        // app-1 becomes most recently used, so app-2 is the victim.
        cache.get("app-1");
        cache.insert("app-3", info("host-3:3"));

        assert!(cache.contains("app-1"));
        assert!(!cache.contains("app-2"));
        assert!(cache.contains("app-3"));
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let mut cache = EndpointCache::new(10);
        cache.insert(
            "app-1",
            info("host-1:1")
                .with_security(SecurityContext::new("tok").with_expiry(Duration::ZERO)),
        );

        assert!(cache.get("app-1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entry_survives_until_read() {
        let mut cache = EndpointCache::new(10);
        cache.insert(
            "app-1",
            info("host-1:1")
                .with_security(SecurityContext::new("tok").with_expiry(Duration::ZERO)),
        );

        // No read has observed the expiry yet.
        assert!(cache.contains("app-1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn replacing_an_id_does_not_grow_the_cache() {
        let mut cache = EndpointCache::new(2);
        cache.insert("app-1", info("host-1:1"));
        cache.insert("app-1", info("host-1:2"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("app-1").unwrap().tracking_url, "host-1:2");
    }

    #[test]
    fn remove_reports_presence() {
        let mut cache = EndpointCache::new(10);
        cache.insert("app-1", info("host-1:1"));

        assert!(cache.remove("app-1").is_some());
        assert!(cache.remove("app-1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut cache = EndpointCache::new(0);
        cache.insert("app-1", info("host-1:1"));
        assert_eq!(cache.len(), 1);
    }
}
