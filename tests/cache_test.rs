//! Capacity and eviction-order tests for [`EndpointCache`] at its
//! default scale.

use muninn::{DEFAULT_CACHE_CAPACITY, EndpointCache, EndpointInfo};

fn info(n: usize) -> EndpointInfo {
    EndpointInfo::new(format!("host-{n}:9090"), "v2", format!("/apps/app-{n}"))
}

#[test]
fn cache_fills_to_default_capacity_and_stops() {
    let mut cache = EndpointCache::new(DEFAULT_CACHE_CAPACITY);

    for n in 0..DEFAULT_CACHE_CAPACITY {
        cache.insert(format!("app-{n}"), info(n));
    }
    assert_eq!(cache.len(), 100);

    // One past capacity: size holds, the oldest unread entry goes.
    cache.insert("app-100", info(100));
    assert_eq!(cache.len(), 100);
    assert!(!cache.contains("app-0"));
    assert!(cache.contains("app-1"));
    assert!(cache.contains("app-100"));
}

#[test]
fn reads_reorder_the_eviction_queue() {
    let mut cache = EndpointCache::new(DEFAULT_CACHE_CAPACITY);

    for n in 0..DEFAULT_CACHE_CAPACITY {
        cache.insert(format!("app-{n}"), info(n));
    }

    // Touch the oldest entry; the next eviction must skip it.
    assert!(cache.get("app-0").is_some());
    cache.insert("app-100", info(100));

    assert!(cache.contains("app-0"));
    assert!(!cache.contains("app-1"));
}

#[test]
fn replacement_at_capacity_evicts_nothing() {
    let mut cache = EndpointCache::new(DEFAULT_CACHE_CAPACITY);

    for n in 0..DEFAULT_CACHE_CAPACITY {
        cache.insert(format!("app-{n}"), info(n));
    }

    // Re-resolving a cached id overwrites in place.
    cache.insert("app-50", info(999));

    assert_eq!(cache.len(), 100);
    assert!(cache.contains("app-0"));
    assert_eq!(cache.get("app-50").unwrap().tracking_url, "host-999:9090");
}

#[test]
fn sustained_churn_keeps_the_most_recent_window() {
    let mut cache = EndpointCache::new(DEFAULT_CACHE_CAPACITY);

    for n in 0..250 {
        cache.insert(format!("app-{n}"), info(n));
    }

    assert_eq!(cache.len(), 100);
    for n in 0..150 {
        assert!(!cache.contains(&format!("app-{n}")), "app-{n} should be gone");
    }
    for n in 150..250 {
        assert!(cache.contains(&format!("app-{n}")), "app-{n} should remain");
    }
}
