//! Resolution cache
//!
//! Read-through accelerator in front of the service store. Entries are only
//! written after a successful store lookup, so the cache never holds a record
//! the store did not return.
//!
//! With the default [`CacheConfig`] the cache is unbounded and entries never
//! expire. A TTL and a capacity bound can be configured; eviction under the
//! capacity bound drops the oldest inserted entry and is approximate when
//! many writers race on a full cache.

use dashmap::DashMap;
use injector_types::{ServiceId, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Cache policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries, unbounded when unset
    #[serde(default)]
    pub max_entries: Option<usize>,

    /// Entry lifetime in seconds, never expires when unset
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

#[derive(Debug)]
struct CacheEntry {
    record: ServiceRecord,
    inserted_at: Instant,
}

/// Concurrent id -> record map
///
/// Each entry is replaced as a whole under its shard lock, so readers see
/// either the previous record or the new one, never a mix.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: DashMap<ServiceId, CacheEntry>,
    max_entries: Option<usize>,
    ttl: Option<Duration>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    /// Unbounded, non-expiring cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: None,
            ttl: None,
        }
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: config.max_entries.filter(|max| *max > 0),
            ttl: config.ttl_secs.map(Duration::from_secs),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries).filter(|max| *max > 0);
        self
    }

    /// Look up a record. Expired entries are dropped and reported as a miss.
    pub fn get(&self, id: &str) -> Option<ServiceRecord> {
        let entry = self.entries.get(id)?;

        if let Some(ttl) = self.ttl {
            if entry.inserted_at.elapsed() >= ttl {
                // Release the shard read guard before taking the write lock
                drop(entry);
                self.entries
                    .remove_if(id, |_, e| e.inserted_at.elapsed() >= ttl);
                return None;
            }
        }

        Some(entry.record.clone())
    }

    /// Insert or overwrite the entry for `id`.
    pub fn put(&self, id: ServiceId, record: ServiceRecord) {
        if let Some(max) = self.max_entries {
            if self.entries.len() >= max && !self.entries.contains_key(&id) {
                self.evict_oldest();
            }
        }

        self.entries.insert(
            id,
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop the entry for `id`, returning whether one was present.
    pub fn invalidate(&self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());

        if let Some(id) = oldest {
            self.entries.remove(&id);
            tracing::debug!(service_id = %id, "Evicted oldest cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(id: &str, address: &str) -> ServiceRecord {
        ServiceRecord::new(id, format!("{id}-svc"), address)
    }

    #[test]
    fn test_get_put() {
        let cache = ResolutionCache::new();
        assert!(cache.get("hello").is_none());

        cache.put(ServiceId::new("hello"), record("hello", "http://svc:9000"));

        let hit = cache.get("hello").unwrap();
        assert_eq!(hit.address, "http://svc:9000");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ResolutionCache::new();
        cache.put(ServiceId::new("acl"), record("acl", "http://old:8181"));
        cache.put(ServiceId::new("acl"), record("acl", "http://new:8181"));

        assert_eq!(cache.get("acl").unwrap().address, "http://new:8181");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let cache = ResolutionCache::new();
        cache.put(ServiceId::new("acl"), record("acl", "http://opa:8181"));

        assert!(cache.invalidate("acl"));
        assert!(!cache.invalidate("acl"));
        assert!(cache.get("acl").is_none());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = ResolutionCache::new().with_ttl(Duration::from_millis(20));
        cache.put(ServiceId::new("minio"), record("minio", "minio:9000"));
        assert!(cache.get("minio").is_some());

        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get("minio").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = ResolutionCache::new().with_max_entries(2);
        cache.put(ServiceId::new("a"), record("a", "http://a"));
        std::thread::sleep(Duration::from_millis(2));
        cache.put(ServiceId::new("b"), record("b", "http://b"));
        std::thread::sleep(Duration::from_millis(2));
        cache.put(ServiceId::new("c"), record("c", "http://c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_overwrite_at_capacity_keeps_others() {
        let cache = ResolutionCache::new().with_max_entries(2);
        cache.put(ServiceId::new("a"), record("a", "http://a"));
        cache.put(ServiceId::new("b"), record("b", "http://b"));
        cache.put(ServiceId::new("b"), record("b", "http://b2"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_zero_capacity_means_unbounded() {
        let cache = ResolutionCache::with_config(&CacheConfig {
            max_entries: Some(0),
            ttl_secs: None,
        });
        for i in 0..10 {
            let id = format!("svc{i}");
            cache.put(ServiceId::new(id.clone()), record(&id, "http://x"));
        }
        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn test_concurrent_writers_never_tear() {
        let cache = Arc::new(ResolutionCache::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    let address = format!("http://host{i}:{i}");
                    cache.put(
                        ServiceId::new("shared"),
                        record("shared", &address).with_field("Port", i.to_string()),
                    );
                    let seen = cache.get("shared").unwrap();
                    // Address and Port always come from the same writer
                    let port = seen.field_str("Port").unwrap();
                    assert_eq!(seen.address, format!("http://host{port}:{port}"));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 1);
    }
}
