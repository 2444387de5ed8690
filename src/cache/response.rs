//! Response cache wrapper around Moka.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use moka::sync::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::CacheConfig;

/// A stored response and the moment it was stored.
///
/// Entries are never mutated; a later insert under the same key replaces them.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Arc<Value>,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(value: Value) -> Self {
        Self {
            value: Arc::new(value),
            stored_at: Utc::now(),
        }
    }

    /// Whether the entry is still within `ttl` of its insertion time.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Utc::now().signed_duration_since(self.stored_at) < ttl
    }
}

/// Read-only view of the cache contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub count: usize,
    pub keys: Vec<String>,
    pub ttl: Duration,
}

/// Time-boxed response cache keyed by logical resource name.
///
/// This cache is:
/// - Thread-safe (uses Arc internally)
/// - TTL-bounded from insertion; reads never refresh an entry
/// - Clone-friendly (cloning is cheap, shares the same underlying cache)
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Cache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache from config.
    pub fn new(config: CacheConfig) -> Self {
        // Unbounded: a successful insert stays until it expires or is cleared.
        let inner = Cache::builder().time_to_live(config.ttl).build();

        Self {
            inner: Arc::new(inner),
            ttl: config.ttl,
        }
    }

    /// Get the full entry for a key.
    ///
    /// Returns `None` if the key is absent or its entry has outlived the TTL.
    /// Expired entries are left in place; they are replaced by the next insert.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.inner
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
    }

    /// Get a cached value if it is still valid.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let hit = self.entry(key).map(|entry| entry.value);
        if hit.is_some() {
            debug!("Response cache hit for '{}'", key);
        } else {
            debug!("Response cache miss for '{}'", key);
        }
        hit
    }

    /// Store a value under `key`, stamped with the current time.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Arc<Value> {
        let entry = CacheEntry::new(value);
        let value = Arc::clone(&entry.value);
        self.inner.insert(key.into(), entry);
        value
    }

    /// Remove all entries from the cache.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        debug!("Response cache cleared");
    }

    /// Snapshot of the currently valid keys.
    ///
    /// Does not touch entry timestamps.
    pub fn snapshot(&self) -> CacheSnapshot {
        let mut keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(_, entry)| entry.is_fresh(self.ttl))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        keys.sort();

        CacheSnapshot {
            count: keys.len(),
            keys,
            ttl: self.ttl,
        }
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn short_lived(ttl_ms: u64) -> ResponseCache {
        ResponseCache::new(CacheConfig::default().ttl(Duration::from_millis(ttl_ms)))
    }

    #[test]
    fn test_hit_returns_stored_value() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert("quote", json!({ "content": "c", "author": "a" }));

        let value = cache.get("quote").unwrap();
        assert_eq!(*value, json!({ "content": "c", "author": "a" }));
        assert!(cache.get("joke").is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = short_lived(50);
        cache.insert("joke", json!(1));
        assert!(cache.get("joke").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get("joke").is_none());
        assert!(cache.entry("joke").is_none());
    }

    #[test]
    fn test_reinsert_overwrites_timestamp() {
        let cache = short_lived(80);
        cache.insert("joke", json!("old"));
        let first = cache.entry("joke").unwrap().stored_at;

        std::thread::sleep(Duration::from_millis(120));
        cache.insert("joke", json!("new"));

        let entry = cache.entry("joke").unwrap();
        assert!(entry.stored_at > first);
        assert_eq!(*entry.value, json!("new"));
    }

    #[test]
    fn test_distinct_keys_all_stay_cached() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert("joke", json!(1));
        for _ in 0..5 {
            assert!(cache.get("joke").is_some());
        }
        cache.insert("quote", json!(2));
        for i in 0..50 {
            cache.insert(format!("extra-{}", i), json!(i));
        }

        assert_eq!(*cache.get("joke").unwrap(), json!(1));
        assert_eq!(*cache.get("quote").unwrap(), json!(2));
        assert!((0..50).all(|i| cache.get(&format!("extra-{}", i)).is_some()));
        assert_eq!(cache.snapshot().count, 52);
    }

    #[test]
    fn test_clear_discards_everything() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert("joke", json!(1));
        cache.insert("quote", json!(2));

        cache.clear();

        assert!(cache.get("joke").is_none());
        assert!(cache.get("quote").is_none());
        assert_eq!(cache.snapshot().count, 0);
    }

    #[test]
    fn test_snapshot_lists_valid_keys() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert("quote", json!(1));
        cache.insert("joke", json!(2));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.keys, vec!["joke".to_string(), "quote".to_string()]);
        assert_eq!(snapshot.ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_snapshot_does_not_refresh_entries() {
        let cache = short_lived(80);
        cache.insert("joke", json!(1));
        let stored_at = cache.entry("joke").unwrap().stored_at;

        let _ = cache.snapshot();
        let _ = cache.snapshot();

        assert_eq!(cache.entry("joke").unwrap().stored_at, stored_at);
        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.snapshot().keys.is_empty());
    }
}
