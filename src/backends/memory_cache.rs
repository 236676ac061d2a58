//! Memory Cache - In-Process `HashMap` Backend
//!
//! Keeps values in a plain `HashMap` with a second map holding absolute
//! expiry deadlines for the keys that have a TTL.

use crate::error::{validate_ttl, Result};
use crate::stats::{CacheStats, Counters};
use crate::traits::CacheBackend;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// In-process cache backed by two `HashMap`s
///
/// **Use Case**: process-lifetime caching, tests, single-threaded tools
///
/// **Features**:
/// - Values kept as `serde_json::Value`, no codec round trip
/// - Per-key TTL with lazy expiry on access
/// - Zero external dependencies
///
/// **Limitations**:
/// - No eviction policy and no size limit (unbounded growth)
/// - Lapsed entries stay in memory until accessed or cleared
/// - Not synchronized; wrap in [`SharedCache`](crate::SharedCache) to share
///
/// **Example**:
/// ```rust
/// use swap_cache::{CacheBackend, MemoryCache};
/// use std::time::Duration;
///
/// # fn example() -> swap_cache::Result<()> {
/// let mut cache = MemoryCache::new();
/// let value = serde_json::json!({"user": "alice"});
///
/// cache.set("user:1", &value, Some(Duration::from_secs(60)))?;
/// assert_eq!(cache.get("user:1")?, Some(value));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    /// Stored values
    store: HashMap<String, Value>,
    /// Absolute deadlines, only for keys set with a TTL
    expiry: HashMap<String, Instant>,
    counters: Counters,
}

impl MemoryCache {
    /// Create new empty memory cache
    #[must_use]
    pub fn new() -> Self {
        info!("Initializing Memory Cache (in-process HashMap)");
        Self::default()
    }

    fn is_expired(&self, key: &str, now: Instant) -> bool {
        self.expiry.get(key).is_some_and(|expires_at| *expires_at <= now)
    }

    fn evict(&mut self, key: &str) {
        self.store.remove(key);
        self.expiry.remove(key);
    }

    /// Number of stored entries, including lapsed ones not yet evicted
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl CacheBackend for MemoryCache {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        if self.is_expired(key, Instant::now()) {
            self.evict(key);
            self.counters.record_lookup(false);
            debug!(key = %key, "[Memory] Evicted expired key");
            return Ok(None);
        }

        let value = self.store.get(key).cloned();
        self.counters.record_lookup(value.is_some());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        let ttl = validate_ttl(ttl)?;

        self.store.insert(key.to_string(), value.clone());
        match ttl.and_then(|ttl| Instant::now().checked_add(ttl)) {
            Some(deadline) => {
                self.expiry.insert(key.to_string(), deadline);
            }
            None => {
                self.expiry.remove(key);
            }
        }
        self.counters.sets += 1;

        debug!(key = %key, ttl_ms = ?ttl.map(|t| t.as_millis()), "[Memory] Cached key");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let existed = self.store.contains_key(key) && !self.is_expired(key, Instant::now());
        self.evict(key);
        debug!(key = %key, existed, "[Memory] Deleted key");
        Ok(existed)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        if !self.store.contains_key(key) {
            return Ok(false);
        }
        if self.is_expired(key, Instant::now()) {
            self.evict(key);
            debug!(key = %key, "[Memory] Evicted expired key");
            return Ok(false);
        }
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        let count = self.store.len();
        self.store.clear();
        self.expiry.clear();
        debug!(count, "[Memory] Cleared all entries");
        Ok(())
    }

    fn stats(&mut self) -> Result<CacheStats> {
        let now = Instant::now();
        let live = self
            .store
            .keys()
            .filter(|key| !self.is_expired(key, now))
            .count();

        let stats = CacheStats::new(self.name(), live as u64, !self.expiry.is_empty());
        Ok(self.counters.apply(stats))
    }

    fn close(&mut self) -> Result<()> {
        // Nothing to flush or disconnect
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
