//! Cache Statistics
//!
//! Snapshot describing a backend's state at the moment `stats()` was called.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Immutable statistics snapshot
///
/// Built fresh on every `stats()` call; backends never cache or update one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Backend name (`"memory"`, `"disk"`, `"redis"`)
    pub backend: String,
    /// Number of live (non-expired) keys
    pub total_keys: u64,
    /// Whether TTL-bearing entries are present (always true for Redis)
    pub ttl_enabled: bool,
    /// Backend-specific diagnostics
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl CacheStats {
    /// Create a snapshot with no extra diagnostics
    pub fn new(backend: impl Into<String>, total_keys: u64, ttl_enabled: bool) -> Self {
        Self {
            backend: backend.into(),
            total_keys,
            ttl_enabled,
            extra: Map::new(),
        }
    }

    /// Attach a diagnostic field
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend={} total_keys={} ttl_enabled={}",
            self.backend, self.total_keys, self.ttl_enabled
        )?;
        for (key, value) in &self.extra {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// Hit/miss/set counters reported through `CacheStats::extra`
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
}

impl Counters {
    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn apply(self, stats: CacheStats) -> CacheStats {
        stats
            .with_extra("hits", self.hits)
            .with_extra("misses", self.misses)
            .with_extra("sets", self.sets)
    }
}
