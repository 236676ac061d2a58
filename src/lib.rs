//! Swap Cache
//!
//! A backend-swappable key-value cache for Rust featuring:
//! - **One contract**: `get`/`set`/`delete`/`exists`/`clear`/`stats`/`close` on every backend
//! - **In-Memory Backend**: plain `HashMap` storage with per-key TTL
//! - **Disk Backend**: single-file SQLite store that survives restarts
//! - **Redis Backend**: networked cache with native server-side TTL
//! - **Lazy Expiry**: lapsed entries are evicted when accessed, never swept
//! - **Null-Safe `get_or_set`**: a cached `null` is a hit, not a miss
//!
//! # Quick Start
//!
//! ```rust
//! use swap_cache::{CacheBackend, CacheBackendExt, MemoryCache};
//! use std::time::Duration;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut cache = MemoryCache::new();
//!
//!     // Store data with a TTL
//!     let data = serde_json::json!({"user": "alice", "score": 100});
//!     cache.set("user:1", &data, Some(Duration::from_secs(300)))?;
//!
//!     // Retrieve data (`None` on a miss)
//!     if let Some(cached) = cache.get("user:1")? {
//!         tracing::info!("Cached data: {}", cached);
//!     }
//!
//!     // Compute on miss
//!     let total = cache.get_or_set("sum", || Ok::<_, anyhow::Error>((1..=10).sum::<u64>().into()), None)?;
//!     assert_eq!(total, 55);
//!
//!     // Get statistics
//!     let stats = cache.stats()?;
//!     tracing::info!("Live keys: {}", stats.total_keys);
//!
//!     cache.close()?;
//!     Ok(())
//! }
//! ```
//!
//! # Choosing a Backend
//!
//! ```text
//! MemoryCache  → process lifetime, no I/O
//! DiskCache    → SQLite file, survives restarts, shareable across processes
//! RedisCache   → remote server, shared across hosts, TTL enforced by Redis
//! ```
//!
//! Code written against [`CacheBackend`] works with any of them; use
//! [`CacheBuilder`] or [`BackendConfig`] to pick one at runtime.

pub mod backends;
pub mod builder;
pub mod codecs;
pub mod config;
pub mod error;
pub mod keys;
pub mod shared;
pub mod stats;
pub mod traits;

pub use backends::{DiskCache, MemoryCache, RedisCache};
pub use builder::CacheBuilder;
pub use codecs::JsonCodec;
#[cfg(feature = "msgpack")]
pub use codecs::MsgPackCodec;
pub use config::{BackendConfig, RedisConfig};
pub use error::{CacheError, Result, MAX_TTL};
pub use keys::make_key;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use traits::{CacheBackend, CacheBackendExt, CacheCodec};
