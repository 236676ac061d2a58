//! Cache Backend Implementations
//!
//! This module contains the three interchangeable implementations of
//! [`CacheBackend`](crate::traits::CacheBackend).
//!
//! # Available Backends
//!
//! - **`MemoryCache`** - In-process `HashMap`, values kept as-is
//! - **`DiskCache`** - SQLite file, survives restarts
//! - **`RedisCache`** - Redis server, native TTL (feature: `redis`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use swap_cache::backends::{DiskCache, MemoryCache, RedisCache};
//! use swap_cache::RedisConfig;
//!
//! # fn example() -> swap_cache::Result<()> {
//! let memory = MemoryCache::new();
//! let disk = DiskCache::open(".cache/app.db")?;
//! let redis = RedisCache::new(RedisConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod disk_cache;
pub mod memory_cache;
pub mod redis_cache;

pub use disk_cache::DiskCache;
pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
