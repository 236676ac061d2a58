//! Cache Builder
//!
//! Picks and constructs one backend at runtime, returning it behind the
//! `CacheBackend` trait so calling code never names a concrete type.
//!
//! # Example: Default Backend
//!
//! ```rust
//! use swap_cache::CacheBuilder;
//!
//! let cache = CacheBuilder::new().build()?;
//! assert_eq!(cache.name(), "memory");
//! # Ok::<(), swap_cache::CacheError>(())
//! ```
//!
//! # Example: Backend From Configuration
//!
//! ```rust,no_run
//! use swap_cache::{BackendConfig, CacheBuilder};
//!
//! let config: BackendConfig = serde_json::from_str(r#"{"backend": "redis", "port": 6380}"#)?;
//! let cache = CacheBuilder::from_config(config).build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::backends::{DiskCache, MemoryCache, RedisCache};
use crate::config::{BackendConfig, RedisConfig};
use crate::error::Result;
use crate::traits::CacheBackend;
use std::path::PathBuf;
use tracing::info;

/// Builder for a boxed cache backend
///
/// # Default Behavior
///
/// With nothing configured, `.build()` returns a [`MemoryCache`].
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    config: BackendConfig,
}

impl CacheBuilder {
    /// Create a new builder targeting the in-memory backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing backend selection
    #[must_use]
    pub fn from_config(config: BackendConfig) -> Self {
        Self { config }
    }

    /// Use the in-memory backend
    #[must_use]
    pub fn memory(mut self) -> Self {
        self.config = BackendConfig::Memory;
        self
    }

    /// Use the SQLite backend at `path`
    #[must_use]
    pub fn disk(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = BackendConfig::Disk { path: path.into() };
        self
    }

    /// Use the Redis backend
    #[must_use]
    pub fn redis(mut self, config: RedisConfig) -> Self {
        self.config = BackendConfig::Redis(config);
        self
    }

    /// Backend selection as currently configured
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Construct the selected backend
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Config` if the Redis backend is selected in a
    /// build without the `redis` feature, or any construction error of the
    /// selected backend.
    pub fn build(self) -> Result<Box<dyn CacheBackend>> {
        self.config.build()
    }
}

impl BackendConfig {
    /// Construct the backend this configuration selects
    ///
    /// # Errors
    ///
    /// See [`CacheBuilder::build`].
    pub fn build(self) -> Result<Box<dyn CacheBackend>> {
        let backend: Box<dyn CacheBackend> = match self {
            Self::Memory => Box::new(MemoryCache::new()),
            Self::Disk { path } => Box::new(DiskCache::open(path)?),
            Self::Redis(config) => Box::new(RedisCache::new(config)?),
        };

        info!(backend = backend.name(), "Cache backend ready");
        Ok(backend)
    }
}
