//! Cache Errors
//!
//! A cache miss is never an error: `get` reports it as `Ok(None)`. Everything
//! in [`CacheError`] is either a configuration problem caught at construction
//! time or a failure of the storage underneath a backend.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by cache backends and codecs
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend cannot be constructed as configured (missing feature, bad URL)
    #[error("cache configuration error: {0}")]
    Config(String),

    /// TTLs must be strictly positive
    #[error("invalid TTL {0:?}: TTL must be greater than zero")]
    InvalidTtl(Duration),

    /// Operation attempted after `close()`
    #[error("{0} cache backend is closed")]
    Closed(&'static str),

    /// Codec failed to encode or decode a value
    #[error("{codec} codec failed: {source}")]
    Codec {
        codec: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Cached value could not be converted to or from the requested type
    #[error("value conversion failed: {0}")]
    Value(#[from] serde_json::Error),

    /// Filesystem failure (e.g. creating the cache directory)
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failure in the disk backend
    #[error("disk cache error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Redis failure in the networked backend
    #[cfg(feature = "redis")]
    #[error("redis cache error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl CacheError {
    /// Wrap a codec failure
    pub fn codec<E>(codec: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Codec {
            codec,
            source: source.into(),
        }
    }

    /// Whether this error was raised while constructing a backend
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = CacheError> = std::result::Result<T, E>;

/// Longest TTL stored with a deadline (100 years)
///
/// Anything longer is kept without one, so clock arithmetic in every backend
/// stays in range.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Reject zero TTLs and treat TTLs past [`MAX_TTL`] as "no expiry"
pub(crate) fn validate_ttl(ttl: Option<Duration>) -> Result<Option<Duration>> {
    match ttl {
        Some(ttl) if ttl.is_zero() => Err(CacheError::InvalidTtl(ttl)),
        Some(ttl) if ttl > MAX_TTL => Ok(None),
        other => Ok(other),
    }
}
