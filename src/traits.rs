//! Cache Backend Traits
//!
//! This module defines the contract every cache backend satisfies and the
//! pluggable serialization codec used by backends that store bytes.
//!
//! # Architecture
//!
//! - `CacheCodec`: Trait for pluggable serialization backends
//! - `CacheBackend`: Core trait implemented by every storage backend
//! - `CacheBackendExt`: Derived operations (`get_or_set`, typed helpers),
//!   implemented once for every `CacheBackend`
//!
//! # Example: Custom Backend
//!
//! ```rust,ignore
//! use swap_cache::{CacheBackend, CacheStats, Result};
//! use serde_json::Value;
//! use std::time::Duration;
//!
//! struct MyCustomCache {
//!     // Your implementation
//! }
//!
//! impl CacheBackend for MyCustomCache {
//!     fn get(&mut self, key: &str) -> Result<Option<Value>> {
//!         // Your implementation
//!     }
//!
//!     fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
//!         // Your implementation
//!     }
//!
//!     // ... delete, exists, clear, stats, close
//! }
//! ```

use crate::error::{validate_ttl, CacheError, Result};
use crate::stats::CacheStats;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

/// Trait for cache value serialization/deserialization
///
/// Backends that persist bytes (disk, Redis) encode values through a codec.
/// The in-memory backend keeps values as they are and never touches one.
///
/// # Example: Custom Codec
///
/// ```rust,ignore
/// use swap_cache::{CacheCodec, CacheError, Result};
/// use serde::{Serialize, de::DeserializeOwned};
///
/// #[derive(Debug)]
/// struct MyCustomCodec;
///
/// impl CacheCodec for MyCustomCodec {
///     fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
///         mycodec::serialize(value).map_err(|e| CacheError::codec(self.name(), e))
///     }
///
///     fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
///         mycodec::deserialize(bytes).map_err(|e| CacheError::codec(self.name(), e))
///     }
///
///     fn name(&self) -> &'static str {
///         "mycodec"
///     }
/// }
/// ```
pub trait CacheCodec: Send + Sync + Debug {
    /// Serialize a value to bytes
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Codec` if the value cannot be encoded.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize bytes to a value
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Codec` if the bytes are not valid for this codec.
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Get the name of the codec
    ///
    /// Reported in backend statistics and log lines.
    fn name(&self) -> &'static str;
}

/// Core cache contract implemented by every backend
///
/// # Semantics
///
/// - A miss is `Ok(None)`, never an error. A stored JSON `null` comes back as
///   `Ok(Some(Value::Null))`, so callers that cache null-like values must use
///   [`exists`](CacheBackend::exists) to detect misses.
/// - `ttl = None` means the entry never expires on its own. `Some(ttl)` sets an
///   absolute deadline of `now + ttl`, computed when `set` is called. Zero
///   TTLs are rejected with `CacheError::InvalidTtl`.
/// - Expiry is lazy: lapsed entries are removed when `get`/`exists`/`delete`
///   observe them, never by a background sweep.
///
/// # Thread Safety
///
/// Backends are not internally synchronized, hence `&mut self` on every
/// operation. Wrap a backend in [`SharedCache`](crate::SharedCache) to share
/// it between threads.
pub trait CacheBackend: Send {
    /// Get value from cache by key
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - Live entry found
    /// * `Ok(None)` - Key never set, deleted or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Store a value, replacing any previous entry and its TTL
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidTtl` for a zero TTL, or a storage error.
    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()>;

    /// Remove a key
    ///
    /// Returns `true` iff the key was live immediately before the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Check whether a key is live, evicting it if it has lapsed
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn exists(&mut self, key: &str) -> Result<bool>;

    /// Remove every entry, live or not
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn clear(&mut self) -> Result<()>;

    /// Take a fresh statistics snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn stats(&mut self) -> Result<CacheStats>;

    /// Release backend resources
    ///
    /// Calling `close` again is a no-op. Dropping a backend releases the same
    /// resources, so `close` only matters when the caller wants to observe
    /// errors from shutting down.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying connection fails to close cleanly.
    fn close(&mut self) -> Result<()>;

    /// Get the name of this cache backend
    ///
    /// This is the `backend` field of [`CacheStats`].
    fn name(&self) -> &'static str;
}

impl<C: CacheBackend + ?Sized> CacheBackend for Box<C> {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        (**self).set(key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn stats(&mut self) -> Result<CacheStats> {
        (**self).stats()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Operations derived from the [`CacheBackend`] primitives
///
/// Implemented for every backend, including `dyn CacheBackend`, so the
/// exists-then-get ordering of `get_or_set` lives in exactly one place.
pub trait CacheBackendExt: CacheBackend {
    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// Checks [`exists`](CacheBackend::exists) before calling
    /// [`get`](CacheBackend::get), so a stored `null` is a hit and
    /// `compute_fn` is not called again. On a miss `compute_fn` runs exactly
    /// once; its error is returned unchanged and nothing is stored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use swap_cache::{CacheBackendExt, MemoryCache};
    ///
    /// let mut cache = MemoryCache::new();
    /// let value = cache.get_or_set("answer", || Ok::<_, swap_cache::CacheError>(42.into()), None)?;
    /// assert_eq!(value, 42);
    /// # Ok::<(), swap_cache::CacheError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the compute error, or a cache error converted into `E`.
    fn get_or_set<F, E>(&mut self, key: &str, compute_fn: F, ttl: Option<Duration>) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
        E: From<CacheError>,
    {
        let ttl = validate_ttl(ttl)?;

        if let Some(value) = lookup_live(self, key)? {
            return Ok(value);
        }

        let value = compute_fn()?;
        self.set(key, &value, ttl)?;
        Ok(value)
    }

    /// Get a value and convert it to `T`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Value` if the cached value does not match `T`.
    fn get_typed<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Convert `value` to JSON and store it
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Value` if `value` cannot be represented as JSON.
    fn set_typed<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, &value, ttl)
    }

    /// Typed version of [`get_or_set`](CacheBackendExt::get_or_set)
    ///
    /// # Errors
    ///
    /// Returns the compute error, or a cache/conversion error converted into `E`.
    fn get_or_set_typed<T, F, E>(&mut self, key: &str, compute_fn: F, ttl: Option<Duration>) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
        E: From<CacheError>,
    {
        let value = self.get_or_set(
            key,
            || {
                let typed = compute_fn()?;
                serde_json::to_value(&typed).map_err(|e| E::from(CacheError::from(e)))
            },
            ttl,
        )?;
        serde_json::from_value(value).map_err(|e| E::from(CacheError::from(e)))
    }
}

impl<C: CacheBackend + ?Sized> CacheBackendExt for C {}

/// `exists` then `get`, the lookup half of every `get_or_set`
///
/// `None` means the caller should compute. That covers both a miss and an
/// entry that lapsed between the two calls.
pub(crate) fn lookup_live<C: CacheBackend + ?Sized>(backend: &mut C, key: &str) -> Result<Option<Value>> {
    if !backend.exists(key)? {
        return Ok(None);
    }
    let value = backend.get(key)?;
    if value.is_none() {
        debug!(key = %key, backend = backend.name(), "Entry expired between exists and get, recomputing");
    }
    Ok(value)
}
