//! Shared Cache - Mutex Wrapper for Multi-Threaded Use
//!
//! Backends are not internally synchronized. `SharedCache` puts one behind an
//! `Arc<parking_lot::Mutex<_>>` so clones can be handed to other threads.
//! Each call locks for the duration of that single operation.

use crate::error::{validate_ttl, CacheError, Result};
use crate::stats::CacheStats;
use crate::traits::{lookup_live, CacheBackend, CacheBackendExt};
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Thread-safe handle to a cache backend
///
/// Cloning is cheap and every clone refers to the same backend.
///
/// ```rust
/// use swap_cache::{MemoryCache, SharedCache};
///
/// let cache = SharedCache::new(MemoryCache::new());
/// let worker = cache.clone();
/// std::thread::spawn(move || worker.set("k", &serde_json::json!(1), None))
///     .join()
///     .unwrap()?;
/// assert!(cache.exists("k")?);
/// # Ok::<(), swap_cache::CacheError>(())
/// ```
pub struct SharedCache<C: CacheBackend> {
    inner: Arc<Mutex<C>>,
}

impl<C: CacheBackend> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CacheBackend> SharedCache<C> {
    /// Wrap a backend
    pub fn new(backend: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(backend)),
        }
    }

    /// Lock the backend for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, C> {
        self.inner.lock()
    }

    /// See [`CacheBackend::get`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.lock().get(key)
    }

    /// See [`CacheBackend::set`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn set(&self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        self.inner.lock().set(key, value, ttl)
    }

    /// See [`CacheBackend::delete`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.inner.lock().delete(key)
    }

    /// See [`CacheBackend::exists`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn exists(&self, key: &str) -> Result<bool> {
        self.inner.lock().exists(key)
    }

    /// See [`CacheBackend::clear`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn clear(&self) -> Result<()> {
        self.inner.lock().clear()
    }

    /// See [`CacheBackend::stats`]
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn stats(&self) -> Result<CacheStats> {
        self.inner.lock().stats()
    }

    /// See [`CacheBackend::close`]. Closes the backend for every clone.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    /// [`CacheBackendExt::get_or_set`] with the lock released while computing
    ///
    /// Two threads missing the same key may both run `compute_fn`; the last
    /// `set` wins.
    ///
    /// # Errors
    ///
    /// Returns the compute error, or a cache error converted into `E`.
    pub fn get_or_set<F, E>(&self, key: &str, compute_fn: F, ttl: Option<Duration>) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
        E: From<CacheError>,
    {
        let ttl = validate_ttl(ttl)?;
        // Released before computing, unlike get_or_set_locked
        if let Some(value) = lookup_live(&mut *self.inner.lock(), key)? {
            return Ok(value);
        }

        let value = compute_fn()?;
        self.inner.lock().set(key, &value, ttl)?;
        Ok(value)
    }

    /// `get_or_set` holding the lock across exists, compute and set
    ///
    /// Concurrent callers in this process see `compute_fn` run at most once
    /// per miss. Other processes sharing the same file or Redis database are
    /// not covered.
    ///
    /// # Errors
    ///
    /// Returns the compute error, or a cache error converted into `E`.
    pub fn get_or_set_locked<F, E>(&self, key: &str, compute_fn: F, ttl: Option<Duration>) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
        E: From<CacheError>,
    {
        let mut backend = self.inner.lock();
        debug!(key = %key, backend = backend.name(), "Computing under cache lock");
        backend.get_or_set(key, compute_fn, ttl)
    }

    /// `delete` that evaluates liveness and removes the key under one lock
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn delete_locked(&self, key: &str) -> Result<bool> {
        let mut backend = self.inner.lock();
        let existed = backend.exists(key)?;
        if existed {
            backend.delete(key)?;
        }
        Ok(existed)
    }
}

impl<C: CacheBackend> CacheBackend for SharedCache<C> {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        SharedCache::get(self, key)
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        SharedCache::set(self, key, value, ttl)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        SharedCache::delete(self, key)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        SharedCache::exists(self, key)
    }

    fn clear(&mut self) -> Result<()> {
        SharedCache::clear(self)
    }

    fn stats(&mut self) -> Result<CacheStats> {
        SharedCache::stats(self)
    }

    fn close(&mut self) -> Result<()> {
        SharedCache::close(self)
    }

    fn name(&self) -> &'static str {
        self.inner.lock().name()
    }
}
