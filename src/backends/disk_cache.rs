//! Disk Cache - SQLite Persistent Backend
//!
//! Single-file SQLite store with one `cache` table. Values go through a
//! [`CacheCodec`] and expiry deadlines are stored as absolute Unix
//! timestamps, so entries survive process restarts with their TTL intact.

use crate::codecs::JsonCodec;
use crate::error::{validate_ttl, CacheError, Result};
use crate::stats::{CacheStats, Counters};
use crate::traits::{CacheBackend, CacheCodec};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Default database location, relative to the working directory
pub const DEFAULT_PATH: &str = ".cache/swap_cache.db";

const DDL: &str = "
CREATE TABLE IF NOT EXISTS cache (
    key        TEXT PRIMARY KEY,
    value      BLOB NOT NULL,
    expires_at REAL
);
";

/// Seconds since the Unix epoch
fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

fn is_lapsed(expires_at: Option<f64>, now: f64) -> bool {
    expires_at.is_some_and(|deadline| deadline <= now)
}

/// SQLite-backed persistent cache
///
/// This is the persistent backend, providing:
/// - Entries that survive process restarts
/// - Absolute TTL deadlines stored next to each row
/// - Lazy expiry: lapsed rows are deleted when `get`/`exists` observe them
/// - Autocommit on every call (no batching)
///
/// The database file and its parent directories are created on open, and
/// opening an existing file reuses its table.
///
/// # Example
///
/// ```rust,no_run
/// use swap_cache::{CacheBackend, DiskCache};
///
/// # fn example() -> swap_cache::Result<()> {
/// let mut cache = DiskCache::open("/tmp/swap_cache_demo.db")?;
/// cache.set("user:42", &serde_json::json!({"name": "Alice"}), None)?;
/// cache.close()?;
/// # Ok(())
/// # }
/// ```
pub struct DiskCache<C: CacheCodec = JsonCodec> {
    /// `None` once closed
    conn: Option<Connection>,
    path: PathBuf,
    codec: C,
    counters: Counters,
}

impl DiskCache<JsonCodec> {
    /// Open (or create) a cache at `path` using the JSON codec
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_codec(path, JsonCodec)
    }

    /// Open (or create) a cache at [`DEFAULT_PATH`]
    ///
    /// # Errors
    ///
    /// Same as [`DiskCache::open`].
    pub fn open_default() -> Result<Self> {
        Self::open(DEFAULT_PATH)
    }
}

impl<C: CacheCodec> DiskCache<C> {
    /// Open (or create) a cache at `path` with a custom codec
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub fn with_codec(path: impl AsRef<Path>, codec: C) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), codec = codec.name(), "Initializing Disk Cache (SQLite)");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(DDL)?;

        Ok(Self {
            conn: Some(conn),
            path,
            codec,
            counters: Counters::default(),
        })
    }

    /// Location of the database file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(CacheError::Closed("disk"))
    }

    fn remove_row(&self, key: &str) -> Result<usize> {
        Ok(self
            .conn()?
            .execute("DELETE FROM cache WHERE key = ?1", params![key])?)
    }
}

impl<C: CacheCodec> CacheBackend for DiskCache<C> {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        let row: Option<(Vec<u8>, Option<f64>)> = self
            .conn()?
            .query_row(
                "SELECT value, expires_at FROM cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((blob, expires_at)) = row else {
            self.counters.record_lookup(false);
            return Ok(None);
        };

        if is_lapsed(expires_at, now_secs()) {
            self.remove_row(key)?;
            self.counters.record_lookup(false);
            debug!(key = %key, "[Disk] Evicted expired key");
            return Ok(None);
        }

        let value = self.codec.deserialize(&blob)?;
        self.counters.record_lookup(true);
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
        let ttl = validate_ttl(ttl)?;
        let blob = self.codec.serialize(value)?;
        let expires_at = ttl.map(|ttl| now_secs() + ttl.as_secs_f64());

        self.conn()?.execute(
            "INSERT OR REPLACE INTO cache (key, value, expires_at) VALUES (?1, ?2, ?3)",
            params![key, blob, expires_at],
        )?;
        self.counters.sets += 1;

        debug!(key = %key, ttl_ms = ?ttl.map(|t| t.as_millis()), bytes = blob.len(), "[Disk] Cached key");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        // Not atomic: another process may change the row between these calls
        let existed = self.exists(key)?;
        self.remove_row(key)?;
        debug!(key = %key, existed, "[Disk] Deleted key");
        Ok(existed)
    }

    fn exists(&mut self, key: &str) -> Result<bool> {
        let row: Option<Option<f64>> = self
            .conn()?
            .query_row(
                "SELECT expires_at FROM cache WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(expires_at) = row else {
            return Ok(false);
        };

        if is_lapsed(expires_at, now_secs()) {
            self.remove_row(key)?;
            debug!(key = %key, "[Disk] Evicted expired key");
            return Ok(false);
        }
        Ok(true)
    }

    fn clear(&mut self) -> Result<()> {
        let count = self.conn()?.execute("DELETE FROM cache", [])?;
        debug!(count, "[Disk] Cleared all rows");
        Ok(())
    }

    fn stats(&mut self) -> Result<CacheStats> {
        let conn = self.conn()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cache WHERE expires_at IS NULL OR expires_at > ?1",
            params![now_secs()],
            |row| row.get(0),
        )?;
        let with_ttl: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cache WHERE expires_at IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let stats = CacheStats::new(self.name(), total.unsigned_abs(), with_ttl > 0)
            .with_extra("path", self.path.display().to_string())
            .with_extra("codec", self.codec.name());
        Ok(self.counters.apply(stats))
    }

    fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if let Err((_conn, e)) = conn.close() {
            warn!(path = %self.path.display(), error = %e, "[Disk] Failed to close SQLite connection");
            return Err(e.into());
        }
        info!(path = %self.path.display(), "Disk Cache closed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}
