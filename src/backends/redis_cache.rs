//! Redis Cache - Networked Backend
//!
//! Thin adapter translating the cache contract into native Redis commands.
//! Expiry is delegated to the server (`SET ... EX/PX`), so this backend keeps
//! no local TTL bookkeeping.
//!
//! Built without the `redis` cargo feature, [`RedisCache`] still exists but
//! every constructor fails with [`CacheError::Config`].

use crate::codecs::JsonCodec;
use crate::config::RedisConfig;
use crate::error::{CacheError, Result};
use crate::traits::CacheCodec;

#[cfg(feature = "redis")]
pub use connected::RedisCache;
#[cfg(not(feature = "redis"))]
pub use unavailable::RedisCache;

#[cfg_attr(feature = "redis", allow(dead_code))]
fn missing_feature_error() -> CacheError {
    CacheError::Config(
        "RedisCache requires the `redis` crate. Enable it with the `redis` cargo feature: \
         swap-cache = { version = \"0.1\", features = [\"redis\"] }"
            .to_string(),
    )
}

#[cfg(feature = "redis")]
mod connected {
    use super::{CacheCodec, CacheError, JsonCodec, RedisConfig, Result};
    use crate::error::validate_ttl;
    use crate::stats::{CacheStats, Counters};
    use crate::traits::CacheBackend;
    use redis::{Client, Commands, Connection, InfoDict};
    use serde_json::Value;
    use std::time::Duration;
    use tracing::{debug, info};

    /// Redis cache over a single blocking connection
    ///
    /// This is the networked backend, providing:
    /// - Shared storage across processes and hosts
    /// - Native server-side TTL (`EX` seconds, `PX` for sub-second TTLs)
    /// - Server diagnostics (`INFO`, `DBSIZE`) in [`CacheStats`]
    ///
    /// **Warning**: [`clear`](CacheBackend::clear) runs `FLUSHDB`, which wipes
    /// the whole logical database, not only keys written through this cache.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use swap_cache::{CacheBackend, RedisCache, RedisConfig};
    /// use std::time::Duration;
    ///
    /// # fn example() -> swap_cache::Result<()> {
    /// let mut cache = RedisCache::new(RedisConfig::new("localhost", 6379).with_db(1))?;
    /// cache.set("session:1", &serde_json::json!({"user": 7}), Some(Duration::from_secs(30)))?;
    /// # Ok(())
    /// # }
    /// ```
    pub struct RedisCache<C: CacheCodec = JsonCodec> {
        /// `None` once closed
        conn: Option<Connection>,
        config: RedisConfig,
        codec: C,
        counters: Counters,
    }

    impl RedisCache<JsonCodec> {
        /// Connect using `config` and the JSON codec
        ///
        /// # Errors
        ///
        /// Returns `CacheError::Config` for unusable connection parameters,
        /// or `CacheError::Redis` if the server cannot be reached.
        pub fn new(config: RedisConfig) -> Result<Self> {
            Self::with_codec(config, JsonCodec)
        }

        /// Connect using a full connection URL (e.g. `redis://localhost:6379/0`)
        ///
        /// # Errors
        ///
        /// Same as [`RedisCache::new`].
        pub fn with_url(redis_url: &str) -> Result<Self> {
            Self::new(RedisConfig::from_url(redis_url))
        }
    }

    impl<C: CacheCodec> RedisCache<C> {
        /// Connect using `config` and a custom codec
        ///
        /// # Errors
        ///
        /// Returns `CacheError::Config` for unusable connection parameters,
        /// or `CacheError::Redis` if the server cannot be reached.
        pub fn with_codec(config: RedisConfig, codec: C) -> Result<Self> {
            let redis_url = config.redacted_url();
            info!(redis_url = %redis_url, codec = codec.name(), "Initializing Redis Cache");

            let client = Client::open(config.to_url().as_str()).map_err(|e| {
                CacheError::Config(format!("invalid Redis connection parameters {redis_url}: {e}"))
            })?;

            let mut conn = match config.connect_timeout() {
                Some(timeout) => client.get_connection_with_timeout(timeout)?,
                None => client.get_connection()?,
            };
            conn.set_read_timeout(config.read_timeout())?;
            conn.set_write_timeout(config.write_timeout())?;

            // Test connection
            let _: String = redis::cmd("PING").query(&mut conn)?;

            info!(redis_url = %redis_url, "Redis Cache connected successfully");

            Ok(Self {
                conn: Some(conn),
                config,
                codec,
                counters: Counters::default(),
            })
        }

        /// Connection parameters this cache was built with
        #[must_use]
        pub fn config(&self) -> &RedisConfig {
            &self.config
        }

        fn conn(&mut self) -> Result<&mut Connection> {
            self.conn.as_mut().ok_or(CacheError::Closed("redis"))
        }
    }

    impl<C: CacheCodec> CacheBackend for RedisCache<C> {
        fn get(&mut self, key: &str) -> Result<Option<Value>> {
            let data: Option<Vec<u8>> = self.conn()?.get(key)?;
            self.counters.record_lookup(data.is_some());

            match data {
                Some(bytes) => Ok(Some(self.codec.deserialize(&bytes)?)),
                None => Ok(None),
            }
        }

        fn set(&mut self, key: &str, value: &Value, ttl: Option<Duration>) -> Result<()> {
            let ttl = validate_ttl(ttl)?;
            let blob = self.codec.serialize(value)?;
            let conn = self.conn()?;

            match ttl {
                None => conn.set::<_, _, ()>(key, blob)?,
                Some(ttl) if ttl.subsec_nanos() == 0 => conn.set_ex::<_, _, ()>(key, blob, ttl.as_secs())?,
                Some(ttl) => {
                    let millis = u64::try_from(ttl.as_millis().max(1)).unwrap_or(u64::MAX);
                    conn.pset_ex::<_, _, ()>(key, blob, millis)?;
                }
            }
            self.counters.sets += 1;

            debug!(key = %key, ttl_ms = ?ttl.map(|t| t.as_millis()), "[Redis] Cached key");
            Ok(())
        }

        fn delete(&mut self, key: &str) -> Result<bool> {
            let removed: u64 = self.conn()?.del(key)?;
            debug!(key = %key, removed, "[Redis] Deleted key");
            Ok(removed > 0)
        }

        fn exists(&mut self, key: &str) -> Result<bool> {
            let found: bool = self.conn()?.exists(key)?;
            Ok(found)
        }

        fn clear(&mut self) -> Result<()> {
            let db = self.config.db;
            let _: () = redis::cmd("FLUSHDB").query(self.conn()?)?;
            debug!(db, "[Redis] Flushed logical database");
            Ok(())
        }

        fn stats(&mut self) -> Result<CacheStats> {
            let conn = self.conn()?;
            let total_keys: u64 = redis::cmd("DBSIZE").query(&mut *conn)?;
            let info: InfoDict = redis::cmd("INFO").query(&mut *conn)?;

            let info_field =
                |name: &str| info.get::<String>(name).unwrap_or_else(|| "unknown".to_string());

            let stats = CacheStats::new(self.name(), total_keys, true)
                .with_extra("redis_version", info_field("redis_version"))
                .with_extra("used_memory_human", info_field("used_memory_human"))
                .with_extra("db", self.config.db)
                .with_extra("codec", self.codec.name());
            Ok(self.counters.apply(stats))
        }

        fn close(&mut self) -> Result<()> {
            if self.conn.take().is_some() {
                info!(redis_url = %self.config.redacted_url(), "Redis Cache closed");
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "redis"
        }
    }
}

#[cfg(not(feature = "redis"))]
mod unavailable {
    use super::{missing_feature_error, CacheCodec, JsonCodec, RedisConfig, Result};
    use crate::stats::CacheStats;
    use crate::traits::CacheBackend;
    use serde_json::Value;
    use std::convert::Infallible;
    use std::marker::PhantomData;
    use std::time::Duration;

    /// Placeholder for the Redis backend when the `redis` feature is disabled
    ///
    /// Cannot be constructed: every constructor returns `CacheError::Config`.
    pub struct RedisCache<C: CacheCodec = JsonCodec> {
        never: Infallible,
        _codec: PhantomData<C>,
    }

    impl RedisCache<JsonCodec> {
        /// # Errors
        ///
        /// Always returns `CacheError::Config`.
        pub fn new(config: RedisConfig) -> Result<Self> {
            Self::with_codec(config, JsonCodec)
        }

        /// # Errors
        ///
        /// Always returns `CacheError::Config`.
        pub fn with_url(redis_url: &str) -> Result<Self> {
            Self::new(RedisConfig::from_url(redis_url))
        }
    }

    impl<C: CacheCodec> RedisCache<C> {
        /// # Errors
        ///
        /// Always returns `CacheError::Config`.
        pub fn with_codec(_config: RedisConfig, _codec: C) -> Result<Self> {
            Err(missing_feature_error())
        }

        #[must_use]
        pub fn config(&self) -> &RedisConfig {
            match self.never {}
        }
    }

    impl<C: CacheCodec> CacheBackend for RedisCache<C> {
        fn get(&mut self, _key: &str) -> Result<Option<Value>> {
            match self.never {}
        }

        fn set(&mut self, _key: &str, _value: &Value, _ttl: Option<Duration>) -> Result<()> {
            match self.never {}
        }

        fn delete(&mut self, _key: &str) -> Result<bool> {
            match self.never {}
        }

        fn exists(&mut self, _key: &str) -> Result<bool> {
            match self.never {}
        }

        fn clear(&mut self) -> Result<()> {
            match self.never {}
        }

        fn stats(&mut self) -> Result<CacheStats> {
            match self.never {}
        }

        fn close(&mut self) -> Result<()> {
            match self.never {}
        }

        fn name(&self) -> &'static str {
            "redis"
        }
    }

}
