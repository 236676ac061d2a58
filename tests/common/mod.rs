//! Common utilities for integration tests
//!
//! This module provides shared test infrastructure including:
//! - Redis connection helpers
//! - Test data generators
//! - The cache contract suite, instantiated once per backend

#![allow(dead_code)]

use std::time::Duration;

/// TTL short enough to keep the suite fast
pub const SHORT_TTL: Duration = Duration::from_millis(200);

/// Sleep comfortably past [`SHORT_TTL`]
pub fn wait_past_short_ttl() {
    std::thread::sleep(SHORT_TTL + Duration::from_millis(150));
}

/// Get Redis URL from environment or use default
///
/// Defaults to logical database 15 because the contract suite flushes it.
pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string())
}

/// Create a test key with unique suffix
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Generate test data of various types
pub mod test_data {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct User {
        pub id: u64,
        pub name: String,
        pub email: String,
    }

    impl User {
        pub fn new(id: u64) -> Self {
            Self {
                id,
                name: format!("User {}", id),
                email: format!("user{}@example.com", id),
            }
        }
    }

    /// Generate JSON test data
    pub fn json_user(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": format!("User {}", id),
            "email": format!("user{}@example.com", id),
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    /// Every value shape a backend must round-trip
    pub fn storable_values() -> Vec<serde_json::Value> {
        vec![
            serde_json::Value::Null,
            serde_json::json!(true),
            serde_json::json!(42),
            serde_json::json!(-7.25),
            serde_json::json!("hello"),
            serde_json::json!(""),
            serde_json::json!([1, "two", null, [3.5]]),
            serde_json::json!({"list": [1, 2, 3], "nested": {"ok": true}, "none": null}),
        ]
    }
}

/// Instantiate the cache contract suite for one backend
///
/// `$setup` is a function returning `anyhow::Result<Option<(Guard, Cache)>>`.
/// `Guard` keeps fixtures alive for the duration of a test (temp directory,
/// lock on a shared server); `None` skips the test.
#[macro_export]
macro_rules! cache_contract_tests {
    ($setup:path) => {
        use swap_cache::{CacheBackend, CacheBackendExt, CacheError};
        use std::cell::Cell;

        macro_rules! fixture {
            () => {
                match $setup()? {
                    Some(fixture) => fixture,
                    None => return Ok(()),
                }
            };
        }

        #[test]
        fn contract_set_and_get() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("k", &serde_json::json!("hello"), None)?;
            assert_eq!(cache.get("k")?, Some(serde_json::json!("hello")));
            cache.close()?;
            Ok(())
        }

        #[test]
        fn contract_round_trip_all_shapes() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            for (i, value) in $crate::common::test_data::storable_values().into_iter().enumerate() {
                let key = format!("shape:{i}");
                cache.set(&key, &value, None)?;
                assert_eq!(cache.get(&key)?, Some(value), "round trip failed for {key}");
            }
            Ok(())
        }

        #[test]
        fn contract_miss_returns_none() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            assert_eq!(cache.get("nonexistent")?, None);
            assert!(!cache.exists("nonexistent")?);
            Ok(())
        }

        #[test]
        fn contract_exists_matches_get() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("x", &serde_json::json!(42), None)?;
            cache.set("n", &serde_json::Value::Null, None)?;
            for key in ["x", "n", "missing"] {
                assert_eq!(cache.exists(key)?, cache.get(key)?.is_some(), "key {key}");
            }
            Ok(())
        }

        #[test]
        fn contract_delete_semantics() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("d", &serde_json::json!("v"), None)?;
            assert!(cache.delete("d")?);
            assert_eq!(cache.get("d")?, None);
            assert!(!cache.delete("d")?);
            assert!(!cache.delete("ghost")?);
            Ok(())
        }

        #[test]
        fn contract_delete_expired_returns_false() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("short", &serde_json::json!("v"), Some($crate::common::SHORT_TTL))?;
            $crate::common::wait_past_short_ttl();
            assert!(!cache.delete("short")?);
            Ok(())
        }

        #[test]
        fn contract_clear_removes_all() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("a", &serde_json::json!(1), None)?;
            cache.set("b", &serde_json::json!(2), Some(std::time::Duration::from_secs(60)))?;
            cache.set("c", &serde_json::json!(3), Some($crate::common::SHORT_TTL))?;
            $crate::common::wait_past_short_ttl();

            cache.clear()?;
            for key in ["a", "b", "c"] {
                assert_eq!(cache.get(key)?, None);
            }
            assert_eq!(cache.stats()?.total_keys, 0);
            Ok(())
        }

        #[test]
        fn contract_ttl_expiry() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("ttl_key", &serde_json::json!("ttl_val"), Some($crate::common::SHORT_TTL))?;
            assert_eq!(cache.get("ttl_key")?, Some(serde_json::json!("ttl_val")));
            assert!(cache.exists("ttl_key")?);

            $crate::common::wait_past_short_ttl();
            assert_eq!(cache.get("ttl_key")?, None);
            assert!(!cache.exists("ttl_key")?);
            Ok(())
        }

        #[test]
        fn contract_ttl_not_expired_yet() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("alive", &serde_json::json!("yes"), Some(std::time::Duration::from_secs(60)))?;
            assert_eq!(cache.get("alive")?, Some(serde_json::json!("yes")));
            assert!(cache.exists("alive")?);
            Ok(())
        }

        #[test]
        fn contract_no_ttl_persists() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("persist", &serde_json::json!("forever"), None)?;
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert_eq!(cache.get("persist")?, Some(serde_json::json!("forever")));
            Ok(())
        }

        #[test]
        fn contract_huge_ttl_does_not_panic() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let huge = std::time::Duration::from_secs(u64::MAX);
            cache.set("huge", &serde_json::json!(1), Some(huge))?;
            assert_eq!(cache.get("huge")?, Some(serde_json::json!(1)));
            assert!(cache.exists("huge")?);

            let value = cache.get_or_set("huge_computed", || Ok::<_, CacheError>(serde_json::json!("v")), Some(huge))?;
            assert_eq!(value, serde_json::json!("v"));
            assert_eq!(cache.get("huge_computed")?, Some(serde_json::json!("v")));
            Ok(())
        }

        #[test]
        fn contract_overwrite_replaces_value_and_ttl() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("ov", &serde_json::json!("first"), None)?;
            cache.set("ov", &serde_json::json!("second"), None)?;
            assert_eq!(cache.get("ov")?, Some(serde_json::json!("second")));

            // TTL added by the second set
            cache.set("ttl_added", &serde_json::json!("a"), None)?;
            cache.set("ttl_added", &serde_json::json!("b"), Some($crate::common::SHORT_TTL))?;
            // TTL removed by the second set
            cache.set("ttl_removed", &serde_json::json!("a"), Some($crate::common::SHORT_TTL))?;
            cache.set("ttl_removed", &serde_json::json!("b"), None)?;

            $crate::common::wait_past_short_ttl();
            assert_eq!(cache.get("ttl_added")?, None);
            assert_eq!(cache.get("ttl_removed")?, Some(serde_json::json!("b")));
            Ok(())
        }

        #[test]
        fn contract_zero_ttl_rejected() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let err = cache
                .set("z", &serde_json::json!(1), Some(std::time::Duration::ZERO))
                .unwrap_err();
            assert!(matches!(err, CacheError::InvalidTtl(_)));
            assert!(!cache.exists("z")?);
            Ok(())
        }

        #[test]
        fn contract_stats_backend_name() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let stats = cache.stats()?;
            assert!(!stats.backend.is_empty());
            assert_eq!(stats.backend, cache.name());
            Ok(())
        }

        #[test]
        fn contract_stats_counts_live_keys_only() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("live1", &serde_json::json!("v"), None)?;
            cache.set("live2", &serde_json::json!("v"), Some(std::time::Duration::from_secs(60)))?;
            cache.set("dead1", &serde_json::json!("v"), Some($crate::common::SHORT_TTL))?;
            cache.set("dead2", &serde_json::json!("v"), Some($crate::common::SHORT_TTL))?;
            $crate::common::wait_past_short_ttl();

            if cache.name() == "redis" {
                // DBSIZE may include expired keys Redis has not reclaimed yet
                assert!(!cache.exists("dead1")? && !cache.exists("dead2")?);
            }
            let stats = cache.stats()?;
            assert_eq!(stats.total_keys, 2);
            assert!(stats.ttl_enabled);
            Ok(())
        }

        #[test]
        fn contract_get_or_set_miss_calls_fn_once() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let calls = Cell::new(0);
            let compute = || {
                calls.set(calls.get() + 1);
                Ok::<_, anyhow::Error>(serde_json::json!("computed"))
            };

            assert_eq!(cache.get_or_set("lazy", compute, None)?, serde_json::json!("computed"));
            assert_eq!(cache.get_or_set("lazy", compute, None)?, serde_json::json!("computed"));
            assert_eq!(cache.get_or_set("lazy", compute, None)?, serde_json::json!("computed"));
            assert_eq!(calls.get(), 1);
            assert_eq!(cache.get("lazy")?, Some(serde_json::json!("computed")));
            Ok(())
        }

        #[test]
        fn contract_get_or_set_hit_skips_fn() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("eager", &serde_json::json!("cached"), None)?;
            let result = cache.get_or_set(
                "eager",
                || -> anyhow::Result<serde_json::Value> { panic!("Should not compute again") },
                None,
            )?;
            assert_eq!(result, serde_json::json!("cached"));
            Ok(())
        }

        #[test]
        fn contract_get_or_set_returns_stored_null() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("null_val", &serde_json::Value::Null, None)?;
            let result = cache.get_or_set(
                "null_val",
                || -> anyhow::Result<serde_json::Value> { panic!("null is a cached value") },
                None,
            )?;
            assert!(result.is_null());
            Ok(())
        }

        #[test]
        fn contract_get_or_set_failure_stores_nothing() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let err = cache
                .get_or_set("fails", || Err(anyhow::anyhow!("upstream unavailable")), None)
                .unwrap_err();
            assert_eq!(err.to_string(), "upstream unavailable");
            assert!(!cache.exists("fails")?);
            Ok(())
        }

        #[test]
        fn contract_get_or_set_applies_ttl() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let calls = Cell::new(0);
            let compute = || {
                calls.set(calls.get() + 1);
                Ok::<_, anyhow::Error>(serde_json::json!(calls.get()))
            };

            assert_eq!(cache.get_or_set("ttl", compute, Some($crate::common::SHORT_TTL))?, 1);
            $crate::common::wait_past_short_ttl();
            assert_eq!(cache.get_or_set("ttl", compute, Some($crate::common::SHORT_TTL))?, 2);
            Ok(())
        }

        #[test]
        fn contract_typed_helpers() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            let user = $crate::common::test_data::User::new(5);
            cache.set_typed("user:5", &user, None)?;
            let cached: Option<$crate::common::test_data::User> = cache.get_typed("user:5")?;
            assert_eq!(cached, Some(user.clone()));

            let again: $crate::common::test_data::User = cache.get_or_set_typed(
                "user:5",
                || -> anyhow::Result<$crate::common::test_data::User> { panic!("Should not compute again") },
                None,
            )?;
            assert_eq!(again, user);

            cache.set("not_a_user", &serde_json::json!([1, 2]), None)?;
            let err = cache.get_typed::<$crate::common::test_data::User>("not_a_user").unwrap_err();
            assert!(matches!(err, CacheError::Value(_)));
            Ok(())
        }

        #[test]
        fn contract_close_is_idempotent() -> anyhow::Result<()> {
            let (_guard, mut cache) = fixture!();
            cache.set("cm", &serde_json::json!(true), None)?;
            cache.close()?;
            cache.close()?;
            Ok(())
        }

        #[test]
        fn contract_usable_as_trait_object() -> anyhow::Result<()> {
            let (_guard, cache) = fixture!();
            let mut boxed: Box<dyn CacheBackend> = Box::new(cache);
            boxed.set("boxed", &$crate::common::test_data::json_user(1), None)?;
            assert_eq!(boxed.get("boxed")?, Some($crate::common::test_data::json_user(1)));
            let value = boxed.get_or_set("boxed", || -> anyhow::Result<serde_json::Value> { panic!("hit") }, None)?;
            assert_eq!(value["id"], 1);
            Ok(())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let key1 = test_key("user");
        let key2 = test_key("user");
        assert_ne!(key1, key2, "Keys should be unique");
        assert!(key1.starts_with("test_user_"));
    }

    #[test]
    fn test_data_generation() {
        let user = test_data::User::new(123);
        assert_eq!(user.id, 123);
        assert_eq!(user.name, "User 123");
        assert_eq!(user.email, "user123@example.com");
    }
}
