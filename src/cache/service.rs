//! Cache Service Module
//!
//! The shared, cloneable handle the rest of the application talks to. Wraps
//! the entry store in a `tokio::sync::RwLock` and adds default-TTL policy,
//! argument validation and invalidation helpers.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, Clock, EntryStore, SystemClock, MAX_KEY_LENGTH};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::middleware::ResponseCacheLayer;

// == Cache Service ==
/// Thread-safe cache handle. Clones share the same store.
#[derive(Debug, Clone)]
pub struct CacheService {
    store: Arc<RwLock<EntryStore>>,
    default_ttl: u64,
}

impl CacheService {
    // == Constructors ==
    /// Creates a cache on the system clock.
    pub fn new(default_ttl: u64) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock(default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(RwLock::new(EntryStore::new(clock))),
            default_ttl,
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_ttl)
    }

    /// TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` if absent or expired.
    pub async fn get(&self, key: &str) -> Option<Value> {
        // write lock: a lazy expiry removes the entry and stats are updated
        self.store.write().await.get(key)
    }

    /// Returns the live value for `key` decoded as `T`.
    ///
    /// A value that does not decode as `T` reads as absent.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!("Cached value for '{}' did not decode: {}", key, e);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` seconds (default TTL if `None`).
    ///
    /// The value is serialized before the lock is taken; on failure nothing is
    /// stored and the error is returned.
    pub async fn set<T>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        validate_key(&key)?;

        let value = serde_json::to_value(value)?;
        let ttl = ttl.unwrap_or(self.default_ttl);

        self.store.write().await.set(key, value, ttl);
        Ok(())
    }

    // == Invalidate ==
    /// Removes a single entry. Absent keys are a no-op.
    ///
    /// Returns whether an entry was removed.
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.store.write().await.delete(key))
    }

    // == Invalidate By Pattern ==
    /// Removes every entry whose key contains `pattern`.
    ///
    /// Case-sensitive substring match. An empty pattern removes everything.
    /// The whole key set is filtered under one write lock, so no matching
    /// key survives the call.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> usize {
        let removed = self.store.write().await.delete_matching(pattern);
        debug!("Invalidated {} entries matching '{}'", removed, pattern);
        removed
    }

    // == List Keys ==
    /// Returns all stored keys, including expired entries not yet swept.
    pub async fn list_keys(&self) -> Vec<String> {
        self.store.read().await.list_keys()
    }

    // == TTL ==
    /// Remaining TTL in seconds for a live entry.
    pub async fn ttl_remaining(&self, key: &str) -> Option<u64> {
        let store = self.store.read().await;
        let now = store.now_ms();
        store
            .entry(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Clear ==
    /// Drops every entry. Returns how many were removed.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Size ==
    /// Returns the number of stored entries, expired-but-unswept included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Sweep Expired ==
    /// Removes expired entries, at most `batch_size` keys per write lock.
    ///
    /// Candidates are picked from a snapshot taken under a read lock; each
    /// batch re-checks expiry so entries refreshed mid-sweep survive.
    pub async fn sweep_expired(&self, batch_size: usize) -> usize {
        let (now, snapshot) = {
            let store = self.store.read().await;
            (store.now_ms(), store.expiry_snapshot())
        };

        let expired: Vec<String> = snapshot
            .into_iter()
            .filter(|(_, expires_at)| now >= *expires_at)
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0;
        for batch in expired.chunks(batch_size.max(1)) {
            removed += self.store.write().await.remove_expired(batch);
            tokio::task::yield_now().await;
        }
        removed
    }

    // == Layer ==
    /// Builds a response caching layer backed by this cache.
    ///
    /// `duration` overrides the TTL (seconds) for entries created through the
    /// layer; `None` uses the default TTL.
    pub fn layer(&self, duration: Option<u64>) -> ResponseCacheLayer {
        ResponseCacheLayer::new(self.clone(), duration)
    }
}

// == Validation ==
/// Rejects keys that can never name a cache entry.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument(
            "Key cannot be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidArgument(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde::Deserialize;
    use serde_json::json;

    fn cache_with_clock() -> (CacheService, ManualClock) {
        let clock = ManualClock::new(0);
        let cache = CacheService::with_clock(600, Arc::new(clock.clone()));
        (cache, clock)
    }

    #[tokio::test]
    async fn test_get_never_set_is_absent() {
        let (cache, _) = cache_with_clock();
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _) = cache_with_clock();

        cache.set("k", &json!({"id": 1}), Some(60)).await.unwrap();
        assert_eq!(cache.get("k").await, Some(json!({"id": 1})));
    }

    #[tokio::test]
    async fn test_default_ttl_applied() {
        let (cache, clock) = cache_with_clock();

        cache.set("k", "v", None).await.unwrap();
        assert_eq!(cache.ttl_remaining("k").await, Some(600));

        clock.advance_secs(599);
        assert!(cache.get("k").await.is_some());

        clock.advance_secs(1);
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_lazy_expiry_without_sweep() {
        let (cache, clock) = cache_with_clock();

        cache.set("k", "v", Some(5)).await.unwrap();
        clock.advance_secs(6);

        assert_eq!(cache.get("k").await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_removes_regardless_of_ttl() {
        let (cache, _) = cache_with_clock();

        cache.set("k", "v", Some(86_400)).await.unwrap();
        assert!(cache.invalidate("k").await.unwrap());
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_twice_is_noop() {
        let (cache, _) = cache_with_clock();

        cache.set("k", "v", None).await.unwrap();
        assert!(cache.invalidate("k").await.unwrap());
        assert!(!cache.invalidate("k").await.unwrap());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_by_pattern() {
        let (cache, _) = cache_with_clock();

        cache
            .set("user:42:profile", &json!({"name": "a"}), Some(600))
            .await
            .unwrap();
        cache
            .set("user:42:orders", &json!([1, 2]), Some(600))
            .await
            .unwrap();
        cache
            .set("user:7:profile", &json!({"name": "b"}), Some(600))
            .await
            .unwrap();

        assert_eq!(cache.invalidate_by_pattern("user:42").await, 2);

        assert_eq!(cache.get("user:42:profile").await, None);
        assert_eq!(cache.get("user:42:orders").await, None);
        assert_eq!(cache.get("user:7:profile").await, Some(json!({"name": "b"})));
    }

    #[tokio::test]
    async fn test_invalidate_by_empty_pattern_clears_everything() {
        let (cache, _) = cache_with_clock();

        cache.set("a", "1", None).await.unwrap();
        cache.set("b", "2", None).await.unwrap();

        assert_eq!(cache.invalidate_by_pattern("").await, 2);
        assert!(cache.list_keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let (cache, _) = cache_with_clock();

        let result = cache.set("", "v", None).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        let result = cache.set(long_key, "v", None).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));

        let result = cache.invalidate("").await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_unserializable_value_is_not_stored() {
        use std::collections::HashMap;

        let (cache, _) = cache_with_clock();

        // JSON object keys must be strings
        let mut value = HashMap::new();
        value.insert(vec![1u8], "v");

        let result = cache.set("k", &value, None).await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_get_as_typed() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Item {
            id: u32,
        }

        let (cache, _) = cache_with_clock();
        cache.set("item", &Item { id: 7 }, None).await.unwrap();

        assert_eq!(cache.get_as::<Item>("item").await, Some(Item { id: 7 }));
        assert_eq!(cache.get_as::<Vec<u8>>("item").await, None);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let (cache, clock) = cache_with_clock();

        for i in 0..10 {
            cache.set(format!("short:{}", i), &i, Some(1)).await.unwrap();
        }
        cache.set("long", "v", Some(3600)).await.unwrap();
        clock.advance_secs(2);

        assert_eq!(cache.len().await, 11);
        assert_eq!(cache.sweep_expired(3).await, 10);
        assert_eq!(cache.list_keys().await, vec!["long".to_string()]);
        assert_eq!(cache.stats().await.expirations, 10);
    }

    #[tokio::test]
    async fn test_sweep_with_zero_batch_size_still_progresses() {
        let (cache, clock) = cache_with_clock();

        cache.set("k", "v", Some(1)).await.unwrap();
        clock.advance_secs(1);

        assert_eq!(cache.sweep_expired(0).await, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let (cache, _) = cache_with_clock();

        cache.set("a", "1", None).await.unwrap();
        cache.set("b", "2", None).await.unwrap();

        assert_eq!(cache.clear().await, 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let (cache, _) = cache_with_clock();
        let other = cache.clone();

        cache.set("k", "v", None).await.unwrap();
        assert_eq!(other.get("k").await, Some(json!("v")));
    }
}
