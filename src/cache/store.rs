//! Entry Store Module
//!
//! Raw key to entry storage with expiry-aware lookup. Holds no locks itself;
//! the cache service wraps it for shared access.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, Clock};

// == Entry Store ==
/// HashMap-backed storage for cache entries.
#[derive(Debug)]
pub struct EntryStore {
    /// Key-entry storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl EntryStore {
    // == Constructor ==
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds`, replacing any previous
    /// entry and its expiry.
    pub fn set(&mut self, key: String, value: Value, ttl_seconds: u64) {
        let entry = CacheEntry::new(value, ttl_seconds, self.clock.now_ms());
        self.entries.insert(key, entry);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
        }
        removed
    }

    // == Delete Matching ==
    /// Removes every entry whose key contains `pattern` as a substring.
    ///
    /// Matching is case-sensitive; an empty pattern matches every key.
    /// Returns the number of entries removed.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        let removed = before - self.entries.len();
        self.stats.record_invalidations(removed);
        removed
    }

    // == List Keys ==
    /// Returns every stored key, including expired entries not yet swept.
    pub fn list_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Clear ==
    /// Removes all entries. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Expiry Snapshot ==
    /// Copies every key with its expiry timestamp.
    ///
    /// Lets a sweeper decide what to remove without holding the store while
    /// it does so.
    pub fn expiry_snapshot(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.expires_at))
            .collect()
    }

    // == Remove Expired ==
    /// Removes the given keys that are still expired.
    ///
    /// Keys refreshed by a `set` since they were collected are left alone.
    pub fn remove_expired(&mut self, keys: &[String]) -> usize {
        let now = self.clock.now_ms();
        let mut removed = 0;

        for key in keys {
            let expired = self
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_expired(now));
            if expired {
                self.entries.remove(key);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        removed
    }

    // == Entry ==
    /// Returns the raw entry for `key`, expired or not.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Size ==
    /// Returns the number of stored entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn store_with_clock() -> (EntryStore, ManualClock) {
        let clock = ManualClock::new(0);
        (EntryStore::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_store_new() {
        let (store, _) = store_with_clock();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock();

        store.set("key1".to_string(), json!("value1"), 60);

        assert_eq!(store.get("key1"), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock();
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite_resets_expiry() {
        let (mut store, clock) = store_with_clock();

        store.set("key1".to_string(), json!(1), 5);
        clock.advance_secs(4);
        store.set("key1".to_string(), json!(2), 5);
        clock.advance_secs(4);

        assert_eq!(store.get("key1"), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lazy_expiry_removes_entry() {
        let (mut store, clock) = store_with_clock();

        store.set("key1".to_string(), json!("v"), 1);
        clock.advance_secs(1);

        assert_eq!(store.len(), 1, "entry stays until read or swept");
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let (mut store, _) = store_with_clock();

        store.set("key1".to_string(), json!("v"), 60);
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_store_delete_matching_substring() {
        let (mut store, _) = store_with_clock();

        store.set("/items?page=1".to_string(), json!(1), 60);
        store.set("/items?page=2".to_string(), json!(2), 60);
        store.set("/users".to_string(), json!(3), 60);

        assert_eq!(store.delete_matching("/items"), 2);
        assert_eq!(store.list_keys(), vec!["/users".to_string()]);
    }

    #[test]
    fn test_store_delete_matching_is_case_sensitive() {
        let (mut store, _) = store_with_clock();

        store.set("User:1".to_string(), json!(1), 60);

        assert_eq!(store.delete_matching("user"), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete_matching_empty_pattern_clears_all() {
        let (mut store, _) = store_with_clock();

        store.set("a".to_string(), json!(1), 60);
        store.set("b".to_string(), json!(2), 60);

        assert_eq!(store.delete_matching(""), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_list_keys_includes_unswept_expired() {
        let (mut store, clock) = store_with_clock();

        store.set("short".to_string(), json!(1), 1);
        store.set("long".to_string(), json!(2), 60);
        clock.advance_secs(2);

        let mut keys = store.list_keys();
        keys.sort();
        assert_eq!(keys, vec!["long".to_string(), "short".to_string()]);
    }

    fn expired_from_snapshot(store: &EntryStore) -> Vec<String> {
        let now = store.now_ms();
        store
            .expiry_snapshot()
            .into_iter()
            .filter(|(_, expires_at)| now >= *expires_at)
            .map(|(key, _)| key)
            .collect()
    }

    #[test]
    fn test_store_expiry_snapshot_and_remove() {
        let (mut store, clock) = store_with_clock();

        store.set("key1".to_string(), json!(1), 1);
        store.set("key2".to_string(), json!(2), 10);
        clock.advance_secs(2);

        let expired = expired_from_snapshot(&store);
        assert_eq!(expired, vec!["key1".to_string()]);

        assert_eq!(store.remove_expired(&expired), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key2"), Some(json!(2)));
    }

    #[test]
    fn test_store_remove_expired_skips_refreshed_keys() {
        let (mut store, clock) = store_with_clock();

        store.set("key1".to_string(), json!(1), 1);
        clock.advance_secs(2);
        let expired = expired_from_snapshot(&store);

        // refreshed between collection and removal
        store.set("key1".to_string(), json!(2), 60);

        assert_eq!(store.remove_expired(&expired), 0);
        assert_eq!(store.get("key1"), Some(json!(2)));
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock();

        store.set("a".to_string(), json!(1), 60);
        store.set("b".to_string(), json!(2), 60);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with_clock();

        store.set("key1".to_string(), json!("v"), 60);
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_entry_exposes_timestamps() {
        let (mut store, clock) = store_with_clock();
        clock.advance_secs(3);

        store.set("key1".to_string(), json!("v"), 10);

        let entry = store.entry("key1").unwrap();
        assert_eq!(entry.created_at, 3_000);
        assert_eq!(entry.expires_at, 13_000);
    }
}
