//! Memory Store Module
//!
//! Synchronous core of the in-process backend: HashMap storage with LRU
//! capacity bound and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, LruTracker};

// == Memory Store ==
/// Key-value storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An expired entry is dropped on access and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        if self.live(key).is_none() {
            return None;
        }
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and TTL.
    ///
    /// At capacity, the least recently used entry is evicted first.
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Duration) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::with_ttl(value, ttl));
        self.lru.touch(key);
    }

    // == Compare And Set ==
    /// Writes `value` only if the live value under `key` equals `expected`.
    ///
    /// `expected = None` means the key must be absent (or expired).
    /// Returns whether the write happened.
    pub fn compare_and_set(
        &mut self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
        ttl: Duration,
    ) -> bool {
        let current = self.live(key).map(|entry| entry.value.as_slice());
        if current != expected {
            return false;
        }
        self.set(key, value, ttl);
        true
    }

    // == Delete ==
    /// Removes `key`. Returns whether a live entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let was_live = self.live(key).is_some();
        self.entries.remove(key);
        self.lru.remove(key);
        was_live
    }

    // == TTL ==
    /// Remaining lifetime of the live entry under `key`.
    pub fn ttl_remaining(&mut self, key: &str) -> Option<Duration> {
        self.live(key).and_then(CacheEntry::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired.len()
    }

    /// Returns the current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `key`, purging it first if it has expired.
    fn live(&mut self, key: &str) -> Option<&CacheEntry> {
        if self.entries.get(key).is_some_and(CacheEntry::is_expired) {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        self.entries.get(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_store_set_and_get() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"one".to_vec(), MINUTE);

        assert_eq!(store.get("cartu1"), Some(b"one".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_missing() {
        let mut store = MemoryStore::new(100);
        assert_eq!(store.get("cartu1"), None);
    }

    #[test]
    fn test_store_overwrite_resets_value() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"one".to_vec(), MINUTE);
        store.set("cartu1", b"two".to_vec(), MINUTE);

        assert_eq!(store.get("cartu1"), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"one".to_vec(), MINUTE);

        assert!(store.delete("cartu1"));
        assert!(!store.delete("cartu1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"one".to_vec(), Duration::from_millis(50));
        assert!(store.get("cartu1").is_some());

        sleep(Duration::from_millis(80));

        assert_eq!(store.get("cartu1"), None);
        assert!(store.is_empty(), "Expired entry should be purged on access");
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = MemoryStore::new(2);

        store.set("cartu1", b"1".to_vec(), MINUTE);
        store.set("cartu2", b"2".to_vec(), MINUTE);
        store.get("cartu1");
        store.set("cartu3", b"3".to_vec(), MINUTE);

        assert_eq!(store.len(), 2);
        assert!(store.get("cartu1").is_some());
        assert_eq!(store.get("cartu2"), None);
        assert!(store.get("cartu3").is_some());
    }

    #[test]
    fn test_compare_and_set_requires_matching_value() {
        let mut store = MemoryStore::new(100);

        assert!(store.compare_and_set("cartu1", None, b"v1".to_vec(), MINUTE));
        assert!(!store.compare_and_set("cartu1", None, b"v2".to_vec(), MINUTE));
        assert!(!store.compare_and_set("cartu1", Some(b"stale".as_slice()), b"v2".to_vec(), MINUTE));
        assert!(store.compare_and_set("cartu1", Some(b"v1".as_slice()), b"v2".to_vec(), MINUTE));

        assert_eq!(store.get("cartu1"), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_compare_and_set_treats_expired_as_absent() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"old".to_vec(), Duration::from_millis(30));
        sleep(Duration::from_millis(60));

        assert!(store.compare_and_set("cartu1", None, b"new".to_vec(), MINUTE));
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"1".to_vec(), Duration::from_millis(30));
        store.set("cartu2", b"2".to_vec(), MINUTE);

        sleep(Duration::from_millis(60));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("cartu2").is_some());
    }

    #[test]
    fn test_ttl_refreshed_on_set() {
        let mut store = MemoryStore::new(100);

        store.set("cartu1", b"1".to_vec(), Duration::from_secs(1));
        store.set("cartu1", b"1".to_vec(), MINUTE);

        assert!(store.ttl_remaining("cartu1").unwrap() > Duration::from_secs(50));
    }
}
