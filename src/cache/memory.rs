//! In-process [`KeyValueCache`] backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueCache, MemoryStore};
use crate::error::CacheResult;

/// Thread-safe handle over a [`MemoryStore`].
///
/// Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(max_entries))),
        }
    }

    /// Shared store, handed to the background expiry sweeper.
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        self.store.clone()
    }

    /// Remaining lifetime of `key`, `None` if absent.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.write().await.ttl_remaining(key)
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        // Write lock: reads purge expired entries and update LRU order
        Ok(self.store.write().await.get(key))
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.store.write().await.set(key, value.to_vec(), ttl);
        Ok(())
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
        ttl: Duration,
    ) -> CacheResult<bool> {
        Ok(self
            .store
            .write()
            .await
            .compare_and_set(key, expected, value.to_vec(), ttl))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.write().await.delete(key);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new(10);

        cache
            .set_with_expiry("cartu1", b"{}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("cartu1").await.unwrap(), Some(b"{}".to_vec()));
        assert!(cache.ttl("cartu1").await.is_some());
    }

    #[tokio::test]
    async fn test_memory_cache_delete_missing_key() {
        let cache = MemoryCache::new(10);

        assert!(cache.delete("cartu1").await.is_ok());
        assert!(cache.delete("cartu1").await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let cache = MemoryCache::new(10);
        let other = cache.clone();

        cache
            .set_with_expiry("cartu1", b"x", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(other.get("cartu1").await.unwrap(), Some(b"x".to_vec()));
        assert!(other.is_connected().await);
    }
}
