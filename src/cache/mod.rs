//! Cache Module
//!
//! The key-value backends carts are stored in. Both backends expose the same
//! [`KeyValueCache`] contract: byte values, per-write TTL, idempotent delete.

mod entry;
mod lru;
mod memory;
mod redis_impl;
mod store;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use redis_impl::RedisCache;
pub use store::MemoryStore;

/// Operations the cart store needs from a TTL key-value backend.
///
/// Implementations are long-lived handles shared across all requests.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Returns the value under `key`, `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Stores `value` only if the current value equals `expected`
    /// (`None` = key must be absent). Returns whether the write happened.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
        ttl: Duration,
    ) -> CacheResult<bool>;

    /// Removes `key`. Succeeds when the key does not exist.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Connectivity probe used for startup and health diagnostics.
    async fn is_connected(&self) -> bool;
}
