//! Expiry sweep for the in-process cache
//!
//! Reads already ignore expired entries; the sweep only reclaims memory
//! for carts nobody asks for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    store: Arc<RwLock<MemoryStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = store.write().await;
                let removed = guard.cleanup_expired();
                (removed, guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "Expiry sweep purged carts");
            } else {
                debug!(remaining, "Expiry sweep found nothing to purge");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let store = Arc::new(RwLock::new(MemoryStore::new(100)));
        store
            .write()
            .await
            .set("cart:gone", b"{}".to_vec(), Duration::from_millis(200));

        let handle = spawn_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.read().await.len(), 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_entries() {
        let store = Arc::new(RwLock::new(MemoryStore::new(100)));
        store
            .write()
            .await
            .set("cart:u1", b"{}".to_vec(), Duration::from_secs(3600));

        let handle = spawn_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            store.write().await.get("cart:u1"),
            Some(b"{}".to_vec())
        );
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_can_be_aborted() {
        let store = Arc::new(RwLock::new(MemoryStore::new(100)));
        let handle = spawn_cleanup_task(store, 1);

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
