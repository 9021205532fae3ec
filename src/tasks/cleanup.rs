//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries so they
//! stop counting against capacity.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that sweeps `cache` every `interval`.
///
/// The write lock is held only for the sweep itself. Abort the returned
/// handle to stop the task.
pub fn spawn_cleanup_task<V>(cache: SharedCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs_f64(), "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut guard = cache.write().await;
                let removed = guard.cleanup_expired();
                (removed, guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "cache sweep removed expired entries");
            } else {
                debug!(remaining, "cache sweep found nothing expired");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::RwLock;

    use crate::cache::{CacheKey, CacheStore, DataCategory};

    fn key(name: &str) -> CacheKey {
        CacheKey::new(DataCategory::Roster, "rosters").param(name)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_entries() {
        let cache: SharedCache<u32> = Arc::new(RwLock::new(CacheStore::new(100)));
        cache
            .write()
            .await
            .put(&key("short"), 1, Duration::from_secs(1))
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        {
            let guard = cache.read().await;
            assert!(guard.is_empty(), "expired entry should have been swept");
            assert_eq!(guard.stats().evictions, 1);
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_valid_entries() {
        let cache: SharedCache<u32> = Arc::new(RwLock::new(CacheStore::new(100)));
        cache
            .write()
            .await
            .put(&key("long"), 7, Duration::from_secs(3600))
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.write().await.get(&key("long")), Some(7));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache: SharedCache<u32> = Arc::new(RwLock::new(CacheStore::new(10)));
        let handle = spawn_cleanup_task(cache, Duration::from_secs(1));

        handle.abort();
        let joined = handle.await;
        assert!(joined.unwrap_err().is_cancelled());
    }
}
