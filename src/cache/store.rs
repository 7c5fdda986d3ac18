//! Local Store Engine
//!
//! HashMap storage behind a single mutex with lazy TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use crate::cache::{Cache, CacheEntry, CacheStats, Context};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Map and counters, always mutated together under the lock.
#[derive(Debug)]
struct StoreState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

// == Local Cache ==
/// In-memory [`Cache`] implementation with lazy expiry.
///
/// Every operation takes the one lock, does a single lookup, insert or
/// remove plus a clock comparison, and releases it. Expired entries stay
/// resident until the next access on the key, a call to
/// [`purge_expired`](LocalCache::purge_expired), or a sweep by the cleanup task.
///
/// `get` returns a clone of the stored value. Store an `Arc<T>` to hand out
/// the same allocation to every reader.
#[derive(Debug)]
pub struct LocalCache<V> {
    state: Mutex<StoreState<V>>,
}

impl<V> LocalCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty cache with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::with_capacity(capacity),
                stats: CacheStats::new(),
            }),
        }
    }

    /// Creates an empty cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the map.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - state.entries.len();

        state.stats.record_expired(removed);
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones not yet dropped.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

impl<V> Default for LocalCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Cache<V> for LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, _ctx: &Context, key: &str) -> Result<V> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let now = Instant::now();

        match state.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                state.stats.record_hit();
                Ok(value)
            }
            Some(_) => {
                state.entries.remove(key);
                state.stats.record_expired(1);
                state.stats.record_miss();
                trace!(key, "dropped expired entry on get");
                Err(CacheError::KeyNotFound)
            }
            None => {
                state.stats.record_miss();
                Err(CacheError::KeyNotFound)
            }
        }
    }

    async fn set(&self, _ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(value, ttl);

        let mut state = self.state.lock().await;
        if let Some(previous) = state.entries.insert(key.to_string(), entry) {
            if previous.is_expired() {
                state.stats.record_expired(1);
            }
        }
        Ok(())
    }

    async fn del(&self, _ctx: &Context, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.entries.remove(key) {
            if entry.is_expired() {
                state.stats.record_expired(1);
            }
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::sleep;

    fn ctx() -> Context {
        Context::background()
    }

    #[tokio::test]
    async fn test_store_new() {
        let store: LocalCache<String> = LocalCache::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "value1".to_string(), Duration::from_secs(60)).await.unwrap();
        let value = store.get(&ctx(), "key1").await.unwrap();

        assert_eq!(value, "value1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store: LocalCache<String> = LocalCache::new();

        let result = store.get(&ctx(), "nonexistent").await;
        assert!(matches!(result, Err(CacheError::KeyNotFound)));
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "value1", Duration::from_secs(60)).await.unwrap();
        store.set(&ctx(), "key1", "value2", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get(&ctx(), "key1").await.unwrap(), "value2");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_drops_expired_entry() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", 1u32, Duration::from_millis(10)).await.unwrap();
        sleep(Duration::from_millis(30)).await;

        assert_eq!(store.len().await, 1, "expired entry stays resident until touched");
        assert!(matches!(store.get(&ctx(), "key1").await, Err(CacheError::KeyNotFound)));
        assert_eq!(store.len().await, 0);
        assert_eq!(store.stats().await.expired, 1);
    }

    #[tokio::test]
    async fn test_get_does_not_refresh_ttl() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", 1u32, Duration::from_millis(100)).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        store.get(&ctx(), "key1").await.unwrap();

        // Past the original expiry, but well inside a window restarted by the get
        sleep(Duration::from_millis(60)).await;

        assert!(matches!(store.get(&ctx(), "key1").await, Err(CacheError::KeyNotFound)));
    }

    #[tokio::test]
    async fn test_set_revives_expired_key() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "old", Duration::ZERO).await.unwrap();
        store.set(&ctx(), "key1", "new", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get(&ctx(), "key1").await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_arc_values_keep_identity() {
        let store = LocalCache::new();
        let value = Arc::new(vec![1u8, 2, 3]);

        store.set(&ctx(), "blob", Arc::clone(&value), Duration::from_secs(60)).await.unwrap();
        let fetched = store.get(&ctx(), "blob").await.unwrap();

        assert!(Arc::ptr_eq(&value, &fetched));
    }

    #[tokio::test]
    async fn test_store_stats() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "value1", Duration::from_secs(60)).await.unwrap();
        store.get(&ctx(), "key1").await.unwrap(); // hit
        let _ = store.get(&ctx(), "nonexistent").await; // miss

        let stats = store.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_del_expired_counts_as_expired() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "value1", Duration::ZERO).await.unwrap();
        store.del(&ctx(), "key1").await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_set_over_expired_counts_as_expired() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "old", Duration::ZERO).await.unwrap();
        store.set(&ctx(), "key1", "new", Duration::from_secs(60)).await.unwrap();
        store.set(&ctx(), "key1", "newer", Duration::from_secs(60)).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(stats.expired, 1, "only the expired entry counts, not the live overwrite");
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_store_purge_expired() {
        let store = LocalCache::new();

        store.set(&ctx(), "key1", "value1", Duration::from_millis(10)).await.unwrap();
        store.set(&ctx(), "key2", "value2", Duration::from_secs(60)).await.unwrap();

        sleep(Duration::from_millis(30)).await;

        let removed = store.purge_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&ctx(), "key2").await.unwrap(), "value2");
    }

    #[tokio::test]
    async fn test_cancelled_context_still_completes() {
        let store = LocalCache::new();
        let cancelled = Context::background();
        cancelled.cancel();

        store.set(&cancelled, "key1", "value1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get(&cancelled, "key1").await.unwrap(), "value1");
        store.del(&cancelled, "key1").await.unwrap();
        assert!(store.get(&cancelled, "key1").await.is_err());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            initial_capacity: 64,
            ..Config::default()
        };
        let store: LocalCache<String> = LocalCache::from_config(&config);
        let state = store.state.try_lock().unwrap();
        assert!(state.entries.capacity() >= 64);
    }
}
