//! Short-lived read cache for GET responses.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use crate::backend::ApiError;

/// Upper bound on distinct URLs held at once.
const MAX_ENTRIES: u64 = 1000;

/// GET response cache keyed by full request URL.
///
/// Concurrent lookups for the same key share one in-flight fetch; failed
/// fetches are not stored.
///
/// Entries are stored under the generation current when the fetch started.
/// [`clear`](Self::clear) moves to a new generation, so a fetch still in
/// flight at that point can only land in a generation nobody reads again.
#[derive(Clone)]
pub struct ReadCache {
    cache: Cache<String, Arc<Value>>,
    generation: Arc<AtomicU64>,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its
    /// success.
    pub async fn get_or_fetch<F>(&self, key: String, fetch: F) -> Result<Arc<Value>, ApiError>
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        let key = format!("{}:{key}", self.generation.load(Ordering::Acquire));
        if self.cache.contains_key(&key) {
            debug!(key = %key, "read cache hit");
        }

        self.cache
            .try_get_with(key, async move { fetch.await.map(Arc::new) })
            .await
            .map_err(|e| ApiError::clone(&e))
    }

    /// Drop every cached response.
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let cache = ReadCache::new(Duration::from_secs(10));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch("http://x/products".to_string(), async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!([1, 2]))
                })
                .await
                .unwrap();
            assert_eq!(*value, json!([1, 2]));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = ReadCache::new(Duration::from_secs(10));
        let key = "http://x/carts/me".to_string();

        let err = cache
            .get_or_fetch(key.clone(), async {
                Err(ApiError::Network {
                    path: "/carts/me".to_string(),
                    message: "connection refused".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));

        let value = cache
            .get_or_fetch(key, async { Ok(json!({"items": []})) })
            .await
            .unwrap();
        assert_eq!(*value, json!({"items": []}));
    }

    #[tokio::test]
    async fn test_clear_drops_entries() {
        let cache = ReadCache::new(Duration::from_secs(10));
        cache
            .get_or_fetch("k".to_string(), async { Ok(json!(1)) })
            .await
            .unwrap();
        cache.cache.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 1);

        cache.clear().await;
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_in_flight_during_clear_is_not_served_later() {
        let cache = ReadCache::new(Duration::from_secs(10));
        let (started_tx, started) = tokio::sync::oneshot::channel::<()>();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let slow = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("k".to_string(), async move {
                        started_tx.send(()).ok();
                        wait.await.ok();
                        Ok(json!("before write"))
                    })
                    .await
                    .unwrap()
            })
        };
        started.await.unwrap();

        cache.clear().await;
        release.send(()).unwrap();
        assert_eq!(*slow.await.unwrap(), json!("before write"));

        let value = cache
            .get_or_fetch("k".to_string(), async { Ok(json!("after write")) })
            .await
            .unwrap();
        assert_eq!(*value, json!("after write"));
    }
}
