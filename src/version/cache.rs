//! In-memory lookup caches for registry results
//!
//! Both the latest-version cache (keyed by image reference) and the bearer-token
//! cache (keyed by repository) are instances of [`LookupCache`]. Entries expire a
//! fixed time after they were written and the oldest/least-used entries are
//! evicted once the size bound is reached. Nothing is persisted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

/// Cached latest version per image reference; `None` records "no release tag found".
/// Failed fetches are not cached, see [`LookupCache::try_get_or_fetch`].
pub type VersionCache = LookupCache<Option<String>>;

/// Cached bearer token per repository; `None` records "auth endpoint issued no token".
pub type TokenCache = LookupCache<Option<String>>;

/// TTL- and size-bounded cache with single-flight population.
///
/// Concurrent lookups of the same missing key run the fetch future once; the
/// other callers wait for and share its result. Lookups of different keys never
/// wait on each other.
#[derive(Clone)]
pub struct LookupCache<V> {
    name: &'static str,
    inner: Cache<String, V>,
}

impl<V> LookupCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ttl: Duration, max_size: u64) -> Self {
        debug!(
            "Creating {} cache (ttl={:?}, max_size={})",
            name, ttl, max_size
        );

        let inner = Cache::builder()
            .name(name)
            .time_to_live(ttl)
            .max_capacity(max_size)
            .build();

        Self { name, inner }
    }

    /// Returns the cached value for `key`, running `fetch` on a miss.
    ///
    /// The fetched value is cached whatever it is, so negative outcomes are
    /// remembered for the same TTL as positive ones.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> V
    where
        F: Future<Output = V>,
    {
        let name = self.name;
        self.inner
            .get_with(key.to_string(), async move {
                debug!("{} cache miss: {}", name, key);
                fetch.await
            })
            .await
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch), but only an `Ok` value is
    /// cached. An error is handed to every caller waiting on the same fetch and
    /// the next lookup of the key fetches again.
    pub async fn try_get_or_fetch<F, E>(&self, key: &str, fetch: F) -> Result<V, Arc<E>>
    where
        F: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        let name = self.name;
        self.inner
            .try_get_with(key.to_string(), async move {
                debug!("{} cache miss: {}", name, key);
                fetch.await
            })
            .await
    }

    /// Returns the cached value without populating on a miss.
    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).await
    }

    /// Number of live entries, after pending evictions have been applied.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
