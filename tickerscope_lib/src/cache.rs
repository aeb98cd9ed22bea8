//! Process-wide memo cache backed by `DashMap` for concurrent access.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

/// Memoizes the result of an async fetch per key for the lifetime of the
/// cache.
///
/// Each key owns a `OnceCell`, so concurrent callers asking for the same
/// key wait on a single in-flight fetch instead of issuing their own.
/// Entries are never invalidated: historical prices for a closed range are
/// treated as immutable.
pub struct FetchCache<K, V> {
    store: DashMap<K, Arc<OnceCell<V>>>,
}

impl<K, V> Default for FetchCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            store: DashMap::new(),
        }
    }
}

impl<K, V> FetchCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, running `fetch` only if no value
    /// exists and no other caller is already fetching it.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let cell = self
            .store
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();
        if cell.initialized() {
            tracing::debug!("cache hit for {:?}", key);
        }
        cell.get_or_init(fetch).await.clone()
    }

    /// Returns the cached value for `key` if a fetch has completed.
    pub fn get(&self, key: &K) -> Option<V> {
        let cell = self.store.get(key)?.clone();
        cell.get().cloned()
    }

    /// Number of keys seen, including ones still being fetched.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
