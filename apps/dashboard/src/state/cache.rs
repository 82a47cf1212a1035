//! # Query Cache
//!
//! Keyed cache of read results with in-flight deduplication and
//! scope-based invalidation.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    QueryCache::fetch(key, fetcher)                      │
//! │                                                                         │
//! │  lock ─► entry for key                                                  │
//! │            │                                                            │
//! │            ├── fresh data?      ──► return cached Arc<T>                │
//! │            │                                                            │
//! │            ├── request in flight? ─► clone Shared future ─┐             │
//! │            │                                              │             │
//! │            └── otherwise ─► start fetcher, store Shared ──┤             │
//! │                             (remember generation)         │             │
//! │  unlock ◄─────────────────────────────────────────────────┘             │
//! │     │                                                                   │
//! │     ▼  await (no lock held)                                             │
//! │  lock ─► same request id AND same generation? ─► store result           │
//! │          otherwise (invalidated meanwhile)    ─► drop result            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invalidation
//! `invalidate("products")` bumps the generation of every entry whose key
//! scope is `products`, drops its data and forgets its in-flight request.
//! The next read of any such key goes to the network again.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::ApiError;

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, ApiError>>>;

// =============================================================================
// Query Key
// =============================================================================

/// Identity of one read.
///
/// `scope` is the entity the read depends on (`products`, `categories`);
/// `params` is a canonical rendering of the operation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub scope: String,
    pub params: String,
}

impl QueryKey {
    pub fn new(scope: impl Into<String>, params: impl Into<String>) -> Self {
        QueryKey {
            scope: scope.into(),
            params: params.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.params)
    }
}

// =============================================================================
// Query State
// =============================================================================

/// What a view knows about one read.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    /// Nothing requested (e.g. a detail view without an id).
    pub fn idle() -> Self {
        QueryState {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
        }
    }

    pub fn success(data: Arc<T>) -> Self {
        QueryState {
            data: Some(data),
            ..Self::idle()
        }
    }

    pub fn failure(error: ApiError) -> Self {
        QueryState {
            is_error: true,
            error: Some(error),
            ..Self::idle()
        }
    }

    pub fn from_result(result: Result<Arc<T>, ApiError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.is_loading && !self.is_error && self.data.is_none()
    }

    /// The data, or the error that prevented it.
    pub fn into_result(self) -> Result<Option<Arc<T>>, ApiError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        QueryState {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_error: self.is_error,
            error: self.error.clone(),
        }
    }
}

// =============================================================================
// Cache
// =============================================================================

struct Cached {
    value: AnyValue,
    fetched_at: Instant,
}

struct InFlight {
    id: u64,
    generation: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    data: Option<Cached>,
    error: Option<ApiError>,
    in_flight: Option<InFlight>,
    generation: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    next_request: u64,
}

/// Shared read cache, owned by the application root and cloned into every
/// component that reads or writes.
///
/// The mutex is only held for bookkeeping, never across an `.await`.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
    stale_after: Option<Duration>,
}

impl QueryCache {
    /// Entries stay fresh until invalidated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries older than `stale_after` are refetched on the next read.
    pub fn with_stale_after(stale_after: Option<Duration>) -> Self {
        QueryCache {
            inner: Arc::default(),
            stale_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Entries are consistent between statements; poisoning is ignored.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_fresh(&self, cached: &Cached) -> bool {
        match self.stale_after {
            Some(max_age) => cached.fetched_at.elapsed() < max_age,
            None => true,
        }
    }

    /// Returns the cached value for `key`, joining an in-flight request or
    /// starting `fetcher` when there is neither.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (request_id, generation, future) = {
            let mut inner = self.lock();
            inner.next_request += 1;
            let next_request = inner.next_request;
            let entry = inner.entries.entry(key.clone()).or_default();

            if let Some(cached) = entry.data.as_ref().filter(|c| self.is_fresh(c)) {
                debug!(%key, "Query cache hit");
                return downcast(&key, cached.value.clone());
            }

            match &entry.in_flight {
                Some(in_flight) => {
                    debug!(%key, "Joining in-flight query");
                    (in_flight.id, in_flight.generation, in_flight.future.clone())
                }
                None => {
                    debug!(%key, "Query cache miss");
                    let future = fetcher()
                        .map(|result| result.map(|value| Arc::new(value) as AnyValue))
                        .boxed()
                        .shared();
                    entry.in_flight = Some(InFlight {
                        id: next_request,
                        generation: entry.generation,
                        future: future.clone(),
                    });
                    (next_request, entry.generation, future)
                }
            }
        };

        let result = future.await;
        self.complete(&key, request_id, generation, &result);
        downcast(&key, result?)
    }

    /// Records the outcome of request `request_id` unless the key was
    /// invalidated (or refetched) while it ran.
    fn complete(
        &self,
        key: &QueryKey,
        request_id: u64,
        generation: u64,
        result: &Result<AnyValue, ApiError>,
    ) {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };

        match &entry.in_flight {
            Some(in_flight) if in_flight.id == request_id => entry.in_flight = None,
            // Another waiter on the same request already recorded it.
            _ => return,
        }

        if entry.generation != generation {
            debug!(%key, "Dropping result of invalidated query");
            return;
        }

        match result {
            Ok(value) => {
                entry.data = Some(Cached {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
                entry.error = None;
            }
            Err(error) => entry.error = Some(error.clone()),
        }
    }

    /// Current state of `key` without fetching.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        let inner = self.lock();
        let Some(entry) = inner.entries.get(key) else {
            return QueryState::idle();
        };

        let data = entry
            .data
            .as_ref()
            .and_then(|cached| cached.value.clone().downcast::<T>().ok());

        QueryState {
            data,
            is_loading: entry.in_flight.is_some(),
            is_error: entry.error.is_some(),
            error: entry.error.clone(),
        }
    }

    /// Drops every entry in `scope`; in-flight reads for them will not be
    /// cached. Returns how many keys were invalidated.
    pub fn invalidate(&self, scope: &str) -> usize {
        let mut inner = self.lock();
        let mut count = 0;
        for (_, entry) in inner.entries.iter_mut().filter(|(k, _)| k.scope == scope) {
            entry.generation += 1;
            entry.data = None;
            entry.error = None;
            entry.in_flight = None;
            count += 1;
        }
        info!(scope, keys = count, "Invalidated queries");
        count
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("stale_after", &self.stale_after)
            .finish_non_exhaustive()
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: AnyValue) -> Result<Arc<T>, ApiError> {
    value
        .downcast::<T>()
        .map_err(|_| ApiError::internal(format!("Query {} cached a different type", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    async fn counted(calls: Arc<AtomicUsize>, value: u32) -> Result<u32, ApiError> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = counter();
        let key = QueryKey::new("products", "list:{}");

        let first = cache.fetch(key.clone(), || counted(calls.clone(), 1)).await.unwrap();
        let second = cache.fetch(key.clone(), || counted(calls.clone(), 2)).await.unwrap();

        assert_eq!(*first, 1);
        assert_eq!(*second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_request() {
        let cache = QueryCache::new();
        let calls = counter();
        let key = QueryKey::new("categories", "list");

        let (a, b, c) = tokio::join!(
            cache.fetch(key.clone(), || counted(calls.clone(), 7)),
            cache.fetch(key.clone(), || counted(calls.clone(), 8)),
            cache.fetch(key.clone(), || counted(calls.clone(), 9)),
        );

        assert_eq!((*a.unwrap(), *b.unwrap(), *c.unwrap()), (7, 7, 7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_keys_are_independent() {
        let cache = QueryCache::new();
        let calls = counter();

        let a = cache
            .fetch(QueryKey::new("products", "detail:1"), || counted(calls.clone(), 1))
            .await
            .unwrap();
        let b = cache
            .fetch(QueryKey::new("products", "detail:2"), || counted(calls.clone(), 2))
            .await
            .unwrap();

        assert_eq!((*a, *b), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_scope_forces_refetch() {
        let cache = QueryCache::new();
        let calls = counter();
        let products = QueryKey::new("products", "list:{}");
        let categories = QueryKey::new("categories", "list");

        cache.fetch(products.clone(), || counted(calls.clone(), 1)).await.unwrap();
        cache.fetch(categories.clone(), || counted(calls.clone(), 1)).await.unwrap();

        assert_eq!(cache.invalidate("products"), 1);
        assert!(cache.peek::<u32>(&products).data.is_none());
        assert!(cache.peek::<u32>(&categories).data.is_some());

        let refetched = cache.fetch(products, || counted(calls.clone(), 2)).await.unwrap();
        assert_eq!(*refetched, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_result_invalidated_in_flight_is_not_cached() {
        let cache = QueryCache::new();
        let calls = counter();
        let key = QueryKey::new("products", "list:{}");

        let pending = {
            let cache = cache.clone();
            let key = key.clone();
            let calls = calls.clone();
            tokio::spawn(async move { cache.fetch(key, || counted(calls, 1)).await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.peek::<u32>(&key).is_loading);

        cache.invalidate("products");
        // The caller still gets its answer...
        assert_eq!(*pending.await.unwrap().unwrap(), 1);
        // ...but it never reached the cache.
        assert!(cache.peek::<u32>(&key).is_idle());
    }

    #[tokio::test]
    async fn test_errors_are_recorded_and_retried() {
        let cache = QueryCache::new();
        let key = QueryKey::new("categories", "list");

        let err = cache
            .fetch::<u32, _, _>(key.clone(), || async {
                Err(ApiError::new(ErrorCode::StoreError, "Failed to fetch categories"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Failed to fetch categories");

        let state = cache.peek::<u32>(&key);
        assert!(state.is_error);
        assert!(!state.is_loading);

        let ok = cache.fetch(key.clone(), || async { Ok(3u32) }).await.unwrap();
        assert_eq!(*ok, 3);
        assert!(!cache.peek::<u32>(&key).is_error);
    }

    #[tokio::test]
    async fn test_stale_entries_are_refetched() {
        let cache = QueryCache::with_stale_after(Some(Duration::from_millis(200)));
        let calls = counter();
        let key = QueryKey::new("categories", "list");

        cache.fetch(key.clone(), || counted(calls.clone(), 1)).await.unwrap();
        cache.fetch(key.clone(), || counted(calls.clone(), 1)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        let refetched = cache.fetch(key, || counted(calls.clone(), 2)).await.unwrap();
        assert_eq!(*refetched, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_type_mismatch_is_internal_error() {
        let cache = QueryCache::new();
        let key = QueryKey::new("products", "detail:1");

        cache.fetch(key.clone(), || async { Ok(1u32) }).await.unwrap();
        let err = cache
            .fetch::<String, _, _>(key, || async { Ok(String::new()) })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
