// ── Query handles ──
//
// A `Query<T>` is one consumer's view of one cache entry: it keeps the
// entry observed while alive, knows how to fetch it, and reads typed
// state out of the type-erased snapshot.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::cache::{self, EntrySnapshot, Fetcher, QueryCache, QueryStatus, Subscription};
use crate::error::CoreError;
use crate::key::ResourceKey;

/// Typed view of a cache entry.
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<CoreError>,
    pub status: QueryStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    /// `false` when a required parameter was missing; the query never fetches.
    pub enabled: bool,
}

impl<T> QueryState<T> {
    fn disabled() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Idle,
            fetched_at: None,
            enabled: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_stale(&self) -> bool {
        self.status == QueryStatus::Stale
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            status: self.status,
            fetched_at: self.fetched_at,
            enabled: self.enabled,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("status", &self.status)
            .field("enabled", &self.enabled)
            .field("data", &self.data)
            .field("error", &self.error)
            .field("fetched_at", &self.fetched_at)
            .finish()
    }
}

struct Binding {
    subscription: Subscription,
    receiver: watch::Receiver<EntrySnapshot>,
    fetcher: Fetcher,
}

/// Handle to one query. Dropping it releases the subscription; a fetch
/// already in flight still completes and is stored.
pub struct Query<T> {
    cache: Arc<QueryCache>,
    binding: Option<Binding>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> Query<T> {
    /// An enabled query observing `key`.
    pub(crate) fn new(cache: Arc<QueryCache>, key: ResourceKey, fetcher: Fetcher) -> Self {
        let subscription = cache.subscribe(key);
        let receiver = subscription.watch();
        Self {
            cache,
            binding: Some(Binding {
                subscription,
                receiver,
                fetcher,
            }),
            _marker: PhantomData,
        }
    }

    /// A query that stays idle because a required parameter is missing.
    pub(crate) fn disabled(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            binding: None,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> Option<&ResourceKey> {
        self.binding.as_ref().map(|b| b.subscription.key())
    }

    pub fn is_enabled(&self) -> bool {
        self.binding.is_some()
    }

    /// Current state without fetching.
    pub fn state(&self) -> QueryState<T> {
        let Some(ref binding) = self.binding else {
            return QueryState::disabled();
        };
        let snap = binding.receiver.borrow().clone();
        self.typed(binding.subscription.key(), snap)
    }

    fn typed(&self, key: &ResourceKey, snap: EntrySnapshot) -> QueryState<T> {
        let status = self.cache.effective_status(&snap);
        let (data, error) = match snap.data.map(|d| cache::downcast::<T>(key, d)) {
            None => (None, snap.error),
            Some(Ok(data)) => (Some(data), snap.error),
            Some(Err(mismatch)) => (None, Some(mismatch)),
        };
        QueryState {
            data,
            error,
            status,
            fetched_at: snap.fetched_at,
            enabled: true,
        }
    }

    /// Fetch if missing, failed or stale, then return the resulting state.
    ///
    /// Concurrent loads of the same key share one request. A disabled
    /// query returns its idle state without touching the network.
    pub async fn load(&self) -> QueryState<T> {
        if let Some(ref binding) = self.binding {
            // The outcome is also recorded in the entry; state() reads it.
            let _ = self
                .cache
                .run_subscribed(&binding.subscription, &binding.fetcher, false)
                .await;
        }
        self.state()
    }

    /// Like [`load`](Self::load), but returns the data or the error directly.
    /// `Ok(None)` only for a disabled query.
    pub async fn fetch(&self) -> Result<Option<Arc<T>>, CoreError> {
        self.run(false).await
    }

    /// Issue a new request even if fresh data or a fetch is present.
    pub async fn refetch(&self) -> Result<Option<Arc<T>>, CoreError> {
        self.run(true).await
    }

    async fn run(&self, force: bool) -> Result<Option<Arc<T>>, CoreError> {
        let Some(ref binding) = self.binding else {
            return Ok(None);
        };
        let data = self
            .cache
            .run_subscribed(&binding.subscription, &binding.fetcher, force)
            .await?;
        cache::downcast::<T>(binding.subscription.key(), data).map(Some)
    }

    /// Wait for the entry to change and return the new state.
    ///
    /// Returns `None` for a disabled query (its state never changes).
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        let binding = self.binding.as_mut()?;
        binding.receiver.changed().await.ok()?;
        let snap = binding.receiver.borrow_and_update().clone();
        let key = binding.subscription.key().clone();
        Some(self.typed(&key, snap))
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.binding.as_ref().map(|b| b.subscription.key()))
            .finish_non_exhaustive()
    }
}
