// ── Query cache ──
//
// Keyed registry of cache slots. Owns request de-duplication (one
// shared future per key), last-request-wins ordering, invalidation
// and garbage collection. Constructed explicitly and shared via `Arc`.

mod entry;
mod slot;

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

pub use entry::{CacheEvent, EntrySnapshot, FetchResult, QueryData, QueryStatus};

use self::slot::{Begin, CacheSlot, Settle, SharedFetch};
use crate::config::{CacheConfig, RetryPolicy};
use crate::error::CoreError;
use crate::key::ResourceKey;

const EVENT_CHANNEL_SIZE: usize = 256;

/// Produces one fetch attempt for a key. Called again for each retry.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

/// Receiver side of mutation invalidation messages.
pub trait InvalidationSink: Send + Sync {
    /// Mark every entry covered by any of `targets` stale. Returns the
    /// number of entries affected.
    fn invalidate_keys(&self, targets: &[ResourceKey]) -> usize;

    /// Prime an entry with a value the caller already holds.
    fn seed(&self, key: ResourceKey, data: QueryData);
}

// ── Subscription ─────────────────────────────────────────────────────

/// Keeps one entry observed (and therefore out of GC) while alive.
pub struct Subscription {
    slot: Arc<CacheSlot>,
}

impl Subscription {
    pub fn key(&self) -> &ResourceKey {
        self.slot.key()
    }

    pub fn snapshot(&self) -> EntrySnapshot {
        self.slot.snapshot()
    }

    /// Watch channel for this entry's snapshots.
    pub fn watch(&self) -> watch::Receiver<EntrySnapshot> {
        self.slot.watch()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.slot.release();
    }
}

// ── QueryCache ───────────────────────────────────────────────────────

pub struct QueryCache {
    entries: DashMap<ResourceKey, Arc<CacheSlot>>,
    config: CacheConfig,
    events: broadcast::Sender<CacheEvent>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            entries: DashMap::new(),
            config,
            events,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cache change notifications.
    pub fn events(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    fn slot(&self, key: &ResourceKey) -> Arc<CacheSlot> {
        if let Some(slot) = self.entries.get(key) {
            return Arc::clone(slot.value());
        }
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(CacheSlot::new(key.clone())));
        Arc::clone(entry.value())
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Observe `key`, creating its entry if needed.
    pub fn subscribe(&self, key: ResourceKey) -> Subscription {
        // Count the subscriber while the shard lock is held so a
        // concurrent GC sweep cannot evict the slot in between.
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(CacheSlot::new(key)));
        entry.observe();
        Subscription {
            slot: Arc::clone(entry.value()),
        }
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscriber_count(&self, key: &ResourceKey) -> usize {
        self.entries
            .get(key)
            .map_or(0, |slot| slot.subscriber_count())
    }

    pub fn snapshot(&self, key: &ResourceKey) -> Option<EntrySnapshot> {
        self.entries.get(key).map(|slot| slot.snapshot())
    }

    /// Status as a reader would see it: `Success` past `stale_time`
    /// reads as `Stale`.
    pub fn status(&self, key: &ResourceKey) -> Option<QueryStatus> {
        self.snapshot(key).map(|snap| self.effective_status(&snap))
    }

    pub(crate) fn effective_status(&self, snap: &EntrySnapshot) -> QueryStatus {
        if snap.status == QueryStatus::Success && !self.is_fresh(snap) {
            QueryStatus::Stale
        } else {
            snap.status
        }
    }

    fn is_fresh(&self, snap: &EntrySnapshot) -> bool {
        match self.config.stale_time {
            None => true,
            Some(stale_time) => snap.age().is_some_and(|age| age < stale_time),
        }
    }

    /// Typed read of the cached value.
    pub fn get_data<T: Any + Send + Sync>(
        &self,
        key: &ResourceKey,
    ) -> Result<Option<Arc<T>>, CoreError> {
        match self.snapshot(key).and_then(|snap| snap.data) {
            None => Ok(None),
            Some(data) => downcast(key, data).map(Some),
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Store `value` under `key` as fresh data.
    pub fn set_data<T: Any + Send + Sync>(&self, key: &ResourceKey, value: T) {
        self.set_raw(key, Arc::new(value));
    }

    pub(crate) fn set_raw(&self, key: &ResourceKey, data: QueryData) {
        let event = self.slot(key).seed(data);
        trace!(%key, "entry seeded");
        let _ = self.events.send(event);
    }

    /// Mark every entry covered by `target` stale.
    ///
    /// Entries are not refetched here: the next `load` of a stale entry
    /// fetches, and observers are woken through their watch channel.
    pub fn invalidate(&self, target: &ResourceKey) -> usize {
        let slots: Vec<Arc<CacheSlot>> = self
            .entries
            .iter()
            .filter(|e| target.covers(e.key()))
            .map(|e| Arc::clone(e.value()))
            .collect();

        let mut touched = 0;
        for slot in slots {
            if slot.invalidate() {
                touched += 1;
                let _ = self.events.send(CacheEvent::Invalidated(slot.key().clone()));
            }
        }
        debug!(%target, touched, "invalidated");
        touched
    }

    /// Invalidate every entry of one resource, whatever its parameters.
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        self.invalidate(&ResourceKey::new(resource))
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Return fresh cached data, join the in-flight fetch, or fetch.
    pub async fn load(&self, key: &ResourceKey, fetcher: &Fetcher) -> FetchResult {
        let slot = self.slot(key);
        self.run(&slot, fetcher, false).await
    }

    /// Always issue a new fetch. Any older in-flight response for the
    /// same key will not overwrite this one.
    pub async fn refetch(&self, key: &ResourceKey, fetcher: &Fetcher) -> FetchResult {
        let slot = self.slot(key);
        self.run(&slot, fetcher, true).await
    }

    pub(crate) async fn run_subscribed(
        &self,
        subscription: &Subscription,
        fetcher: &Fetcher,
        force: bool,
    ) -> FetchResult {
        self.run(&subscription.slot, fetcher, force).await
    }

    async fn run(&self, slot: &Arc<CacheSlot>, fetcher: &Fetcher, force: bool) -> FetchResult {
        let begin = slot.begin(
            force,
            |snap| self.is_fresh(snap),
            |generation| self.spawn_fetch(slot, generation, Arc::clone(fetcher)),
        );

        let (mut generation, mut pending) = match begin {
            Begin::Cached(data) => return Ok(data),
            Begin::Await(generation, pending) => (generation, pending),
        };

        loop {
            let result = pending.await;
            match slot.settle(generation, result) {
                Settle::Done(result) => return result,
                Settle::Follow(next, fut) => {
                    trace!(key = %slot.key(), from = generation, to = next, "following newer fetch");
                    generation = next;
                    pending = fut;
                }
            }
        }
    }

    /// Run the fetch on its own task so the result is stored even when
    /// every caller has gone away.
    fn spawn_fetch(&self, slot: &Arc<CacheSlot>, generation: u64, fetcher: Fetcher) -> SharedFetch {
        let task_slot = Arc::clone(slot);
        let events = self.events.clone();
        let retry = self.config.retry;

        let handle = tokio::spawn(async move {
            let result = fetch_with_retry(&fetcher, retry, task_slot.key()).await;
            if let Some(event) = task_slot.complete(generation, &result) {
                let _ = events.send(event);
            }
            result
        });

        let slot = Arc::clone(slot);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let err = CoreError::FetchAborted {
                        key: slot.key().to_string(),
                        reason: e.to_string(),
                    };
                    let failed = Err(err);
                    slot.complete(generation, &failed);
                    failed
                }
            }
        }
        .boxed()
        .shared()
    }

    // ── Garbage collection ───────────────────────────────────────────

    /// Evict entries unobserved for at least `gc_time`. Returns how many
    /// were removed.
    pub fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let gc_time = self.config.gc_time;
        let mut evicted = Vec::new();

        self.entries.retain(|key, slot| {
            if slot.is_collectable(now, gc_time) {
                evicted.push(key.clone());
                false
            } else {
                true
            }
        });

        for key in &evicted {
            trace!(%key, "evicted");
            let _ = self.events.send(CacheEvent::Evicted(key.clone()));
        }
        evicted.len()
    }
}

impl InvalidationSink for QueryCache {
    fn invalidate_keys(&self, targets: &[ResourceKey]) -> usize {
        targets.iter().map(|t| self.invalidate(t)).sum()
    }

    fn seed(&self, key: ResourceKey, data: QueryData) {
        self.set_raw(&key, data);
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

pub(crate) fn downcast<T: Any + Send + Sync>(
    key: &ResourceKey,
    data: QueryData,
) -> Result<Arc<T>, CoreError> {
    data.downcast::<T>()
        .map_err(|_| CoreError::type_mismatch(key))
}

async fn fetch_with_retry(fetcher: &Fetcher, retry: RetryPolicy, key: &ResourceKey) -> FetchResult {
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Err(e) if e.is_transient() && attempt < retry.max_retries => {
                attempt += 1;
                warn!(%key, attempt, error = %e, "fetch failed, retrying");
                tokio::time::sleep(retry.backoff).await;
            }
            result => return result,
        }
    }
}
