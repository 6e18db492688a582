// ── Per-key cache slot ──
//
// One slot per ResourceKey. The watch channel carries the public
// snapshot; the mutex guards the bookkeeping that decides which fetch
// results may be applied. Lock order is always mutex first, then the
// watch channel. The mutex is never held across an await.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use super::entry::{CacheEvent, EntrySnapshot, FetchResult, QueryData, QueryStatus};
use crate::key::ResourceKey;

pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// What `begin` decided for a load.
pub(crate) enum Begin {
    /// Fresh data is already present.
    Cached(QueryData),
    /// Await this fetch (joined or newly started).
    Await(u64, SharedFetch),
}

/// What a caller should do once its fetch resolved.
pub(crate) enum Settle {
    Done(FetchResult),
    /// A newer fetch was issued meanwhile; await that one instead.
    Follow(u64, SharedFetch),
}

struct InFlight {
    generation: u64,
    result: SharedFetch,
}

struct SlotInner {
    subscribers: usize,
    /// Set while `subscribers == 0`.
    unobserved_since: Option<Instant>,
    /// Generation of the most recently issued fetch or seed.
    issued: u64,
    /// Generation whose result the snapshot currently reflects.
    applied: u64,
    /// Every generation up to this one was issued before the last
    /// invalidation; its result lands as `Stale`.
    invalidated_through: u64,
    /// The most recently issued fetch, until it completes.
    in_flight: Option<InFlight>,
}

pub(crate) struct CacheSlot {
    key: ResourceKey,
    state: watch::Sender<EntrySnapshot>,
    inner: Mutex<SlotInner>,
}

impl CacheSlot {
    pub(crate) fn new(key: ResourceKey) -> Self {
        let (state, _) = watch::channel(EntrySnapshot::idle());
        Self {
            key,
            state,
            inner: Mutex::new(SlotInner {
                subscribers: 0,
                unobserved_since: Some(Instant::now()),
                issued: 0,
                applied: 0,
                invalidated_through: 0,
                in_flight: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub(crate) fn snapshot(&self) -> EntrySnapshot {
        self.state.borrow().clone()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<EntrySnapshot> {
        self.state.subscribe()
    }

    // ── Subscribers ──────────────────────────────────────────────────

    pub(crate) fn observe(&self) {
        let mut inner = self.lock();
        inner.subscribers += 1;
        inner.unobserved_since = None;
    }

    pub(crate) fn release(&self) {
        let mut inner = self.lock();
        inner.subscribers = inner.subscribers.saturating_sub(1);
        if inner.subscribers == 0 {
            inner.unobserved_since = Some(Instant::now());
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers
    }

    /// Unobserved for at least `gc_time` with nothing in flight.
    pub(crate) fn is_collectable(&self, now: Instant, gc_time: Duration) -> bool {
        let inner = self.lock();
        inner.subscribers == 0
            && inner.in_flight.is_none()
            && inner
                .unobserved_since
                .is_some_and(|since| now.saturating_duration_since(since) >= gc_time)
    }

    // ── Fetch lifecycle ──────────────────────────────────────────────

    /// Join the in-flight fetch, serve fresh data, or start a new fetch.
    ///
    /// A fetch issued before the last invalidation is never joined.
    /// `force` skips both joining and the freshness check. `spawn` is
    /// called with the new generation only when a fetch is started.
    pub(crate) fn begin(
        &self,
        force: bool,
        is_fresh: impl FnOnce(&EntrySnapshot) -> bool,
        spawn: impl FnOnce(u64) -> SharedFetch,
    ) -> Begin {
        let mut inner = self.lock();

        if !force {
            // A fetch issued before the last invalidation may carry data
            // the server has since replaced; only newer fetches are joined.
            if let Some(ref flight) = inner.in_flight {
                if flight.generation > inner.invalidated_through {
                    trace!(key = %self.key, generation = flight.generation, "joining in-flight fetch");
                    return Begin::Await(flight.generation, flight.result.clone());
                }
            }
            let snap = self.state.borrow();
            if let (QueryStatus::Success, Some(data)) = (snap.status, &snap.data) {
                if is_fresh(&snap) {
                    return Begin::Cached(data.clone());
                }
            }
        }

        inner.issued += 1;
        let generation = inner.issued;
        let result = spawn(generation);
        inner.in_flight = Some(InFlight {
            generation,
            result: result.clone(),
        });
        self.state.send_modify(|s| s.status = QueryStatus::Loading);
        trace!(key = %self.key, generation, "fetch started");

        Begin::Await(generation, result)
    }

    /// Apply a finished fetch unless a newer result is already applied.
    pub(crate) fn complete(&self, generation: u64, result: &FetchResult) -> Option<CacheEvent> {
        let mut inner = self.lock();

        if inner
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == generation)
        {
            inner.in_flight = None;
        }

        if generation <= inner.applied {
            trace!(key = %self.key, generation, applied = inner.applied, "discarding superseded response");
            return None;
        }
        inner.applied = generation;

        let newer_pending = inner.in_flight.is_some();
        let invalidated = generation <= inner.invalidated_through;

        self.state.send_modify(|s| {
            match result {
                Ok(data) => {
                    s.record_success(data.clone());
                    s.status = if newer_pending {
                        QueryStatus::Loading
                    } else if invalidated {
                        QueryStatus::Stale
                    } else {
                        QueryStatus::Success
                    };
                }
                Err(e) => {
                    s.error = Some(e.clone());
                    s.status = if newer_pending {
                        QueryStatus::Loading
                    } else {
                        QueryStatus::Error
                    };
                }
            }
        });
        trace!(key = %self.key, generation, ok = result.is_ok(), "fetch applied");

        Some(CacheEvent::Updated(self.key.clone()))
    }

    /// Decide what the caller of fetch `generation` receives.
    ///
    /// Callers always end with the newest applied outcome, so an older
    /// request never hands back data the cache has already replaced.
    pub(crate) fn settle(&self, generation: u64, result: FetchResult) -> Settle {
        let inner = self.lock();

        if let Some(ref flight) = inner.in_flight {
            if flight.generation > generation {
                return Settle::Follow(flight.generation, flight.result.clone());
            }
        }

        if inner.applied > generation {
            let snap = self.state.borrow();
            if let Some(ref e) = snap.error {
                return Settle::Done(Err(e.clone()));
            }
            if let Some(ref data) = snap.data {
                return Settle::Done(Ok(data.clone()));
            }
        }

        Settle::Done(result)
    }

    /// Store a value directly, superseding anything in flight.
    pub(crate) fn seed(&self, data: QueryData) -> CacheEvent {
        let mut inner = self.lock();
        inner.issued += 1;
        inner.applied = inner.issued;
        inner.in_flight = None;

        self.state.send_modify(|s| {
            s.record_success(data);
            s.status = QueryStatus::Success;
        });

        CacheEvent::Updated(self.key.clone())
    }

    /// Mark the entry stale. Returns `true` if anything changed
    /// (settled data went stale, or an in-flight fetch will land stale).
    pub(crate) fn invalidate(&self) -> bool {
        let mut inner = self.lock();
        let pending = inner.in_flight.is_some();
        inner.invalidated_through = inner.issued;

        let went_stale = self.state.send_if_modified(|s| match s.status {
            QueryStatus::Success | QueryStatus::Error => {
                s.status = QueryStatus::Stale;
                true
            }
            _ => false,
        });

        went_stale || pending
    }
}
