use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::error::CoreError;

/// Type-erased cached value. Typed access goes through [`Query`](crate::Query)
/// or [`QueryCache::get_data`](super::QueryCache::get_data).
pub type QueryData = Arc<dyn Any + Send + Sync>;

/// Outcome of one fetch, shared by every caller that joined it.
pub type FetchResult = Result<QueryData, CoreError>;

/// Lifecycle of a cache entry.
///
/// `Idle -> Loading -> Success | Error`, `Success | Error -> Stale` on
/// invalidation, `Stale -> Loading` on the next load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
    Stale,
}

/// Point-in-time view of one entry, as published on its watch channel.
///
/// `data` survives refetches, errors and invalidation: a stale or
/// reloading entry keeps showing what it last had.
#[derive(Clone)]
pub struct EntrySnapshot {
    pub data: Option<QueryData>,
    pub error: Option<CoreError>,
    pub status: QueryStatus,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Monotonic twin of `fetched_at` for age checks (pausable in tests).
    pub(crate) fetched_instant: Option<Instant>,
}

impl EntrySnapshot {
    pub(crate) fn idle() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Idle,
            fetched_at: None,
            fetched_instant: None,
        }
    }

    pub(crate) fn record_success(&mut self, data: QueryData) {
        self.data = Some(data);
        self.error = None;
        self.fetched_at = Some(Utc::now());
        self.fetched_instant = Some(Instant::now());
    }

    /// Age of the data, if any was ever fetched.
    pub fn age(&self) -> Option<std::time::Duration> {
        self.fetched_instant.map(|t| t.elapsed())
    }
}

impl fmt::Debug for EntrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntrySnapshot")
            .field("status", &self.status)
            .field("has_data", &self.data.is_some())
            .field("error", &self.error)
            .field("fetched_at", &self.fetched_at)
            .finish_non_exhaustive()
    }
}

/// Change notifications from a [`QueryCache`](super::QueryCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch result or seeded value was stored.
    Updated(crate::key::ResourceKey),
    /// The entry was marked stale.
    Invalidated(crate::key::ResourceKey),
    /// The entry was removed by garbage collection.
    Evicted(crate::key::ResourceKey),
}
