// ── Runtime data-layer configuration ──
//
// Describes where the backend lives and how the cache behaves. Never
// touches disk: `slate-config` (or a test) builds one and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use slate_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Trust an additional CA certificate file.
    CustomCa(PathBuf),
}

/// Retry behaviour for query fetches. Mutations are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure. 0 disables retries.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        max_retries: 0,
        backoff: Duration::ZERO,
    };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Cache tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which successful data counts as stale on the next load.
    /// `None` keeps data fresh until invalidated.
    pub stale_time: Option<Duration>,
    /// How long an entry may sit with zero subscribers before eviction.
    pub gc_time: Duration,
    /// How often the background GC sweeps.
    pub gc_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: None,
            gc_time: Duration::from_secs(300),
            gc_interval: Duration::from_secs(60),
            retry: RetryPolicy::NONE,
        }
    }
}

/// Everything the data layer needs to talk to one backend.
#[derive(Debug, Clone)]
pub struct SlateConfig {
    /// API base URL (e.g. `https://api.slate.film/v1`).
    pub api_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub cache: CacheConfig,
    /// Organization used by org-scoped convenience queries. `None` leaves
    /// those queries disabled until one is supplied.
    pub organization_id: Option<Uuid>,
}

impl SlateConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cache: CacheConfig::default(),
            organization_id: None,
        }
    }

    pub fn with_organization(mut self, org: Uuid) -> Self {
        self.organization_id = Some(org);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(ref path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }
}
