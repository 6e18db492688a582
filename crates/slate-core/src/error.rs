// ── Core error types ──
//
// Backend failures pass through unchanged as `CoreError::Api`; the
// variants added here describe conditions of the data layer itself.
// `Clone` because one fetch result is delivered to every joined caller.

use thiserror::Error;

use crate::key::ResourceKey;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Backend ──────────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] slate_api::Error),

    // ── Mutations ────────────────────────────────────────────────────
    /// The same mutation handle was invoked again before the first call settled.
    #[error("A mutation is already in progress")]
    MutationPending,

    /// The command processor is not running (never started, or shut down).
    #[error("Data layer is not running")]
    Disconnected,

    // ── Cache ────────────────────────────────────────────────────────
    /// A cache entry holds a value of a different type than the reader expected.
    #[error("Cached value for {key} has an unexpected type")]
    TypeMismatch { key: String },

    /// The task performing a fetch ended without producing a result.
    #[error("Fetch for {key} aborted: {reason}")]
    FetchAborted { key: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn type_mismatch(key: &ResourceKey) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
        }
    }

    /// The backend error, if this is one.
    pub fn api_error(&self) -> Option<&slate_api::Error> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(slate_api::Error::is_not_found)
    }

    /// Worth retrying: network failures and 5xx responses.
    pub fn is_transient(&self) -> bool {
        self.api_error().is_some_and(slate_api::Error::is_transient)
    }
}
