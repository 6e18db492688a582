use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

/// Source of the bearer token attached to every request.
///
/// The session layer (sign-in flow, token refresh) lives outside this
/// crate; the client only asks for the current token right before a
/// request goes out. Returning `None` fails the request with
/// [`Error::Unauthenticated`](crate::Error::Unauthenticated) without
/// touching the network.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A fixed token, e.g. a service key from configuration.
#[derive(Debug, Clone)]
pub struct StaticToken(SecretString);

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request, so a
/// rotated value is picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn bearer_token(&self) -> Option<SecretString> {
        std::env::var(&self.var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    }
}

/// A swappable session token: set on sign-in, replaced on refresh,
/// cleared on sign-out.
#[derive(Debug, Default)]
pub struct SessionToken {
    current: RwLock<Option<SecretString>>,
}

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(token: SecretString) -> Self {
        Self {
            current: RwLock::new(Some(token)),
        }
    }

    pub fn set(&self, token: SecretString) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl TokenProvider for SessionToken {
    fn bearer_token(&self) -> Option<SecretString> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
