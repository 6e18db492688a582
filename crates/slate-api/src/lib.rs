// slate-api: Async Rust client for the Slate production-management backend.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{EnvToken, SessionToken, StaticToken, TokenProvider};
pub use client::ApiClient;
pub use endpoints::{filter_params, paths};
pub use error::{Error, FieldErrors};
pub use models::*;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
