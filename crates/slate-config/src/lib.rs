//! Shared configuration for Slate tools.
//!
//! TOML profiles, token resolution (env var, plaintext, system keyring)
//! and translation to `slate_core::SlateConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use slate_core::{
    CacheConfig, EnvToken, RetryPolicy, SlateConfig, StaticToken, TlsVerification, TokenProvider,
};

const KEYRING_SERVICE: &str = "slate";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://api.slate.film/v1").
    pub api_url: String,

    /// Organization used by org-scoped commands.
    pub organization_id: Option<String>,

    /// Session token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable holding the session token. Read on every request.
    pub token_env: Option<String>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Seconds before cached data counts as stale. Unset: never by age.
    pub stale_time_secs: Option<u64>,

    /// Seconds an unobserved cache entry survives.
    pub gc_time_secs: Option<u64>,

    /// Extra attempts for failed reads (network errors and 5xx only).
    pub retry_attempts: Option<u32>,

    /// Delay between read retries, in milliseconds.
    pub retry_backoff_ms: Option<u64>,
}

impl Profile {
    pub fn organization(&self) -> Result<Option<Uuid>, ConfigError> {
        self.organization_id
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|_| ConfigError::Validation {
                    field: "organization_id".into(),
                    reason: format!("not a UUID: {raw}"),
                })
            })
            .transpose()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("film", "slate", "slate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("slate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path. Env overrides use `SLATE_` with `__` as
/// the nesting separator (`SLATE_PROFILES__PROD__API_URL`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SLATE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

/// Build the token provider for a profile.
///
/// 1. `token_env`: the variable is read on every request, so a rotated
///    token is picked up without restarting.
/// 2. Plaintext `token` in the profile.
/// 3. System keyring entry `slate / {profile}/token`.
pub fn token_provider(
    profile: &Profile,
    profile_name: &str,
) -> Result<Arc<dyn TokenProvider>, ConfigError> {
    if let Some(ref var) = profile.token_env {
        return Ok(Arc::new(EnvToken::new(var.clone())));
    }

    if let Some(ref token) = profile.token {
        return Ok(Arc::new(StaticToken::new(SecretString::from(token.clone()))));
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(Arc::new(StaticToken::new(SecretString::from(secret))));
        }
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a session token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `SlateConfig` from a profile, no CLI overrides.
///
/// Settings the profile leaves unset fall back to `defaults`.
pub fn profile_to_slate_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<SlateConfig, ConfigError> {
    let url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = profile
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

    let cache_defaults = CacheConfig::default();
    let cache = CacheConfig {
        stale_time: profile.stale_time_secs.map(Duration::from_secs),
        gc_time: profile
            .gc_time_secs
            .map_or(cache_defaults.gc_time, Duration::from_secs),
        retry: RetryPolicy {
            max_retries: profile.retry_attempts.unwrap_or(0),
            backoff: Duration::from_millis(profile.retry_backoff_ms.unwrap_or(500)),
        },
        ..cache_defaults
    };

    let mut config = SlateConfig::new(url);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.cache = cache;
    config.organization_id = profile.organization()?;
    Ok(config)
}
