//! CLI configuration: thin wrapper around `slate_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --org, --timeout).

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use slate_core::{SlateConfig, StaticToken, TokenProvider};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use slate_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the data-layer config and token source for this invocation.
///
/// Flag (or its env var) > profile > built-in default. Without a
/// profile, `--api-url` and `--token` alone are enough.
pub fn resolve(global: &GlobalOpts) -> Result<(SlateConfig, Arc<dyn TokenProvider>), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.api_url.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    // 1. Backend URL and cache settings
    let mut profile = profile;
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    let mut config = slate_config::profile_to_slate_config(&profile, &cfg.defaults)?;

    // 2. Flag overrides
    if let Some(org) = global.org {
        config.organization_id = Some(org);
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    // Single invocation: no background GC.
    config.cache.gc_interval = Duration::ZERO;

    // 3. Token (flag > profile chain)
    let tokens: Arc<dyn TokenProvider> = match global.token {
        Some(ref token) => Arc::new(StaticToken::new(SecretString::from(token.clone()))),
        None => slate_config::token_provider(&profile, &profile_name)?,
    };

    Ok((config, tokens))
}
