// Config loading and profile translation against temporary files.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use uuid::Uuid;

use slate_config::{
    Config, ConfigError, Defaults, Profile, load_config_from, profile_to_slate_config,
    save_config_to, token_provider,
};
use slate_core::TlsVerification;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

fn profile(api_url: &str) -> Profile {
    Profile {
        api_url: api_url.into(),
        ..Profile::default()
    }
}

#[test]
fn test_load_profiles_from_file() {
    let org = Uuid::new_v4();
    let (_dir, path) = write_config(&format!(
        r#"
default_profile = "studio"

[defaults]
output = "json"

[profiles.studio]
api_url = "https://api.slate.film/v1"
organization_id = "{org}"
token_env = "SLATE_STUDIO_TOKEN"
stale_time_secs = 30
retry_attempts = 2
"#
    ));

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("studio"));
    assert_eq!(cfg.defaults.output, "json");
    assert_eq!(cfg.defaults.timeout, 30);

    let studio = &cfg.profiles["studio"];
    assert_eq!(studio.api_url, "https://api.slate.film/v1");
    assert_eq!(studio.organization().unwrap(), Some(org));
    assert_eq!(studio.token_env.as_deref(), Some("SLATE_STUDIO_TOKEN"));
    assert_eq!(studio.retry_attempts, Some(2));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert!(cfg.profiles.is_empty());
}

#[test]
fn test_save_then_load_keeps_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            token: Some("tok".into()),
            timeout: Some(10),
            ..profile("https://api.slate.film")
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let p = &loaded.profiles["default"];
    assert_eq!(p.api_url, "https://api.slate.film");
    assert_eq!(p.token.as_deref(), Some("tok"));
    assert_eq!(p.timeout, Some(10));
}

#[test]
fn test_profile_translates_cache_settings() {
    let org = Uuid::new_v4();
    let p = Profile {
        organization_id: Some(org.to_string()),
        ca_cert: Some("/etc/slate/ca.pem".into()),
        timeout: Some(5),
        stale_time_secs: Some(30),
        gc_time_secs: Some(60),
        retry_attempts: Some(3),
        retry_backoff_ms: Some(250),
        ..profile("https://api.slate.film/v1")
    };

    let config = profile_to_slate_config(&p, &Defaults::default()).unwrap();
    assert_eq!(config.api_url.as_str(), "https://api.slate.film/v1");
    assert_eq!(config.organization_id, Some(org));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.tls,
        TlsVerification::CustomCa("/etc/slate/ca.pem".into())
    );
    assert_eq!(config.cache.stale_time, Some(Duration::from_secs(30)));
    assert_eq!(config.cache.gc_time, Duration::from_secs(60));
    assert_eq!(config.cache.retry.max_retries, 3);
    assert_eq!(config.cache.retry.backoff, Duration::from_millis(250));
}

#[test]
fn test_profile_defaults_disable_retries_and_age_staleness() {
    let config =
        profile_to_slate_config(&profile("https://api.slate.film"), &Defaults::default()).unwrap();
    assert_eq!(config.cache.stale_time, None);
    assert_eq!(config.cache.retry.max_retries, 0);
    assert_eq!(config.organization_id, None);
    assert_eq!(config.tls, TlsVerification::SystemDefaults);
}

#[test]
fn test_profile_without_timeout_uses_config_default() {
    let (_dir, path) = write_config(
        r#"
[defaults]
timeout = 90

[profiles.default]
api_url = "https://api.slate.film/v1"

[profiles.fast]
api_url = "https://api.slate.film/v1"
timeout = 5
"#,
    );
    let cfg = load_config_from(&path).unwrap();

    let config = profile_to_slate_config(&cfg.profiles["default"], &cfg.defaults).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(90));

    let config = profile_to_slate_config(&cfg.profiles["fast"], &cfg.defaults).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_invalid_url_is_rejected() {
    let err =
        profile_to_slate_config(&profile("not a url"), &Defaults::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
}

#[test]
fn test_invalid_organization_is_rejected() {
    let p = Profile {
        organization_id: Some("studio-one".into()),
        ..profile("https://api.slate.film")
    };
    let err = profile_to_slate_config(&p, &Defaults::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "organization_id"));
}

#[test]
fn test_plaintext_token() {
    let p = Profile {
        token: Some("plain-token".into()),
        ..profile("https://api.slate.film")
    };
    let provider = token_provider(&p, "default").unwrap();
    assert_eq!(
        provider.bearer_token().unwrap().expose_secret(),
        "plain-token"
    );
}

#[test]
fn test_token_env_wins_over_plaintext() {
    let p = Profile {
        token: Some("plain-token".into()),
        token_env: Some("SLATE_CONFIG_TEST_SURELY_UNSET".into()),
        ..profile("https://api.slate.film")
    };
    // The variable is unset, so the env provider reports no token
    // instead of falling back to the plaintext one.
    let provider = token_provider(&p, "default").unwrap();
    assert!(provider.bearer_token().is_none());
}
