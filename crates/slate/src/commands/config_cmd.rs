//! Config subcommand handlers.

use dialoguer::{Input, Password, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

const SETTABLE_KEYS: &str = "api_url, organization_id, token, token_env, ca_cert, timeout, \
                             stale_time_secs, gc_time_secs, retry_attempts, retry_backoff_ms";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let profiles = cfg
        .profiles
        .iter()
        .map(|(name, profile)| {
            let mut profile = profile.clone();
            if profile.token.is_some() {
                profile.token = Some(REDACTED.into());
            }
            (name.clone(), profile)
        })
        .collect();

    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles,
    }
}

/// TOML-ish text view for `config show` in table mode.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "api_url = \"{}\"", p.api_url);
        if let Some(ref org) = p.organization_id {
            let _ = writeln!(out, "organization_id = \"{org}\"");
        }
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        let numbers = [
            ("timeout", p.timeout),
            ("stale_time_secs", p.stale_time_secs),
            ("gc_time_secs", p.gc_time_secs),
            ("retry_attempts", p.retry_attempts.map(u64::from)),
            ("retry_backoff_ms", p.retry_backoff_ms),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
    }

    out.trim_end().to_owned()
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("'{value}' is not a non-negative whole number"),
    })
}

fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Session token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Store the token in the keyring, or hand it back for plaintext config.
fn store_token(profile_name: &str, token: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the token?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        slate_config::store_token(profile_name, &token)?;
        eprintln!("   ✓ Token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("Slate CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default("https://api.slate.film/v1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let organization_id: String = Input::new()
                .with_prompt("Organization ID (blank to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                api_url,
                organization_id: Some(organization_id).filter(|s| !s.trim().is_empty()),
                ..Profile::default()
            };
            profile.organization()?;
            profile.token = store_token(&profile_name, prompt_token()?)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Test it: slate projects list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.replace('-', "_").as_str() {
                "api_url" => {
                    url::Url::parse(&value).map_err(|e| CliError::Validation {
                        field: "api_url".into(),
                        reason: e.to_string(),
                    })?;
                    profile.api_url = value;
                }
                "organization_id" => {
                    value
                        .parse::<uuid::Uuid>()
                        .map_err(|_| CliError::Validation {
                            field: "organization_id".into(),
                            reason: format!("not a UUID: {value}"),
                        })?;
                    profile.organization_id = Some(value);
                }
                "token" => profile.token = Some(value),
                "token_env" => profile.token_env = Some(value),
                "ca_cert" => profile.ca_cert = Some(value.into()),
                "timeout" => profile.timeout = Some(parse_number(&key, &value)?),
                "stale_time_secs" => profile.stale_time_secs = Some(parse_number(&key, &value)?),
                "gc_time_secs" => profile.gc_time_secs = Some(parse_number(&key, &value)?),
                "retry_attempts" => profile.retry_attempts = Some(parse_number(&key, &value)?),
                "retry_backoff_ms" => {
                    profile.retry_backoff_ms = Some(parse_number(&key, &value)?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
                    });
                }
            }

            save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: slate config init");
                return Ok(());
            }
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            let listing = names
                .into_iter()
                .map(|name| {
                    let marker = if name == default { " *" } else { "" };
                    format!("{name}{marker}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&listing, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }

        // ── Set-token ───────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            let token = prompt_token()?;
            slate_config::store_token(&profile_name, &token)?;

            // A plaintext token would shadow the keyring.
            if cfg
                .profiles
                .get_mut(&profile_name)
                .and_then(|p| p.token.take())
                .is_some()
            {
                save_config(&cfg)?;
            }

            output::success(
                global,
                &format!("Token for profile '{profile_name}' stored in system keyring"),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                api_url: "https://api.slate.film/v1".into(),
                token: Some("secret-token".into()),
                token_env: Some("SLATE_PROD_TOKEN".into()),
                ..Profile::default()
            },
        );

        let shown = format_config(&redacted(&cfg));
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("token = \"****\""));
        assert!(shown.contains("token_env = \"SLATE_PROD_TOKEN\""));
    }
}
