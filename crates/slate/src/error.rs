//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use slate_config::ConfigError;
use slate_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Slate API")]
    #[diagnostic(
        code(slate::connection_failed),
        help(
            "Check the API URL and your network connection.\n\
             Current URL comes from --api-url, SLATE_API_URL or the profile's api_url."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(slate::timeout),
        help("Increase the timeout with --timeout or the profile's timeout setting.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(slate::auth_failed),
        help(
            "Your session token is missing, expired or lacks access.\n\
             Run: slate config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(slate::no_credentials),
        help(
            "Configure one with: slate config init\n\
             Or set the SLATE_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Not found: {message}")]
    #[diagnostic(
        code(slate::not_found),
        help("It may have been deleted already. List the resource to see what exists.")
    )]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(slate::conflict))]
    Conflict { message: String },

    #[error("Plan limit reached: {message}")]
    #[diagnostic(
        code(slate::limit_reached),
        help("Your organization's plan does not allow this. Upgrade it or free up capacity.")
    )]
    LimitReached { message: String },

    #[error("No organization selected")]
    #[diagnostic(
        code(slate::no_organization),
        help(
            "Pass --org <ID>, set SLATE_ORG, or run:\n\
             slate config set organization_id <ID>"
        )
    )]
    NoOrganization,

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(slate::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(slate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(slate::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: slate config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(slate::no_config),
        help(
            "Create one with: slate config init\n\
             Expected at: {path}\n\
             Or pass --api-url and --token."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(slate::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(slate::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::LimitReached { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NoOrganization => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        use slate_core::ApiError;

        let api = match err {
            CoreError::Api(api) => api,
            CoreError::Config { message } => {
                return CliError::Validation {
                    field: "config".into(),
                    reason: message,
                };
            }
            other => {
                return CliError::ApiError {
                    code: "internal".into(),
                    message: other.to_string(),
                };
            }
        };

        match api {
            ApiError::Network { timeout: true, .. } => CliError::Timeout,
            ApiError::Network { message, .. } => CliError::ConnectionFailed { reason: message },
            ApiError::Unauthenticated | ApiError::Auth { .. } => CliError::AuthFailed {
                profile: "current".into(),
                message: api.message(),
            },
            ApiError::Validation {
                ref message,
                ref fields,
                ..
            } => {
                if fields.is_empty() {
                    CliError::Validation {
                        field: "input".into(),
                        reason: message.clone(),
                    }
                } else {
                    CliError::Validation {
                        field: fields.keys().cloned().collect::<Vec<_>>().join(", "),
                        reason: fields
                            .values()
                            .flatten()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join("; "),
                    }
                }
            }
            ApiError::NotFound { message } => CliError::NotFound { message },
            ApiError::Conflict { message } => CliError::Conflict { message },
            ApiError::LimitReached { message } => CliError::LimitReached { message },
            other => CliError::ApiError {
                code: other
                    .status_code()
                    .map_or_else(|| "client".into(), |s| s.to_string()),
                message: other.message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_core::ApiError;

    #[test]
    fn backend_errors_map_to_exit_codes() {
        let cases = [
            (ApiError::from_response(401, ""), exit_code::AUTH),
            (ApiError::from_response(404, ""), exit_code::NOT_FOUND),
            (ApiError::from_response(409, ""), exit_code::CONFLICT),
            (ApiError::from_response(402, ""), exit_code::PERMISSION),
            (ApiError::from_response(422, ""), exit_code::USAGE),
            (ApiError::from_response(503, ""), exit_code::GENERAL),
        ];
        for (api, code) in cases {
            let status = api.status_code();
            assert_eq!(CliError::from(CoreError::Api(api)).exit_code(), code, "{status:?}");
        }
    }

    #[test]
    fn field_errors_name_the_fields() {
        let api = ApiError::from_response(
            422,
            r#"{"message":"invalid","errors":{"amount_cents":["must be positive"]}}"#,
        );
        let err = CliError::from(CoreError::Api(api));
        assert!(
            matches!(err, CliError::Validation { ref field, ref reason }
                if field == "amount_cents" && reason == "must be positive")
        );
    }
}
