use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// Field name -> messages, as reported by the backend for rejected input.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Top-level error type for the `slate-api` crate.
///
/// Every backend failure is normalized into one of these variants,
/// regardless of the raw error body shape. The original HTTP status is
/// kept wherever a response was received; requests that never reached
/// the server report no status at all (see [`Error::status_code`]).
///
/// `Clone` so a single failed fetch can be handed to every caller that
/// joined it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never reached the server (offline, DNS, refused, timeout).
    #[error("Cannot connect to the backend: {message}")]
    Network { message: String, timeout: bool },

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (TLS material, proxy, etc.)
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    // ── Authentication ──────────────────────────────────────────────
    /// No session token available; the request was not sent.
    #[error("Not signed in -- no session token available")]
    Unauthenticated,

    /// The backend rejected the credentials (401) or the caller's rights (403).
    #[error("Authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    // ── Client errors ───────────────────────────────────────────────
    /// Input rejected, usually with field-level detail.
    #[error("Validation failed: {message}")]
    Validation {
        status: u16,
        message: String,
        fields: FieldErrors,
    },

    /// Duplicate resource (e.g. an invite for an existing member).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Plan or seat limit reached (HTTP 402).
    #[error("Limit reached: {message}")]
    LimitReached { message: String },

    /// The resource does not exist (or no longer exists).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other 4xx.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Server ──────────────────────────────────────────────────────
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Loose view over the error bodies the backend produces.
///
/// Seen in the wild: `{"message": ".."}`, `{"error": ".."}`,
/// `{"error": {"message": ".."}}`, `{"detail": ".."}`, with field errors
/// under `errors` or `validation_errors` as either a map or a list of
/// `{field, message}` objects.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default, alias = "validation_errors")]
    errors: Option<serde_json::Value>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        if let Some(ref m) = self.message {
            return Some(m.clone());
        }
        match self.error {
            Some(serde_json::Value::String(ref s)) => return Some(s.clone()),
            Some(serde_json::Value::Object(ref obj)) => {
                if let Some(m) = obj.get("message").and_then(|m| m.as_str()) {
                    return Some(m.to_owned());
                }
            }
            _ => {}
        }
        self.detail.clone()
    }

    fn fields(&self) -> FieldErrors {
        self.errors.as_ref().map(parse_field_errors).unwrap_or_default()
    }
}

fn parse_field_errors(value: &serde_json::Value) -> FieldErrors {
    let mut out = FieldErrors::new();
    match value {
        serde_json::Value::Object(map) => {
            for (field, msgs) in map {
                let entry: &mut Vec<String> = out.entry(field.clone()).or_default();
                match msgs {
                    serde_json::Value::String(s) => entry.push(s.clone()),
                    serde_json::Value::Array(items) => {
                        entry.extend(items.iter().filter_map(|m| m.as_str().map(String::from)));
                    }
                    other => entry.push(other.to_string()),
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                let field = item
                    .get("field")
                    .or_else(|| item.get("path"))
                    .and_then(|f| f.as_str())
                    .unwrap_or("_");
                if let Some(msg) = item.get("message").and_then(|m| m.as_str()) {
                    out.entry(field.to_owned()).or_default().push(msg.to_owned());
                }
            }
        }
        _ => {}
    }
    out
}

impl Error {
    /// Normalize a non-2xx response into a typed error.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed.message().unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                body.chars().take(200).collect()
            }
        });

        match status {
            401 | 403 => Self::Auth { status, message },
            402 => Self::LimitReached { message },
            404 | 410 => Self::NotFound { message },
            409 => Self::Conflict { message },
            400 | 422 => Self::Validation {
                status,
                message,
                fields: parsed.fields(),
            },
            500..=599 => Self::Server { status, message },
            _ => Self::Api { status, message },
        }
    }

    /// HTTP status carried by this error.
    ///
    /// `None` is the distinguished "network" status: no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Network { .. }
            | Self::InvalidUrl(_)
            | Self::ClientSetup(_)
            | Self::Deserialization { .. } => None,
            Self::Unauthenticated => Some(401),
            Self::Auth { status, .. }
            | Self::Validation { status, .. }
            | Self::Api { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Conflict { .. } => Some(409),
            Self::LimitReached { .. } => Some(402),
            Self::NotFound { .. } => Some(404),
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Network { message, .. }
            | Self::Auth { message, .. }
            | Self::Validation { message, .. }
            | Self::Conflict { message }
            | Self::LimitReached { message }
            | Self::NotFound { message }
            | Self::Api { message, .. }
            | Self::Server { message, .. }
            | Self::Deserialization { message, .. }
            | Self::ClientSetup(message) => message.clone(),
            Self::InvalidUrl(e) => e.to_string(),
            Self::Unauthenticated => "no session token available".into(),
        }
    }

    /// Field-level messages, if the backend supplied any.
    pub fn validation_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }

    /// Returns `true` if the session is missing or was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Auth { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Server { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            timeout: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_map_is_parsed() {
        let body = r#"{"message":"Invalid input","errors":{"email":["is taken","is invalid"],"name":"required"}}"#;
        let err = Error::from_response(422, body);

        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.message(), "Invalid input");
        let fields = err.validation_errors().unwrap();
        assert_eq!(fields["email"], vec!["is taken", "is invalid"]);
        assert_eq!(fields["name"], vec!["required"]);
    }

    #[test]
    fn validation_list_is_parsed() {
        let body = r#"{"validation_errors":[{"field":"amount_cents","message":"must be positive"}]}"#;
        let err = Error::from_response(400, body);

        let fields = err.validation_errors().unwrap();
        assert_eq!(fields["amount_cents"], vec!["must be positive"]);
        assert_eq!(err.message(), body);
    }

    #[test]
    fn nested_error_message() {
        let err = Error::from_response(409, r#"{"error":{"message":"Invite already exists"}}"#);
        assert!(matches!(err, Error::Conflict { ref message } if message == "Invite already exists"));
    }

    #[test]
    fn status_classes_map_to_variants() {
        assert!(matches!(Error::from_response(401, ""), Error::Auth { status: 401, .. }));
        assert!(matches!(Error::from_response(402, ""), Error::LimitReached { .. }));
        assert!(Error::from_response(404, "").is_not_found());
        assert!(matches!(Error::from_response(503, "down"), Error::Server { status: 503, .. }));
        assert!(matches!(Error::from_response(418, ""), Error::Api { status: 418, .. }));
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = Error::from_response(500, "");
        assert_eq!(err.message(), "HTTP 500");
        assert!(err.is_transient());
    }

    #[test]
    fn network_has_no_status() {
        let err = Error::Network {
            message: "connection refused".into(),
            timeout: false,
        };
        assert_eq!(err.status_code(), None);
        assert!(err.is_transient());
        assert!(!err.is_auth());
    }
}
