// HTTP client for the Slate backend REST API.
//
// Wraps `reqwest::Client` with base-URL joining, bearer authentication
// and error normalization. Typed reads (invoices, team, ...) are
// inherent methods defined in `crate::endpoints`; writes all go through
// `send_json`.

use std::sync::Arc;

use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the backend REST API.
///
/// Stateless apart from the connection pool: no retries, no caching.
/// Those belong to the layer above.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, token source, and transport config.
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http, tokens)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment (`https://host/api/v1/`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL / auth helpers ───────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.tokens.bearer_token().ok_or(Error::Unauthenticated)?;
        let url = self.url(path)?;
        debug!("{method} {url}");
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    // ── Requests ─────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.request(Method::GET, path)?.send().await?;
        Self::handle_response(resp).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, Error> {
        trace!(?params, "query parameters");
        let resp = self
            .request(Method::GET, path)?
            .query(params)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Untyped request: any method, optional JSON body, JSON (or `null`) back.
    ///
    /// Every write from the mutation layer goes through here.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        let mut builder = self.request(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Deserialize a 2xx body, or normalize anything else into a typed error.
    ///
    /// Empty bodies (204, bare 200) deserialize as JSON `null`, which
    /// covers `()`, `Option<T>` and `serde_json::Value`.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err = Error::from_response(status.as_u16(), &body);
            debug!(status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        let text = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };

        serde_json::from_str(text).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
