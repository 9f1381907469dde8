//! Thin request layer shared by every client in this crate.

use std::time::Duration;

use composio_core::Error;
use reqwest::Method;
use serde_json::{Value, json};

/// v3 API: CRUD on toolkits, auth configs, and connected accounts.
pub const V3_BASE_URL: &str = "https://backend.composio.dev/api/v3";
/// v2 API: action listing and action execution. Takes only legacy UUIDs
/// as account identifiers.
pub const V2_BASE_URL: &str = "https://backend.composio.dev/api/v2";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which API generation a path lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiVersion {
    V3,
    V2,
}

/// One authenticated connection pool against both API hosts. Owned by a
/// single client instance and dropped with it.
pub(crate) struct Transport {
    http: reqwest::Client,
    api_key: String,
    v3_base: String,
    v2_base: String,
}

impl Transport {
    pub(crate) fn new(
        api_key: String,
        v3_base: impl Into<String>,
        v2_base: impl Into<String>,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            v3_base: v3_base.into(),
            v2_base: v2_base.into(),
        })
    }

    /// One request, one decoded JSON body. Non-2xx becomes [`Error::Http`]
    /// with the raw response text; 204 and empty bodies decode to `{}`.
    pub(crate) async fn request(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let base = match version {
            ApiVersion::V3 => &self.v3_base,
            ApiVersion::V2 => &self.v2_base,
        };
        let url = format!("{}{path}", base.trim_end_matches('/'));
        tracing::debug!(method = %method, %url, "composio api request");

        let mut request = self
            .http
            .request(method, &url)
            .header("X-API-Key", &self.api_key);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format!("failed to reach {url}: {e}")))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        if status.as_u16() == 204 || bytes.is_empty() {
            return Ok(json!({}));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Transport(format!("invalid JSON in response from {url}: {e}")))
    }
}
