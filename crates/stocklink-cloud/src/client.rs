//! Authenticated HTTP client for the remote inventory API
//!
//! Wraps `reqwest::Client` with base-URL construction, a bounded request
//! timeout, transparent bearer-token injection, and the reactive renewal
//! policy: a 401 triggers exactly one token re-acquisition and one replay of
//! the original request. A second consecutive 401 is surfaced as a fatal
//! authentication error and never retried again.
//!
//! A 401 whose body signals `UNAUTHORIZED_ENDPOINT` means the endpoint
//! itself is not enabled for these credentials; renewing the token cannot
//! fix that, so it is classified separately and surfaced immediately.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, error, warn};

use stocklink_core::domain::errors::RemoteError;

use crate::auth::TokenManager;

/// Body marker the remote sends on a 401 for a disabled endpoint/module
const UNAUTHORIZED_ENDPOINT_MARKER: &str = "UNAUTHORIZED_ENDPOINT";

/// HTTP client for remote inventory API calls
///
/// Every request goes through [`execute`](ApiClient::execute), which owns
/// the token attachment and the single bounded 401 retry. The endpoint
/// modules in [`crate::inventory`] build on top of it.
pub struct ApiClient {
    /// The underlying HTTP client (carries the bounded timeout)
    http: Client,
    /// Base URL for API requests, without a trailing slash
    base_url: String,
    /// Token manager injected into every request
    tokens: Arc<TokenManager>,
}

impl ApiClient {
    /// Creates a new client for the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. `https://api.example.com/api`)
    /// * `timeout` - Applied to every request; remote calls must not block
    ///   indefinitely
    /// * `tokens` - Shared token manager
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<TokenManager>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Builds a request for `path` carrying the given bearer token.
    fn request(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    /// Sends a request with the current token, replaying once after a 401.
    ///
    /// Returns the successful response, or a classified [`RemoteError`]:
    /// 404 maps to `NotFound`, other non-success statuses to `Api`, and
    /// transport failures to `Network`.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, RemoteError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .request(method.clone(), path, &token, body)
            .send()
            .await
            .map_err(|err| RemoteError::Network(err.to_string()))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return classify(response, path).await;
        }

        let body_text = response.text().await.unwrap_or_default();
        if is_unauthorized_endpoint(&body_text) {
            error!(path, "Endpoint not authorized for these credentials");
            return Err(RemoteError::UnauthorizedEndpoint {
                endpoint: path.to_string(),
            });
        }

        warn!(path, "Received 401, renewing token and replaying request");
        let fresh_token = self.tokens.force_reacquire().await?;
        let retry = self
            .request(method, path, &fresh_token, body)
            .send()
            .await
            .map_err(|err| RemoteError::Network(err.to_string()))?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            let retry_body = retry.text().await.unwrap_or_default();
            if is_unauthorized_endpoint(&retry_body) {
                return Err(RemoteError::UnauthorizedEndpoint {
                    endpoint: path.to_string(),
                });
            }
            error!(path, "Request rejected twice with 401, giving up");
            return Err(RemoteError::AuthFailed(format!(
                "request to {path} rejected twice with 401"
            )));
        }

        debug!(path, "Replay after token renewal succeeded");
        classify(retry, path).await
    }

    /// GET `path` and deserialize the JSON response body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, RemoteError> {
        let response = self.execute(Method::GET, path, None).await?;
        response
            .json()
            .await
            .map_err(|err| RemoteError::InvalidResponse(err.to_string()))
    }

    /// POST `body` to `path` and deserialize the JSON response body.
    pub async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, RemoteError> {
        let response = self.execute(Method::POST, path, Some(body)).await?;
        response
            .json()
            .await
            .map_err(|err| RemoteError::InvalidResponse(err.to_string()))
    }

    /// Returns the base URL requests are built against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Maps a non-401 response to `Ok` or a classified error.
async fn classify(response: Response, path: &str) -> Result<Response, RemoteError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        debug!(path, "Remote reported 404");
        return Err(RemoteError::NotFound(path.to_string()));
    }

    let message = extract_message(&response.text().await.unwrap_or_default());
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Returns true when a 401 body names the unauthorized-endpoint condition.
fn is_unauthorized_endpoint(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m == UNAUTHORIZED_ENDPOINT_MARKER)
        })
        .unwrap_or(false)
}

/// Pulls a human-readable message out of an error response body.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
