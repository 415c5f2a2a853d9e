//! HTTP gateway to the admin REST API.
//!
//! A single reqwest client carries every outbound call: base URL and timeout
//! come from configuration, the access token (when present) is attached as a
//! bearer header, and any 401 purges the local session before the error
//! reaches the caller.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::session::store::CredentialStore;

mod error;

pub use error::{ApiError, ApiErrorKind};

/// Admin API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: CredentialStore,
}

impl ApiClient {
    /// Creates a new API client from configuration.
    ///
    /// The store is consulted on every request for the current access token,
    /// so tokens written after construction are picked up without rebuilding
    /// the client.
    pub fn new(config: &ApiConfig, store: CredentialStore) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.resolved_base_url(),
            http,
            store,
        })
    }

    /// Sends a GET request to `path`.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        self.execute(self.http.get(self.url(path))).await
    }

    /// Sends a POST request with a JSON body to `path`.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    /// Sends a PUT request with a JSON body to `path`.
    pub async fn put(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    /// Decodes a successful response body as JSON.
    pub async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::parse(format!("Failed to parse response body: {e}")))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attaches the bearer token if one is stored, sends, and intercepts
    /// error statuses.
    ///
    /// On 401 the access token and cached user are purged before the error
    /// propagates; the refresh token is deliberately left in place so a
    /// refresh can still be attempted. Requests without a stored token go
    /// out unauthenticated, which login and the password flows rely on.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let builder = match self.store.access_token() {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::timeout("Request timed out")
            } else {
                ApiError::transport(format!("Network error: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Purge before the caller sees the error. clear_access is
            // idempotent, so racing 401s are safe.
            if let Err(e) = self.store.clear_access() {
                tracing::warn!("failed to purge credentials after 401: {e:#}");
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(401, &body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        Ok(response)
    }
}
