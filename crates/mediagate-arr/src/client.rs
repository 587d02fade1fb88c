// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared JSON-over-HTTP plumbing for the *arr style APIs.
//!
//! All three backends authenticate with an `X-Api-Key` header and report
//! errors as JSON bodies. Reads that hit a transient status (429, 500, 502,
//! 503) are retried once after a short delay. Writes are sent exactly once.

use std::time::Duration;

use mediagate_core::MediagateError;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Longest response body quoted verbatim in an error message.
const MAX_ERROR_BODY: usize = 200;

/// An authenticated client for one backend instance.
#[derive(Debug, Clone)]
pub struct ArrClient {
    client: reqwest::Client,
    base_url: String,
    service: &'static str,
    max_retries: u32,
    retry_delay: Duration,
}

impl ArrClient {
    /// Build a client for `base_url`. `service` names the backend in errors.
    pub fn new(
        service: &'static str,
        base_url: &str,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, MediagateError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| MediagateError::Config(format!("invalid {service} API key: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MediagateError::Backend {
                message: format!("failed to build {service} HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Override the delay before a retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, MediagateError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            MediagateError::Config(format!(
                "invalid {} base URL `{}`: {e}",
                self.service, self.base_url
            ))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// `GET path?query` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MediagateError> {
        let url = self.url(path, query)?;
        self.execute(|| self.client.get(url.clone()), true).await
    }

    /// `POST path` with a JSON body and decode the JSON response.
    ///
    /// Never retried: a create the backend committed before failing must not
    /// be sent a second time.
    pub async fn post<B: Serialize + Sync + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, MediagateError> {
        let url = self.url(path, &[])?;
        self.execute(|| self.client.post(url.clone()).json(body), false).await
    }

    async fn execute<T, F>(&self, build: F, retry: bool) -> Result<T, MediagateError>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let service = self.service;
        let mut attempt = 0;
        loop {
            let response = build().send().await.map_err(|e| MediagateError::Backend {
                message: format!("could not reach {service}: {e}"),
                source: Some(Box::new(e)),
            })?;

            let status = response.status();
            debug!(service, status = %status, attempt, "backend response received");

            if status.is_success() {
                return response.json::<T>().await.map_err(|e| MediagateError::Backend {
                    message: format!("unexpected response from {service}: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if retry && is_transient_error(status) && attempt < self.max_retries {
                warn!(service, status = %status, "transient error, will retry");
                attempt += 1;
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            return Err(MediagateError::backend(format!(
                "{service} returned {status}: {}",
                error_detail(&body, status)
            )));
        }
    }
}

/// HTTP statuses worth one retry of a read.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

/// Best human-readable detail from an error body.
///
/// Overseerr answers `{"message": ..}`; Radarr and Sonarr answer either that
/// or a list of validation failures carrying `errorMessage`.
fn error_detail(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let message = json
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| json.get(0)?.get("errorMessage")?.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_ERROR_BODY {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
