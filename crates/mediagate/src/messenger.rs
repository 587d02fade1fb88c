// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message transports.
//!
//! A deployment either relays notifications to a webhook (typically the
//! conversational front-end's gateway) or, with no webhook configured, only
//! logs them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mediagate_config::model::NotificationsConfig;
use mediagate_core::{AdapterType, HealthStatus, MediagateError, MessageSender, PluginAdapter};
use mediagate_vault::mask_contact;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

/// Pick the transport described by `config`.
pub fn build_messenger(
    config: &NotificationsConfig,
    timeout: Duration,
) -> Result<Arc<dyn MessageSender>, MediagateError> {
    match config.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => {
            let token = config.webhook_token.clone().map(SecretString::from);
            Ok(Arc::new(WebhookMessenger::new(url, token, timeout)?))
        }
        None => {
            info!("no notification webhook configured, messages will only be logged");
            Ok(Arc::new(LogMessenger))
        }
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    to: &'a str,
    text: &'a str,
}

/// POSTs `{"to": .., "text": ..}` to a fixed URL.
pub struct WebhookMessenger {
    client: reqwest::Client,
    url: Url,
    token: Option<SecretString>,
}

impl WebhookMessenger {
    pub fn new(
        url: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, MediagateError> {
        let url = Url::parse(url)
            .map_err(|e| MediagateError::Config(format!("invalid webhook URL `{url}`: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediagateError::Channel {
                message: format!("failed to build webhook HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, url, token })
    }
}

#[async_trait]
impl PluginAdapter for WebhookMessenger {
    fn name(&self) -> &str {
        "webhook"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, MediagateError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MediagateError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSender for WebhookMessenger {
    async fn send_message(&self, address: &str, text: &str) -> Result<(), MediagateError> {
        let mut request = self
            .client
            .post(self.url.clone())
            .json(&WebhookPayload { to: address, text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| MediagateError::Channel {
            message: format!("webhook delivery failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediagateError::channel(format!(
                "webhook returned {status}"
            )));
        }
        debug!(to = %mask_contact(address), "message delivered to webhook");
        Ok(())
    }
}

/// Logs outbound messages without delivering them.
pub struct LogMessenger;

#[async_trait]
impl PluginAdapter for LogMessenger {
    fn name(&self) -> &str {
        "log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, MediagateError> {
        Ok(HealthStatus::Degraded("messages are only logged".to_string()))
    }

    async fn shutdown(&self) -> Result<(), MediagateError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSender for LogMessenger {
    async fn send_message(&self, address: &str, text: &str) -> Result<(), MediagateError> {
        info!(to = %mask_contact(address), chars = text.chars().count(), "outbound message");
        Ok(())
    }
}
