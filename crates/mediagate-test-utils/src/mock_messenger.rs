// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message transport capturing everything sent through it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mediagate_core::{AdapterType, HealthStatus, MediagateError, MessageSender, PluginAdapter};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub address: String,
    pub text: String,
}

/// A [`MessageSender`] that records messages instead of delivering them.
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: AtomicBool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every send fails with a channel error and records nothing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Just the texts, in send order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMessenger {
    fn name(&self) -> &str {
        "mock-messenger"
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
impl MessageSender for MockMessenger {
    async fn send_message(&self, address: &str, text: &str) -> Result<(), MediagateError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediagateError::channel("mock transport is down"));
        }
        self.sent.lock().await.push(SentMessage {
            address: address.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_and_fails_on_demand() {
        let messenger = MockMessenger::new();
        messenger.send_message("+15550001", "hello").await.unwrap();
        assert_eq!(messenger.sent_texts().await, vec!["hello".to_string()]);

        messenger.set_failing(true);
        assert!(messenger.send_message("+15550001", "lost").await.is_err());
        assert_eq!(messenger.sent_count().await, 1);

        messenger.clear_sent().await;
        assert_eq!(messenger.sent_count().await, 0);
    }
}
