// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cipher and event publisher stand-ins.

use std::sync::Mutex;

use mediagate_core::{EventPublisher, MediagateError, RequestEvent, SecretCipher};
use secrecy::SecretString;

const PLAIN_PREFIX: &str = "plain:";

/// Marks values as "encrypted" by prefixing them. Never use outside tests.
#[derive(Debug, Default)]
pub struct PlainCipher;

impl SecretCipher for PlainCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, MediagateError> {
        Ok(format!("{PLAIN_PREFIX}{plaintext}"))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<SecretString, MediagateError> {
        ciphertext
            .strip_prefix(PLAIN_PREFIX)
            .map(|plain| SecretString::from(plain.to_string()))
            .ok_or_else(|| MediagateError::Vault("not a plain-cipher token".to_string()))
    }
}

/// Keeps every published event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<RequestEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<RequestEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Only the status updates, in publish order.
    pub fn status_updates(&self) -> Vec<RequestEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, RequestEvent::StatusUpdate { .. }))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: RequestEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
