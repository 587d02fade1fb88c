// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort delivery of contact notifications.
//!
//! Delivery failures are logged and swallowed; the status change that
//! triggered a message is never rolled back.

use std::sync::Arc;

use mediagate_core::{MessageSender, SecretCipher};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

pub struct Notifier {
    messenger: Arc<dyn MessageSender>,
    cipher: Arc<dyn SecretCipher>,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessageSender>, cipher: Arc<dyn SecretCipher>) -> Self {
        Self { messenger, cipher }
    }

    /// Send `text` to the encrypted address, if there is one.
    ///
    /// Returns whether the message was handed to the transport.
    pub async fn notify(&self, request_id: i64, address_enc: Option<&str>, text: &str) -> bool {
        let Some(address_enc) = address_enc else {
            debug!(request_id, "no contact address on file, skipping notification");
            return false;
        };
        let address = match self.cipher.decrypt(address_enc) {
            Ok(address) => address,
            Err(e) => {
                warn!(request_id, error = %e, "could not decrypt contact address");
                return false;
            }
        };
        match self
            .messenger
            .send_message(address.expose_secret(), text)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    request_id,
                    transport = self.messenger.name(),
                    error = %e,
                    "notification delivery failed"
                );
                false
            }
        }
    }
}
