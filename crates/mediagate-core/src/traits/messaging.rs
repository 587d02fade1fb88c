// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound text delivery to a contact address.

use async_trait::async_trait;

use crate::error::MediagateError;
use crate::traits::adapter::PluginAdapter;

/// Delivers a text message to a raw contact address.
///
/// The connection lifecycle of the underlying transport is owned by the
/// implementation; callers treat delivery as best effort.
#[async_trait]
pub trait MessageSender: PluginAdapter {
    async fn send_message(&self, address: &str, text: &str) -> Result<(), MediagateError>;
}
