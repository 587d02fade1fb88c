// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget publication of lifecycle events.

use crate::events::RequestEvent;

/// Publishes [`RequestEvent`]s. Delivery and subscribers are the implementation's concern.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: RequestEvent);
}
