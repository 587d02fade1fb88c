// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process fan-out of [`RequestEvent`]s over `tokio::sync::broadcast`.
//!
//! Share an `Arc<EventBus>`; the request engine publishes through the
//! [`EventPublisher`] port and consumers call [`EventBus::subscribe`].

use mediagate_core::{EventPublisher, RequestEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<RequestEvent>,
}

impl EventBus {
    /// A bus buffering up to `capacity` events per slow subscriber.
    ///
    /// Subscribers that fall further behind observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RequestEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: RequestEvent) {
        // SendError only means there are no receivers.
        let _ = self.sender.send(event);
    }
}

/// Spawn a subscriber that logs every event until `cancel` fires or the bus closes.
pub fn spawn_event_logger(bus: &EventBus, cancel: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(event) => log_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event logger lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}

fn log_event(event: &RequestEvent) {
    match event {
        RequestEvent::NewRequest {
            request_id,
            title,
            contact,
            status,
        } => info!(request_id, %title, %contact, %status, "new request"),
        RequestEvent::StatusUpdate {
            request_id,
            previous_status,
            new_status,
            error,
            ..
        } => info!(
            request_id,
            previous = ?previous_status,
            status = %new_status,
            error = error.as_deref().unwrap_or(""),
            "request status changed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mediagate_core::RequestStatus;

    use super::*;

    fn created(id: i64) -> RequestEvent {
        RequestEvent::NewRequest {
            request_id: id,
            title: "Dune (2021)".into(),
            contact: "+155****67".into(),
            status: RequestStatus::Pending,
        }
    }

    #[tokio::test]
    async fn every_subscriber_receives_events() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(created(1));

        assert_eq!(rx1.recv().await.unwrap().request_id(), 1);
        assert_eq!(rx2.recv().await.unwrap().request_id(), 1);
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(created(2));
    }

    #[tokio::test]
    async fn logger_stops_on_cancel() {
        let bus = EventBus::new(4);
        let cancel = CancellationToken::new();
        let handle = spawn_event_logger(&bus, cancel.clone());
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(RequestEvent::status_update(
            3,
            Some(RequestStatus::Submitted),
            RequestStatus::Approved,
            None,
        ));
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should exit")
            .unwrap();
    }
}
