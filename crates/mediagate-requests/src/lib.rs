// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle and availability reconciliation engine.
//!
//! - [`RequestProcessor`] turns a media selection into a request: it applies
//!   the approval policy, submits approved requests to a backend and handles
//!   administrator approve/reject.
//! - [`AvailabilityMonitor`] polls backends for SUBMITTED requests and
//!   notifies contacts about newly available seasons and episodes.
//!
//! Both are written against the port traits in `mediagate-core`; wire them
//! up through [`EnginePorts`].

use std::sync::Arc;

use mediagate_core::{
    BackendConnector, EventPublisher, MessageSender, PolicyStore, RequestStore, SecretCipher,
    ServiceStore,
};

pub mod approval;
pub mod availability;
pub mod dispatch;
pub mod lifecycle;
pub mod messages;
pub mod monitor;
pub mod notify;
pub mod processor;
pub mod reconcile;

pub use approval::ApprovalAction;
pub use monitor::{AvailabilityMonitor, CycleReport};
pub use processor::RequestProcessor;

/// The collaborators the engine needs.
#[derive(Clone)]
pub struct EnginePorts {
    pub requests: Arc<dyn RequestStore>,
    pub services: Arc<dyn ServiceStore>,
    pub policies: Arc<dyn PolicyStore>,
    pub cipher: Arc<dyn SecretCipher>,
    pub connector: Arc<dyn BackendConnector>,
    pub messenger: Arc<dyn MessageSender>,
    pub events: Arc<dyn EventPublisher>,
}
