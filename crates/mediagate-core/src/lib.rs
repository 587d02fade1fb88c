// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the mediagate request broker.
//!
//! This crate provides the error type, the domain model, and the port traits
//! (messaging, encryption, repositories, backend capabilities, events) that
//! the request engine is written against. Adapter crates implement the ports.

pub mod backend;
pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MediagateError;
pub use events::RequestEvent;
pub use types::{
    AdapterType, ApprovalMode, ApprovalPolicy, Availability, EpisodeMap, HealthStatus,
    MediaRequest, MediaSelection, MediaType, NewMediaRequest, NewServiceBinding, ProcessOutcome,
    RequestStatus, RequestUpdate, SeasonSet, ServiceBinding, ServiceKind,
};

pub use traits::{
    BackendConnector, EventPublisher, MessageSender, OverseerrApi, PluginAdapter, PolicyStore,
    RadarrApi, RequestStore, SecretCipher, ServiceStore, SonarrApi, StorageAdapter,
};
