// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port traits the request engine is written against.
//!
//! Adapters with a lifecycle extend [`PluginAdapter`]; async ports use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod backend;
pub mod cipher;
pub mod events;
pub mod messaging;
pub mod storage;

pub use adapter::PluginAdapter;
pub use backend::{BackendConnector, OverseerrApi, RadarrApi, SonarrApi};
pub use cipher::SecretCipher;
pub use events::EventPublisher;
pub use messaging::MessageSender;
pub use storage::{PolicyStore, RequestStore, ServiceStore, StorageAdapter};
