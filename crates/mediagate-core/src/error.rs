// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the mediagate request broker.

use thiserror::Error;

use crate::types::RequestStatus;

/// Fallback text stored on a failed request when the error carries no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The primary error type used across all mediagate ports and core operations.
#[derive(Debug, Error)]
pub enum MediagateError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Encryption, decryption, or key management failures.
    #[error("vault error: {0}")]
    Vault(String),

    /// Outbound message transport errors.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Downstream Overseerr/Radarr/Sonarr failures (HTTP, network, bad payloads).
    ///
    /// Displays the bare message: it is shown to administrators verbatim.
    #[error("{message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request cannot be honoured as submitted (missing external id, no server).
    #[error("{0}")]
    Policy(String),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The lifecycle does not allow moving between these states.
    #[error("cannot move request from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MediagateError {
    /// Shorthand for a backend error without an underlying source.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// The text persisted as a request's `error_message` after a failed submission.
    pub fn failure_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}
