// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events emitted by the request engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RequestStatus;

/// Something observers of the request lifecycle may care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    /// A request record was created.
    NewRequest {
        request_id: i64,
        title: String,
        /// Masked contact address; never the raw value.
        contact: String,
        status: RequestStatus,
    },
    /// A request changed status (or failed while trying to).
    StatusUpdate {
        request_id: i64,
        previous_status: Option<RequestStatus>,
        new_status: RequestStatus,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl RequestEvent {
    /// Build a status update stamped with the current time.
    pub fn status_update(
        request_id: i64,
        previous_status: Option<RequestStatus>,
        new_status: RequestStatus,
        error: Option<String>,
    ) -> Self {
        Self::StatusUpdate {
            request_id,
            previous_status,
            new_status,
            error,
            timestamp: Utc::now(),
        }
    }

    /// Id of the request the event refers to.
    pub fn request_id(&self) -> i64 {
        match self {
            Self::NewRequest { request_id, .. } | Self::StatusUpdate { request_id, .. } => {
                *request_id
            }
        }
    }
}
