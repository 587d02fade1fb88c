// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle transitions driven by the engine.
//!
//! ```text
//! PENDING ──┬─> SUBMITTED ──> APPROVED
//!           ├─> FAILED ──┬─> SUBMITTED
//!           │            ├─> FAILED
//!           │            └─> REJECTED
//!           └─> REJECTED
//! ```
//!
//! Every mutation is expressed as a [`RequestUpdate`] so the store applies
//! it atomically and bumps `updated_at`.

use chrono::{DateTime, Utc};
use mediagate_core::{MediagateError, RequestStatus, RequestUpdate, ServiceKind};

/// Fails with [`MediagateError::InvalidTransition`] unless `from -> to` is allowed.
pub fn ensure_transition(from: RequestStatus, to: RequestStatus) -> Result<(), MediagateError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(MediagateError::InvalidTransition { from, to })
    }
}

/// Successful submission: clears any previous error.
pub fn submitted(kind: ServiceKind, service_id: i64, now: DateTime<Utc>) -> RequestUpdate {
    RequestUpdate::default()
        .status(RequestStatus::Submitted)
        .submitted_at(now)
        .error_message(None)
        .binding(kind, service_id)
}

/// Failed submission: records the error, leaves `submitted_at` untouched.
pub fn failed(binding: Option<(ServiceKind, i64)>, error: &MediagateError) -> RequestUpdate {
    let update = RequestUpdate::default()
        .status(RequestStatus::Failed)
        .error_message(Some(error.failure_message()));
    match binding {
        Some((kind, id)) => update.binding(kind, id),
        None => update,
    }
}

pub fn rejected(notes: impl Into<String>) -> RequestUpdate {
    RequestUpdate::default()
        .status(RequestStatus::Rejected)
        .admin_notes(Some(notes.into()))
}
