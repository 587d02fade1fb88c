// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval decision engine.
//!
//! Maps the active policy mode and the contact's exception membership to
//! the action taken on a fresh selection. Exceptions receive the opposite
//! of the default treatment; under `auto_deny` that means approval.

use mediagate_core::{ApprovalMode, ApprovalPolicy};

/// What happens to a new selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    /// Submit to a backend right away.
    AutoApprove,
    /// Persist as pending and wait for an administrator.
    Hold,
    /// Persist as rejected without contacting any backend.
    AutoReject,
}

/// The effective-action table.
pub fn effective_action(mode: ApprovalMode, is_exception: bool) -> ApprovalAction {
    match (mode, is_exception) {
        (ApprovalMode::AutoApprove, false) => ApprovalAction::AutoApprove,
        (ApprovalMode::AutoApprove, true) => ApprovalAction::Hold,
        (ApprovalMode::Manual, false) => ApprovalAction::Hold,
        (ApprovalMode::Manual, true) => ApprovalAction::AutoApprove,
        (ApprovalMode::AutoDeny, false) => ApprovalAction::AutoReject,
        (ApprovalMode::AutoDeny, true) => ApprovalAction::AutoApprove,
    }
}

/// Decide for `contact_hash` under `policy`.
///
/// A missing policy record behaves like the default policy: auto-approve
/// with exceptions disabled.
pub fn decide(policy: Option<&ApprovalPolicy>, contact_hash: &str) -> ApprovalAction {
    match policy {
        Some(policy) => effective_action(policy.mode, policy.is_exception(contact_hash)),
        None => ApprovalAction::AutoApprove,
    }
}
