// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate policy show|set` command implementations.

use mediagate_core::{ApprovalMode, ApprovalPolicy, MediagateError, PolicyStore};
use mediagate_storage::SqliteStorage;
use mediagate_vault::contact_hash;
use tracing::info;

/// Changes requested by `mediagate policy set`. Contacts are raw addresses.
#[derive(Debug, Clone, Default)]
pub struct PolicyEdit {
    pub mode: Option<ApprovalMode>,
    pub exceptions_enabled: Option<bool>,
    pub add_exceptions: Vec<String>,
    pub remove_exceptions: Vec<String>,
}

impl PolicyEdit {
    fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.exceptions_enabled.is_none()
            && self.add_exceptions.is_empty()
            && self.remove_exceptions.is_empty()
    }

    /// Apply to `policy`, storing contacts by hash only.
    fn apply(&self, mut policy: ApprovalPolicy) -> ApprovalPolicy {
        if let Some(mode) = self.mode {
            policy.mode = mode;
        }
        if let Some(enabled) = self.exceptions_enabled {
            policy.exceptions_enabled = enabled;
        }
        for contact in &self.add_exceptions {
            policy.exception_contacts.insert(contact_hash(contact));
        }
        for contact in &self.remove_exceptions {
            policy.exception_contacts.remove(&contact_hash(contact));
        }
        policy
    }
}

pub async fn run_show(storage: &SqliteStorage) -> Result<(), MediagateError> {
    match storage.get_active().await? {
        Some(policy) => print_policy(&policy, false),
        None => print_policy(&ApprovalPolicy::default(), true),
    }
    Ok(())
}

pub async fn run_set(storage: &SqliteStorage, edit: &PolicyEdit) -> Result<(), MediagateError> {
    if edit.is_empty() {
        return Err(MediagateError::Config(
            "nothing to change; pass --mode, --exceptions, --add-exception or --remove-exception"
                .to_string(),
        ));
    }
    let current = storage.get_active().await?.unwrap_or_default();
    let updated = edit.apply(current);
    storage.save(&updated).await?;
    info!(
        mode = %updated.mode,
        exceptions = updated.exception_contacts.len(),
        "approval policy saved"
    );
    print_policy(&updated, false);
    Ok(())
}

fn print_policy(policy: &ApprovalPolicy, is_default: bool) {
    println!();
    println!("  mediagate approval policy{}", if is_default { " (default)" } else { "" });
    println!("  {}", "-".repeat(35));
    println!("    Mode:        {}", policy.mode);
    println!(
        "    Exceptions:  {} ({} contact{})",
        if policy.exceptions_enabled { "on" } else { "off" },
        policy.exception_contacts.len(),
        if policy.exception_contacts.len() == 1 { "" } else { "s" },
    );
    for hash in &policy.exception_contacts {
        println!("      {}", &hash[..hash.len().min(12)]);
    }
    println!();
}
