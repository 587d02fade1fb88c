// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact address hashing and masking.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the trimmed address. Used for lookups and
/// exception matching; the raw address is never stored in clear.
pub fn contact_hash(address: &str) -> String {
    hex::encode(Sha256::digest(address.trim().as_bytes()))
}

/// Masked form safe for logs and events: `+155****67`.
///
/// Values of six characters or fewer are fully masked.
pub fn mask_contact(address: &str) -> String {
    let chars: Vec<char> = address.trim().chars().collect();
    if chars.len() <= 6 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 2..].iter().collect();
    format!("{prefix}****{suffix}")
}
