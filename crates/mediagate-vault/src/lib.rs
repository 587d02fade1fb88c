// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption at rest for backend API keys and contact addresses.
//!
//! Values are sealed with AES-256-GCM under a random master key; the master
//! key is wrapped by an Argon2id-derived passphrase key. Contact addresses
//! are additionally hashed for lookups and masked for display.

pub mod contact;
pub mod crypto;
pub mod kdf;
pub mod prompt;
pub mod vault;

pub use contact::{contact_hash, mask_contact};
pub use prompt::{VAULT_KEY_ENV_VAR, get_vault_passphrase};
pub use vault::Vault;
