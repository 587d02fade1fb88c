// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption of values kept at rest (API keys, contact addresses).

use secrecy::SecretString;

use crate::error::MediagateError;

/// Symmetric encryption of short strings.
pub trait SecretCipher: Send + Sync {
    /// Encrypt `plaintext` into a self-describing text token.
    fn encrypt(&self, plaintext: &str) -> Result<String, MediagateError>;

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, ciphertext: &str) -> Result<SecretString, MediagateError>;
}
