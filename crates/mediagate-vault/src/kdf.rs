// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id passphrase derivation.

use mediagate_core::MediagateError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Derive a 32-byte wrapping key from `passphrase` (Argon2id, v0x13).
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
) -> Result<Zeroizing<[u8; 32]>, MediagateError> {
    let params = argon2::Params::new(memory_cost, iterations, parallelism, Some(32))
        .map_err(|e| MediagateError::Vault(format!("invalid Argon2id parameters: {e}")))?;
    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| MediagateError::Vault(format!("Argon2id key derivation failed: {e}")))?;
    Ok(output)
}

pub fn generate_salt() -> Result<[u8; 16], MediagateError> {
    let mut salt = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| MediagateError::Vault("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_derive_same_key() {
        let salt = [7u8; 16];
        let a = derive_key(b"hunter2", &salt, 32768, 2, 1).unwrap();
        let b = derive_key(b"hunter2", &salt, 32768, 2, 1).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn salt_changes_key() {
        let a = derive_key(b"hunter2", &[1u8; 16], 32768, 2, 1).unwrap();
        let b = derive_key(b"hunter2", &[2u8; 16], 32768, 2, 1).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn invalid_params_rejected() {
        assert!(derive_key(b"x", &[0u8; 16], 1, 0, 0).is_err());
    }
}
