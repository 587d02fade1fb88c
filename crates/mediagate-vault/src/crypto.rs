// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open and the `nonce:ciphertext` text encoding.
//!
//! Every [`seal`] draws a fresh random 96-bit nonce from the system CSPRNG.

use mediagate_core::MediagateError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, MediagateError> {
    UnboundKey::new(&AES_256_GCM, key)
        .map(LessSafeKey::new)
        .map_err(|_| MediagateError::Vault("failed to create AES-256-GCM key".to_string()))
}

/// Encrypt with a random nonce. Returns `(ciphertext_with_tag, nonce)`.
pub fn seal(
    key: &[u8; 32],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), MediagateError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| MediagateError::Vault("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| MediagateError::Vault("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt output of [`seal`]. Fails on a wrong key or tampered data.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, MediagateError> {
    let key = aead_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| {
            MediagateError::Vault("decryption failed: wrong key or corrupted data".to_string())
        })?;
    Ok(plaintext.to_vec())
}

/// Seal `plaintext` and encode it as `hex(nonce):hex(ciphertext)`.
pub fn seal_to_token(key: &[u8; 32], plaintext: &str) -> Result<String, MediagateError> {
    let (ciphertext, nonce) = seal(key, plaintext.as_bytes())?;
    Ok(format!("{}:{}", hex::encode(nonce), hex::encode(ciphertext)))
}

/// Decode and open a token produced by [`seal_to_token`].
pub fn open_token(key: &[u8; 32], token: &str) -> Result<String, MediagateError> {
    let (nonce_hex, cipher_hex) = token
        .split_once(':')
        .ok_or_else(|| MediagateError::Vault("malformed ciphertext token".to_string()))?;
    let nonce: [u8; NONCE_LEN] = hex::decode(nonce_hex)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| MediagateError::Vault("malformed nonce in ciphertext token".to_string()))?;
    let ciphertext = hex::decode(cipher_hex)
        .map_err(|e| MediagateError::Vault(format!("malformed ciphertext token: {e}")))?;

    let plaintext = open(key, &nonce, &ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|e| MediagateError::Vault(format!("decrypted value is not valid UTF-8: {e}")))
}

/// A random 32-byte AES-256 key.
pub fn generate_random_key() -> Result<[u8; 32], MediagateError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| MediagateError::Vault("failed to generate random key".to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_nonce_and_ciphertext_parts() {
        let key = generate_random_key().unwrap();
        let token = seal_to_token(&key, "radarr-api-key").unwrap();
        let (nonce, cipher) = token.split_once(':').unwrap();
        assert_eq!(nonce.len(), NONCE_LEN * 2);
        // 14 bytes of plaintext plus the 16-byte tag
        assert_eq!(cipher.len(), (14 + 16) * 2);
        assert_eq!(open_token(&key, &token).unwrap(), "radarr-api-key");
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = generate_random_key().unwrap();
        let a = seal_to_token(&key, "+15551234567").unwrap();
        let b = seal_to_token(&key, "+15551234567").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let token = seal_to_token(&generate_random_key().unwrap(), "secret").unwrap();
        assert!(open_token(&generate_random_key().unwrap(), &token).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = generate_random_key().unwrap();
        let (mut ciphertext, nonce) = seal(&key, b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&key, &nonce, &ciphertext).is_err());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let key = generate_random_key().unwrap();
        assert!(open_token(&key, "no-separator").is_err());
        assert!(open_token(&key, "abcd:00").is_err());
        assert!(open_token(&key, "zz:zz").is_err());
    }
}
