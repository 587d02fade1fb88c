// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: create, unlock, re-wrap, and encrypt values at rest.
//!
//! A random master key encrypts every stored secret. The master key itself is
//! sealed with an Argon2id key derived from the operator's passphrase and kept
//! in `vault_meta`; changing the passphrase only re-wraps the master key.

use mediagate_config::model::VaultConfig;
use mediagate_core::{MediagateError, SecretCipher};
use rusqlite::params;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf;

/// The unlocked vault. Holds the master key in memory only.
pub struct Vault {
    master_key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

/// Raw rows of `vault_meta`.
struct VaultMeta {
    wrapped_master_key: Vec<u8>,
    nonce: Vec<u8>,
    salt: Vec<u8>,
    kdf_params: Vec<u8>,
}

impl Vault {
    /// Whether a wrapped master key has been stored.
    pub async fn exists(conn: &tokio_rusqlite::Connection) -> Result<bool, MediagateError> {
        conn.call(|conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM vault_meta WHERE key = 'wrapped_master_key'",
                [],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
    }

    /// Unlock the vault if one exists, otherwise create it.
    pub async fn open_or_create(
        conn: &tokio_rusqlite::Connection,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, MediagateError> {
        if Self::exists(conn).await? {
            Self::unlock(conn, passphrase).await
        } else {
            Self::create(conn, passphrase, config).await
        }
    }

    /// Create a vault with a fresh master key wrapped by `passphrase`.
    pub async fn create(
        conn: &tokio_rusqlite::Connection,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, MediagateError> {
        let master_key = Zeroizing::new(crypto::generate_random_key()?);
        store_wrapped_key(conn, &master_key, passphrase, config).await?;
        info!("vault created");
        Ok(Self { master_key })
    }

    /// Derive the wrapping key from `passphrase` and unwrap the stored master key.
    ///
    /// The KDF parameters recorded at wrap time are used, not the current config.
    pub async fn unlock(
        conn: &tokio_rusqlite::Connection,
        passphrase: &SecretString,
    ) -> Result<Self, MediagateError> {
        let meta = conn
            .call(|conn| -> Result<VaultMeta, rusqlite::Error> {
                let read = |key: &str| -> Result<Vec<u8>, rusqlite::Error> {
                    conn.query_row(
                        "SELECT value FROM vault_meta WHERE key = ?1",
                        params![key],
                        |row| row.get(0),
                    )
                };
                Ok(VaultMeta {
                    wrapped_master_key: read("wrapped_master_key")?,
                    nonce: read("master_key_nonce")?,
                    salt: read("kdf_salt")?,
                    kdf_params: read("kdf_params")?,
                })
            })
            .await
            .map_err(map_tr_err)?;

        let kdf_params: serde_json::Value = serde_json::from_slice(&meta.kdf_params)
            .map_err(|e| MediagateError::Vault(format!("corrupted KDF params: {e}")))?;
        let param = |name: &str| -> Result<u32, MediagateError> {
            kdf_params[name]
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| MediagateError::Vault(format!("missing {name} in KDF params")))
        };

        let salt: [u8; 16] = meta
            .salt
            .try_into()
            .map_err(|_| MediagateError::Vault("corrupted salt (expected 16 bytes)".to_string()))?;
        let nonce: [u8; 12] = meta
            .nonce
            .try_into()
            .map_err(|_| MediagateError::Vault("corrupted nonce (expected 12 bytes)".to_string()))?;

        let wrapping_key = kdf::derive_key(
            passphrase.expose_secret().as_bytes(),
            &salt,
            param("memory_cost")?,
            param("iterations")?,
            param("parallelism")?,
        )?;

        let unwrapped = Zeroizing::new(
            crypto::open(&wrapping_key, &nonce, &meta.wrapped_master_key).map_err(|_| {
                MediagateError::Vault("invalid passphrase or corrupted vault".to_string())
            })?,
        );
        let master_key: [u8; 32] = unwrapped.as_slice().try_into().map_err(|_| {
            MediagateError::Vault("corrupted master key (expected 32 bytes)".to_string())
        })?;

        debug!("vault unlocked");
        Ok(Self {
            master_key: Zeroizing::new(master_key),
        })
    }

    /// Re-wrap the master key under a new passphrase. Stored values stay valid.
    pub async fn change_passphrase(
        &self,
        conn: &tokio_rusqlite::Connection,
        new_passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<(), MediagateError> {
        store_wrapped_key(conn, &self.master_key, new_passphrase, config).await?;
        info!("vault passphrase changed");
        Ok(())
    }
}

impl SecretCipher for Vault {
    fn encrypt(&self, plaintext: &str) -> Result<String, MediagateError> {
        crypto::seal_to_token(&self.master_key, plaintext)
    }

    fn decrypt(&self, ciphertext: &str) -> Result<SecretString, MediagateError> {
        crypto::open_token(&self.master_key, ciphertext).map(SecretString::from)
    }
}

/// Seal `master_key` under `passphrase` and replace the `vault_meta` rows.
async fn store_wrapped_key(
    conn: &tokio_rusqlite::Connection,
    master_key: &[u8; 32],
    passphrase: &SecretString,
    config: &VaultConfig,
) -> Result<(), MediagateError> {
    let salt = kdf::generate_salt()?;
    let wrapping_key = kdf::derive_key(
        passphrase.expose_secret().as_bytes(),
        &salt,
        config.kdf_memory_cost,
        config.kdf_iterations,
        config.kdf_parallelism,
    )?;
    let (wrapped, nonce) = crypto::seal(&wrapping_key, master_key)?;

    let kdf_params = serde_json::json!({
        "memory_cost": config.kdf_memory_cost,
        "iterations": config.kdf_iterations,
        "parallelism": config.kdf_parallelism,
    })
    .to_string()
    .into_bytes();
    let rows: Vec<(&'static str, Vec<u8>)> = vec![
        ("wrapped_master_key", wrapped),
        ("master_key_nonce", nonce.to_vec()),
        ("kdf_salt", salt.to_vec()),
        ("kdf_params", kdf_params),
    ];

    conn.call(move |conn| -> Result<(), rusqlite::Error> {
        let tx = conn.transaction()?;
        for (key, value) in &rows {
            tx.execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()
    })
    .await
    .map_err(map_tr_err)
}

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MediagateError {
    MediagateError::Vault(format!("vault database error: {e}"))
}
