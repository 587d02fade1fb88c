// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition from `MEDIAGATE_VAULT_KEY` or a TTY prompt.

use mediagate_core::MediagateError;
use secrecy::SecretString;

/// Environment variable holding the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "MEDIAGATE_VAULT_KEY";

/// Read the passphrase from the environment, else prompt on an interactive terminal.
pub fn get_vault_passphrase() -> Result<SecretString, MediagateError> {
    if let Ok(key) = std::env::var(VAULT_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Vault passphrase: ");
        let passphrase = rpassword::read_password()
            .map_err(|e| MediagateError::Vault(format!("failed to read passphrase: {e}")))?;
        if passphrase.is_empty() {
            return Err(MediagateError::Vault(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(passphrase));
    }

    Err(MediagateError::Vault(format!(
        "no passphrase provided; set {VAULT_KEY_ENV_VAR} or run interactively"
    )))
}
