// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.

use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::MediagateConfig;

/// Shortest permitted monitor interval.
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first.
pub fn validate_config(config: &MediagateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.monitor.interval_secs < MIN_INTERVAL_SECS {
        errors.push(ConfigError::validation(format!(
            "monitor.interval_secs must be at least {MIN_INTERVAL_SECS}, got {}",
            config.monitor.interval_secs
        )));
    }

    for (key, root) in [
        ("dispatch.default_movie_root", &config.dispatch.default_movie_root),
        ("dispatch.default_series_root", &config.dispatch.default_series_root),
    ] {
        if !Path::new(root).is_absolute() {
            errors.push(ConfigError::validation(format!(
                "{key} must be an absolute path, got `{root}`"
            )));
        }
    }

    if config.dispatch.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "dispatch.request_timeout_secs must be greater than 0",
        ));
    }

    if config.vault.kdf_memory_cost < 32768 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
            config.vault.kdf_memory_cost
        )));
    }

    if config.vault.kdf_iterations < 2 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_iterations must be at least 2, got {}",
            config.vault.kdf_iterations
        )));
    }

    if config.vault.kdf_parallelism < 1 {
        errors.push(ConfigError::validation(format!(
            "vault.kdf_parallelism must be at least 1, got {}",
            config.vault.kdf_parallelism
        )));
    }

    if let Some(url) = &config.notifications.webhook_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(ConfigError::validation(format!(
            "notifications.webhook_url must use http or https, got `{url}`"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
