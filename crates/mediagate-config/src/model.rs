// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the mediagate request broker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level mediagate configuration.
///
/// Every section is optional and falls back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediagateConfig {
    /// Service identity and log verbosity.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Availability monitor schedule.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Defaults used when submitting to Radarr, Sonarr and Overseerr.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Outbound notification transport.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Instance name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "mediagate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("mediagate").join("mediagate.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("mediagate.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Vault key-derivation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Availability monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Start the periodic reconciliation loop with `serve`.
    #[serde(default = "default_monitor_enabled")]
    pub enabled: bool,

    /// Seconds between reconciliation cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_monitor_enabled(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_monitor_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    300
}

/// Submission defaults applied when a binding leaves a field unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Radarr root folder when the binding has none.
    #[serde(default = "default_movie_root")]
    pub default_movie_root: String,

    /// Sonarr root folder when the binding has none.
    #[serde(default = "default_series_root")]
    pub default_series_root: String,

    #[serde(default = "default_profile_id")]
    pub default_quality_profile_id: i64,

    #[serde(default = "default_profile_id")]
    pub default_language_profile_id: i64,

    /// Profile forwarded to Overseerr; 0 leaves the choice to Overseerr.
    #[serde(default)]
    pub overseerr_profile_id: i64,

    /// Per-call HTTP timeout for backend clients.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_movie_root: default_movie_root(),
            default_series_root: default_series_root(),
            default_quality_profile_id: default_profile_id(),
            default_language_profile_id: default_profile_id(),
            overseerr_profile_id: 0,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_movie_root() -> String {
    "/movies".to_string()
}

fn default_series_root() -> String {
    "/tv".to_string()
}

fn default_profile_id() -> i64 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Notification transport configuration. No webhook means log-only delivery.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Sent as a bearer token with each webhook call.
    #[serde(default)]
    pub webhook_token: Option<String>,
}
