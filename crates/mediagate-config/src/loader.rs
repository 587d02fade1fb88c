// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./mediagate.toml` > `~/.config/mediagate/mediagate.toml` >
//! `/etc/mediagate/mediagate.toml`, with `MEDIAGATE_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MediagateConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/mediagate/mediagate.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mediagate.toml";

/// Top-level sections addressable through `MEDIAGATE_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "service",
    "storage",
    "vault",
    "monitor",
    "dispatch",
    "notifications",
];

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mediagate").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mediagate/mediagate.toml`
/// 3. `~/.config/mediagate/mediagate.toml`
/// 4. `./mediagate.toml`
/// 5. `MEDIAGATE_*` environment variables
pub fn load_config() -> Result<MediagateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MediagateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MediagateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `MEDIAGATE_DISPATCH_DEFAULT_MOVIE_ROOT` to
/// `dispatch.default_movie_root`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// key names containing underscores survive intact. `MEDIAGATE_VAULT_KEY`
/// carries the vault passphrase and is never part of the config tree.
fn env_provider() -> Env {
    Env::prefixed("MEDIAGATE_")
        .ignore(&["VAULT_KEY"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Rewrite a prefix-stripped env key, in any case, into a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
