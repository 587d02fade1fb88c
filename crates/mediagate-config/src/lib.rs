// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the mediagate request broker.
//!
//! TOML parsing with strict `deny_unknown_fields`, XDG file lookup,
//! `MEDIAGATE_` environment overrides, and miette diagnostics with typo
//! suggestions.
//!
//! ```no_run
//! use mediagate_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("monitor every {}s", config.monitor.interval_secs);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MediagateConfig;

/// Load from the standard hierarchy and validate.
///
/// Figment errors are converted into diagnostics pointing into the
/// offending file where possible.
pub fn load_and_validate() -> Result<MediagateConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load from an inline TOML string and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<MediagateConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read whichever config files exist, for diagnostic source spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = Vec::new();
    candidates.push(
        std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into()),
    );
    if let Some(path) = loader::user_config_path() {
        candidates.push(path);
    }
    candidates.push(loader::SYSTEM_CONFIG_PATH.into());

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
