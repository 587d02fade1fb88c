// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the mediagate configuration system.

use std::io::Write;

use mediagate_config::diagnostic::{ConfigError, suggest_key};
use mediagate_config::model::MediagateConfig;
use mediagate_config::{
    load_and_validate_str, load_config_from_path, load_config_from_str,
};
use serial_test::serial;

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[service]
name = "living-room"
log_level = "debug"

[storage]
database_path = "/tmp/mediagate-test.db"
wal_mode = false

[monitor]
enabled = false
interval_secs = 120

[dispatch]
default_movie_root = "/srv/movies"
default_series_root = "/srv/tv"
default_quality_profile_id = 4
default_language_profile_id = 2
overseerr_profile_id = 7
request_timeout_secs = 10

[notifications]
webhook_url = "https://sms.example.org/send"
webhook_token = "tok"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "living-room");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/mediagate-test.db");
    assert!(!config.storage.wal_mode);
    assert!(!config.monitor.enabled);
    assert_eq!(config.monitor.interval_secs, 120);
    assert_eq!(config.dispatch.default_movie_root, "/srv/movies");
    assert_eq!(config.dispatch.default_quality_profile_id, 4);
    assert_eq!(config.dispatch.overseerr_profile_id, 7);
    assert_eq!(
        config.notifications.webhook_url.as_deref(),
        Some("https://sms.example.org/send")
    );
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert_eq!(config.monitor.interval_secs, 300);
    assert_eq!(config.dispatch.default_series_root, "/tv");
}

#[test]
fn unknown_top_level_section_rejected() {
    let err = load_config_from_str("[telegram]\nbot_token = \"x\"\n").unwrap_err();
    assert!(err.to_string().contains("telegram"));
}

#[test]
fn typo_produces_unknown_key_with_suggestion() {
    let errors = load_and_validate_str("[dispatch]\ndefault_movie_rot = \"/m\"\n").unwrap_err();
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "default_movie_rot" && s == "default_movie_root"
        )
    });
    assert!(found, "expected a suggestion, got: {errors:?}");
}

#[test]
fn wrong_type_produces_invalid_type() {
    let errors = load_and_validate_str("[monitor]\ninterval_secs = \"often\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn validation_errors_surface_through_load_and_validate() {
    let errors = load_and_validate_str("[monitor]\ninterval_secs = 1\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn suggestion_helper_is_public() {
    assert_eq!(
        suggest_key("webhok_url", &["webhook_url", "webhook_token"]),
        Some("webhook_url".to_string())
    );
}

#[test]
fn config_error_renders_with_miette() {
    let error = ConfigError::Validation {
        message: "monitor.interval_secs must be at least 10, got 1".into(),
    };
    let mut buf = String::new();
    miette::GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .unwrap();
    assert!(buf.contains("interval_secs"));
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dispatch]\ndefault_movie_root = \"/from/file\"").unwrap();

    // SAFETY: serialized with every other env-mutating test.
    unsafe {
        std::env::set_var("MEDIAGATE_DISPATCH_DEFAULT_MOVIE_ROOT", "/from/env");
        std::env::set_var("MEDIAGATE_MONITOR_INTERVAL_SECS", "45");
    }
    let result = load_config_from_path(file.path());
    unsafe {
        std::env::remove_var("MEDIAGATE_DISPATCH_DEFAULT_MOVIE_ROOT");
        std::env::remove_var("MEDIAGATE_MONITOR_INTERVAL_SECS");
    }

    let config: MediagateConfig = result.expect("env override should merge");
    assert_eq!(config.dispatch.default_movie_root, "/from/env");
    assert_eq!(config.monitor.interval_secs, 45);
}

#[test]
#[serial]
fn vault_passphrase_env_is_not_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[monitor]\ninterval_secs = 120").unwrap();

    // SAFETY: serialized with every other env-mutating test.
    unsafe {
        std::env::set_var("MEDIAGATE_VAULT_KEY", "correct horse battery staple");
        std::env::set_var("MEDIAGATE_SERVICE_LOG_LEVEL", "debug");
    }
    let result = load_config_from_path(file.path());
    unsafe {
        std::env::remove_var("MEDIAGATE_VAULT_KEY");
        std::env::remove_var("MEDIAGATE_SERVICE_LOG_LEVEL");
    }

    let config: MediagateConfig = result.expect("passphrase variable must not break loading");
    assert_eq!(config.monitor.interval_secs, 120);
    assert_eq!(config.service.log_level, "debug");
}

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/mediagate.toml"))
        .expect("missing file is skipped");
    assert_eq!(config.service.name, "mediagate");
}
