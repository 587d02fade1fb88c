// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate services ...` command implementations.
//!
//! API keys are encrypted with the vault before they reach storage and are
//! never printed.

use std::io::IsTerminal;

use mediagate_core::{
    MediagateError, NewServiceBinding, SecretCipher, ServiceBinding, ServiceKind, ServiceStore,
};
use mediagate_storage::SqliteStorage;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::app::App;

/// Fields of `mediagate services add`.
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub kind: ServiceKind,
    pub name: String,
    pub url: String,
    pub api_key: Option<String>,
    pub priority: i32,
    pub quality_profile: Option<i64>,
    pub root_folder: Option<String>,
    pub language_profile: Option<i64>,
    pub disabled: bool,
}

pub async fn run_add(app: &App, args: AddArgs) -> Result<(), MediagateError> {
    let base_url = normalize_base_url(&args.url)?;
    let api_key = match args.api_key {
        Some(key) => SecretString::from(key),
        None => prompt_api_key(args.kind)?,
    };
    if api_key.expose_secret().trim().is_empty() {
        return Err(MediagateError::Config("API key must not be empty".to_string()));
    }

    let binding = NewServiceBinding {
        kind: args.kind,
        name: args.name.trim().to_string(),
        base_url,
        api_key_enc: app.vault.encrypt(api_key.expose_secret().trim())?,
        priority: args.priority,
        enabled: !args.disabled,
        quality_profile_id: args.quality_profile,
        root_folder: args.root_folder,
        language_profile_id: args.language_profile,
    };
    let created = app.storage.create(&binding).await?;
    println!("added {} service #{} ({})", created.kind, created.id, created.name);
    Ok(())
}

pub async fn run_list(storage: &SqliteStorage, plain: bool) -> Result<(), MediagateError> {
    let bindings = storage.list().await?;
    if bindings.is_empty() {
        println!("no services configured");
        return Ok(());
    }
    let use_color = !plain && std::io::stdout().is_terminal();
    for binding in &bindings {
        println!("{}", binding_line(binding, use_color));
    }
    Ok(())
}

pub async fn run_set_enabled(
    storage: &SqliteStorage,
    id: i64,
    enabled: bool,
) -> Result<(), MediagateError> {
    ServiceStore::find_by_id(storage, id)
        .await?
        .ok_or(MediagateError::NotFound {
            entity: "service",
            id,
        })?;
    storage.set_enabled(id, enabled).await?;
    println!(
        "service #{id} {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn prompt_api_key(kind: ServiceKind) -> Result<SecretString, MediagateError> {
    if !std::io::stdin().is_terminal() {
        return Err(MediagateError::Config(
            "no API key given; pass --api-key or run interactively".to_string(),
        ));
    }
    eprint!("{kind} API key: ");
    let key = rpassword::read_password()
        .map_err(|e| MediagateError::Config(format!("failed to read API key: {e}")))?;
    Ok(SecretString::from(key))
}

/// Validate an http(s) URL and strip the trailing slash.
fn normalize_base_url(url: &str) -> Result<String, MediagateError> {
    let trimmed = url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| MediagateError::Config(format!("invalid service URL `{url}`: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MediagateError::Config(format!(
            "service URL `{url}` must use http or https"
        )));
    }
    Ok(trimmed.to_string())
}

fn binding_line(binding: &ServiceBinding, use_color: bool) -> String {
    let state = if binding.enabled { "enabled" } else { "disabled" };
    let state = if use_color {
        use colored::Colorize;
        if binding.enabled {
            state.green().to_string()
        } else {
            state.dimmed().to_string()
        }
    } else {
        state.to_string()
    };
    format!(
        "{:>4}  {:<9}  {:<8}  p{}  {}  {}",
        binding.id,
        binding.kind.to_string(),
        state,
        binding.priority,
        binding.name,
        binding.base_url,
    )
}
