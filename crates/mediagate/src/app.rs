// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembly of the request engine from configuration.
//!
//! Every subcommand that touches requests goes through [`App::open`]: open
//! storage, unlock the vault, then wire the ports.

use std::sync::Arc;
use std::time::Duration;

use mediagate_arr::HttpConnector;
use mediagate_bus::EventBus;
use mediagate_config::model::MediagateConfig;
use mediagate_core::{MediagateError, MessageSender, PluginAdapter, StorageAdapter};
use mediagate_requests::{AvailabilityMonitor, EnginePorts, RequestProcessor};
use mediagate_storage::SqliteStorage;
use mediagate_vault::Vault;
use secrecy::SecretString;
use tracing::{debug, info};

use crate::messenger::build_messenger;

/// Open and migrate the configured database without touching the vault.
pub async fn open_storage(config: &MediagateConfig) -> Result<Arc<SqliteStorage>, MediagateError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    debug!(path = %config.storage.database_path, "storage ready");
    Ok(Arc::new(storage))
}

/// The wired engine plus the adapters commands reach into directly.
pub struct App {
    pub storage: Arc<SqliteStorage>,
    pub vault: Arc<Vault>,
    pub bus: Arc<EventBus>,
    pub processor: RequestProcessor,
    pub monitor: AvailabilityMonitor,
}

impl App {
    /// Open storage and the vault with the passphrase from the environment or a prompt.
    pub async fn open(config: &MediagateConfig) -> Result<Self, MediagateError> {
        let passphrase = mediagate_vault::get_vault_passphrase()?;
        Self::open_with(config, &passphrase).await
    }

    pub async fn open_with(
        config: &MediagateConfig,
        passphrase: &SecretString,
    ) -> Result<Self, MediagateError> {
        let storage = open_storage(config).await?;
        let vault = Vault::open_or_create(
            storage.database()?.connection(),
            passphrase,
            &config.vault,
        )
        .await?;
        let vault = Arc::new(vault);

        let timeout = Duration::from_secs(config.dispatch.request_timeout_secs);
        let messenger: Arc<dyn MessageSender> = build_messenger(&config.notifications, timeout)?;
        info!(transport = messenger.name(), "message transport ready");

        let bus = Arc::new(EventBus::default());
        let ports = EnginePorts {
            requests: storage.clone(),
            services: storage.clone(),
            policies: storage.clone(),
            cipher: vault.clone(),
            connector: Arc::new(HttpConnector::new(timeout)),
            messenger,
            events: bus.clone(),
        };

        Ok(Self {
            processor: RequestProcessor::new(&ports, config.dispatch.clone()),
            monitor: AvailabilityMonitor::new(
                &ports,
                Duration::from_secs(config.monitor.interval_secs),
            ),
            storage,
            vault,
            bus,
        })
    }

    /// Flush the WAL and release the database.
    pub async fn close(&self) -> Result<(), MediagateError> {
        self.storage.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediagate_core::{SecretCipher, ServiceStore};
    use secrecy::ExposeSecret;

    fn temp_config(dir: &tempfile::TempDir) -> MediagateConfig {
        let mut config = MediagateConfig::default();
        config.storage.database_path = dir
            .path()
            .join("mediagate.db")
            .to_string_lossy()
            .into_owned();
        config.vault.kdf_memory_cost = 1024;
        config.vault.kdf_iterations = 1;
        config.vault.kdf_parallelism = 1;
        config
    }

    #[tokio::test]
    async fn reopening_unlocks_existing_vault() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        let passphrase = SecretString::from("correct horse");

        let sealed = {
            let app = App::open_with(&config, &passphrase).await.unwrap();
            assert!(app.storage.list().await.unwrap().is_empty());
            let sealed = app.vault.encrypt("radarr-key").unwrap();
            app.close().await.unwrap();
            sealed
        };

        let app = App::open_with(&config, &passphrase).await.unwrap();
        let plain = app.vault.decrypt(&sealed).unwrap();
        assert_eq!(plain.expose_secret(), "radarr-key");
        assert!(!app.monitor.is_running());
    }

    #[tokio::test]
    async fn wrong_passphrase_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        let app = App::open_with(&config, &SecretString::from("first"))
            .await
            .unwrap();
        app.close().await.unwrap();
        drop(app);

        let result = App::open_with(&config, &SecretString::from("second")).await;
        assert!(matches!(result, Err(MediagateError::Vault(_))));
    }
}
