// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and repository ports.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use mediagate_config::model::StorageConfig;
use mediagate_core::{
    AdapterType, ApprovalPolicy, HealthStatus, MediaRequest, MediagateError, NewMediaRequest,
    NewServiceBinding, PluginAdapter, PolicyStore, RequestStatus, RequestStore, RequestUpdate,
    ServiceBinding, ServiceStore, StorageAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage.
///
/// The database is opened lazily by [`StorageAdapter::initialize`]; every
/// repository call before that fails with a storage error.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already-open database (tests, in-memory runs).
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// The open database, shared with the vault for `vault_meta`.
    pub fn database(&self) -> Result<&Database, MediagateError> {
        self.db.get().ok_or_else(|| {
            MediagateError::storage("storage not initialized; call initialize() first")
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MediagateError> {
        self.database()?
            .connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MediagateError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MediagateError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| MediagateError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MediagateError> {
        self.database()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl RequestStore for SqliteStorage {
    async fn find_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<MediaRequest>, MediagateError> {
        queries::requests::by_status(self.database()?, status).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRequest>, MediagateError> {
        queries::requests::get(self.database()?, id).await
    }

    async fn find_all(&self) -> Result<Vec<MediaRequest>, MediagateError> {
        queries::requests::all(self.database()?).await
    }

    async fn create(&self, request: &NewMediaRequest) -> Result<MediaRequest, MediagateError> {
        queries::requests::insert(self.database()?, request).await
    }

    async fn update(
        &self,
        id: i64,
        update: &RequestUpdate,
    ) -> Result<MediaRequest, MediagateError> {
        queries::requests::update(self.database()?, id, update).await
    }
}

#[async_trait]
impl ServiceStore for SqliteStorage {
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceBinding>, MediagateError> {
        queries::services::get(self.database()?, id).await
    }

    async fn list(&self) -> Result<Vec<ServiceBinding>, MediagateError> {
        queries::services::list(self.database()?).await
    }

    async fn create(&self, binding: &NewServiceBinding) -> Result<ServiceBinding, MediagateError> {
        queries::services::insert(self.database()?, binding).await
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<(), MediagateError> {
        queries::services::set_enabled(self.database()?, id, enabled).await
    }
}

#[async_trait]
impl PolicyStore for SqliteStorage {
    async fn get_active(&self) -> Result<Option<ApprovalPolicy>, MediagateError> {
        queries::policy::get(self.database()?).await
    }

    async fn save(&self, policy: &ApprovalPolicy) -> Result<(), MediagateError> {
        queries::policy::save(self.database()?, policy).await
    }
}
