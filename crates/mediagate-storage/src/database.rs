// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: PRAGMAs, WAL mode and migrations.
//!
//! Every statement runs on tokio-rusqlite's single background thread, so
//! writes are serialized. Do not open a second connection for writes.

use std::path::Path;

use mediagate_core::MediagateError;
use tracing::{debug, info};

use crate::migrations::run_migrations;

/// Handle to the migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and migrate it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MediagateError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(MediagateError::storage)?;
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(MediagateError::storage)?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        info!(path, "database opened");
        Ok(db)
    }

    /// A migrated in-memory database, for tests and dry runs.
    pub async fn open_in_memory() -> Result<Self, MediagateError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(MediagateError::storage)?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), MediagateError> {
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        self.conn
            .call(move |conn| -> Result<Result<(), MediagateError>, rusqlite::Error> {
                conn.execute_batch(&format!(
                    "PRAGMA journal_mode = {journal};
                     PRAGMA synchronous = NORMAL;
                     PRAGMA foreign_keys = ON;
                     PRAGMA busy_timeout = 5000;"
                ))?;
                Ok(run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)??;
        debug!(journal, "pragmas applied and migrations run");
        Ok(())
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), MediagateError> {
        self.conn
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(map_tr_err)
    }
}

/// Convert tokio-rusqlite errors into storage errors.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MediagateError {
    MediagateError::storage(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mediagate.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await
            .unwrap();

        for table in ["approval_policy", "media_requests", "service_bindings", "vault_meta"] {
            assert!(tables.iter().any(|t| t == table), "missing {table}");
        }
        db.checkpoint().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("again.db");
        let path = path.to_str().unwrap();
        drop(Database::open(path, false).await.unwrap());
        assert!(Database::open(path, false).await.is_ok());
    }
}
