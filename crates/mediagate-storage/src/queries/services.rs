// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `service_bindings` queries.

use chrono::Utc;
use mediagate_core::{MediagateError, NewServiceBinding, ServiceBinding};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::codec::{decode_enum, decode_time, encode_time};

const COLUMNS: &str = "id, kind, name, base_url, api_key_enc, priority, enabled,
    quality_profile_id, root_folder, language_profile_id, created_at";

struct BindingRow {
    id: i64,
    kind: String,
    name: String,
    base_url: String,
    api_key_enc: String,
    priority: i32,
    enabled: bool,
    quality_profile_id: Option<i64>,
    root_folder: Option<String>,
    language_profile_id: Option<i64>,
    created_at: String,
}

impl BindingRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            name: row.get(2)?,
            base_url: row.get(3)?,
            api_key_enc: row.get(4)?,
            priority: row.get(5)?,
            enabled: row.get(6)?,
            quality_profile_id: row.get(7)?,
            root_folder: row.get(8)?,
            language_profile_id: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<ServiceBinding, MediagateError> {
        Ok(ServiceBinding {
            id: self.id,
            kind: decode_enum("kind", &self.kind)?,
            name: self.name,
            base_url: self.base_url,
            api_key_enc: self.api_key_enc,
            priority: self.priority,
            enabled: self.enabled,
            quality_profile_id: self.quality_profile_id,
            root_folder: self.root_folder,
            language_profile_id: self.language_profile_id,
            created_at: decode_time("created_at", &self.created_at)?,
        })
    }
}

fn select_one(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<BindingRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM service_bindings WHERE id = ?1"),
        params![id],
        BindingRow::from_row,
    )
    .optional()
}

pub async fn get(db: &Database, id: i64) -> Result<Option<ServiceBinding>, MediagateError> {
    db.connection()
        .call(move |conn| select_one(conn, id))
        .await
        .map_err(map_tr_err)?
        .map(BindingRow::decode)
        .transpose()
}

/// All bindings, highest priority (lowest number) first, ties by id.
pub async fn list(db: &Database) -> Result<Vec<ServiceBinding>, MediagateError> {
    let rows = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM service_bindings ORDER BY priority ASC, id ASC"
            ))?;
            let rows = stmt.query_map([], BindingRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(BindingRow::decode).collect()
}

pub async fn insert(
    db: &Database,
    binding: &NewServiceBinding,
) -> Result<ServiceBinding, MediagateError> {
    let binding = binding.clone();
    let now = encode_time(Utc::now());
    let row = db
        .connection()
        .call(move |conn| -> Result<BindingRow, rusqlite::Error> {
            conn.execute(
                "INSERT INTO service_bindings (kind, name, base_url, api_key_enc, priority,
                     enabled, quality_profile_id, root_folder, language_profile_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    binding.kind.to_string(),
                    binding.name,
                    binding.base_url,
                    binding.api_key_enc,
                    binding.priority,
                    binding.enabled,
                    binding.quality_profile_id,
                    binding.root_folder,
                    binding.language_profile_id,
                    now,
                ],
            )?;
            let id = conn.last_insert_rowid();
            select_one(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
        })
        .await
        .map_err(map_tr_err)?;
    row.decode()
}

pub async fn set_enabled(db: &Database, id: i64, enabled: bool) -> Result<(), MediagateError> {
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE service_bindings SET enabled = ?2 WHERE id = ?1",
                params![id, enabled],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(MediagateError::NotFound {
            entity: "service",
            id,
        });
    }
    Ok(())
}
