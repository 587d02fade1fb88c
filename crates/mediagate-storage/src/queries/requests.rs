// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `media_requests` queries.

use chrono::Utc;
use mediagate_core::{MediaRequest, MediagateError, NewMediaRequest, RequestStatus, RequestUpdate};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::codec::{
    decode_enum, decode_json, decode_opt_time, decode_time, encode_json, encode_time,
};

const COLUMNS: &str = "id, contact_hash, contact_address_enc, media_type, title, year, tmdb_id,
    tvdb_id, service_kind, service_id, selected_seasons, notified_seasons, notified_episodes,
    total_seasons, partial_notified, status, submitted_at, error_message, admin_notes,
    created_at, updated_at";

/// Column values as stored, before decoding.
struct RequestRow {
    id: i64,
    contact_hash: String,
    contact_address_enc: Option<String>,
    media_type: String,
    title: String,
    year: Option<i32>,
    tmdb_id: Option<i64>,
    tvdb_id: Option<i64>,
    service_kind: Option<String>,
    service_id: Option<i64>,
    selected_seasons: String,
    notified_seasons: String,
    notified_episodes: String,
    total_seasons: u32,
    partial_notified: bool,
    status: String,
    submitted_at: Option<String>,
    error_message: Option<String>,
    admin_notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RequestRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            contact_hash: row.get(1)?,
            contact_address_enc: row.get(2)?,
            media_type: row.get(3)?,
            title: row.get(4)?,
            year: row.get(5)?,
            tmdb_id: row.get(6)?,
            tvdb_id: row.get(7)?,
            service_kind: row.get(8)?,
            service_id: row.get(9)?,
            selected_seasons: row.get(10)?,
            notified_seasons: row.get(11)?,
            notified_episodes: row.get(12)?,
            total_seasons: row.get(13)?,
            partial_notified: row.get(14)?,
            status: row.get(15)?,
            submitted_at: row.get(16)?,
            error_message: row.get(17)?,
            admin_notes: row.get(18)?,
            created_at: row.get(19)?,
            updated_at: row.get(20)?,
        })
    }

    fn decode(self) -> Result<MediaRequest, MediagateError> {
        Ok(MediaRequest {
            id: self.id,
            contact_hash: self.contact_hash,
            contact_address_enc: self.contact_address_enc,
            media_type: decode_enum("media_type", &self.media_type)?,
            title: self.title,
            year: self.year,
            tmdb_id: self.tmdb_id,
            tvdb_id: self.tvdb_id,
            service_kind: self
                .service_kind
                .as_deref()
                .map(|raw| decode_enum("service_kind", raw))
                .transpose()?,
            service_id: self.service_id,
            selected_seasons: decode_json("selected_seasons", &self.selected_seasons)?,
            notified_seasons: decode_json("notified_seasons", &self.notified_seasons)?,
            notified_episodes: decode_json("notified_episodes", &self.notified_episodes)?,
            total_seasons: self.total_seasons,
            partial_notified: self.partial_notified,
            status: decode_enum("status", &self.status)?,
            submitted_at: decode_opt_time("submitted_at", self.submitted_at.as_deref())?,
            error_message: self.error_message,
            admin_notes: self.admin_notes,
            created_at: decode_time("created_at", &self.created_at)?,
            updated_at: decode_time("updated_at", &self.updated_at)?,
        })
    }
}

fn select_one(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<RequestRow>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM media_requests WHERE id = ?1"),
        params![id],
        RequestRow::from_row,
    )
    .optional()
}

/// Insert a request and return it as stored.
pub async fn insert(
    db: &Database,
    request: &NewMediaRequest,
) -> Result<MediaRequest, MediagateError> {
    let request = request.clone();
    let now = encode_time(Utc::now());
    let selected = encode_json(&request.selected_seasons)?;
    let submitted_at = request.submitted_at.map(encode_time);

    let row = db
        .connection()
        .call(move |conn| -> Result<RequestRow, rusqlite::Error> {
            conn.execute(
                "INSERT INTO media_requests (contact_hash, contact_address_enc, media_type, title,
                     year, tmdb_id, tvdb_id, service_kind, service_id, selected_seasons,
                     status, submitted_at, error_message, admin_notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
                params![
                    request.contact_hash,
                    request.contact_address_enc,
                    request.media_type.to_string(),
                    request.title,
                    request.year,
                    request.tmdb_id,
                    request.tvdb_id,
                    request.service_kind.map(|k| k.to_string()),
                    request.service_id,
                    selected,
                    request.status.to_string(),
                    submitted_at,
                    request.error_message,
                    request.admin_notes,
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

pub async fn get(db: &Database, id: i64) -> Result<Option<MediaRequest>, MediagateError> {
    db.connection()
        .call(move |conn| select_one(conn, id))
        .await
        .map_err(map_tr_err)?
        .map(RequestRow::decode)
        .transpose()
}

/// Requests in `status`, oldest first.
pub async fn by_status(
    db: &Database,
    status: RequestStatus,
) -> Result<Vec<MediaRequest>, MediagateError> {
    let status = status.to_string();
    let rows = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM media_requests WHERE status = ?1
                 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![status], RequestRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(RequestRow::decode).collect()
}

/// Every request, newest first.
pub async fn all(db: &Database) -> Result<Vec<MediaRequest>, MediagateError> {
    let rows = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM media_requests ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map([], RequestRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(RequestRow::decode).collect()
}

/// Read, apply and write back in one transaction.
pub async fn update(
    db: &Database,
    id: i64,
    update: &RequestUpdate,
) -> Result<MediaRequest, MediagateError> {
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<Result<MediaRequest, MediagateError>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let Some(row) = select_one(&tx, id)? else {
                return Ok(Err(MediagateError::NotFound {
                    entity: "request",
                    id,
                }));
            };
            let mut request = match row.decode() {
                Ok(request) => request,
                Err(e) => return Ok(Err(e)),
            };
            request.apply(&update, Utc::now());

            let encoded = encode_json(&request.notified_seasons)
                .and_then(|seasons| Ok((seasons, encode_json(&request.notified_episodes)?)));
            let (notified_seasons, notified_episodes) = match encoded {
                Ok(pair) => pair,
                Err(e) => return Ok(Err(e)),
            };

            tx.execute(
                "UPDATE media_requests SET service_kind = ?2, service_id = ?3,
                     notified_seasons = ?4, notified_episodes = ?5, total_seasons = ?6,
                     partial_notified = ?7, status = ?8, submitted_at = ?9,
                     error_message = ?10, admin_notes = ?11, updated_at = ?12
                 WHERE id = ?1",
                params![
                    id,
                    request.service_kind.map(|k| k.to_string()),
                    request.service_id,
                    notified_seasons,
                    notified_episodes,
                    request.total_seasons,
                    request.partial_notified,
                    request.status.to_string(),
                    request.submitted_at.map(encode_time),
                    request.error_message,
                    request.admin_notes,
                    encode_time(request.updated_at),
                ],
            )?;
            tx.commit()?;
            Ok(Ok(request))
        })
        .await
        .map_err(map_tr_err)?
}

#[cfg(test)]
mod tests {
    use mediagate_core::{MediaSelection, MediaType, ServiceKind};

    use super::*;

    fn selection() -> MediaSelection {
        MediaSelection {
            media_type: MediaType::Series,
            title: "The Bear".into(),
            year: Some(2022),
            tmdb_id: Some(136315),
            tvdb_id: Some(403245),
            seasons: [1, 2].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn insert_and_fetch() {
        let db = Database::open_in_memory().await.unwrap();
        let new = NewMediaRequest::from_selection(
            "h1",
            Some("enc".into()),
            &selection(),
            RequestStatus::Pending,
        );
        let stored = insert(&db, &new).await.unwrap();

        assert!(stored.id > 0);
        assert_eq!(stored.status, RequestStatus::Pending);
        assert_eq!(stored.selected_seasons, [1, 2].into_iter().collect());
        assert!(stored.notified_episodes.is_empty());

        let fetched = get(&db, stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(get(&db, stored.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_persists_partial_changes() {
        let db = Database::open_in_memory().await.unwrap();
        let new = NewMediaRequest::from_selection("h1", None, &selection(), RequestStatus::Pending);
        let stored = insert(&db, &new).await.unwrap();

        let mut episodes = mediagate_core::EpisodeMap::new();
        episodes.entry(1).or_default().insert(4);
        let change = RequestUpdate::default()
            .status(RequestStatus::Submitted)
            .binding(ServiceKind::Sonarr, 3)
            .submitted_at(Utc::now())
            .notified_seasons([1].into_iter().collect())
            .notified_episodes(episodes.clone())
            .total_seasons(3);
        let updated = update(&db, stored.id, &change).await.unwrap();
        assert_eq!(updated.status, RequestStatus::Submitted);
        assert!(updated.updated_at >= stored.updated_at);

        let fetched = get(&db, stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.service_kind, Some(ServiceKind::Sonarr));
        assert_eq!(fetched.service_id, Some(3));
        assert_eq!(fetched.notified_episodes, episodes);
        assert_eq!(fetched.total_seasons, 3);
        assert!(fetched.submitted_at.is_some());
        assert_eq!(fetched.title, "The Bear");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let db = Database::open_in_memory().await.unwrap();
        let err = update(&db, 42, &RequestUpdate::default().status(RequestStatus::Failed))
            .await
            .unwrap_err();
        assert!(matches!(err, MediagateError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn status_filter_and_ordering() {
        let db = Database::open_in_memory().await.unwrap();
        let new = |hash: &str, status| {
            NewMediaRequest::from_selection(hash, None, &selection(), status)
        };
        let a = insert(&db, &new("a", RequestStatus::Submitted)).await.unwrap();
        let _ = insert(&db, &new("b", RequestStatus::Pending)).await.unwrap();
        let c = insert(&db, &new("c", RequestStatus::Submitted)).await.unwrap();

        let submitted = by_status(&db, RequestStatus::Submitted).await.unwrap();
        let ids: Vec<i64> = submitted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);

        let everything = all(&db).await.unwrap();
        assert_eq!(everything.len(), 3);
        assert_eq!(everything[0].id, c.id);
    }
}
