// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single-row `approval_policy` table.

use std::collections::BTreeSet;

use chrono::Utc;
use mediagate_core::{ApprovalPolicy, MediagateError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::queries::codec::{decode_enum, decode_json, encode_json, encode_time};

pub async fn get(db: &Database) -> Result<Option<ApprovalPolicy>, MediagateError> {
    let row = db
        .connection()
        .call(|conn| {
            conn.query_row(
                "SELECT mode, exceptions_enabled, exception_contacts FROM approval_policy
                 WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    let Some((mode, exceptions_enabled, contacts)) = row else {
        return Ok(None);
    };
    Ok(Some(ApprovalPolicy {
        mode: decode_enum("mode", &mode)?,
        exceptions_enabled,
        exception_contacts: decode_json::<BTreeSet<String>>("exception_contacts", &contacts)?,
    }))
}

/// Insert or replace the active policy.
pub async fn save(db: &Database, policy: &ApprovalPolicy) -> Result<(), MediagateError> {
    let mode = policy.mode.to_string();
    let exceptions_enabled = policy.exceptions_enabled;
    let contacts = encode_json(&policy.exception_contacts)?;
    let now = encode_time(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO approval_policy (id, mode, exceptions_enabled, exception_contacts, updated_at)
                 VALUES (1, ?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET mode = excluded.mode,
                     exceptions_enabled = excluded.exceptions_enabled,
                     exception_contacts = excluded.exception_contacts,
                     updated_at = excluded.updated_at",
                params![mode, exceptions_enabled, contacts, now],
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use mediagate_core::ApprovalMode;

    use super::*;

    #[tokio::test]
    async fn absent_until_saved() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(get(&db).await.unwrap().is_none());

        let policy = ApprovalPolicy {
            mode: ApprovalMode::Manual,
            exceptions_enabled: true,
            exception_contacts: ["abc".to_string()].into_iter().collect(),
        };
        save(&db, &policy).await.unwrap();
        assert_eq!(get(&db).await.unwrap(), Some(policy.clone()));

        let relaxed = ApprovalPolicy {
            mode: ApprovalMode::AutoApprove,
            ..policy
        };
        save(&db, &relaxed).await.unwrap();
        assert_eq!(get(&db).await.unwrap(), Some(relaxed));
    }
}
