// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery).
//!
//! SQL files under `migrations/` are compiled in and applied on every open.

use mediagate_core::MediagateError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Refinery records progress in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), MediagateError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(MediagateError::storage)?;
    Ok(())
}
