// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the mediagate request broker.
//!
//! WAL-mode SQLite with embedded migrations and a single-writer connection
//! (`tokio-rusqlite`). [`SqliteStorage`] implements the request, service and
//! policy repository ports.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
