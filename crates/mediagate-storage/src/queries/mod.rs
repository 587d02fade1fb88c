// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions, one module per table.
//!
//! Closures passed to the connection only move raw column values; decoding
//! JSON, timestamps and enum text happens afterwards in [`codec`].

pub mod codec;
pub mod policy;
pub mod requests;
pub mod services;
