// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for Overseerr, Radarr and Sonarr.
//!
//! Each client implements the matching backend port from `mediagate-core`;
//! [`HttpConnector`] builds them on demand from a binding.

pub mod client;
pub mod connector;
pub mod overseerr;
pub mod radarr;
pub mod sonarr;

pub use client::ArrClient;
pub use connector::HttpConnector;
pub use overseerr::OverseerrClient;
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;
