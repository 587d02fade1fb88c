// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability interfaces of the three downstream backends.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::backend::{
    OverseerrMovieDetails, OverseerrRequest, OverseerrRequestReceipt, OverseerrSearchResult,
    OverseerrServer, OverseerrTvDetails, RadarrAddMovie, RadarrMovie, SonarrAddSeries, SonarrSeries,
};
use crate::error::MediagateError;
use crate::types::EpisodeMap;

/// The request aggregator.
#[async_trait]
pub trait OverseerrApi: Send + Sync {
    /// First page of search results for `query`.
    async fn search(&self, query: &str) -> Result<Vec<OverseerrSearchResult>, MediagateError>;

    async fn movie_details(&self, tmdb_id: i64) -> Result<OverseerrMovieDetails, MediagateError>;

    async fn tv_details(&self, tmdb_id: i64) -> Result<OverseerrTvDetails, MediagateError>;

    /// Radarr instances Overseerr forwards movie requests to.
    async fn radarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError>;

    /// Sonarr instances Overseerr forwards series requests to.
    async fn sonarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError>;

    async fn request(
        &self,
        request: &OverseerrRequest,
    ) -> Result<OverseerrRequestReceipt, MediagateError>;
}

/// The movie acquirer.
#[async_trait]
pub trait RadarrApi: Send + Sync {
    async fn movie_by_tmdb(&self, tmdb_id: i64) -> Result<Option<RadarrMovie>, MediagateError>;

    async fn add_movie(&self, movie: &RadarrAddMovie) -> Result<RadarrMovie, MediagateError>;
}

/// The series acquirer.
#[async_trait]
pub trait SonarrApi: Send + Sync {
    async fn series_by_tvdb(&self, tvdb_id: i64)
    -> Result<Option<SonarrSeries>, MediagateError>;

    async fn all_series(&self) -> Result<Vec<SonarrSeries>, MediagateError>;

    /// Episodes with a file on disk, grouped by season (specials included).
    async fn available_episodes(&self, series_id: i64) -> Result<EpisodeMap, MediagateError>;

    async fn add_series(&self, series: &SonarrAddSeries) -> Result<SonarrSeries, MediagateError>;
}

/// Builds short-lived clients for a binding's base URL and decrypted key.
///
/// Clients are dropped after the operation that needed them.
pub trait BackendConnector: Send + Sync {
    fn overseerr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn OverseerrApi>, MediagateError>;

    fn radarr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn RadarrApi>, MediagateError>;

    fn sonarr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn SonarrApi>, MediagateError>;
}
