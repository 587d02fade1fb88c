// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sonarr API v3 client.

use async_trait::async_trait;
use mediagate_core::backend::{SonarrAddSeries, SonarrEpisode, SonarrSeries};
use mediagate_core::{EpisodeMap, MediagateError, SonarrApi};

use crate::client::ArrClient;

pub struct SonarrClient {
    http: ArrClient,
}

impl SonarrClient {
    pub fn new(http: ArrClient) -> Self {
        Self { http }
    }
}

/// Group episodes that have a file by season.
pub fn downloaded_episodes(episodes: &[SonarrEpisode]) -> EpisodeMap {
    let mut map = EpisodeMap::new();
    for episode in episodes.iter().filter(|e| e.has_file) {
        map.entry(episode.season_number)
            .or_default()
            .insert(episode.episode_number);
    }
    map
}

#[async_trait]
impl SonarrApi for SonarrClient {
    async fn series_by_tvdb(&self, tvdb_id: i64) -> Result<Option<SonarrSeries>, MediagateError> {
        Ok(self
            .all_series()
            .await?
            .into_iter()
            .find(|s| s.tvdb_id == tvdb_id))
    }

    async fn all_series(&self) -> Result<Vec<SonarrSeries>, MediagateError> {
        self.http.get("/api/v3/series", &[]).await
    }

    async fn available_episodes(&self, series_id: i64) -> Result<EpisodeMap, MediagateError> {
        let episodes: Vec<SonarrEpisode> = self
            .http
            .get("/api/v3/episode", &[("seriesId", series_id.to_string())])
            .await?;
        Ok(downloaded_episodes(&episodes))
    }

    async fn add_series(&self, series: &SonarrAddSeries) -> Result<SonarrSeries, MediagateError> {
        self.http.post("/api/v3/series", series).await
    }
}
