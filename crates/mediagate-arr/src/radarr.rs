// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Radarr API v3 client.

use async_trait::async_trait;
use mediagate_core::backend::{RadarrAddMovie, RadarrMovie};
use mediagate_core::{MediagateError, RadarrApi};

use crate::client::ArrClient;

pub struct RadarrClient {
    http: ArrClient,
}

impl RadarrClient {
    pub fn new(http: ArrClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RadarrApi for RadarrClient {
    async fn movie_by_tmdb(&self, tmdb_id: i64) -> Result<Option<RadarrMovie>, MediagateError> {
        let movies: Vec<RadarrMovie> = self
            .http
            .get("/api/v3/movie", &[("tmdbId", tmdb_id.to_string())])
            .await?;
        // Older Radarr builds ignore the filter and return the whole library.
        Ok(movies.into_iter().find(|m| m.tmdb_id == tmdb_id))
    }

    async fn add_movie(&self, movie: &RadarrAddMovie) -> Result<RadarrMovie, MediagateError> {
        self.http.post("/api/v3/movie", movie).await
    }
}
