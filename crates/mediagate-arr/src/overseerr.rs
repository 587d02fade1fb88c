// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Overseerr API v1 client.

use async_trait::async_trait;
use mediagate_core::backend::{
    OverseerrMovieDetails, OverseerrRequest, OverseerrRequestReceipt, OverseerrSearchResult,
    OverseerrServer, OverseerrTvDetails,
};
use mediagate_core::{MediagateError, OverseerrApi};
use serde::Deserialize;

use crate::client::ArrClient;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<OverseerrSearchResult>,
}

pub struct OverseerrClient {
    http: ArrClient,
}

impl OverseerrClient {
    pub fn new(http: ArrClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl OverseerrApi for OverseerrClient {
    /// Only the first page is fetched. Callers that miss a title here read
    /// it by id through the details endpoints.
    async fn search(&self, query: &str) -> Result<Vec<OverseerrSearchResult>, MediagateError> {
        let page: SearchPage = self
            .http
            .get(
                "/api/v1/search",
                &[("query", query.to_string()), ("page", "1".to_string())],
            )
            .await?;
        Ok(page.results)
    }

    async fn movie_details(&self, tmdb_id: i64) -> Result<OverseerrMovieDetails, MediagateError> {
        self.http.get(&format!("/api/v1/movie/{tmdb_id}"), &[]).await
    }

    async fn tv_details(&self, tmdb_id: i64) -> Result<OverseerrTvDetails, MediagateError> {
        self.http.get(&format!("/api/v1/tv/{tmdb_id}"), &[]).await
    }

    async fn radarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError> {
        self.http.get("/api/v1/service/radarr", &[]).await
    }

    async fn sonarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError> {
        self.http.get("/api/v1/service/sonarr", &[]).await
    }

    async fn request(
        &self,
        request: &OverseerrRequest,
    ) -> Result<OverseerrRequestReceipt, MediagateError> {
        self.http.post("/api/v1/request", request).await
    }
}
