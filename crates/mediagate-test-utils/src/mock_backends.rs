// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable in-memory Overseerr, Radarr and Sonarr backends.
//!
//! Each mock keeps its state behind a mutex so tests can change what the
//! "backend" reports between reconciliation cycles.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::{Mutex, Notify, Semaphore};

use mediagate_core::backend::{
    OverseerrMediaInfo, OverseerrMovieDetails, OverseerrRequest, OverseerrRequestReceipt,
    OverseerrSearchResult, OverseerrServer, OverseerrTvDetails, RadarrAddMovie, RadarrMovie,
    SonarrAddSeries, SonarrSeries,
};
use mediagate_core::{
    BackendConnector, EpisodeMap, MediagateError, OverseerrApi, RadarrApi, SonarrApi,
};

fn scripted_error(error: &Option<String>) -> Result<(), MediagateError> {
    match error {
        Some(message) => Err(MediagateError::backend(message.clone())),
        None => Ok(()),
    }
}

// --- Overseerr ---

#[derive(Default)]
struct OverseerrState {
    search_results: Vec<OverseerrSearchResult>,
    movie_details: HashMap<i64, OverseerrMovieDetails>,
    tv_details: HashMap<i64, OverseerrTvDetails>,
    details_error: Option<String>,
    radarr_servers: Vec<OverseerrServer>,
    sonarr_servers: Vec<OverseerrServer>,
    requests: Vec<OverseerrRequest>,
    error: Option<String>,
}

#[derive(Default)]
pub struct MockOverseerr {
    state: Mutex<OverseerrState>,
}

impl MockOverseerr {
    pub fn new() -> Self {
        Self::default()
    }

    /// A server entry as Overseerr lists it.
    pub fn server(id: i64, name: &str, is_default: bool) -> OverseerrServer {
        OverseerrServer {
            id,
            name: name.to_string(),
            is_default,
            is_4k: false,
            active_profile_id: None,
            active_directory: None,
        }
    }

    /// A search hit with the given media status (5 available, 4 partial).
    pub fn search_hit(
        tmdb_id: i64,
        media_type: &str,
        title: &str,
        status: i32,
    ) -> OverseerrSearchResult {
        OverseerrSearchResult {
            id: tmdb_id,
            media_type: media_type.to_string(),
            title: Some(title.to_string()),
            name: None,
            media_info: Some(OverseerrMediaInfo {
                status,
                tmdb_id: Some(tmdb_id),
                ..OverseerrMediaInfo::default()
            }),
        }
    }

    pub async fn set_search_results(&self, results: Vec<OverseerrSearchResult>) {
        self.state.lock().await.search_results = results;
    }

    /// Movie details served by id, independent of search results.
    pub async fn set_movie_status(&self, tmdb_id: i64, status: i32) {
        self.state.lock().await.movie_details.insert(
            tmdb_id,
            OverseerrMovieDetails {
                id: tmdb_id,
                media_info: Some(OverseerrMediaInfo {
                    status,
                    tmdb_id: Some(tmdb_id),
                    ..OverseerrMediaInfo::default()
                }),
            },
        );
    }

    pub async fn set_tv_details(&self, details: OverseerrTvDetails) {
        self.state.lock().await.tv_details.insert(details.id, details);
    }

    /// Make `tv_details` fail with `message`, or succeed again with `None`.
    pub async fn fail_details(&self, message: Option<&str>) {
        self.state.lock().await.details_error = message.map(str::to_string);
    }

    pub async fn set_radarr_servers(&self, servers: Vec<OverseerrServer>) {
        self.state.lock().await.radarr_servers = servers;
    }

    pub async fn set_sonarr_servers(&self, servers: Vec<OverseerrServer>) {
        self.state.lock().await.sonarr_servers = servers;
    }

    /// Make every call fail with `message`, or succeed again with `None`.
    pub async fn fail_with(&self, message: Option<&str>) {
        self.state.lock().await.error = message.map(str::to_string);
    }

    /// Requests created so far.
    pub async fn requests(&self) -> Vec<OverseerrRequest> {
        self.state.lock().await.requests.clone()
    }
}

#[async_trait]
impl OverseerrApi for MockOverseerr {
    async fn search(&self, query: &str) -> Result<Vec<OverseerrSearchResult>, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        let query = query.to_lowercase();
        Ok(state
            .search_results
            .iter()
            .filter(|r| {
                r.title
                    .as_deref()
                    .or(r.name.as_deref())
                    .is_some_and(|t| t.to_lowercase().contains(&query))
            })
            .cloned()
            .collect())
    }

    async fn movie_details(&self, tmdb_id: i64) -> Result<OverseerrMovieDetails, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        state
            .movie_details
            .get(&tmdb_id)
            .cloned()
            .ok_or_else(|| MediagateError::backend("Overseerr returned 404 Not Found: Not Found"))
    }

    async fn tv_details(&self, tmdb_id: i64) -> Result<OverseerrTvDetails, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        scripted_error(&state.details_error)?;
        state
            .tv_details
            .get(&tmdb_id)
            .cloned()
            .ok_or_else(|| MediagateError::backend("Overseerr returned 404 Not Found: Not Found"))
    }

    async fn radarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        Ok(state.radarr_servers.clone())
    }

    async fn sonarr_servers(&self) -> Result<Vec<OverseerrServer>, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        Ok(state.sonarr_servers.clone())
    }

    async fn request(
        &self,
        request: &OverseerrRequest,
    ) -> Result<OverseerrRequestReceipt, MediagateError> {
        let mut state = self.state.lock().await;
        scripted_error(&state.error)?;
        state.requests.push(request.clone());
        Ok(OverseerrRequestReceipt {
            id: state.requests.len() as i64,
            status: 2,
        })
    }
}

// --- Radarr ---

#[derive(Default)]
struct RadarrState {
    movies: HashMap<i64, RadarrMovie>,
    added: Vec<RadarrAddMovie>,
    error: Option<String>,
    /// Closed to let held lookups through.
    gate: Option<Arc<Semaphore>>,
}

#[derive(Default)]
pub struct MockRadarr {
    state: Mutex<RadarrState>,
    lookups: AtomicUsize,
    lookup_started: Notify,
}

impl MockRadarr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a movie in the library, with or without a file on disk.
    pub async fn set_movie(&self, tmdb_id: i64, title: &str, has_file: bool) {
        let mut state = self.state.lock().await;
        let id = state.movies.len() as i64 + 1;
        state.movies.insert(
            tmdb_id,
            RadarrMovie {
                id,
                title: title.to_string(),
                tmdb_id,
                year: None,
                has_file,
                monitored: true,
            },
        );
    }

    pub async fn fail_with(&self, message: Option<&str>) {
        self.state.lock().await.error = message.map(str::to_string);
    }

    /// Add-movie bodies received so far.
    pub async fn added(&self) -> Vec<RadarrAddMovie> {
        self.state.lock().await.added.clone()
    }

    /// Block every `movie_by_tmdb` call until [`Self::release_lookups`].
    pub async fn hold_lookups(&self) {
        self.state.lock().await.gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub async fn release_lookups(&self) {
        if let Some(gate) = self.state.lock().await.gate.take() {
            gate.close();
        }
    }

    /// Number of `movie_by_tmdb` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Resolves once a `movie_by_tmdb` call has begun, including one that
    /// began before this was awaited.
    pub async fn lookup_started(&self) {
        self.lookup_started.notified().await;
    }
}

#[async_trait]
impl RadarrApi for MockRadarr {
    async fn movie_by_tmdb(&self, tmdb_id: i64) -> Result<Option<RadarrMovie>, MediagateError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.lookup_started.notify_one();
        let gate = self.state.lock().await.gate.clone();
        if let Some(gate) = gate {
            // Only ever closed, never given permits.
            let _ = gate.acquire().await;
        }
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        Ok(state.movies.get(&tmdb_id).cloned())
    }

    async fn add_movie(&self, movie: &RadarrAddMovie) -> Result<RadarrMovie, MediagateError> {
        let mut state = self.state.lock().await;
        scripted_error(&state.error)?;
        state.added.push(movie.clone());
        let added = RadarrMovie {
            id: state.movies.len() as i64 + 1,
            title: movie.title.clone(),
            tmdb_id: movie.tmdb_id,
            year: movie.year,
            has_file: false,
            monitored: movie.monitored,
        };
        state.movies.insert(movie.tmdb_id, added.clone());
        Ok(added)
    }
}

// --- Sonarr ---

#[derive(Default)]
struct SonarrState {
    series: Vec<SonarrSeries>,
    episodes: HashMap<i64, EpisodeMap>,
    episodes_error: Option<String>,
    added: Vec<SonarrAddSeries>,
    error: Option<String>,
}

#[derive(Default)]
pub struct MockSonarr {
    state: Mutex<SonarrState>,
}

impl MockSonarr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a series (matched by TVDB id).
    pub async fn set_series(&self, series: SonarrSeries) {
        let mut state = self.state.lock().await;
        state.series.retain(|s| s.tvdb_id != series.tvdb_id);
        state.series.push(series);
    }

    pub async fn set_episodes(&self, series_id: i64, episodes: EpisodeMap) {
        self.state.lock().await.episodes.insert(series_id, episodes);
    }

    pub async fn fail_episodes(&self, message: Option<&str>) {
        self.state.lock().await.episodes_error = message.map(str::to_string);
    }

    pub async fn fail_with(&self, message: Option<&str>) {
        self.state.lock().await.error = message.map(str::to_string);
    }

    pub async fn added(&self) -> Vec<SonarrAddSeries> {
        self.state.lock().await.added.clone()
    }
}

#[async_trait]
impl SonarrApi for MockSonarr {
    async fn series_by_tvdb(
        &self,
        tvdb_id: i64,
    ) -> Result<Option<SonarrSeries>, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        Ok(state.series.iter().find(|s| s.tvdb_id == tvdb_id).cloned())
    }

    async fn all_series(&self) -> Result<Vec<SonarrSeries>, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        Ok(state.series.clone())
    }

    async fn available_episodes(&self, series_id: i64) -> Result<EpisodeMap, MediagateError> {
        let state = self.state.lock().await;
        scripted_error(&state.error)?;
        scripted_error(&state.episodes_error)?;
        Ok(state.episodes.get(&series_id).cloned().unwrap_or_default())
    }

    async fn add_series(&self, series: &SonarrAddSeries) -> Result<SonarrSeries, MediagateError> {
        let mut state = self.state.lock().await;
        scripted_error(&state.error)?;
        state.added.push(series.clone());
        let added = SonarrSeries {
            id: state.series.len() as i64 + 1,
            title: series.title.clone(),
            tvdb_id: series.tvdb_id,
            year: series.year,
            seasons: Vec::new(),
        };
        state.series.push(added.clone());
        Ok(added)
    }
}

// --- Connector ---

/// Hands out the same mock instances for every binding.
#[derive(Default, Clone)]
pub struct MockConnector {
    pub overseerr: Arc<MockOverseerr>,
    pub radarr: Arc<MockRadarr>,
    pub sonarr: Arc<MockSonarr>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackendConnector for MockConnector {
    fn overseerr(
        &self,
        _base_url: &str,
        _api_key: &SecretString,
    ) -> Result<Arc<dyn OverseerrApi>, MediagateError> {
        Ok(self.overseerr.clone())
    }

    fn radarr(
        &self,
        _base_url: &str,
        _api_key: &SecretString,
    ) -> Result<Arc<dyn RadarrApi>, MediagateError> {
        Ok(self.radarr.clone())
    }

    fn sonarr(
        &self,
        _base_url: &str,
        _api_key: &SecretString,
    ) -> Result<Arc<dyn SonarrApi>, MediagateError> {
        Ok(self.sonarr.clone())
    }
}
