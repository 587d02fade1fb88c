// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalised availability lookups against the bound backend.

use std::sync::Arc;

use mediagate_core::backend::{
    OVERSEERR_STATUS_AVAILABLE, OVERSEERR_STATUS_PARTIALLY_AVAILABLE, SonarrSeries,
};
use mediagate_core::{
    Availability, BackendConnector, MediaRequest, MediaType, MediagateError, SeasonSet,
    SecretCipher, ServiceBinding, ServiceKind,
};
use tracing::{debug, warn};

fn overseerr_counts_as_available(status: i32) -> bool {
    status == OVERSEERR_STATUS_AVAILABLE || status == OVERSEERR_STATUS_PARTIALLY_AVAILABLE
}

/// Season availability from Sonarr statistics: every aired episode has a file.
/// Specials (season 0) and seasons with nothing aired yet never count.
pub fn sonarr_available_seasons(series: &SonarrSeries) -> (SeasonSet, u32) {
    let mut available = SeasonSet::new();
    let mut total = 0;
    for season in series.seasons.iter().filter(|s| s.season_number > 0) {
        total = total.max(season.season_number);
        let Some(stats) = &season.statistics else {
            continue;
        };
        if stats.episode_count > 0 && stats.episode_file_count >= stats.episode_count {
            available.insert(season.season_number);
        }
    }
    (available, total)
}

pub struct AvailabilityChecker {
    connector: Arc<dyn BackendConnector>,
    cipher: Arc<dyn SecretCipher>,
}

impl AvailabilityChecker {
    pub fn new(connector: Arc<dyn BackendConnector>, cipher: Arc<dyn SecretCipher>) -> Self {
        Self { connector, cipher }
    }

    /// Poll `binding` for `request`'s title.
    pub async fn check(
        &self,
        request: &MediaRequest,
        binding: &ServiceBinding,
    ) -> Result<Availability, MediagateError> {
        if !binding.kind.serves(request.media_type) {
            return Err(MediagateError::Policy(format!(
                "{} cannot handle {} requests",
                binding.kind, request.media_type
            )));
        }
        match binding.kind {
            ServiceKind::Overseerr => self.check_overseerr(request, binding).await,
            ServiceKind::Radarr => self.check_radarr(request, binding).await,
            ServiceKind::Sonarr => self.check_sonarr(request, binding).await,
        }
    }

    async fn check_overseerr(
        &self,
        request: &MediaRequest,
        binding: &ServiceBinding,
    ) -> Result<Availability, MediagateError> {
        let tmdb_id = request.tmdb_id.ok_or_else(|| {
            MediagateError::Policy(format!(
                "Missing TMDB ID for {} request",
                request.media_type
            ))
        })?;
        let wanted_type = match request.media_type {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        };

        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let overseerr = self.connector.overseerr(&binding.base_url, &api_key)?;

        let results = overseerr.search(&request.title).await?;
        let hit = results
            .into_iter()
            .find(|r| r.id == tmdb_id && r.media_type == wanted_type);

        // Search is read one page deep; a miss there falls back to the
        // details endpoint keyed on the TMDB id.
        let mut tv_details = None;
        let media_info = match hit {
            Some(hit) => hit.media_info,
            None => {
                debug!(
                    request_id = request.id,
                    "title not on first search page, reading details"
                );
                let details = match request.media_type {
                    MediaType::Movie => overseerr
                        .movie_details(tmdb_id)
                        .await
                        .map(|d| d.media_info),
                    MediaType::Series => overseerr.tv_details(tmdb_id).await.map(|d| {
                        tv_details = Some(d.clone());
                        d.media_info
                    }),
                };
                match details {
                    Ok(info) => info,
                    Err(e) => {
                        debug!(request_id = request.id, error = %e, "title not found in Overseerr");
                        return Ok(Availability::default());
                    }
                }
            }
        };

        let status = media_info.map(|m| m.status).unwrap_or_default();
        let mut availability = Availability {
            is_available: overseerr_counts_as_available(status),
            is_partial: status == OVERSEERR_STATUS_PARTIALLY_AVAILABLE,
            ..Availability::default()
        };
        if request.media_type == MediaType::Movie || !availability.is_available {
            return Ok(availability);
        }

        let details = match tv_details {
            Some(details) => Ok(details),
            None => overseerr.tv_details(tmdb_id).await,
        };
        match details {
            Ok(details) => {
                let seasons = details
                    .media_info
                    .map(|m| m.seasons)
                    .unwrap_or_default();
                availability.available_seasons = seasons
                    .iter()
                    .filter(|s| s.season_number > 0 && overseerr_counts_as_available(s.status))
                    .map(|s| s.season_number)
                    .collect();
                let highest = details
                    .seasons
                    .iter()
                    .map(|s| s.season_number)
                    .max()
                    .unwrap_or(0);
                availability.total_seasons = details.number_of_seasons.max(highest);
            }
            Err(e) => {
                warn!(
                    request_id = request.id,
                    error = %e,
                    "season details unavailable, falling back to headline status"
                );
                availability.season_detail_missing = true;
            }
        }
        Ok(availability)
    }

    async fn check_radarr(
        &self,
        request: &MediaRequest,
        binding: &ServiceBinding,
    ) -> Result<Availability, MediagateError> {
        let tmdb_id = request.tmdb_id.ok_or_else(|| {
            MediagateError::Policy("Missing TMDB ID for movie request".to_string())
        })?;
        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let radarr = self.connector.radarr(&binding.base_url, &api_key)?;

        let has_file = radarr
            .movie_by_tmdb(tmdb_id)
            .await?
            .is_some_and(|movie| movie.has_file);
        Ok(Availability {
            is_available: has_file,
            ..Availability::default()
        })
    }

    async fn check_sonarr(
        &self,
        request: &MediaRequest,
        binding: &ServiceBinding,
    ) -> Result<Availability, MediagateError> {
        let tvdb_id = request.tvdb_id.ok_or_else(|| {
            MediagateError::Policy("Missing TVDB ID for series request".to_string())
        })?;
        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let sonarr = self.connector.sonarr(&binding.base_url, &api_key)?;

        let Some(series) = sonarr.series_by_tvdb(tvdb_id).await? else {
            debug!(request_id = request.id, tvdb_id, "series not in Sonarr yet");
            return Ok(Availability::default());
        };

        let (available_seasons, total_seasons) = sonarr_available_seasons(&series);
        let available_episodes = match sonarr.available_episodes(series.id).await {
            Ok(episodes) => Some(episodes),
            Err(e) => {
                warn!(
                    request_id = request.id,
                    error = %e,
                    "episode listing unavailable, skipping episode reconciliation"
                );
                None
            }
        };

        let complete = total_seasons > 0 && available_seasons.len() as u32 == total_seasons;
        Ok(Availability {
            is_available: !available_seasons.is_empty(),
            is_partial: !available_seasons.is_empty() && !complete,
            available_seasons,
            available_episodes,
            total_seasons,
            season_detail_missing: false,
        })
    }
}
