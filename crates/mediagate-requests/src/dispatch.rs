// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission dispatcher.
//!
//! Performs the backend-specific create/request call for an approved
//! request. The binding's API key is decrypted right before the call and
//! dropped with the client when the call returns.

use std::sync::{Arc, LazyLock};

use mediagate_config::model::DispatchConfig;
use mediagate_core::backend::{
    OverseerrRequest, OverseerrServer, RadarrAddMovie, RadarrAddOptions, SeasonSelection,
    SonarrAddOptions, SonarrAddSeries,
};
use mediagate_core::{
    BackendConnector, MediaRequest, MediaType, MediagateError, NewMediaRequest, SeasonSet,
    SecretCipher, ServiceBinding, ServiceKind,
};
use regex::Regex;
use tracing::{debug, info};

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

/// URL-safe slug: `title_slug("The Matrix", 603) == "the-matrix-603"`.
pub fn title_slug(title: &str, id: i64) -> String {
    let lowered = format!("{title}-{id}").to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// The request fields the dispatcher reads.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub media_type: MediaType,
    pub title: &'a str,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    pub selected_seasons: &'a SeasonSet,
}

impl<'a> From<&'a MediaRequest> for Submission<'a> {
    fn from(request: &'a MediaRequest) -> Self {
        Self {
            media_type: request.media_type,
            title: &request.title,
            year: request.year,
            tmdb_id: request.tmdb_id,
            tvdb_id: request.tvdb_id,
            selected_seasons: &request.selected_seasons,
        }
    }
}

impl<'a> From<&'a NewMediaRequest> for Submission<'a> {
    fn from(request: &'a NewMediaRequest) -> Self {
        Self {
            media_type: request.media_type,
            title: &request.title,
            year: request.year,
            tmdb_id: request.tmdb_id,
            tvdb_id: request.tvdb_id,
            selected_seasons: &request.selected_seasons,
        }
    }
}

fn missing_id(kind: &str, media_type: MediaType) -> MediagateError {
    MediagateError::Policy(format!("Missing {kind} ID for {media_type} request"))
}

/// Default server if one is flagged, else the first one listed.
pub fn pick_server(servers: &[OverseerrServer]) -> Option<&OverseerrServer> {
    servers.iter().find(|s| s.is_default).or_else(|| servers.first())
}

pub struct Dispatcher {
    connector: Arc<dyn BackendConnector>,
    cipher: Arc<dyn SecretCipher>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        connector: Arc<dyn BackendConnector>,
        cipher: Arc<dyn SecretCipher>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            connector,
            cipher,
            config,
        }
    }

    /// Submit to `binding`. Any error means the submission failed.
    pub async fn submit(
        &self,
        binding: &ServiceBinding,
        submission: Submission<'_>,
    ) -> Result<(), MediagateError> {
        if !binding.enabled {
            return Err(MediagateError::Policy(format!(
                "Service '{}' is disabled",
                binding.name
            )));
        }
        if !binding.kind.serves(submission.media_type) {
            return Err(MediagateError::Policy(format!(
                "{} cannot handle {} requests",
                binding.kind, submission.media_type
            )));
        }

        debug!(
            service_id = binding.id,
            kind = %binding.kind,
            title = submission.title,
            "dispatching request"
        );
        match binding.kind {
            ServiceKind::Radarr => self.submit_radarr(binding, submission).await,
            ServiceKind::Sonarr => self.submit_sonarr(binding, submission).await,
            ServiceKind::Overseerr => self.submit_overseerr(binding, submission).await,
        }
    }

    async fn submit_radarr(
        &self,
        binding: &ServiceBinding,
        submission: Submission<'_>,
    ) -> Result<(), MediagateError> {
        let tmdb_id = submission
            .tmdb_id
            .ok_or_else(|| missing_id("TMDB", MediaType::Movie))?;
        let movie = RadarrAddMovie {
            title: submission.title.to_string(),
            tmdb_id,
            year: submission.year,
            title_slug: title_slug(submission.title, tmdb_id),
            quality_profile_id: binding
                .quality_profile_id
                .unwrap_or(self.config.default_quality_profile_id),
            root_folder_path: binding
                .root_folder
                .clone()
                .unwrap_or_else(|| self.config.default_movie_root.clone()),
            monitored: true,
            add_options: RadarrAddOptions {
                search_for_movie: true,
            },
        };

        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let radarr = self.connector.radarr(&binding.base_url, &api_key)?;
        let added = radarr.add_movie(&movie).await?;
        info!(service_id = binding.id, radarr_id = added.id, "movie added to Radarr");
        Ok(())
    }

    async fn submit_sonarr(
        &self,
        binding: &ServiceBinding,
        submission: Submission<'_>,
    ) -> Result<(), MediagateError> {
        let tvdb_id = submission
            .tvdb_id
            .ok_or_else(|| missing_id("TVDB", MediaType::Series))?;
        let series = SonarrAddSeries {
            title: submission.title.to_string(),
            tvdb_id,
            year: submission.year,
            title_slug: title_slug(submission.title, tvdb_id),
            quality_profile_id: binding
                .quality_profile_id
                .unwrap_or(self.config.default_quality_profile_id),
            language_profile_id: Some(
                binding
                    .language_profile_id
                    .unwrap_or(self.config.default_language_profile_id),
            ),
            root_folder_path: binding
                .root_folder
                .clone()
                .unwrap_or_else(|| self.config.default_series_root.clone()),
            monitored: true,
            season_folder: true,
            add_options: SonarrAddOptions {
                search_for_missing_episodes: true,
            },
        };

        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let sonarr = self.connector.sonarr(&binding.base_url, &api_key)?;
        let added = sonarr.add_series(&series).await?;
        info!(service_id = binding.id, sonarr_id = added.id, "series added to Sonarr");
        Ok(())
    }

    async fn submit_overseerr(
        &self,
        binding: &ServiceBinding,
        submission: Submission<'_>,
    ) -> Result<(), MediagateError> {
        let media_type = submission.media_type;
        let tmdb_id = submission
            .tmdb_id
            .ok_or_else(|| missing_id("TMDB", media_type))?;

        let api_key = self.cipher.decrypt(&binding.api_key_enc)?;
        let overseerr = self.connector.overseerr(&binding.base_url, &api_key)?;

        let (servers, acquirer) = match media_type {
            MediaType::Movie => (overseerr.radarr_servers().await?, "Radarr"),
            MediaType::Series => (overseerr.sonarr_servers().await?, "Sonarr"),
        };
        let server = pick_server(&servers).ok_or_else(|| {
            MediagateError::Policy(format!("No {acquirer} server configured in Overseerr"))
        })?;

        let request = OverseerrRequest {
            media_type: match media_type {
                MediaType::Movie => "movie".to_string(),
                MediaType::Series => "tv".to_string(),
            },
            media_id: tmdb_id,
            tvdb_id: match media_type {
                MediaType::Movie => None,
                MediaType::Series => submission.tvdb_id,
            },
            seasons: match media_type {
                MediaType::Movie => None,
                MediaType::Series if submission.selected_seasons.is_empty() => {
                    Some(SeasonSelection::All)
                }
                MediaType::Series => Some(SeasonSelection::Seasons(
                    submission.selected_seasons.iter().copied().collect(),
                )),
            },
            server_id: server.id,
            profile_id: match self.config.overseerr_profile_id {
                0 => None,
                id => Some(id),
            },
            is_4k: server.is_4k,
        };

        let receipt = overseerr.request(&request).await?;
        info!(
            service_id = binding.id,
            overseerr_request_id = receipt.id,
            server = %server.name,
            "request created in Overseerr"
        );
        Ok(())
    }
}
