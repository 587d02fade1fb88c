// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload types exchanged with Overseerr, Radarr and Sonarr.
//!
//! Field names follow the backends' camelCase JSON so the HTTP clients can
//! (de)serialize these directly; mocks construct them by hand.

use serde::{Deserialize, Serialize, Serializer};

/// Overseerr media status: every part of the title is available.
pub const OVERSEERR_STATUS_AVAILABLE: i32 = 5;

/// Overseerr media status: some of the title is available.
pub const OVERSEERR_STATUS_PARTIALLY_AVAILABLE: i32 = 4;

// --- Overseerr ---

/// One hit from Overseerr's `/search` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrSearchResult {
    /// TMDB id of the hit.
    pub id: i64,
    /// `"movie"`, `"tv"` or `"person"`.
    pub media_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub media_info: Option<OverseerrMediaInfo>,
}

/// Overseerr's local knowledge about a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrMediaInfo {
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub tvdb_id: Option<i64>,
    #[serde(default)]
    pub seasons: Vec<OverseerrSeasonStatus>,
}

/// Availability status of one season as tracked by Overseerr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrSeasonStatus {
    pub season_number: u32,
    #[serde(default)]
    pub status: i32,
}

/// Season listing from TMDB metadata, as relayed by Overseerr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrSeasonInfo {
    pub season_number: u32,
    #[serde(default)]
    pub episode_count: u32,
}

/// Response of Overseerr's `/movie/{tmdbId}` endpoint, reduced to what
/// availability needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrMovieDetails {
    pub id: i64,
    #[serde(default)]
    pub media_info: Option<OverseerrMediaInfo>,
}

/// Response of Overseerr's `/tv/{tmdbId}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrTvDetails {
    pub id: i64,
    #[serde(default)]
    pub number_of_seasons: u32,
    #[serde(default)]
    pub seasons: Vec<OverseerrSeasonInfo>,
    #[serde(default)]
    pub media_info: Option<OverseerrMediaInfo>,
}

/// A Radarr or Sonarr instance that Overseerr forwards requests to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrServer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, rename = "is4k")]
    pub is_4k: bool,
    #[serde(default)]
    pub active_profile_id: Option<i64>,
    #[serde(default)]
    pub active_directory: Option<String>,
}

/// Seasons forwarded with a series request: explicit numbers or every season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSelection {
    All,
    Seasons(Vec<u32>),
}

impl Serialize for SeasonSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Seasons(seasons) => seasons.serialize(serializer),
        }
    }
}

/// Body of `POST /request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrRequest {
    /// `"movie"` or `"tv"`.
    pub media_type: String,
    /// TMDB id of the title.
    pub media_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<SeasonSelection>,
    pub server_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,
    #[serde(rename = "is4k")]
    pub is_4k: bool,
}

/// The part of Overseerr's created-request response we keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverseerrRequestReceipt {
    pub id: i64,
    #[serde(default)]
    pub status: i32,
}

// --- Radarr ---

/// A movie in Radarr's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrMovie {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub tmdb_id: i64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
}

/// Body of Radarr's `POST /api/v3/movie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrAddMovie {
    pub title: String,
    pub tmdb_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub title_slug: String,
    pub quality_profile_id: i64,
    pub root_folder_path: String,
    pub monitored: bool,
    pub add_options: RadarrAddOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrAddOptions {
    pub search_for_movie: bool,
}

// --- Sonarr ---

/// A series in Sonarr's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeries {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub tvdb_id: i64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub seasons: Vec<SonarrSeason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeason {
    pub season_number: u32,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub statistics: Option<SonarrSeasonStatistics>,
}

/// Per-season counters. `episode_count` counts aired episodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrSeasonStatistics {
    #[serde(default)]
    pub episode_file_count: u32,
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub total_episode_count: u32,
}

/// One entry of Sonarr's `/api/v3/episode?seriesId=` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrEpisode {
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub has_file: bool,
}

/// Body of Sonarr's `POST /api/v3/series`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrAddSeries {
    pub title: String,
    pub tvdb_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub title_slug: String,
    pub quality_profile_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_profile_id: Option<i64>,
    pub root_folder_path: String,
    pub monitored: bool,
    pub season_folder: bool,
    pub add_options: SonarrAddOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrAddOptions {
    pub search_for_missing_episodes: bool,
}
