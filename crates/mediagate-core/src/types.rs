// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the port traits and the request engine.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Season numbers, always sorted and unique.
pub type SeasonSet = BTreeSet<u32>;

/// Episode numbers keyed by season number.
pub type EpisodeMap = BTreeMap<u32, BTreeSet<u32>>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of pluggable adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Messenger,
    Storage,
}

/// What a request asks for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

/// Authoritative lifecycle state of a [`MediaRequest`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Submitted,
    Failed,
}

impl RequestStatus {
    /// Terminal states are never left again by the engine.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether the engine may move a request from `self` to `next`.
    ///
    /// `Failed -> Failed` is a re-approval that failed again.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Pending, Submitted | Failed | Rejected)
                | (Failed, Submitted | Failed | Rejected)
                | (Submitted, Approved)
        )
    }
}

/// Downstream backend flavour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Request aggregator forwarding to the acquirers it manages.
    Overseerr,
    /// Movie acquirer.
    Radarr,
    /// Series acquirer.
    Sonarr,
}

impl ServiceKind {
    /// Whether a binding of this kind can accept requests for `media_type`.
    pub fn serves(self, media_type: MediaType) -> bool {
        match self {
            Self::Overseerr => true,
            Self::Radarr => media_type == MediaType::Movie,
            Self::Sonarr => media_type == MediaType::Series,
        }
    }
}

/// Policy mode applied to ordinary contacts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    #[default]
    AutoApprove,
    Manual,
    AutoDeny,
}

/// The active approval policy with its per-contact exceptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    pub mode: ApprovalMode,
    pub exceptions_enabled: bool,
    /// Contact hashes that receive the opposite treatment.
    pub exception_contacts: BTreeSet<String>,
}

impl ApprovalPolicy {
    /// Exception membership only counts while exceptions are enabled.
    pub fn is_exception(&self, contact_hash: &str) -> bool {
        self.exceptions_enabled && self.exception_contacts.contains(contact_hash)
    }
}

/// A configured downstream backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub id: i64,
    pub kind: ServiceKind,
    pub name: String,
    pub base_url: String,
    /// Encrypted API key; decrypt only immediately before a call.
    pub api_key_enc: String,
    /// Lower numbers win among bindings of the same kind.
    pub priority: i32,
    pub enabled: bool,
    pub quality_profile_id: Option<i64>,
    pub root_folder: Option<String>,
    pub language_profile_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields for registering a new backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceBinding {
    pub kind: ServiceKind,
    pub name: String,
    pub base_url: String,
    pub api_key_enc: String,
    pub priority: i32,
    pub enabled: bool,
    pub quality_profile_id: Option<i64>,
    pub root_folder: Option<String>,
    pub language_profile_id: Option<i64>,
}

/// A structured media selection handed over by the conversational front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSelection {
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    /// Empty means every season.
    #[serde(default)]
    pub seasons: SeasonSet,
}

/// One user-initiated desire for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRequest {
    pub id: i64,
    /// One-way hash of the contact address; used for lookups.
    pub contact_hash: String,
    /// Encrypted raw address, kept only to deliver notifications.
    pub contact_address_enc: Option<String>,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    pub service_kind: Option<ServiceKind>,
    pub service_id: Option<i64>,
    pub selected_seasons: SeasonSet,
    pub notified_seasons: SeasonSet,
    pub notified_episodes: EpisodeMap,
    pub total_seasons: u32,
    /// A bare "partially available" notice was already sent.
    pub partial_notified: bool,
    pub status: RequestStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaRequest {
    /// Title with the year in parentheses when known.
    pub fn display_title(&self) -> String {
        display_title(&self.title, self.year)
    }

    /// Apply a partial update in place, bumping `updated_at`.
    pub fn apply(&mut self, update: &RequestUpdate, now: DateTime<Utc>) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(submitted_at) = update.submitted_at {
            self.submitted_at = Some(submitted_at);
        }
        if let Some(error_message) = &update.error_message {
            self.error_message = error_message.clone();
        }
        if let Some(admin_notes) = &update.admin_notes {
            self.admin_notes = admin_notes.clone();
        }
        if let Some(kind) = update.service_kind {
            self.service_kind = Some(kind);
        }
        if let Some(id) = update.service_id {
            self.service_id = Some(id);
        }
        if let Some(seasons) = &update.notified_seasons {
            self.notified_seasons = seasons.clone();
        }
        if let Some(episodes) = &update.notified_episodes {
            self.notified_episodes = episodes.clone();
        }
        if let Some(total) = update.total_seasons {
            self.total_seasons = total;
        }
        if let Some(flag) = update.partial_notified {
            self.partial_notified = flag;
        }
        self.updated_at = now;
    }
}

/// Render `"Title (Year)"`, or just the title when the year is unknown.
pub fn display_title(title: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("{title} ({year})"),
        None => title.to_string(),
    }
}

/// Fields for persisting a freshly decided request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaRequest {
    pub contact_hash: String,
    pub contact_address_enc: Option<String>,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    pub service_kind: Option<ServiceKind>,
    pub service_id: Option<i64>,
    pub selected_seasons: SeasonSet,
    pub status: RequestStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub admin_notes: Option<String>,
}

impl NewMediaRequest {
    /// Start a record from a selection; binding and outcome fields are unset.
    pub fn from_selection(
        contact_hash: impl Into<String>,
        contact_address_enc: Option<String>,
        selection: &MediaSelection,
        status: RequestStatus,
    ) -> Self {
        Self {
            contact_hash: contact_hash.into(),
            contact_address_enc,
            media_type: selection.media_type,
            title: selection.title.clone(),
            year: selection.year,
            tmdb_id: selection.tmdb_id,
            tvdb_id: selection.tvdb_id,
            service_kind: None,
            service_id: None,
            selected_seasons: selection.seasons.clone(),
            status,
            submitted_at: None,
            error_message: None,
            admin_notes: None,
        }
    }
}

/// A partial update. `None` leaves a field untouched; the doubly-optional
/// text fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestUpdate {
    pub status: Option<RequestStatus>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub error_message: Option<Option<String>>,
    pub admin_notes: Option<Option<String>>,
    pub service_kind: Option<ServiceKind>,
    pub service_id: Option<i64>,
    pub notified_seasons: Option<SeasonSet>,
    pub notified_episodes: Option<EpisodeMap>,
    pub total_seasons: Option<u32>,
    pub partial_notified: Option<bool>,
}

impl RequestUpdate {
    pub fn status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(at);
        self
    }

    pub fn error_message(mut self, message: Option<String>) -> Self {
        self.error_message = Some(message);
        self
    }

    pub fn admin_notes(mut self, notes: Option<String>) -> Self {
        self.admin_notes = Some(notes);
        self
    }

    pub fn binding(mut self, kind: ServiceKind, id: i64) -> Self {
        self.service_kind = Some(kind);
        self.service_id = Some(id);
        self
    }

    pub fn notified_seasons(mut self, seasons: SeasonSet) -> Self {
        self.notified_seasons = Some(seasons);
        self
    }

    pub fn notified_episodes(mut self, episodes: EpisodeMap) -> Self {
        self.notified_episodes = Some(episodes);
        self
    }

    pub fn total_seasons(mut self, total: u32) -> Self {
        self.total_seasons = Some(total);
        self
    }

    pub fn partial_notified(mut self, flag: bool) -> Self {
        self.partial_notified = Some(flag);
        self
    }

    /// True when applying this update would change nothing but `updated_at`.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalised availability snapshot for one request, from one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    pub is_available: bool,
    pub is_partial: bool,
    pub available_seasons: SeasonSet,
    /// Per-episode data, when the backend exposes it.
    pub available_episodes: Option<EpisodeMap>,
    pub total_seasons: u32,
    /// Season breakdown could not be fetched; only the headline status is known.
    pub season_detail_missing: bool,
}

/// Result of `decide_and_process` as returned to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    pub success: bool,
    pub request_id: i64,
    pub status: RequestStatus,
    pub error_message: Option<String>,
}
