// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure season and episode reconciliation.
//!
//! Given a request's stored notified-state and one availability snapshot,
//! compute the notices to send and the update to persist. Nothing here
//! touches storage or the network; the monitor applies the result.
//!
//! Notified seasons, notified episodes and `total_seasons` only ever grow.

use std::collections::BTreeSet;

use mediagate_core::{
    Availability, EpisodeMap, MediaRequest, MediaType, RequestStatus, RequestUpdate, SeasonSet,
};

use crate::messages;

/// One outbound notification, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The whole title (or some of it, for `partial`) became available.
    Available { partial: bool },
    /// A bare "partially available" notice without a season list.
    PartiallyAvailable,
    /// Requested seasons became available; `completes` marks the last of them.
    SeasonsAvailable { seasons: Vec<u32>, completes: bool },
    /// Seasons past the highest requested one became available.
    SeasonsBeyondRequest(Vec<u32>),
    /// The backend now knows about more seasons than before.
    SeasonsAnnounced(Vec<u32>),
    /// The request completed in a cycle without season notices.
    RequestComplete,
    /// New episodes as `(season, episode)`, sorted ascending.
    Episodes(Vec<(u32, u32)>),
}

impl Notice {
    pub fn render(&self, title: &str) -> String {
        match self {
            Self::Available { partial } => messages::now_available(title, *partial),
            Self::PartiallyAvailable => messages::now_available(title, true),
            Self::SeasonsAvailable { seasons, completes } => {
                messages::seasons_available(title, seasons, *completes)
            }
            Self::SeasonsBeyondRequest(seasons) => messages::seasons_beyond_request(title, seasons),
            Self::SeasonsAnnounced(seasons) => messages::seasons_announced(title, seasons),
            Self::RequestComplete => messages::request_complete(title),
            Self::Episodes(episodes) => messages::episodes_available(title, episodes),
        }
    }
}

/// Outcome of reconciling one request against one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// In send order: season notices first, then episodes.
    pub notices: Vec<Notice>,
    /// Empty when nothing changed.
    pub update: RequestUpdate,
}

impl Reconciliation {
    /// Whether this reconciliation moves the request to APPROVED.
    pub fn approves(&self) -> bool {
        self.update.status == Some(RequestStatus::Approved)
    }
}

/// Dispatch on media type.
pub fn reconcile(request: &MediaRequest, availability: &Availability) -> Reconciliation {
    match request.media_type {
        MediaType::Movie => reconcile_movie(request, availability),
        MediaType::Series => reconcile_series(request, availability),
    }
}

pub fn reconcile_movie(request: &MediaRequest, availability: &Availability) -> Reconciliation {
    let mut out = Reconciliation::default();
    if availability.is_available && request.status == RequestStatus::Submitted {
        out.notices.push(Notice::Available {
            partial: availability.is_partial,
        });
        out.update = RequestUpdate::default().status(RequestStatus::Approved);
    }
    out
}

/// Seasons the request covers this cycle. An empty selection means every
/// season the backend currently knows about.
pub fn requested_seasons(selected: &SeasonSet, total_seasons: u32) -> SeasonSet {
    if selected.is_empty() {
        (1..=total_seasons).collect()
    } else {
        selected.clone()
    }
}

pub fn reconcile_series(request: &MediaRequest, availability: &Availability) -> Reconciliation {
    let mut notices = Vec::new();
    let mut update = RequestUpdate::default();
    let still_submitted = request.status == RequestStatus::Submitted;

    // Announced seasons. First population is silent.
    let stored_total = request.total_seasons;
    let total = stored_total.max(availability.total_seasons);
    if total > stored_total {
        if stored_total > 0 {
            notices.push(Notice::SeasonsAnnounced((stored_total + 1..=total).collect()));
        }
        update = update.total_seasons(total);
    }

    if availability.season_detail_missing {
        if availability.is_available && !availability.is_partial {
            if still_submitted {
                notices.insert(0, Notice::Available { partial: false });
                update = update.status(RequestStatus::Approved);
            }
        } else if availability.is_partial && !request.partial_notified {
            notices.insert(0, Notice::PartiallyAvailable);
            update = update.partial_notified(true);
        }
        return Reconciliation { notices, update };
    }

    let available: SeasonSet = availability
        .available_seasons
        .iter()
        .copied()
        .filter(|s| *s > 0)
        .collect();
    let requested = requested_seasons(&request.selected_seasons, total);
    let newly: SeasonSet = available
        .difference(&request.notified_seasons)
        .copied()
        .collect();

    let requested_new: Vec<u32> = newly.intersection(&requested).copied().collect();
    let beyond: Vec<u32> = match request.selected_seasons.iter().next_back() {
        Some(&max_selected) => newly
            .iter()
            .copied()
            .filter(|s| !requested.contains(s) && *s > max_selected)
            .collect(),
        None => Vec::new(),
    };

    let completes = still_submitted && !requested.is_empty() && requested.is_subset(&available);

    let mut season_notices = Vec::new();
    if !requested_new.is_empty() {
        season_notices.push(Notice::SeasonsAvailable {
            seasons: requested_new.clone(),
            completes,
        });
    }
    if !beyond.is_empty() {
        season_notices.push(Notice::SeasonsBeyondRequest(beyond.clone()));
    }
    if completes && requested_new.is_empty() {
        season_notices.push(Notice::RequestComplete);
    }
    season_notices.append(&mut notices);
    let mut notices = season_notices;

    if !requested_new.is_empty() || !beyond.is_empty() {
        let mut notified = request.notified_seasons.clone();
        notified.extend(requested_new.iter().chain(beyond.iter()).copied());
        update = update.notified_seasons(notified);
    }

    if completes {
        update = update.status(RequestStatus::Approved);
    }

    if let Some(episodes) = &availability.available_episodes {
        let (new_episodes, merged) = diff_episodes(&request.notified_episodes, episodes);
        if !new_episodes.is_empty() {
            notices.push(Notice::Episodes(new_episodes));
            update = update.notified_episodes(merged);
        }
    }

    Reconciliation { notices, update }
}

/// Episodes in `available` not yet in `notified` (specials excluded), and the
/// merged notified map.
pub fn diff_episodes(
    notified: &EpisodeMap,
    available: &EpisodeMap,
) -> (Vec<(u32, u32)>, EpisodeMap) {
    let empty = BTreeSet::new();
    let mut fresh = Vec::new();
    let mut merged = notified.clone();
    for (&season, episodes) in available.iter().filter(|(s, _)| **s > 0) {
        let known = notified.get(&season).unwrap_or(&empty);
        let new: Vec<u32> = episodes.difference(known).copied().collect();
        if new.is_empty() {
            continue;
        }
        fresh.extend(new.iter().map(|e| (season, *e)));
        merged.entry(season).or_default().extend(new);
    }
    (fresh, merged)
}
