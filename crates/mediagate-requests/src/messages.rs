// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text sent to requesting contacts.
//!
//! Titles are always rendered with the year in parentheses when known; the
//! callers pass `MediaRequest::display_title()`.

use std::collections::BTreeMap;

/// Most episodes listed individually before switching to a per-season summary.
pub const MAX_LISTED_EPISODES: usize = 5;

/// `"word"` or `"words"` depending on `count`.
pub fn pluralize(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// `"a"`, `"a and b"`, `"a, b and c"`.
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

/// `"Season 1"`, `"Seasons 1 and 2"`, `"Seasons 1, 2 and 3"`.
pub fn season_list(seasons: &[u32]) -> String {
    let numbers: Vec<String> = seasons.iter().map(u32::to_string).collect();
    format!("{} {}", pluralize(seasons.len(), "Season"), join_list(&numbers))
}

fn is_are(count: usize) -> &'static str {
    if count == 1 { "is" } else { "are" }
}

pub fn request_approved(title: &str) -> String {
    format!(
        "Your request for {title} has been approved and sent for download. \
         You'll get a message when it's ready."
    )
}

pub fn request_pending(title: &str) -> String {
    format!("Your request for {title} is waiting for approval. You'll hear back once it's reviewed.")
}

pub fn request_declined(title: &str) -> String {
    format!("Sorry, your request for {title} was declined.")
}

pub fn request_failed(title: &str) -> String {
    format!(
        "Sorry, something went wrong submitting your request for {title}. \
         An administrator will look into it."
    )
}

/// Whole title (movie or series) is available, or only some of it.
pub fn now_available(title: &str, partial: bool) -> String {
    if partial {
        format!("{title} is now partially available.")
    } else {
        format!("{title} is now available to watch!")
    }
}

/// Requested seasons became available; `complete` appends the completion line.
pub fn seasons_available(title: &str, seasons: &[u32], complete: bool) -> String {
    let mut text = format!(
        "{} of {title} {} now available.",
        season_list(seasons),
        is_are(seasons.len())
    );
    if complete {
        text.push_str("\nYour request is now complete.");
    }
    text
}

pub fn seasons_beyond_request(title: &str, seasons: &[u32]) -> String {
    format!(
        "New release: {} of {title} {} now available (beyond your request).",
        season_list(seasons),
        is_are(seasons.len())
    )
}

pub fn seasons_announced(title: &str, seasons: &[u32]) -> String {
    let verb = if seasons.len() == 1 { "has" } else { "have" };
    format!("{} of {title} {verb} been announced.", season_list(seasons))
}

pub fn request_complete(title: &str) -> String {
    format!("All requested seasons of {title} are now available. Your request is now complete.")
}

/// New episodes as `(season, episode)` pairs, already sorted ascending.
pub fn episodes_available(title: &str, episodes: &[(u32, u32)]) -> String {
    match episodes {
        [] => String::new(),
        [(season, episode)] => {
            format!("New episode of {title}: Season {season}, Episode {episode} is now available.")
        }
        _ if episodes.len() <= MAX_LISTED_EPISODES => {
            let codes: Vec<String> = episodes
                .iter()
                .map(|(s, e)| format!("S{s:02}E{e:02}"))
                .collect();
            format!(
                "{} new episodes of {title} are now available: {}.",
                episodes.len(),
                join_list(&codes)
            )
        }
        _ => {
            let mut per_season: BTreeMap<u32, usize> = BTreeMap::new();
            for (season, _) in episodes {
                *per_season.entry(*season).or_default() += 1;
            }
            let summary: Vec<String> = per_season
                .iter()
                .map(|(season, count)| {
                    format!("Season {season} ({count} {})", pluralize(*count, "episode"))
                })
                .collect();
            format!(
                "{} new episodes of {title} are now available: {}.",
                episodes.len(),
                join_list(&summary)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_lists() {
        assert_eq!(season_list(&[1]), "Season 1");
        assert_eq!(season_list(&[1, 2]), "Seasons 1 and 2");
        assert_eq!(season_list(&[1, 2, 4]), "Seasons 1, 2 and 4");
    }

    #[test]
    fn seasons_available_agrees_in_number() {
        assert_eq!(
            seasons_available("Severance (2022)", &[1], false),
            "Season 1 of Severance (2022) is now available."
        );
        assert_eq!(
            seasons_available("Severance (2022)", &[1, 2], true),
            "Seasons 1 and 2 of Severance (2022) are now available.\nYour request is now complete."
        );
    }

    #[test]
    fn announcements_use_has_or_have() {
        assert_eq!(
            seasons_announced("Andor", &[3]),
            "Season 3 of Andor has been announced."
        );
        assert_eq!(
            seasons_announced("Andor", &[3, 4]),
            "Seasons 3 and 4 of Andor have been announced."
        );
    }

    #[test]
    fn single_episode_phrasing() {
        assert_eq!(
            episodes_available("Andor (2022)", &[(2, 5)]),
            "New episode of Andor (2022): Season 2, Episode 5 is now available."
        );
    }

    #[test]
    fn short_episode_list_is_compact() {
        assert_eq!(
            episodes_available("Andor", &[(1, 9), (1, 10), (2, 1)]),
            "3 new episodes of Andor are now available: S01E09, S01E10 and S02E01."
        );
    }

    #[test]
    fn long_episode_list_is_summarised_per_season() {
        let episodes: Vec<(u32, u32)> = (1..=6).map(|e| (1, e)).chain([(2, 1)]).collect();
        assert_eq!(
            episodes_available("Andor", &episodes),
            "7 new episodes of Andor are now available: Season 1 (6 episodes) and Season 2 (1 episode)."
        );
    }

    #[test]
    fn outcome_messages_mention_title() {
        assert!(request_failed("Heat (1995)").contains("Heat (1995)"));
        assert!(!request_failed("Heat").contains("approved"));
        assert!(request_declined("Heat").starts_with("Sorry"));
        assert_eq!(now_available("Heat", true), "Heat is now partially available.");
    }
}
