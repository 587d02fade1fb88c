// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column encoding helpers shared by the query modules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use mediagate_core::MediagateError;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub fn decode_time(column: &str, raw: &str) -> Result<DateTime<Utc>, MediagateError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(column, e))
}

pub fn decode_opt_time(
    column: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, MediagateError> {
    raw.map(|raw| decode_time(column, raw)).transpose()
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String, MediagateError> {
    serde_json::to_string(value).map_err(MediagateError::storage)
}

pub fn decode_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T, MediagateError> {
    serde_json::from_str(raw).map_err(|e| corrupt(column, e))
}

/// Parse an enum stored as its lowercase name.
pub fn decode_enum<T: FromStr>(column: &str, raw: &str) -> Result<T, MediagateError> {
    raw.parse()
        .map_err(|_| corrupt(column, format!("unrecognized value `{raw}`")))
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> MediagateError {
    MediagateError::storage(format!("corrupt `{column}` column: {detail}"))
}

#[cfg(test)]
mod tests {
    use mediagate_core::{EpisodeMap, RequestStatus};

    use super::*;

    #[test]
    fn episode_maps_survive_json_columns() {
        let mut map = EpisodeMap::new();
        map.entry(2).or_default().extend([1, 2, 3]);
        let raw = encode_json(&map).unwrap();
        assert_eq!(raw, r#"{"2":[1,2,3]}"#);
        let back: EpisodeMap = decode_json("notified_episodes", &raw).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn bad_enum_names_the_column() {
        let err = decode_enum::<RequestStatus>("status", "archived").unwrap_err();
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn times_use_rfc3339() {
        let now = Utc::now();
        let raw = encode_time(now);
        assert_eq!(decode_time("created_at", &raw).unwrap(), now);
        assert!(decode_opt_time("submitted_at", None).unwrap().is_none());
    }
}
