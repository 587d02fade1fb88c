// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate request` and `mediagate requests ...` command implementations.

use std::io::IsTerminal;

use mediagate_core::{
    MediaRequest, MediaSelection, MediaType, MediagateError, ProcessOutcome, RequestStatus,
};
use mediagate_vault::contact_hash;

use crate::app::App;

/// Fields of `mediagate request`, already parsed by clap.
#[derive(Debug, Clone)]
pub struct SubmitArgs {
    pub contact: String,
    pub title: String,
    pub media_type: MediaType,
    pub year: Option<i32>,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    pub seasons: Vec<u32>,
    pub service: Option<i64>,
}

impl SubmitArgs {
    fn selection(&self) -> MediaSelection {
        MediaSelection {
            media_type: self.media_type,
            title: self.title.trim().to_string(),
            year: self.year,
            tmdb_id: self.tmdb_id,
            tvdb_id: self.tvdb_id,
            seasons: self.seasons.iter().copied().collect(),
        }
    }
}

/// Submit a selection on behalf of `args.contact` and print the outcome.
pub async fn run_submit(app: &App, args: &SubmitArgs, json: bool) -> Result<(), MediagateError> {
    let outcome = app
        .processor
        .decide_and_process(
            &contact_hash(&args.contact),
            Some(&args.contact),
            &args.selection(),
            args.service,
        )
        .await?;

    if json {
        print_json(&outcome);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

pub async fn run_list(
    app: &App,
    status: Option<RequestStatus>,
    json: bool,
    plain: bool,
) -> Result<(), MediagateError> {
    let requests = app.processor.list_requests(status).await?;
    if json {
        print_json(&requests);
        return Ok(());
    }

    if requests.is_empty() {
        println!("no requests");
        return Ok(());
    }
    let use_color = !plain && std::io::stdout().is_terminal();
    for request in &requests {
        println!("{}", request_line(request, use_color));
    }
    Ok(())
}

pub async fn run_approve(
    app: &App,
    id: i64,
    service: Option<i64>,
    plain: bool,
) -> Result<(), MediagateError> {
    let request = app.processor.approve_request(id, service).await?;
    let use_color = !plain && std::io::stdout().is_terminal();
    println!("{}", request_line(&request, use_color));
    if let Some(error) = &request.error_message {
        println!("    error: {error}");
    }
    Ok(())
}

pub async fn run_reject(
    app: &App,
    id: i64,
    notes: Option<String>,
    plain: bool,
) -> Result<(), MediagateError> {
    let request = app.processor.reject_request(id, notes).await?;
    let use_color = !plain && std::io::stdout().is_terminal();
    println!("{}", request_line(&request, use_color));
    Ok(())
}

fn print_outcome(outcome: &ProcessOutcome) {
    println!("request {}: {}", outcome.request_id, outcome.status);
    if let Some(error) = &outcome.error_message {
        println!("    error: {error}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// One summary line: id, status, type, title and where it was sent.
fn request_line(request: &MediaRequest, use_color: bool) -> String {
    let status = format!("{:<9}", request.status.to_string());
    let status = if use_color {
        use colored::Colorize;
        match request.status {
            RequestStatus::Approved => status.green().to_string(),
            RequestStatus::Submitted => status.cyan().to_string(),
            RequestStatus::Pending => status.yellow().to_string(),
            RequestStatus::Rejected | RequestStatus::Failed => status.red().to_string(),
        }
    } else {
        status
    };

    let target = match (request.service_kind, request.service_id) {
        (Some(kind), Some(id)) => format!(" -> {kind} #{id}"),
        _ => String::new(),
    };
    let seasons = if request.media_type == MediaType::Series
        && !request.selected_seasons.is_empty()
    {
        let list: Vec<String> = request.selected_seasons.iter().map(u32::to_string).collect();
        format!(" [seasons {}]", list.join(","))
    } else {
        String::new()
    };

    format!(
        "{:>5}  {status}  {:<6}  {}{seasons}{target}",
        request.id,
        request.media_type.to_string(),
        request.display_title(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(status: RequestStatus) -> MediaRequest {
        let now = Utc::now();
        MediaRequest {
            id: 12,
            contact_hash: "abc".into(),
            contact_address_enc: None,
            media_type: MediaType::Series,
            title: "Andor".into(),
            year: Some(2022),
            tmdb_id: Some(83867),
            tvdb_id: Some(393189),
            service_kind: Some(mediagate_core::ServiceKind::Sonarr),
            service_id: Some(3),
            selected_seasons: [1, 2].into_iter().collect(),
            notified_seasons: Default::default(),
            notified_episodes: Default::default(),
            total_seasons: 2,
            partial_notified: false,
            status,
            submitted_at: Some(now),
            error_message: None,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn plain_request_line_names_target_and_seasons() {
        let line = request_line(&request(RequestStatus::Submitted), false);
        assert_eq!(
            line,
            "   12  submitted  series  Andor (2022) [seasons 1,2] -> sonarr #3"
        );
    }

    #[test]
    fn submit_args_build_trimmed_selection() {
        let args = SubmitArgs {
            contact: "+15550001234".into(),
            title: "  Heat ".into(),
            media_type: MediaType::Movie,
            year: Some(1995),
            tmdb_id: Some(949),
            tvdb_id: None,
            seasons: vec![],
            service: None,
        };
        let selection = args.selection();
        assert_eq!(selection.title, "Heat");
        assert_eq!(selection.tmdb_id, Some(949));
        assert!(selection.seasons.is_empty());
    }
}
