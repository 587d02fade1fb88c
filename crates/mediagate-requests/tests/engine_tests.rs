// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end request flows through the processor and the monitor.

use std::time::Duration;

use mediagate_core::backend::{
    OverseerrMediaInfo, OverseerrSeasonInfo, OverseerrSeasonStatus, OverseerrTvDetails,
    SeasonSelection, SonarrSeason, SonarrSeasonStatistics, SonarrSeries,
};
use mediagate_core::{
    ApprovalMode, ApprovalPolicy, EpisodeMap, MediagateError, RequestEvent, RequestStatus,
    ServiceKind, ServiceStore,
};
use mediagate_requests::processor::{ADMIN_REJECT_NOTE, AUTO_REJECT_NOTE};
use mediagate_test_utils::{MockOverseerr, TestHarness};

fn policy(mode: ApprovalMode, exceptions: &[&str]) -> ApprovalPolicy {
    ApprovalPolicy {
        mode,
        exceptions_enabled: !exceptions.is_empty(),
        exception_contacts: exceptions.iter().map(|c| c.to_string()).collect(),
    }
}

/// `(season, aired, downloaded)` triples.
fn sonarr_series(id: i64, tvdb_id: i64, seasons: &[(u32, u32, u32)]) -> SonarrSeries {
    SonarrSeries {
        id,
        title: "Severance".into(),
        tvdb_id,
        year: Some(2022),
        seasons: seasons
            .iter()
            .map(|&(season_number, aired, files)| SonarrSeason {
                season_number,
                monitored: true,
                statistics: Some(SonarrSeasonStatistics {
                    episode_file_count: files,
                    episode_count: aired,
                    total_episode_count: aired,
                }),
            })
            .collect(),
    }
}

// --- decide_and_process ---

#[tokio::test]
async fn overseerr_movie_auto_approve_uses_default_server() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_radarr_servers(vec![
            MockOverseerr::server(1, "Radarr", false),
            MockOverseerr::server(2, "Radarr Main", true),
        ])
        .await;

    let outcome = h
        .submit(&TestHarness::movie("The Matrix", 1999, 603), Some(binding.id))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.status, RequestStatus::Submitted);
    assert!(outcome.error_message.is_none());

    let sent = h.overseerr.requests().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].media_type, "movie");
    assert_eq!(sent[0].media_id, 603);
    assert_eq!(sent[0].server_id, 2);
    assert!(sent[0].seasons.is_none());
    assert!(sent[0].profile_id.is_none());

    let texts = h.messenger.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("The Matrix (1999) has been approved"));

    let updates = h.events.status_updates();
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        RequestEvent::StatusUpdate {
            previous_status,
            new_status,
            error,
            ..
        } => {
            assert!(previous_status.is_none());
            assert_eq!(*new_status, RequestStatus::Submitted);
            assert!(error.is_none());
        }
        other => panic!("unexpected event {other:?}"),
    }

    let stored = h.request(outcome.request_id).await.unwrap();
    assert_eq!(stored.service_kind, Some(ServiceKind::Overseerr));
    assert_eq!(stored.service_id, Some(binding.id));
    assert!(stored.submitted_at.is_some());
}

#[tokio::test]
async fn overseerr_series_forwards_selected_seasons_or_all() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_sonarr_servers(vec![MockOverseerr::server(0, "Sonarr", false)])
        .await;

    h.submit(&TestHarness::series("Severance", 95396, 371980, &[2, 1]), Some(binding.id))
        .await
        .unwrap();
    h.submit(&TestHarness::series("Andor", 83867, 393189, &[]), Some(binding.id))
        .await
        .unwrap();

    let sent = h.overseerr.requests().await;
    assert_eq!(sent[0].media_type, "tv");
    assert_eq!(sent[0].tvdb_id, Some(371980));
    assert_eq!(sent[0].seasons, Some(SeasonSelection::Seasons(vec![1, 2])));
    assert_eq!(sent[1].seasons, Some(SeasonSelection::All));
}

#[tokio::test]
async fn overseerr_without_acquirer_server_fails() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();

    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), Some(binding.id))
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.status, RequestStatus::Failed);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("No Radarr server configured in Overseerr")
    );
}

#[tokio::test]
async fn backend_failure_is_persisted_as_failed() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.radarr.fail_with(Some("Service unavailable")).await;

    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();

    assert_eq!(outcome.status, RequestStatus::Failed);
    let stored = h.request(outcome.request_id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Failed);
    assert_eq!(stored.error_message.as_deref(), Some("Service unavailable"));
    assert!(stored.submitted_at.is_none());

    let texts = h.messenger.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("went wrong"));
    assert!(!texts[0].contains("approved"));

    match &h.events.status_updates()[0] {
        RequestEvent::StatusUpdate { error, .. } => {
            assert_eq!(error.as_deref(), Some("Service unavailable"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn radarr_submission_uses_slug_and_defaults() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();

    let outcome = h
        .submit(&TestHarness::movie("Test: Movie!!", 2020, 5), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Submitted);

    let added = h.radarr.added().await;
    assert_eq!(added[0].title_slug, "test-movie-5");
    assert_eq!(added[0].root_folder_path, "/movies");
    assert_eq!(added[0].quality_profile_id, 1);
    assert!(added[0].monitored);
    assert!(added[0].add_options.search_for_movie);
}

#[tokio::test]
async fn movie_without_tmdb_id_fails_on_radarr() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    let mut selection = TestHarness::movie("Heat", 1995, 949);
    selection.tmdb_id = None;
    selection.tvdb_id = Some(77);

    let outcome = h.submit(&selection, None).await.unwrap();
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("Missing TMDB ID for movie request")
    );
    assert!(h.radarr.added().await.is_empty());
}

#[tokio::test]
async fn no_enabled_binding_fails_request() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.add_binding_with(ServiceKind::Sonarr, 0, false).await.unwrap();

    let outcome = h
        .submit(&TestHarness::series("Severance", 95396, 371980, &[1]), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Failed);
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("No enabled service configured for series requests")
    );
}

#[tokio::test]
async fn priority_picks_binding() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding_with(ServiceKind::Overseerr, 5, true).await.unwrap();
    let sonarr = h.add_binding_with(ServiceKind::Sonarr, 1, true).await.unwrap();

    let outcome = h
        .submit(&TestHarness::series("Severance", 95396, 371980, &[1]), None)
        .await
        .unwrap();
    let stored = h.request(outcome.request_id).await.unwrap();
    assert_eq!(stored.service_id, Some(sonarr.id));
    assert_eq!(h.sonarr.added().await[0].title_slug, "severance-371980");
}

#[tokio::test]
async fn auto_deny_exception_is_submitted_directly() {
    let h = TestHarness::builder()
        .with_policy(policy(ApprovalMode::AutoDeny, &["vip-hash"]))
        .build()
        .await
        .unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();

    let outcome = h
        .submit_as("vip-hash", &TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Submitted);
    assert_eq!(h.radarr.added().await.len(), 1);
}

#[tokio::test]
async fn auto_deny_rejects_without_backend_call() {
    let h = TestHarness::builder()
        .with_policy(policy(ApprovalMode::AutoDeny, &["vip-hash"]))
        .build()
        .await
        .unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();

    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Rejected);
    assert!(h.radarr.added().await.is_empty());

    let stored = h.request(outcome.request_id).await.unwrap();
    assert_eq!(stored.admin_notes.as_deref(), Some(AUTO_REJECT_NOTE));
    assert!(stored.service_id.is_none());

    let texts = h.messenger.sent_texts().await;
    assert_eq!(texts, vec!["Sorry, your request for Heat (1995) was declined.".to_string()]);

    match &h.events.events()[0] {
        RequestEvent::NewRequest {
            status, contact, ..
        } => {
            assert_eq!(*status, RequestStatus::Rejected);
            assert!(contact.contains("****"));
            assert_ne!(contact, "+15550001234");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn manual_mode_holds_then_admin_approves() {
    let h = TestHarness::builder()
        .with_policy(policy(ApprovalMode::Manual, &[]))
        .build()
        .await
        .unwrap();
    let binding = h.add_binding(ServiceKind::Radarr).await.unwrap();

    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Pending);
    assert!(h.radarr.added().await.is_empty());
    let pending = h.request(outcome.request_id).await.unwrap();
    assert!(pending.service_id.is_none());
    assert!(h.messenger.sent_texts().await[0].contains("waiting for approval"));

    let approved = h
        .processor
        .approve_request(outcome.request_id, Some(binding.id))
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Submitted);
    assert_eq!(approved.service_id, Some(binding.id));
    assert_eq!(h.radarr.added().await.len(), 1);

    let updates = h.events.status_updates();
    match updates.last() {
        Some(RequestEvent::StatusUpdate {
            previous_status,
            new_status,
            ..
        }) => {
            assert_eq!(*previous_status, Some(RequestStatus::Pending));
            assert_eq!(*new_status, RequestStatus::Submitted);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn failed_request_can_be_retried() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.radarr.fail_with(Some("Service unavailable")).await;
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Failed);

    h.radarr.fail_with(None).await;
    let retried = h
        .processor
        .approve_request(outcome.request_id, None)
        .await
        .unwrap();
    assert_eq!(retried.status, RequestStatus::Submitted);
    assert!(retried.error_message.is_none());
    assert!(retried.submitted_at.is_some());
}

#[tokio::test]
async fn admin_reject_uses_default_note() {
    let h = TestHarness::builder()
        .with_policy(policy(ApprovalMode::Manual, &[]))
        .build()
        .await
        .unwrap();
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();

    let rejected = h
        .processor
        .reject_request(outcome.request_id, None)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.admin_notes.as_deref(), Some(ADMIN_REJECT_NOTE));

    let again = h.processor.reject_request(outcome.request_id, None).await;
    assert!(matches!(
        again,
        Err(MediagateError::InvalidTransition {
            from: RequestStatus::Rejected,
            ..
        })
    ));
}

#[tokio::test]
async fn submitted_request_cannot_be_approved_again() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();

    let err = h
        .processor
        .approve_request(outcome.request_id, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MediagateError::InvalidTransition {
            from: RequestStatus::Submitted,
            to: RequestStatus::Submitted
        }
    ));
    assert!(matches!(
        h.processor.approve_request(999, None).await,
        Err(MediagateError::NotFound { entity: "request", id: 999 })
    ));
}

#[tokio::test]
async fn list_requests_filters_by_status() {
    let h = TestHarness::builder()
        .with_policy(policy(ApprovalMode::Manual, &[]))
        .build()
        .await
        .unwrap();
    h.submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    h.submit(&TestHarness::movie("Alien", 1979, 348), None)
        .await
        .unwrap();

    let pending = h
        .processor
        .list_requests(Some(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 2);
    assert!(
        h.processor
            .list_requests(Some(RequestStatus::Submitted))
            .await
            .unwrap()
            .is_empty()
    );
    let all = h.processor.list_requests(None).await.unwrap();
    assert_eq!(all[0].title, "Alien");
}

// --- reconciliation ---

#[tokio::test]
async fn series_seasons_arrive_over_two_cycles() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Sonarr).await.unwrap();
    let outcome = h
        .submit(&TestHarness::series("Severance", 95396, 371980, &[1, 2]), None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RequestStatus::Submitted);
    h.messenger.clear_sent().await;

    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(0, 2, 0), (1, 9, 9), (2, 10, 3)]))
        .await;
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.checked, 1);
    assert_eq!(report.approved, 0);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Season 1 of Severance is now available.".to_string()]
    );
    assert_eq!(
        h.request(outcome.request_id).await.unwrap().status,
        RequestStatus::Submitted
    );

    h.messenger.clear_sent().await;
    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(0, 2, 0), (1, 9, 9), (2, 10, 10)]))
        .await;
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Season 2 of Severance is now available.\nYour request is now complete.".to_string()]
    );

    let stored = h.request(outcome.request_id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
    assert_eq!(stored.notified_seasons.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(stored.total_seasons, 2);

    match h.events.status_updates().last() {
        Some(RequestEvent::StatusUpdate {
            previous_status,
            new_status,
            ..
        }) => {
            assert_eq!(*previous_status, Some(RequestStatus::Submitted));
            assert_eq!(*new_status, RequestStatus::Approved);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn repeated_cycle_sends_nothing_new() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Sonarr).await.unwrap();
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[1, 2, 3]), None)
        .await
        .unwrap();
    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(1, 9, 9), (2, 10, 10), (3, 10, 0)]))
        .await;
    let episodes: EpisodeMap = [(1, (1..=9).collect()), (2, (1..=10).collect())]
        .into_iter()
        .collect();
    h.sonarr.set_episodes(1, episodes).await;
    h.messenger.clear_sent().await;

    let first = h.monitor.run_cycle().await.unwrap();
    assert_eq!(first.notifications, 2);
    let texts = h.messenger.sent_texts().await;
    assert_eq!(texts[0], "Seasons 1 and 2 of Severance are now available.");
    assert_eq!(
        texts[1],
        "19 new episodes of Severance are now available: \
         Season 1 (9 episodes) and Season 2 (10 episodes)."
    );

    let second = h.monitor.run_cycle().await.unwrap();
    assert_eq!(second.notifications, 0);
    assert_eq!(second.checked, 1);
}

#[tokio::test]
async fn new_episode_is_announced_singly() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Sonarr).await.unwrap();
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[2]), None)
        .await
        .unwrap();
    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(1, 9, 9), (2, 10, 4)]))
        .await;
    h.sonarr
        .set_episodes(1, [(2, (1..=4).collect())].into_iter().collect())
        .await;
    h.monitor.run_cycle().await.unwrap();
    h.messenger.clear_sent().await;

    h.sonarr
        .set_episodes(1, [(2, (1..=5).collect())].into_iter().collect())
        .await;
    h.monitor.run_cycle().await.unwrap();
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["New episode of Severance: Season 2, Episode 5 is now available.".to_string()]
    );
}

#[tokio::test]
async fn new_season_announcement_after_first_count() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Sonarr).await.unwrap();
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[1]), None)
        .await
        .unwrap();
    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(1, 9, 0)]))
        .await;
    h.monitor.run_cycle().await.unwrap();
    h.messenger.clear_sent().await;

    h.sonarr
        .set_series(sonarr_series(1, 371980, &[(1, 9, 0), (2, 0, 0)]))
        .await;
    h.monitor.run_cycle().await.unwrap();
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Season 2 of Severance has been announced.".to_string()]
    );
}

#[tokio::test]
async fn radarr_movie_approved_when_file_lands() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 0);
    assert_eq!(report.notifications, 0);

    h.radarr.set_movie(949, "Heat", true).await;
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Heat (1995) is now available to watch!".to_string()]
    );
    assert_eq!(
        h.request(outcome.request_id).await.unwrap().status,
        RequestStatus::Approved
    );

    // Approved requests are no longer polled.
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.checked, 0);
}

#[tokio::test]
async fn overseerr_series_season_detail() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_sonarr_servers(vec![MockOverseerr::server(0, "Sonarr", true)])
        .await;
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[1, 2]), Some(binding.id))
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    h.overseerr
        .set_search_results(vec![MockOverseerr::search_hit(95396, "tv", "Severance", 4)])
        .await;
    h.overseerr
        .set_tv_details(OverseerrTvDetails {
            id: 95396,
            number_of_seasons: 2,
            seasons: vec![
                OverseerrSeasonInfo {
                    season_number: 1,
                    episode_count: 9,
                },
                OverseerrSeasonInfo {
                    season_number: 2,
                    episode_count: 10,
                },
            ],
            media_info: Some(OverseerrMediaInfo {
                status: 4,
                seasons: vec![
                    OverseerrSeasonStatus {
                        season_number: 1,
                        status: 5,
                    },
                    OverseerrSeasonStatus {
                        season_number: 2,
                        status: 3,
                    },
                ],
                ..OverseerrMediaInfo::default()
            }),
        })
        .await;

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 0);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Season 1 of Severance is now available.".to_string()]
    );
}

#[tokio::test]
async fn overseerr_degraded_partial_notifies_once() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_sonarr_servers(vec![MockOverseerr::server(0, "Sonarr", true)])
        .await;
    let outcome = h
        .submit(&TestHarness::series("Severance", 95396, 371980, &[1, 2]), Some(binding.id))
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    h.overseerr
        .set_search_results(vec![MockOverseerr::search_hit(95396, "tv", "Severance", 4)])
        .await;
    h.overseerr.fail_details(Some("Overseerr returned 500")).await;

    let first = h.monitor.run_cycle().await.unwrap();
    assert_eq!(first.errors, 0);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Severance is now partially available.".to_string()]
    );
    let second = h.monitor.run_cycle().await.unwrap();
    assert_eq!(second.notifications, 0);
    assert!(h.request(outcome.request_id).await.unwrap().partial_notified);
}

#[tokio::test]
async fn overseerr_movie_available() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_radarr_servers(vec![MockOverseerr::server(0, "Radarr", true)])
        .await;
    h.submit(&TestHarness::movie("The Matrix", 1999, 603), Some(binding.id))
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    // A same-id hit of the wrong type must not match.
    h.overseerr
        .set_search_results(vec![
            MockOverseerr::search_hit(603, "tv", "The Matrix", 5),
            MockOverseerr::search_hit(603, "movie", "The Matrix", 5),
        ])
        .await;
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["The Matrix (1999) is now available to watch!".to_string()]
    );
}

#[tokio::test]
async fn overseerr_movie_missing_from_search_reads_details() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_radarr_servers(vec![MockOverseerr::server(0, "Radarr", true)])
        .await;
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), Some(binding.id))
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    // Only a different title made the first page.
    h.overseerr
        .set_search_results(vec![MockOverseerr::search_hit(1, "movie", "Heat Wave", 5)])
        .await;
    let quiet = h.monitor.run_cycle().await.unwrap();
    assert_eq!(quiet.checked, 1);
    assert_eq!(quiet.approved, 0);

    h.overseerr.set_movie_status(949, 5).await;
    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    assert_eq!(
        h.messenger.sent_texts().await,
        vec!["Heat (1995) is now available to watch!".to_string()]
    );
    assert_eq!(
        h.request(outcome.request_id).await.unwrap().status,
        RequestStatus::Approved
    );
}

#[tokio::test]
async fn overseerr_series_missing_from_search_reads_details() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Overseerr).await.unwrap();
    h.overseerr
        .set_sonarr_servers(vec![MockOverseerr::server(0, "Sonarr", true)])
        .await;
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[1]), Some(binding.id))
        .await
        .unwrap();
    h.messenger.clear_sent().await;

    h.overseerr
        .set_tv_details(OverseerrTvDetails {
            id: 95396,
            number_of_seasons: 1,
            seasons: vec![OverseerrSeasonInfo {
                season_number: 1,
                episode_count: 9,
            }],
            media_info: Some(OverseerrMediaInfo {
                status: 5,
                seasons: vec![OverseerrSeasonStatus {
                    season_number: 1,
                    status: 5,
                }],
                ..OverseerrMediaInfo::default()
            }),
        })
        .await;

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    let texts = h.messenger.sent_texts().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Season 1 of Severance is now available."));
}

#[tokio::test]
async fn failing_request_does_not_abort_cycle() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.add_binding(ServiceKind::Sonarr).await.unwrap();
    h.submit(&TestHarness::series("Severance", 95396, 371980, &[1]), None)
        .await
        .unwrap();
    h.submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();

    h.sonarr.fail_with(Some("Sonarr returned 502 Bad Gateway")).await;
    h.radarr.set_movie(949, "Heat", true).await;

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.errors, 1);
    assert_eq!(report.checked, 1);
    assert_eq!(report.approved, 1);
}

#[tokio::test]
async fn disabled_binding_is_skipped() {
    let h = TestHarness::new().await.unwrap();
    let binding = h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    h.storage.set_enabled(binding.id, false).await.unwrap();
    h.radarr.set_movie(949, "Heat", true).await;

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.approved, 0);
}

#[tokio::test]
async fn notification_failure_keeps_status_change() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    h.radarr.set_movie(949, "Heat", true).await;
    h.messenger.set_failing(true);

    let report = h.monitor.run_cycle().await.unwrap();
    assert_eq!(report.approved, 1);
    assert_eq!(report.notifications, 0);
    assert_eq!(
        h.request(outcome.request_id).await.unwrap().status,
        RequestStatus::Approved
    );
}

#[tokio::test]
async fn monitor_start_is_guarded() {
    let h = TestHarness::new().await.unwrap();
    assert!(!h.monitor.is_running());
    assert!(h.monitor.start());
    assert!(!h.monitor.start());
    assert!(h.monitor.is_running());
    assert!(h.monitor.stop());
    assert!(!h.monitor.is_running());
    assert!(!h.monitor.stop());
    // restartable
    assert!(h.monitor.start());
    assert!(h.monitor.stop());
}

#[tokio::test]
async fn overlapping_cycle_is_refused() {
    let h = TestHarness::new().await.unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    let outcome = h
        .submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();
    h.radarr.set_movie(949, "Heat", true).await;
    h.radarr.hold_lookups().await;

    let monitor = h.monitor.clone();
    let first = tokio::spawn(async move { monitor.run_cycle().await });
    h.radarr.lookup_started().await;

    assert!(h.monitor.run_cycle().await.is_none());
    assert_eq!(h.radarr.lookups(), 1);

    h.radarr.release_lookups().await;
    let report = first.await.unwrap().expect("first cycle completes");
    assert_eq!(report.approved, 1);
    assert_eq!(
        h.request(outcome.request_id).await.unwrap().status,
        RequestStatus::Approved
    );

    // The flag is cleared once the first cycle ends.
    let next = h.monitor.run_cycle().await.expect("cycle runs again");
    assert_eq!(next.checked, 0);
}

#[tokio::test(start_paused = true)]
async fn timer_runs_cycles_until_stopped() {
    let interval = Duration::from_secs(60);
    let h = TestHarness::builder()
        .with_interval(interval)
        .build()
        .await
        .unwrap();
    h.add_binding(ServiceKind::Radarr).await.unwrap();
    h.submit(&TestHarness::movie("Heat", 1995, 949), None)
        .await
        .unwrap();

    let started = tokio::time::Instant::now();
    assert!(h.monitor.start());

    tokio::time::sleep(interval - Duration::from_secs(1)).await;
    assert_eq!(h.radarr.lookups(), 0, "no cycle before the first interval");

    h.radarr.lookup_started().await;
    assert!(started.elapsed() >= interval);
    assert_eq!(h.radarr.lookups(), 1);

    assert!(h.monitor.stop());
    tokio::time::sleep(interval * 10).await;
    assert_eq!(h.radarr.lookups(), 1, "no cycles after stop");
}
