// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points for new selections and administrator review.

use std::sync::Arc;

use chrono::Utc;
use mediagate_config::model::DispatchConfig;
use mediagate_core::types::display_title;
use mediagate_core::{
    EventPublisher, MediaRequest, MediaSelection, MediaType, MediagateError, NewMediaRequest,
    PolicyStore, ProcessOutcome, RequestEvent, RequestStatus, RequestStore, SeasonSet,
    SecretCipher, ServiceBinding, ServiceStore,
};
use mediagate_vault::mask_contact;
use tracing::{info, warn};

use crate::EnginePorts;
use crate::approval::{self, ApprovalAction};
use crate::dispatch::{Dispatcher, Submission};
use crate::lifecycle;
use crate::messages;
use crate::notify::Notifier;

/// Admin note stored on requests rejected by the `auto_deny` policy.
pub const AUTO_REJECT_NOTE: &str = "Auto-rejected by system settings";

/// Admin note stored when an administrator rejects without a reason.
pub const ADMIN_REJECT_NOTE: &str = "Rejected by administrator";

/// Check a selection and normalise its season list.
///
/// Backend-specific id requirements are left to the dispatcher so that they
/// surface as a FAILED request rather than an error to the caller.
pub fn normalize_selection(selection: &MediaSelection) -> Result<MediaSelection, MediagateError> {
    let title = selection.title.trim();
    if title.is_empty() {
        return Err(MediagateError::Policy("Title must not be empty".to_string()));
    }
    if selection.tmdb_id.is_none() && selection.tvdb_id.is_none() {
        return Err(MediagateError::Policy(format!(
            "A {} request needs a TMDB or TVDB ID",
            selection.media_type
        )));
    }

    let seasons: SeasonSet = match selection.media_type {
        MediaType::Movie => SeasonSet::new(),
        MediaType::Series => selection.seasons.iter().copied().filter(|s| *s > 0).collect(),
    };
    Ok(MediaSelection {
        title: title.to_string(),
        seasons,
        ..selection.clone()
    })
}

/// Highest-priority enabled binding able to serve `media_type`.
///
/// `bindings` must already be ordered by priority, then id.
pub fn best_binding(bindings: &[ServiceBinding], media_type: MediaType) -> Option<&ServiceBinding> {
    bindings.iter().find(|b| b.enabled && b.kind.serves(media_type))
}

fn outcome(request: &MediaRequest) -> ProcessOutcome {
    ProcessOutcome {
        success: request.status != RequestStatus::Failed,
        request_id: request.id,
        status: request.status,
        error_message: request.error_message.clone(),
    }
}

pub struct RequestProcessor {
    requests: Arc<dyn RequestStore>,
    services: Arc<dyn ServiceStore>,
    policies: Arc<dyn PolicyStore>,
    cipher: Arc<dyn SecretCipher>,
    events: Arc<dyn EventPublisher>,
    dispatcher: Dispatcher,
    notifier: Notifier,
}

impl RequestProcessor {
    pub fn new(ports: &EnginePorts, dispatch: DispatchConfig) -> Self {
        Self {
            requests: ports.requests.clone(),
            services: ports.services.clone(),
            policies: ports.policies.clone(),
            cipher: ports.cipher.clone(),
            events: ports.events.clone(),
            dispatcher: Dispatcher::new(ports.connector.clone(), ports.cipher.clone(), dispatch),
            notifier: Notifier::new(ports.messenger.clone(), ports.cipher.clone()),
        }
    }

    /// Decide on a fresh selection and, when approved, submit it.
    ///
    /// The request is persisted exactly once, already carrying its decided
    /// status. Errors are returned only for invalid selections and storage
    /// failures; backend failures yield a FAILED request instead.
    pub async fn decide_and_process(
        &self,
        contact_hash: &str,
        contact_address: Option<&str>,
        selection: &MediaSelection,
        binding_id: Option<i64>,
    ) -> Result<ProcessOutcome, MediagateError> {
        let selection = normalize_selection(selection)?;
        let policy = self.policies.get_active().await?;
        let action = approval::decide(policy.as_ref(), contact_hash);

        let contact_address = contact_address.map(str::trim).filter(|a| !a.is_empty());
        let address_enc = contact_address
            .map(|address| self.cipher.encrypt(address))
            .transpose()?;
        let masked = mask_contact(contact_address.unwrap_or(contact_hash));
        let title = display_title(&selection.title, selection.year);
        info!(contact = %masked, title = %title, ?action, "new media selection");

        let request = match action {
            ApprovalAction::AutoReject => {
                let mut new = NewMediaRequest::from_selection(
                    contact_hash,
                    address_enc,
                    &selection,
                    RequestStatus::Rejected,
                );
                new.admin_notes = Some(AUTO_REJECT_NOTE.to_string());
                let request = self.requests.create(&new).await?;
                self.announce(&request, &masked);
                self.send(&request, &messages::request_declined(&title)).await;
                request
            }
            ApprovalAction::Hold => {
                let new = NewMediaRequest::from_selection(
                    contact_hash,
                    address_enc,
                    &selection,
                    RequestStatus::Pending,
                );
                let request = self.requests.create(&new).await?;
                self.announce(&request, &masked);
                self.send(&request, &messages::request_pending(&title)).await;
                request
            }
            ApprovalAction::AutoApprove => {
                let mut new = NewMediaRequest::from_selection(
                    contact_hash,
                    address_enc,
                    &selection,
                    RequestStatus::Pending,
                );
                let submitted = match self.resolve_binding(selection.media_type, binding_id).await {
                    Ok(binding) => {
                        new.service_kind = Some(binding.kind);
                        new.service_id = Some(binding.id);
                        self.dispatcher
                            .submit(&binding, Submission::from(&new))
                            .await
                    }
                    Err(e) => Err(e),
                };
                match submitted {
                    Ok(()) => {
                        new.status = RequestStatus::Submitted;
                        new.submitted_at = Some(Utc::now());
                    }
                    Err(e) => {
                        warn!(title = %title, error = %e, "submission failed");
                        new.status = RequestStatus::Failed;
                        new.error_message = Some(e.failure_message());
                    }
                }

                let request = self.requests.create(&new).await?;
                self.announce(&request, &masked);
                self.events.publish(RequestEvent::status_update(
                    request.id,
                    None,
                    request.status,
                    request.error_message.clone(),
                ));
                self.send_outcome(&request).await;
                request
            }
        };

        info!(request_id = request.id, status = %request.status, "request recorded");
        Ok(outcome(&request))
    }

    /// Approve a PENDING request, or retry a FAILED one.
    ///
    /// Uses `binding_override` when given, else the stored binding, else the
    /// best enabled binding for the media type.
    pub async fn approve_request(
        &self,
        id: i64,
        binding_override: Option<i64>,
    ) -> Result<MediaRequest, MediagateError> {
        let request = self.load(id).await?;
        let previous = request.status;
        lifecycle::ensure_transition(previous, RequestStatus::Submitted)?;

        let binding = self
            .resolve_binding(request.media_type, binding_override.or(request.service_id))
            .await?;
        let update = match self
            .dispatcher
            .submit(&binding, Submission::from(&request))
            .await
        {
            Ok(()) => lifecycle::submitted(binding.kind, binding.id, Utc::now()),
            Err(e) => {
                warn!(request_id = id, error = %e, "submission failed");
                lifecycle::failed(Some((binding.kind, binding.id)), &e)
            }
        };

        let updated = self.requests.update(id, &update).await?;
        self.events.publish(RequestEvent::status_update(
            id,
            Some(previous),
            updated.status,
            updated.error_message.clone(),
        ));
        self.send_outcome(&updated).await;
        info!(request_id = id, from = %previous, to = %updated.status, "request reviewed");
        Ok(updated)
    }

    /// Reject a PENDING or FAILED request.
    pub async fn reject_request(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<MediaRequest, MediagateError> {
        let request = self.load(id).await?;
        let previous = request.status;
        lifecycle::ensure_transition(previous, RequestStatus::Rejected)?;

        let notes = notes
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| ADMIN_REJECT_NOTE.to_string());
        let updated = self.requests.update(id, &lifecycle::rejected(notes)).await?;
        self.events.publish(RequestEvent::status_update(
            id,
            Some(previous),
            RequestStatus::Rejected,
            None,
        ));
        self.send(&updated, &messages::request_declined(&updated.display_title()))
            .await;
        info!(request_id = id, from = %previous, "request rejected");
        Ok(updated)
    }

    /// Requests in `status`, or all of them newest first.
    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<MediaRequest>, MediagateError> {
        match status {
            Some(status) => self.requests.find_by_status(status).await,
            None => self.requests.find_all().await,
        }
    }

    async fn load(&self, id: i64) -> Result<MediaRequest, MediagateError> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or(MediagateError::NotFound {
                entity: "request",
                id,
            })
    }

    async fn resolve_binding(
        &self,
        media_type: MediaType,
        binding_id: Option<i64>,
    ) -> Result<ServiceBinding, MediagateError> {
        match binding_id {
            Some(id) => self
                .services
                .find_by_id(id)
                .await?
                .ok_or(MediagateError::NotFound {
                    entity: "service",
                    id,
                }),
            None => {
                let bindings = self.services.list().await?;
                best_binding(&bindings, media_type).cloned().ok_or_else(|| {
                    MediagateError::Policy(format!(
                        "No enabled service configured for {media_type} requests"
                    ))
                })
            }
        }
    }

    fn announce(&self, request: &MediaRequest, masked_contact: &str) {
        self.events.publish(RequestEvent::NewRequest {
            request_id: request.id,
            title: request.display_title(),
            contact: masked_contact.to_string(),
            status: request.status,
        });
    }

    async fn send_outcome(&self, request: &MediaRequest) {
        let title = request.display_title();
        let text = match request.status {
            RequestStatus::Submitted => messages::request_approved(&title),
            _ => messages::request_failed(&title),
        };
        self.send(request, &text).await;
    }

    async fn send(&self, request: &MediaRequest, text: &str) {
        self.notifier
            .notify(request.id, request.contact_address_enc.as_deref(), text)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mediagate_core::ServiceKind;

    use super::*;

    fn selection(media_type: MediaType) -> MediaSelection {
        MediaSelection {
            media_type,
            title: "  The Matrix ".into(),
            year: Some(1999),
            tmdb_id: Some(603),
            tvdb_id: None,
            seasons: [0, 2, 1].into_iter().collect(),
        }
    }

    fn binding(id: i64, kind: ServiceKind, priority: i32, enabled: bool) -> ServiceBinding {
        ServiceBinding {
            id,
            kind,
            name: format!("{kind}-{id}"),
            base_url: "http://localhost".into(),
            api_key_enc: "enc".into(),
            priority,
            enabled,
            quality_profile_id: None,
            root_folder: None,
            language_profile_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalisation_trims_title_and_drops_specials() {
        let normalised = normalize_selection(&selection(MediaType::Series)).unwrap();
        assert_eq!(normalised.title, "The Matrix");
        assert_eq!(normalised.seasons.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn movies_carry_no_seasons() {
        let normalised = normalize_selection(&selection(MediaType::Movie)).unwrap();
        assert!(normalised.seasons.is_empty());
    }

    #[test]
    fn selection_without_ids_is_refused() {
        let mut s = selection(MediaType::Movie);
        s.tmdb_id = None;
        let err = normalize_selection(&s).unwrap_err();
        assert_eq!(err.to_string(), "A movie request needs a TMDB or TVDB ID");

        let mut s = selection(MediaType::Movie);
        s.title = "   ".into();
        assert!(normalize_selection(&s).is_err());
    }

    #[test]
    fn best_binding_respects_kind_and_enabled() {
        // already ordered by priority
        let bindings = vec![
            binding(1, ServiceKind::Sonarr, 0, true),
            binding(2, ServiceKind::Overseerr, 1, false),
            binding(3, ServiceKind::Radarr, 2, true),
            binding(4, ServiceKind::Overseerr, 3, true),
        ];
        assert_eq!(best_binding(&bindings, MediaType::Movie).map(|b| b.id), Some(3));
        assert_eq!(best_binding(&bindings, MediaType::Series).map(|b| b.id), Some(1));
        assert!(best_binding(&bindings[1..2], MediaType::Movie).is_none());
    }
}
