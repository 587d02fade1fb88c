// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Availability monitor: the periodic reconciliation loop.
//!
//! One timer drives [`AvailabilityMonitor::run_cycle`]. Cycles never
//! overlap; requests inside a cycle are processed one after another so
//! backends never see bursts from this loop. A failure on one request is
//! logged and the cycle moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use mediagate_core::{
    EventPublisher, MediaRequest, MediagateError, RequestEvent, RequestStatus, RequestStore,
    ServiceStore,
};
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::EnginePorts;
use crate::availability::AvailabilityChecker;
use crate::notify::Notifier;
use crate::reconcile;

/// Counters for one reconciliation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Requests whose backend was polled successfully.
    pub checked: usize,
    /// Requests without a usable binding.
    pub skipped: usize,
    /// Notifications handed to the transport.
    pub notifications: usize,
    /// Requests moved to APPROVED.
    pub approved: usize,
    pub errors: usize,
}

enum RequestCheck {
    Skipped(&'static str),
    Checked { notifications: usize, approved: bool },
}

/// Resets the in-progress flag when a cycle ends, however it ends.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    requests: Arc<dyn RequestStore>,
    services: Arc<dyn ServiceStore>,
    events: Arc<dyn EventPublisher>,
    checker: AvailabilityChecker,
    notifier: Notifier,
    interval: Duration,
    cycle_running: AtomicBool,
    timer: Mutex<Option<CancellationToken>>,
}

/// Owns the reconciliation timer. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AvailabilityMonitor {
    inner: Arc<Inner>,
}

impl AvailabilityMonitor {
    pub fn new(ports: &EnginePorts, interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                requests: ports.requests.clone(),
                services: ports.services.clone(),
                events: ports.events.clone(),
                checker: AvailabilityChecker::new(ports.connector.clone(), ports.cipher.clone()),
                notifier: Notifier::new(ports.messenger.clone(), ports.cipher.clone()),
                interval,
                cycle_running: AtomicBool::new(false),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Start the timer. Returns `false` if it was already running.
    ///
    /// The first cycle runs one full interval after start.
    pub fn start(&self) -> bool {
        let mut timer = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_some() {
            debug!("availability monitor already running");
            return false;
        }
        let cancel = CancellationToken::new();
        *timer = Some(cancel.clone());
        drop(timer);

        let period = self.inner.interval;
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        monitor.run_cycle().await;
                    }
                }
            }
            debug!("availability monitor timer stopped");
        });

        info!(interval_secs = period.as_secs(), "availability monitor started");
        true
    }

    /// Stop the timer. An in-flight cycle is allowed to finish.
    ///
    /// Returns `false` if the monitor was not running.
    pub fn stop(&self) -> bool {
        let token = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match token {
            Some(token) => {
                token.cancel();
                info!("availability monitor stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run one reconciliation cycle now.
    ///
    /// Returns `None` without doing anything when a cycle is already in
    /// progress.
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        if self
            .inner
            .cycle_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("reconciliation cycle already in progress");
            return None;
        }
        let _guard = CycleGuard(&self.inner.cycle_running);
        Some(self.cycle().await)
    }

    async fn cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        let submitted = match self
            .inner
            .requests
            .find_by_status(RequestStatus::Submitted)
            .await
        {
            Ok(requests) => requests,
            Err(e) => {
                error!(error = %e, "could not load submitted requests");
                report.errors += 1;
                return report;
            }
        };

        for request in &submitted {
            match self.check_request(request).await {
                Ok(RequestCheck::Skipped(reason)) => {
                    debug!(request_id = request.id, reason, "skipping request");
                    report.skipped += 1;
                }
                Ok(RequestCheck::Checked {
                    notifications,
                    approved,
                }) => {
                    report.checked += 1;
                    report.notifications += notifications;
                    if approved {
                        report.approved += 1;
                    }
                }
                Err(e) => {
                    warn!(request_id = request.id, error = %e, "availability check failed");
                    report.errors += 1;
                }
            }
        }

        info!(
            checked = report.checked,
            skipped = report.skipped,
            notifications = report.notifications,
            approved = report.approved,
            errors = report.errors,
            "reconciliation cycle finished"
        );
        report
    }

    async fn check_request(&self, request: &MediaRequest) -> Result<RequestCheck, MediagateError> {
        let Some(service_id) = request.service_id else {
            return Ok(RequestCheck::Skipped("request has no service binding"));
        };
        let Some(binding) = self.inner.services.find_by_id(service_id).await? else {
            return Ok(RequestCheck::Skipped("service binding no longer exists"));
        };
        if !binding.enabled {
            return Ok(RequestCheck::Skipped("service binding is disabled"));
        }

        let availability = self.inner.checker.check(request, &binding).await?;
        let result = reconcile::reconcile(request, &availability);
        if !result.update.is_empty() {
            self.inner.requests.update(request.id, &result.update).await?;
        }

        let approved = result.approves();
        if approved {
            info!(request_id = request.id, "request fully available");
            self.inner.events.publish(RequestEvent::status_update(
                request.id,
                Some(RequestStatus::Submitted),
                RequestStatus::Approved,
                None,
            ));
        }

        let title = request.display_title();
        let mut notifications = 0;
        for notice in &result.notices {
            let sent = self
                .inner
                .notifier
                .notify(
                    request.id,
                    request.contact_address_enc.as_deref(),
                    &notice.render(&title),
                )
                .await;
            if sent {
                notifications += 1;
            }
        }

        Ok(RequestCheck::Checked {
            notifications,
            approved,
        })
    }
}
