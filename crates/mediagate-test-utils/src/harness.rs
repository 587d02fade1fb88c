// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine tests.
//!
//! `TestHarness` assembles the request processor and availability monitor
//! over in-memory SQLite storage and the mock adapters of this crate.

use std::sync::Arc;
use std::time::Duration;

use mediagate_config::model::DispatchConfig;
use mediagate_core::{
    ApprovalPolicy, MediaRequest, MediaSelection, MediaType, MediagateError, NewServiceBinding,
    PolicyStore, ProcessOutcome, RequestStore, SecretCipher, SeasonSet, ServiceBinding,
    ServiceKind, ServiceStore,
};
use mediagate_requests::{AvailabilityMonitor, EnginePorts, RequestProcessor};
use mediagate_storage::{Database, SqliteStorage};

use crate::mock_backends::{MockConnector, MockOverseerr, MockRadarr, MockSonarr};
use crate::mock_messenger::MockMessenger;
use crate::support::{PlainCipher, RecordingPublisher};

/// Contact address used by the `submit_*` helpers.
pub const TEST_CONTACT: &str = "+15550001234";

/// Builder for test environments.
pub struct TestHarnessBuilder {
    policy: Option<ApprovalPolicy>,
    dispatch: DispatchConfig,
    interval: Duration,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            policy: None,
            dispatch: DispatchConfig::default(),
            interval: Duration::from_secs(300),
        }
    }

    /// Save an approval policy before the harness is handed out.
    pub fn with_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_dispatch_config(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn build(self) -> Result<TestHarness, MediagateError> {
        let db = Database::open_in_memory().await?;
        let storage = Arc::new(SqliteStorage::from_database(db));
        if let Some(policy) = &self.policy {
            storage.save(policy).await?;
        }

        let connector = MockConnector::new();
        let messenger = Arc::new(MockMessenger::new());
        let events = Arc::new(RecordingPublisher::default());
        let cipher = Arc::new(PlainCipher);

        let ports = EnginePorts {
            requests: storage.clone(),
            services: storage.clone(),
            policies: storage.clone(),
            cipher: cipher.clone(),
            connector: Arc::new(connector.clone()),
            messenger: messenger.clone(),
            events: events.clone(),
        };

        Ok(TestHarness {
            processor: RequestProcessor::new(&ports, self.dispatch),
            monitor: AvailabilityMonitor::new(&ports, self.interval),
            storage,
            cipher,
            messenger,
            events,
            overseerr: connector.overseerr,
            radarr: connector.radarr,
            sonarr: connector.sonarr,
        })
    }
}

/// The engine wired to in-memory storage and mocks.
pub struct TestHarness {
    pub processor: RequestProcessor,
    pub monitor: AvailabilityMonitor,
    pub storage: Arc<SqliteStorage>,
    pub cipher: Arc<PlainCipher>,
    pub messenger: Arc<MockMessenger>,
    pub events: Arc<RecordingPublisher>,
    pub overseerr: Arc<MockOverseerr>,
    pub radarr: Arc<MockRadarr>,
    pub sonarr: Arc<MockSonarr>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings and no saved policy.
    pub async fn new() -> Result<Self, MediagateError> {
        Self::builder().build().await
    }

    /// Register an enabled binding of `kind` with priority 0.
    pub async fn add_binding(&self, kind: ServiceKind) -> Result<ServiceBinding, MediagateError> {
        self.add_binding_with(kind, 0, true).await
    }

    pub async fn add_binding_with(
        &self,
        kind: ServiceKind,
        priority: i32,
        enabled: bool,
    ) -> Result<ServiceBinding, MediagateError> {
        let binding = NewServiceBinding {
            kind,
            name: format!("test {kind}"),
            base_url: format!("http://{kind}.test"),
            api_key_enc: self.cipher.encrypt("test-api-key")?,
            priority,
            enabled,
            quality_profile_id: None,
            root_folder: None,
            language_profile_id: None,
        };
        ServiceStore::create(self.storage.as_ref(), &binding).await
    }

    /// A movie selection for `title` keyed on `tmdb_id`.
    pub fn movie(title: &str, year: i32, tmdb_id: i64) -> MediaSelection {
        MediaSelection {
            media_type: MediaType::Movie,
            title: title.to_string(),
            year: Some(year),
            tmdb_id: Some(tmdb_id),
            tvdb_id: None,
            seasons: SeasonSet::new(),
        }
    }

    /// A series selection with both catalog ids and the given seasons.
    pub fn series(title: &str, tmdb_id: i64, tvdb_id: i64, seasons: &[u32]) -> MediaSelection {
        MediaSelection {
            media_type: MediaType::Series,
            title: title.to_string(),
            year: None,
            tmdb_id: Some(tmdb_id),
            tvdb_id: Some(tvdb_id),
            seasons: seasons.iter().copied().collect(),
        }
    }

    /// Run `decide_and_process` as [`TEST_CONTACT`].
    pub async fn submit(
        &self,
        selection: &MediaSelection,
        binding_id: Option<i64>,
    ) -> Result<ProcessOutcome, MediagateError> {
        self.submit_as(TEST_CONTACT, selection, binding_id).await
    }

    /// Run `decide_and_process` for `contact`, using it verbatim as its hash.
    pub async fn submit_as(
        &self,
        contact: &str,
        selection: &MediaSelection,
        binding_id: Option<i64>,
    ) -> Result<ProcessOutcome, MediagateError> {
        self.processor
            .decide_and_process(contact, Some(contact), selection, binding_id)
            .await
    }

    pub async fn request(&self, id: i64) -> Result<MediaRequest, MediagateError> {
        RequestStore::find_by_id(self.storage.as_ref(), id)
            .await?
            .ok_or(MediagateError::NotFound {
                entity: "request",
                id,
            })
    }
}
