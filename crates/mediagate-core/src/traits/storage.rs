// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository contracts for requests, service bindings and the approval policy.

use async_trait::async_trait;

use crate::error::MediagateError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ApprovalPolicy, MediaRequest, NewMediaRequest, NewServiceBinding, RequestStatus,
    RequestUpdate, ServiceBinding,
};

/// Lifecycle of a storage backend (migrations, connection, checkpoint on close).
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), MediagateError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MediagateError>;
}

/// Persistence of [`MediaRequest`] records.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All requests currently in `status`, oldest first.
    async fn find_by_status(&self, status: RequestStatus)
    -> Result<Vec<MediaRequest>, MediagateError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRequest>, MediagateError>;

    /// Every request, newest first.
    async fn find_all(&self) -> Result<Vec<MediaRequest>, MediagateError>;

    async fn create(&self, request: &NewMediaRequest) -> Result<MediaRequest, MediagateError>;

    /// Apply `update` to request `id` and return the stored result.
    ///
    /// Fails with [`MediagateError::NotFound`] when the id is unknown.
    async fn update(
        &self,
        id: i64,
        update: &RequestUpdate,
    ) -> Result<MediaRequest, MediagateError>;
}

/// Read access (and CLI management) of downstream backend bindings.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceBinding>, MediagateError>;

    /// All bindings ordered by priority, then id.
    async fn list(&self) -> Result<Vec<ServiceBinding>, MediagateError>;

    async fn create(&self, binding: &NewServiceBinding) -> Result<ServiceBinding, MediagateError>;

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<(), MediagateError>;
}

/// The single active approval policy.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// `None` when no policy has ever been saved.
    async fn get_active(&self) -> Result<Option<ApprovalPolicy>, MediagateError>;

    async fn save(&self, policy: &ApprovalPolicy) -> Result<(), MediagateError>;
}
