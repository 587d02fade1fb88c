// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds backend clients for a binding's base URL and decrypted key.

use std::sync::Arc;
use std::time::Duration;

use mediagate_core::{BackendConnector, MediagateError, OverseerrApi, RadarrApi, SonarrApi};
use secrecy::SecretString;

use crate::client::ArrClient;
use crate::overseerr::OverseerrClient;
use crate::radarr::RadarrClient;
use crate::sonarr::SonarrClient;

/// [`BackendConnector`] producing HTTP clients with a shared timeout.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl BackendConnector for HttpConnector {
    fn overseerr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn OverseerrApi>, MediagateError> {
        let http = ArrClient::new("Overseerr", base_url, api_key, self.timeout)?;
        Ok(Arc::new(OverseerrClient::new(http)))
    }

    fn radarr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn RadarrApi>, MediagateError> {
        let http = ArrClient::new("Radarr", base_url, api_key, self.timeout)?;
        Ok(Arc::new(RadarrClient::new(http)))
    }

    fn sonarr(
        &self,
        base_url: &str,
        api_key: &SecretString,
    ) -> Result<Arc<dyn SonarrApi>, MediagateError> {
        let http = ArrClient::new("Sonarr", base_url, api_key, self.timeout)?;
        Ok(Arc::new(SonarrClient::new(http)))
    }
}
