// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for mediagate integration tests.
//!
//! Provides mock adapters and a harness for fast, deterministic tests that
//! need no network and no real backends.
//!
//! # Components
//!
//! - [`MockMessenger`] - captures outbound notifications
//! - [`MockOverseerr`], [`MockRadarr`], [`MockSonarr`] - scriptable backends
//! - [`MockConnector`] - hands out the mock backends
//! - [`PlainCipher`] - reversible, non-secret stand-in for the vault
//! - [`RecordingPublisher`] - captures emitted events
//! - [`TestHarness`] - the engine wired against all of the above

pub mod harness;
pub mod mock_backends;
pub mod mock_messenger;
pub mod support;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backends::{MockConnector, MockOverseerr, MockRadarr, MockSonarr};
pub use mock_messenger::{MockMessenger, SentMessage};
pub use support::{PlainCipher, RecordingPublisher};
