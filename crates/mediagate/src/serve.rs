// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate serve` command implementation.
//!
//! Wires storage, the vault, the backend connector and the message transport,
//! attaches an event-logging subscriber, and runs the availability monitor
//! until SIGINT or SIGTERM.

use mediagate_bus::spawn_event_logger;
use mediagate_config::model::MediagateConfig;
use mediagate_core::MediagateError;
use tracing::{info, warn};

use crate::app::App;
use crate::shutdown;

/// Run the broker until a shutdown signal arrives.
pub async fn run_serve(config: MediagateConfig) -> Result<(), MediagateError> {
    info!(name = %config.service.name, "starting mediagate");

    let app = App::open(&config).await?;
    let cancel = shutdown::install_signal_handler();
    let event_logger = spawn_event_logger(&app.bus, cancel.child_token());

    if config.monitor.enabled {
        app.monitor.start();
        info!(
            interval_secs = config.monitor.interval_secs,
            "availability monitor started"
        );
    } else {
        info!("availability monitor disabled by configuration");
    }

    info!("mediagate ready");
    cancel.cancelled().await;

    info!("shutting down");
    app.monitor.stop();
    if let Err(e) = event_logger.await {
        warn!(error = %e, "event logger task ended abnormally");
    }
    if let Err(e) = app.close().await {
        warn!(error = %e, "failed to checkpoint database on shutdown");
    }
    info!("mediagate stopped");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so command output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mediagate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
