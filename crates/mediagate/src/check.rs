// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate check` command implementation.
//!
//! Runs one availability reconciliation cycle immediately, sends any
//! notifications it produces, and prints the cycle report.

use std::io::IsTerminal;

use mediagate_core::MediagateError;
use mediagate_requests::CycleReport;

use crate::app::App;

pub async fn run_check(app: &App, json: bool, plain: bool) -> Result<(), MediagateError> {
    let Some(report) = app.monitor.run_cycle().await else {
        return Err(MediagateError::Internal(
            "a reconciliation cycle is already in progress".to_string(),
        ));
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&report, use_color);
    }
    Ok(())
}

fn print_report(report: &CycleReport, use_color: bool) {
    println!();
    println!("  mediagate check");
    println!("  {}", "-".repeat(35));
    println!("    Checked:        {}", report.checked);
    println!("    Skipped:        {}", report.skipped);
    println!("    Notifications:  {}", report.notifications);
    println!("    Approved:       {}", report.approved);
    if use_color && report.errors > 0 {
        use colored::Colorize;
        println!("    Errors:         {}", report.errors.to_string().red());
    } else {
        println!("    Errors:         {}", report.errors);
    }
    println!();
}
