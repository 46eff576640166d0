// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `concierge report` command implementation.
//!
//! Prints the rolling-window aggregate report to stdout. Works without
//! Telegram credentials, so operators can inspect analytics offline.

use concierge_analytics::{Database, EventLog};
use concierge_config::ConciergeConfig;
use concierge_content::{LanguageResolver, StaticCatalog};
use concierge_core::ConciergeError;

/// Runs the `concierge report` command.
pub async fn run_report(config: ConciergeConfig, days: Option<u32>) -> Result<(), ConciergeError> {
    let days = days.unwrap_or(config.analytics.report_window_days);

    let db = Database::open(&config.analytics.database_path).await?;
    let log = EventLog::new(db);
    let report = log.query(days).await?;

    let catalog = StaticCatalog::builtin(&config.content.media_dir);
    let resolver = LanguageResolver::new(&catalog, &config.content.default_language)?;
    let bundle = resolver.bundle(resolver.default_tag());

    println!(
        "Window: last {} days (since {})",
        report.window_days, report.since
    );
    println!("Events: {}", report.total);
    println!("Unique users: {}", report.unique_users);

    if !report.by_event.is_empty() {
        println!();
        println!("By event:");
        for (event_type, count) in &report.by_event {
            println!("- {event_type}: {count}");
        }
    }

    if !report.top_faq.is_empty() {
        println!();
        println!("Top FAQ subjects:");
        for (subject, count) in &report.top_faq {
            println!("- {}: {count}", bundle.subject_label(subject));
        }
    }

    if !report.top_install.is_empty() {
        println!();
        println!("Top install subjects:");
        for (subject, count) in &report.top_install {
            println!("- {}: {count}", bundle.subject_label(subject));
        }
    }

    println!();
    println!(
        "Feedback: helpful {}, unhelpful {}",
        report.helpful, report.unhelpful
    );

    log.close().await?;
    Ok(())
}
