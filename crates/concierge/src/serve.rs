// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `concierge serve` command implementation.
//!
//! Wires the engine to the Telegram gateway and the SQLite event log, then
//! runs long polling until a shutdown signal arrives. Missing transport
//! credentials abort startup immediately.

use std::sync::Arc;
use std::time::Duration;

use concierge_analytics::{Database, EventLog};
use concierge_config::ConciergeConfig;
use concierge_content::{LanguageResolver, StaticCatalog};
use concierge_core::{ConciergeError, MessagingGateway};
use concierge_engine::{
    EngineSettings, EscalationScheduler, MessageLifecycle, SupportEngine,
};
use concierge_telegram::{run_polling, TelegramGateway};
use teloxide::Bot;
use tracing::{error, info};

/// Runs the `concierge serve` command until interrupted.
pub async fn run_serve(config: ConciergeConfig) -> Result<(), ConciergeError> {
    info!("starting concierge serve");

    let bot_token = config.telegram.bot_token.clone().ok_or_else(|| {
        ConciergeError::Config("telegram.bot_token is required for serve".into())
    })?;
    let admin_chat_id = config.telegram.admin_chat_id.ok_or_else(|| {
        ConciergeError::Config("telegram.admin_chat_id is required for serve".into())
    })?;

    let db = Database::open(&config.analytics.database_path).await?;
    let events = Arc::new(EventLog::new(db));

    let catalog = StaticCatalog::builtin(&config.content.media_dir);
    let resolver = Arc::new(LanguageResolver::new(
        &catalog,
        &config.content.default_language,
    )?);

    let bot = Bot::new(bot_token);
    let gateway: Arc<dyn MessagingGateway> = Arc::new(TelegramGateway::new(bot.clone()));
    let lifecycle = Arc::new(MessageLifecycle::new(gateway.clone()));

    let scheduler = EscalationScheduler::new(
        lifecycle.clone(),
        events.clone(),
        resolver.clone(),
        Duration::from_secs(config.support.reminder_interval_secs),
        config.support.max_reminders,
    );

    let engine = Arc::new(SupportEngine::new(
        gateway,
        lifecycle,
        scheduler,
        resolver,
        events.clone(),
        EngineSettings {
            admin_chat_id,
            report_window_days: config.analytics.report_window_days,
        },
    ));

    info!(
        reminder_interval_secs = config.support.reminder_interval_secs,
        max_reminders = config.support.max_reminders,
        default_language = config.content.default_language.as_str(),
        "engine initialized"
    );

    let mut polling = tokio::spawn(run_polling(bot, engine));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping dispatcher");
            polling.abort();
        }
        result = &mut polling => {
            if let Err(e) = result {
                error!(error = %e, "polling dispatcher exited unexpectedly");
            }
        }
    }

    events.close().await?;
    info!("concierge stopped");
    Ok(())
}
