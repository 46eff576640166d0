// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Concierge support agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized config
//! keys are rejected at startup with actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the serve command additionally requires the Telegram section to
/// be filled in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Escalation reminder settings.
    #[serde(default)]
    pub support: SupportConfig,

    /// Localized content settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Analytics event store settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "concierge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required for `concierge serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat that receives escalated requests and may run the report
    /// command. Required for `concierge serve`.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
}

/// Escalation reminder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SupportConfig {
    /// Seconds between reminder prompts while an escalation is pending.
    #[serde(default = "default_reminder_interval_secs")]
    pub reminder_interval_secs: u64,

    /// Reminders sent per escalation before going silent.
    #[serde(default = "default_max_reminders")]
    pub max_reminders: u32,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            reminder_interval_secs: default_reminder_interval_secs(),
            max_reminders: default_max_reminders(),
        }
    }
}

fn default_reminder_interval_secs() -> u64 {
    600
}

fn default_max_reminders() -> u32 {
    3
}

/// Localized content configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Language used when no explicit selection or usable hint exists.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Directory holding answer media referenced by the catalog.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            media_dir: default_media_dir(),
        }
    }
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_media_dir() -> String {
    "media".to_string()
}

/// Analytics event store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Trailing window, in days, covered by the aggregate report.
    #[serde(default = "default_report_window_days")]
    pub report_window_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            report_window_days: default_report_window_days(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("concierge").join("analytics.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("analytics.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_report_window_days() -> u32 {
    7
}
