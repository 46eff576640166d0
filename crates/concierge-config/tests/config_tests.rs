// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Concierge configuration system.

use concierge_config::diagnostic::ConfigError;
use concierge_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
name = "helpdesk"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
admin_chat_id = -100123456

[support]
reminder_interval_secs = 120
max_reminders = 5

[content]
default_language = "en"
media_dir = "assets"

[analytics]
database_path = "/tmp/analytics.db"
report_window_days = 30
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "helpdesk");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.admin_chat_id, Some(-100123456));
    assert_eq!(config.support.reminder_interval_secs, 120);
    assert_eq!(config.support.max_reminders, 5);
    assert_eq!(config.content.default_language, "en");
    assert_eq!(config.content.media_dir, "assets");
    assert_eq!(config.analytics.database_path, "/tmp/analytics.db");
    assert_eq!(config.analytics.report_window_days, 30);
}

/// Empty TOML falls back to compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.agent.name, "concierge");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.admin_chat_id.is_none());
    assert_eq!(config.support.reminder_interval_secs, 600);
    assert_eq!(config.support.max_reminders, 3);
    assert_eq!(config.content.default_language, "ru");
    assert_eq!(config.analytics.report_window_days, 7);
}

/// Unknown field in a section produces an error mentioning the bad key.
#[test]
fn unknown_field_in_telegram_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown fields surface as UnknownKey diagnostics with a suggestion.
#[test]
fn unknown_field_becomes_diagnostic_with_suggestion() {
    let toml = r#"
[support]
max_remindrs = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce diagnostics");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion, .. }
            if key == "max_remindrs" && suggestion.as_deref() == Some("max_reminders")
    )));
}

/// A wrong value type surfaces as an InvalidType diagnostic.
#[test]
fn wrong_type_becomes_invalid_type_diagnostic() {
    let toml = r#"
[support]
reminder_interval_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce diagnostics");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Semantic validation rejects a zero reminder interval.
#[test]
fn zero_interval_fails_semantic_validation() {
    let toml = r#"
[support]
reminder_interval_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("reminder_interval_secs")
    )));
}

/// The defaults validate cleanly end to end.
#[test]
fn defaults_pass_end_to_end() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.agent.name, "concierge");
}
