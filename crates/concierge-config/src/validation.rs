// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::ConciergeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.support.reminder_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "support.reminder_interval_secs must be at least 1".to_string(),
        });
    }

    if config.analytics.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "analytics.database_path must not be empty".to_string(),
        });
    }

    if config.analytics.report_window_days == 0 {
        errors.push(ConfigError::Validation {
            message: "analytics.report_window_days must be at least 1".to_string(),
        });
    }

    if config.content.default_language.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "content.default_language must not be empty".to_string(),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ConciergeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.support.reminder_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("reminder_interval_secs"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.analytics.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn empty_bot_token_fails_when_set() {
        let mut config = ConciergeConfig::default();
        config.telegram.bot_token = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("bot_token"))
        ));
    }

    #[test]
    fn zero_window_fails_validation() {
        let mut config = ConciergeConfig::default();
        config.analytics.report_window_days = 0;
        assert!(validate_config(&config).is_err());
    }
}
