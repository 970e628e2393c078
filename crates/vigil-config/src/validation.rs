// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane timeout bounds.

use crate::diagnostic::ConfigError;
use crate::model::VigilConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VigilConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate log level is recognized
    if !VALID_LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` is not one of: {}",
                config.bot.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate the file fetch timeout bounds the critical section at all
    if config.listeners.file_fetch_timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "listeners.file_fetch_timeout_secs must be at least 1, got {}",
                config.listeners.file_fetch_timeout_secs
            ),
        });
    }

    // Validate the bot token, when present, is not blank
    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = VigilConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = VigilConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_fetch_timeout_fails_validation() {
        let mut config = VigilConfig::default();
        config.listeners.file_fetch_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("file_fetch_timeout_secs"))
        ));
    }

    #[test]
    fn bogus_log_level_fails_validation() {
        let mut config = VigilConfig::default();
        config.bot.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn empty_bot_token_fails_validation() {
        let mut config = VigilConfig::default();
        config.telegram.bot_token = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("bot_token"))
        ));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = VigilConfig::default();
        config.storage.database_path = "".to_string();
        config.listeners.file_fetch_timeout_secs = 0;
        config.bot.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
