// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Vigil configuration system.

use vigil_config::diagnostic::{ConfigError, suggest_key};
use vigil_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_vigil_config() {
    let toml = r#"
[bot]
name = "test-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
allowed_users = ["alice", "bob"]

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[listeners]
file_fetch_timeout_secs = 10
delete_prompt_replies = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "test-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.allowed_users, vec!["alice", "bob"]);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.listeners.file_fetch_timeout_secs, 10);
    assert!(!config.listeners.delete_prompt_replies);
}

/// Unknown field in [bot] section produces an UnknownField error.
#[test]
fn unknown_field_in_bot_produces_error() {
    let toml = r#"
[bot]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [telegram] section produces an UnknownField error.
#[test]
fn unknown_field_in_telegram_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[mailer]
enabled = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// The high-level entry point converts figment errors into diagnostics
/// carrying a typo suggestion.
#[test]
fn load_and_validate_str_suggests_correction() {
    let toml = r#"
[listeners]
file_fetch_timeout = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion, .. }
            if suggestion.as_deref() == Some("file_fetch_timeout_secs")
    )));
}

/// Semantic validation errors are all collected, not fail-fast.
#[test]
fn load_and_validate_str_collects_semantic_errors() {
    let toml = r#"
[bot]
log_level = "shouting"

[storage]
database_path = ""
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Defaults alone form a valid configuration.
#[test]
fn empty_config_is_valid() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.bot.name, "vigil");
    assert_eq!(config.listeners.file_fetch_timeout_secs, 30);
}

/// Suggestion engine matches section keys from this config schema.
#[test]
fn suggest_key_handles_listener_fields() {
    let valid = &["file_fetch_timeout_secs", "delete_prompt_replies"];
    assert_eq!(
        suggest_key("delete_prompt_replys", valid),
        Some("delete_prompt_replies".to_string())
    );
}
