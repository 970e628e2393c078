// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vigil bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vigil configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Waiter dispatch settings.
    #[serde(default)]
    pub listeners: ListenersConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "vigil".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram transport.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// List of allowed Telegram user IDs or usernames. Empty allows everyone;
    /// the waiter mechanism ignores non-private chats regardless.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vigil").join("vigil.db"))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "vigil.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Waiter dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListenersConfig {
    /// Upper bound, in seconds, on resolving and downloading a document for
    /// a file-kind waiter. Keeps the per-user critical section from being
    /// held indefinitely.
    #[serde(default = "default_file_fetch_timeout_secs")]
    pub file_fetch_timeout_secs: u64,

    /// Whether the dispatcher deletes the user's triggering reply from the
    /// chat (cosmetic cleanup; always best-effort).
    #[serde(default = "default_delete_prompt_replies")]
    pub delete_prompt_replies: bool,
}

impl Default for ListenersConfig {
    fn default() -> Self {
        Self {
            file_fetch_timeout_secs: default_file_fetch_timeout_secs(),
            delete_prompt_replies: default_delete_prompt_replies(),
        }
    }
}

fn default_file_fetch_timeout_secs() -> u64 {
    30
}

fn default_delete_prompt_replies() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = VigilConfig::default();
        assert_eq!(config.bot.name, "vigil");
        assert_eq!(config.bot.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert!(config.telegram.allowed_users.is_empty());
        assert!(config.storage.wal_mode);
        assert_eq!(config.listeners.file_fetch_timeout_secs, 30);
        assert!(config.listeners.delete_prompt_replies);
    }

    #[test]
    fn deny_unknown_fields_rejects_typos() {
        let toml_str = r#"
[bot]
naem = "oops"
"#;
        let result = toml::from_str::<VigilConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let toml_str = r#"
[listeners]
file_fetch_timeout_secs = 5
"#;
        let config: VigilConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.listeners.file_fetch_timeout_secs, 5);
        assert!(config.listeners.delete_prompt_replies);
        assert_eq!(config.bot.name, "vigil");
    }
}
