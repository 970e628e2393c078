// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vigil.toml` > `~/.config/vigil/vigil.toml` > `/etc/vigil/vigil.toml`
//! with environment variable overrides via `VIGIL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VigilConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vigil/vigil.toml` (system-wide)
/// 3. `~/.config/vigil/vigil.toml` (user XDG config)
/// 4. `./vigil.toml` (local directory)
/// 5. `VIGIL_*` environment variables
pub fn load_config() -> Result<VigilConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (defaults + string, no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VigilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VigilConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VigilConfig::default()))
        .merge(Toml::file("/etc/vigil/vigil.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vigil/vigil.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vigil.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. `VIGIL_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("VIGIL_").map(|key| {
        // Figment hands the mapper the original-case env name with the
        // prefix stripped (lowercasing happens only after mapping), so
        // normalize before matching sections.
        // Example: VIGIL_TELEGRAM_BOT_TOKEN -> "telegram.bot_token"
        let key = key.as_str().to_ascii_lowercase();
        for section in ["bot", "telegram", "storage", "listeners"] {
            if let Some(rest) = key.strip_prefix(section)
                && let Some(rest) = rest.strip_prefix('_')
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[bot]
name = "sentry"
log_level = "debug"

[storage]
database_path = "/tmp/sentry.db"
"#,
        )
        .unwrap();
        assert_eq!(config.bot.name, "sentry");
        assert_eq!(config.bot.log_level, "debug");
        assert_eq!(config.storage.database_path, "/tmp/sentry.db");
        // Untouched sections keep their defaults.
        assert_eq!(config.listeners.file_fetch_timeout_secs, 30);
    }

    #[test]
    fn load_from_empty_str_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.bot.name, "vigil");
    }

    #[test]
    fn unknown_key_in_str_fails() {
        let result = load_config_from_str(
            r#"
[telegram]
bot_tken = "12345:abc"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn env_mapping_targets_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VIGIL_TELEGRAM_BOT_TOKEN", "42:token");
            jail.set_env("VIGIL_LISTENERS_FILE_FETCH_TIMEOUT_SECS", "7");
            let config: VigilConfig = Figment::new()
                .merge(Serialized::defaults(VigilConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.telegram.bot_token.as_deref(), Some("42:token"));
            assert_eq!(config.listeners.file_fetch_timeout_secs, 7);
            Ok(())
        });
    }
}
