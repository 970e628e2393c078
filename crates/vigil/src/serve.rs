// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil serve` command implementation.
//!
//! Wires the SQLite store, the listener dispatcher with its built-in flows,
//! and the Telegram transport, then runs long polling until a shutdown
//! signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vigil_config::VigilConfig;
use vigil_core::{CommandSink, VigilError};
use vigil_listeners::{HandlerRegistry, LifecycleManager, ListenerDispatcher, PromptValidator};
use vigil_storage::SqliteStore;
use vigil_telegram::TelegramTransport;

use crate::commands::BotCommands;
use crate::flows::EventTitleFlow;
use crate::shutdown;

/// Runs the `vigil serve` command.
pub async fn run_serve(config: VigilConfig) -> Result<(), VigilError> {
    init_tracing(&config.bot.log_level);

    info!(bot = %config.bot.name, "starting vigil serve");

    // Storage: opens the database, creating it and running migrations.
    let store = SqliteStore::open(&config.storage).await?;
    info!(path = %config.storage.database_path, "storage initialized");

    // Transport: requires a configured bot token.
    let fetch_timeout = Duration::from_secs(config.listeners.file_fetch_timeout_secs);
    let transport = Arc::new(TelegramTransport::from_config(&config.telegram, fetch_timeout)?);
    let bot = transport.bot().clone();

    let validator = Arc::new(PromptValidator::new(transport.clone()));

    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(EventTitleFlow::personal()))?;
    registry.register(Arc::new(EventTitleFlow::shared()))?;
    info!(flows = registry.len(), "handler registry populated");

    let dispatcher = Arc::new(ListenerDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        transport.clone(),
        validator,
        Arc::new(registry),
        config.listeners.delete_prompt_replies,
    ));

    // The command surface arms and clears waiters; the poll loop itself
    // only routes.
    let lifecycle = LifecycleManager::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        store.all_draft_families(),
    );
    let commands: Arc<dyn CommandSink> =
        Arc::new(BotCommands::new(store.clone(), lifecycle, transport));

    let cancel = shutdown::install_signal_handler();

    vigil_telegram::run_polling(
        bot,
        dispatcher,
        commands,
        config.telegram.allowed_users.clone(),
        cancel,
    )
    .await;

    info!("vigil serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigil={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
