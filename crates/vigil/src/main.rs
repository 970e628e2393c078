// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vigil - a Telegram bot built on a single-active-waiter conversation engine.
//!
//! This is the binary entry point for the Vigil bot.

use clap::{Parser, Subcommand};

mod commands;
mod flows;
mod serve;
mod shutdown;

/// Vigil - a Telegram bot built on a single-active-waiter conversation engine.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Vigil bot.
    Serve,
    /// Load and validate the configuration, then print a summary.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match vigil_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vigil_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("vigil: fatal: {e}");
                std::process::exit(1);
            }
        }
        Commands::Config => {
            println!("config ok (bot.name={})", config.bot.name);
            println!("  storage.database_path = {}", config.storage.database_path);
            println!(
                "  telegram.bot_token = {}",
                if config.telegram.bot_token.is_some() { "set" } else { "unset" }
            );
            println!(
                "  listeners.file_fetch_timeout_secs = {}",
                config.listeners.file_fetch_timeout_secs
            );
        }
    }
}
