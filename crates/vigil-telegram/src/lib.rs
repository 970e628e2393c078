// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport adapter for the Vigil bot.
//!
//! Implements [`EventTransport`] over the Telegram Bot API via teloxide and
//! runs the long-polling loop that feeds inbound messages into the
//! [`ListenerDispatcher`].

pub mod event;
pub mod markup;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, MessageId, Recipient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use vigil_config::model::TelegramConfig;
use vigil_core::{CommandSink, DocumentRef, EventTransport, Keyboard, ReplyAnchor, VigilError};
use vigil_listeners::ListenerDispatcher;

/// Telegram implementation of [`EventTransport`].
pub struct TelegramTransport {
    bot: Bot,
    fetch_timeout: Duration,
}

impl TelegramTransport {
    pub fn new(bot: Bot, fetch_timeout: Duration) -> Self {
        Self { bot, fetch_timeout }
    }

    /// Build a transport from configuration.
    ///
    /// Requires `telegram.bot_token` to be set and non-empty.
    pub fn from_config(
        config: &TelegramConfig,
        fetch_timeout: Duration,
    ) -> Result<Self, VigilError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            VigilError::Config("telegram.bot_token is required for the Telegram transport".into())
        })?;

        if token.is_empty() {
            return Err(VigilError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self::new(Bot::new(token), fetch_timeout))
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl EventTransport for TelegramTransport {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), VigilError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(|e| VigilError::Transport {
                message: format!("failed to delete message: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }

    async fn send(
        &self,
        text: &str,
        anchor: ReplyAnchor,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), VigilError> {
        let markup = keyboard.map(markup::to_inline_keyboard);

        // Edit the anchored prompt in place when there is one; flows keep a
        // single evolving message rather than stacking replies.
        if let Some(message_id) = anchor.message_id {
            let mut edit =
                self.bot
                    .edit_message_text(ChatId(anchor.chat_id), MessageId(message_id), text);
            if let Some(markup) = markup.clone() {
                edit = edit.reply_markup(markup);
            }
            match edit.await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    let err_str = e.to_string();
                    if err_str.contains("message is not modified") {
                        return Ok(());
                    }
                    // The prompt may have been deleted meanwhile; fall back
                    // to a fresh message.
                    warn!(error = %e, "edit failed, sending as new message");
                }
            }
        }

        let mut send = self
            .bot
            .send_message(Recipient::Id(ChatId(anchor.chat_id)), text);
        if let Some(markup) = markup {
            send = send.reply_markup(markup);
        }
        send.await.map_err(|e| VigilError::Transport {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }

    async fn fetch_document(&self, document: &DocumentRef) -> Result<String, VigilError> {
        let fetch = async {
            let file = self
                .bot
                .get_file(FileId(document.file_id.clone()))
                .await
                .map_err(|e| VigilError::Transport {
                    message: format!("failed to get file info: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let mut buf = Vec::new();
            self.bot
                .download_file(&file.path, &mut buf)
                .await
                .map_err(|e| VigilError::Transport {
                    message: format!("failed to download file: {e}"),
                    source: Some(Box::new(e)),
                })?;

            debug!(
                file_id = %document.file_id,
                size = buf.len(),
                "downloaded file from Telegram"
            );

            String::from_utf8(buf).map_err(|e| VigilError::Transport {
                message: "file content is not valid UTF-8 text".into(),
                source: Some(Box::new(e)),
            })
        };

        tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| VigilError::Timeout {
                duration: self.fetch_timeout,
            })?
    }
}

/// Run Telegram long polling until the token is cancelled, routing slash
/// commands to the [`CommandSink`], text messages to
/// [`ListenerDispatcher::on_text_event`], and documents to
/// [`ListenerDispatcher::on_file_event`].
///
/// Dispatch errors are logged, never crash the poll loop; the dispatcher
/// has already delivered any user-facing notice itself.
pub async fn run_polling(
    bot: Bot,
    dispatcher: Arc<ListenerDispatcher>,
    commands: Arc<dyn CommandSink>,
    allowed_users: Vec<String>,
    cancel: CancellationToken,
) {
    let allowed: Arc<Vec<String>> = Arc::new(allowed_users);

    info!("starting Telegram long polling");

    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let dispatcher = dispatcher.clone();
        let commands = commands.clone();
        let allowed = allowed.clone();
        async move {
            if !event::is_authorized(&msg, &allowed) {
                debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                return respond(());
            }

            let Some(inbound) = event::to_inbound_event(&msg) else {
                debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                return respond(());
            };

            let command = if inbound.document.is_some() {
                None
            } else {
                inbound.text.as_deref().and_then(event::command_name)
            };

            let result = if let Some(name) = command {
                commands.on_command(name, &inbound).await
            } else if inbound.document.is_some() {
                dispatcher.on_file_event(&inbound).await
            } else {
                dispatcher.on_text_event(&inbound).await
            };

            if let Err(e) = result {
                error!(error = %e, msg_id = msg.id.0, "dispatch failed");
            }

            respond(())
        }
    });

    let mut tg_dispatcher = Dispatcher::builder(bot, handler)
        .default_handler(|_| async {}) // Silently ignore non-message updates
        .build();

    let shutdown = tg_dispatcher.shutdown_token();
    tokio::spawn(async move {
        cancel.cancelled().await;
        if let Ok(wait) = shutdown.shutdown() {
            wait.await;
        }
    });

    tg_dispatcher.dispatch().await;
    info!("Telegram polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_bot_token() {
        let config = TelegramConfig {
            bot_token: None,
            allowed_users: vec![],
        };
        assert!(TelegramTransport::from_config(&config, Duration::from_secs(30)).is_err());
    }

    #[test]
    fn from_config_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            allowed_users: vec![],
        };
        assert!(TelegramTransport::from_config(&config, Duration::from_secs(30)).is_err());
    }

    #[test]
    fn from_config_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
            allowed_users: vec!["user1".into()],
        };
        assert!(TelegramTransport::from_config(&config, Duration::from_secs(30)).is_ok());
    }
}
