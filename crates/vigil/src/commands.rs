// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command surface of the bot.
//!
//! Commands are the entry points of the waiter flows: `/event` and
//! `/shared_event` arm a title waiter, `/cancel` tears down whatever is
//! pending. Users are registered on first contact, so any command works
//! without a prior `/start`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use vigil_core::{
    CommandSink, ConversationKind, EventTransport, InboundEvent, NewWaiter, ReplyAnchor, User,
    UserResolver, VigilError, WaiterKind,
};
use vigil_listeners::LifecycleManager;
use vigil_storage::SqliteStore;

use crate::flows::{PERSONAL_EVENT_TITLE_FLOW, SHARED_EVENT_TITLE_FLOW};

const START_TEXT: &str = "Hi! Use /event or /shared_event to create a calendar event, \
     and /cancel to abandon anything pending.";
const PERSONAL_PROMPT: &str = "Send a title for your personal calendar event.";
const SHARED_PROMPT: &str = "Send a title for the shared calendar event.";
const CANCEL_TEXT: &str = "Cancelled. Nothing is pending now.";

/// Handles the bot's slash commands.
pub struct BotCommands {
    store: SqliteStore,
    lifecycle: LifecycleManager,
    transport: Arc<dyn EventTransport>,
}

impl BotCommands {
    pub fn new(
        store: SqliteStore,
        lifecycle: LifecycleManager,
        transport: Arc<dyn EventTransport>,
    ) -> Self {
        Self {
            store,
            lifecycle,
            transport,
        }
    }

    /// Resolve the sender, registering them on first contact.
    async fn ensure_user(&self, external_id: &str) -> Result<User, VigilError> {
        if let Some(user) = self.store.find_by_external_id(external_id).await? {
            return Ok(user);
        }
        let user = self.store.create_user(external_id).await?;
        info!(user_id = user.id, tg_id = %user.tg_id, "registered new user");
        Ok(user)
    }

    /// Arm a text waiter for a title flow and prompt the user for input.
    async fn arm_title_flow(
        &self,
        event: &InboundEvent,
        flow: &str,
        prompt: &str,
    ) -> Result<(), VigilError> {
        let user = self.ensure_user(&event.sender_id).await?;
        self.lifecycle
            .create_waiter(
                NewWaiter {
                    flow: flow.to_string(),
                    kind: Some(WaiterKind::Text),
                    user_id: Some(user.id),
                    chat_id: Some(event.chat_id),
                    message_id: None,
                    extra_data: None,
                },
                None,
            )
            .await?;
        self.send_plain(event, prompt).await
    }

    async fn send_plain(&self, event: &InboundEvent, text: &str) -> Result<(), VigilError> {
        self.transport
            .send(
                text,
                ReplyAnchor {
                    chat_id: event.chat_id,
                    message_id: None,
                },
                None,
            )
            .await
    }
}

#[async_trait]
impl CommandSink for BotCommands {
    async fn on_command(&self, name: &str, event: &InboundEvent) -> Result<(), VigilError> {
        // Commands only work where their waiters can be fulfilled.
        if event.conversation != ConversationKind::Private {
            return Ok(());
        }

        match name {
            "start" => {
                self.ensure_user(&event.sender_id).await?;
                self.send_plain(event, START_TEXT).await
            }
            "event" => {
                self.arm_title_flow(event, PERSONAL_EVENT_TITLE_FLOW, PERSONAL_PROMPT)
                    .await
            }
            "shared_event" => {
                self.arm_title_flow(event, SHARED_EVENT_TITLE_FLOW, SHARED_PROMPT)
                    .await
            }
            "cancel" => {
                self.lifecycle.clear_user_listeners(&event.sender_id).await?;
                self.send_plain(event, CANCEL_TEXT).await
            }
            other => {
                debug!(command = other, "ignoring unknown command");
                Ok(())
            }
        }
    }
}
