// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram messages into platform-neutral inbound events,
//! plus authorization filtering.

use teloxide::prelude::*;
use teloxide::types::{ChatKind, PublicChatKind};

use vigil_core::{ConversationKind, DocumentRef, InboundEvent};

/// Classify the chat a message arrived from.
pub fn conversation_kind(msg: &Message) -> ConversationKind {
    match &msg.chat.kind {
        ChatKind::Private(_) => ConversationKind::Private,
        ChatKind::Public(public) => match public.kind {
            PublicChatKind::Channel(_) => ConversationKind::Channel,
            _ => ConversationKind::Group,
        },
    }
}

/// Checks whether the message sender is authorized.
///
/// Authorization passes if the sender's user ID (as string) or username
/// matches any entry in `allowed_users`. An empty list allows everyone.
/// Messages without a sender (e.g., channel posts) are rejected.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }

    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return false,
    };

    let user_id_str = user.id.0.to_string();

    for allowed in allowed_users {
        // Match by user ID
        if *allowed == user_id_str {
            return true;
        }
        // Match by username (with or without @ prefix)
        if let Some(ref username) = user.username {
            let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
            if username.eq_ignore_ascii_case(allowed_clean) {
                return true;
            }
        }
    }

    false
}

/// Extract the command name from a text, if the text is a slash command.
///
/// Strips the leading slash, any arguments, and a `@botname` mention
/// (`/cancel@vigil_bot` and `/cancel` are the same command).
pub fn command_name(text: &str) -> Option<&str> {
    let rest = text.trim().strip_prefix('/')?;
    let token = rest.split_whitespace().next()?;
    let name = token.split('@').next()?;
    if name.is_empty() { None } else { Some(name) }
}

/// Convert a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for messages without a sender or carrying neither text
/// nor a document -- the dispatcher has nothing to match those against.
pub fn to_inbound_event(msg: &Message) -> Option<InboundEvent> {
    let sender_id = msg.from.as_ref()?.id.0.to_string();

    let text = msg.text().map(|t| t.to_string());
    let document = msg.document().map(|doc| DocumentRef {
        file_id: doc.file.id.0.clone(),
        file_name: doc.file_name.clone(),
        mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
    });

    if text.is_none() && document.is_none() {
        return None;
    }

    Some(InboundEvent {
        conversation: conversation_kind(msg),
        sender_id,
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        text,
        document,
    })
}
