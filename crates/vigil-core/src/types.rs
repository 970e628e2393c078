// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Vigil workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The coarse class of inbound event a waiter expects.
///
/// A `Text` waiter is satisfied by the next text message from its owner;
/// a `File` waiter by the next document message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WaiterKind {
    Text,
    File,
}

/// A persisted expectation that the next inbound event of a given kind
/// from a given user should be routed to a specific pending flow.
///
/// Invariant: at most one waiter per `(user_id, kind)` pair for non-null
/// users. Creating another supersedes the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waiter {
    pub id: i64,
    /// Flow tag identifying which pending flow this waiter belongs to.
    /// Used as the handler registry key on fulfillment.
    pub flow: String,
    pub kind: WaiterKind,
    /// Owning user. Nullable only for waiters created from an unresolvable
    /// context; such waiters are unreachable by lookup until cleared.
    pub user_id: Option<i64>,
    pub chat_id: Option<i64>,
    pub message_id: Option<i32>,
    /// Opaque payload carried from creation to fulfillment.
    pub extra_data: Option<String>,
    pub created_at: String,
}

/// Field set for inserting a waiter. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default)]
pub struct NewWaiter {
    pub flow: String,
    pub kind: Option<WaiterKind>,
    pub user_id: Option<i64>,
    pub chat_id: Option<i64>,
    pub message_id: Option<i32>,
    pub extra_data: Option<String>,
}

/// Filter for bulk waiter deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterFilter {
    /// Every waiter owned by the user, any kind.
    User { user_id: i64 },
    /// Only the user's waiter of one kind.
    UserKind { user_id: i64, kind: WaiterKind },
}

/// An internal user, keyed by the external platform identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// External platform identifier (Telegram user id as string).
    pub tg_id: String,
    pub created_at: String,
}

/// Chat classification of an inbound event. The waiter mechanism only
/// operates on `Private` conversations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Private,
    Group,
    Channel,
}

/// Reference to a file attached to an inbound event, resolvable through
/// the transport into text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// A platform-neutral inbound event as consumed by the dispatcher.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub conversation: ConversationKind,
    /// External platform id of the sender.
    pub sender_id: String,
    pub chat_id: i64,
    pub message_id: i32,
    pub text: Option<String>,
    pub document: Option<DocumentRef>,
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// Callback data sent back when the button is pressed.
    pub action: String,
}

/// Platform-neutral inline keyboard. The transport adapter maps this onto
/// the platform's native markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub buttons: Vec<Vec<Button>>,
}

impl Keyboard {
    /// The default single-button "back" navigation markup attached to
    /// handler replies that specify no keyboard of their own.
    pub fn back() -> Self {
        Self {
            buttons: vec![vec![Button {
                label: "« Back".to_string(),
                action: "back".to_string(),
            }]],
        }
    }
}

/// A follow-up message produced by a flow handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }
}

/// Where an outbound message should land: the chat, and optionally an
/// existing message to edit in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyAnchor {
    pub chat_id: i64,
    pub message_id: Option<i32>,
}

/// A validation rule for textual input, checked by the validation hook
/// before a waiter is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    /// The candidate value, already trimmed by the dispatcher.
    pub value: String,
    pub min_chars: usize,
    pub max_chars: usize,
    /// Prompt sent to the user when the rule fails.
    pub error_text: String,
}

/// The title rule shared by both calendar-event creation flows.
pub fn event_title_rule(value: impl Into<String>) -> TextRule {
    TextRule {
        value: value.into(),
        min_chars: 1,
        max_chars: 128,
        error_text: "The title must be between 1 and 128 characters. Please try again."
            .to_string(),
    }
}

/// Lifecycle status of a draft record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Creating,
    Active,
}

/// An in-progress business record tied to a waiter-driven flow. Both draft
/// families (mailings and mailing templates) share this shape; this core
/// only knows the purge contract, not draft internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub status: DraftStatus,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn waiter_kind_round_trips_lowercase() {
        assert_eq!(WaiterKind::Text.to_string(), "text");
        assert_eq!(WaiterKind::File.to_string(), "file");
        assert_eq!(WaiterKind::from_str("text").unwrap(), WaiterKind::Text);
        assert_eq!(WaiterKind::from_str("file").unwrap(), WaiterKind::File);
        assert!(WaiterKind::from_str("voice").is_err());
    }

    #[test]
    fn draft_status_uses_screaming_snake_case() {
        assert_eq!(DraftStatus::Creating.to_string(), "CREATING");
        assert_eq!(DraftStatus::from_str("CREATING").unwrap(), DraftStatus::Creating);
        assert_eq!(DraftStatus::Active.to_string(), "ACTIVE");
    }

    #[test]
    fn conversation_kind_serde() {
        let json = serde_json::to_string(&ConversationKind::Private).unwrap();
        assert_eq!(json, "\"private\"");
        let parsed: ConversationKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ConversationKind::Private);
    }

    #[test]
    fn back_keyboard_has_single_button() {
        let kb = Keyboard::back();
        assert_eq!(kb.buttons.len(), 1);
        assert_eq!(kb.buttons[0].len(), 1);
        assert_eq!(kb.buttons[0][0].action, "back");
    }

    #[test]
    fn event_title_rule_bounds() {
        let rule = event_title_rule("My Trip");
        assert_eq!(rule.min_chars, 1);
        assert_eq!(rule.max_chars, 128);
        assert_eq!(rule.value, "My Trip");
    }
}
