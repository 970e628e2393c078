// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound side of the chat platform: message delivery, cosmetic deletes,
//! and document retrieval.

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{DocumentRef, Keyboard, ReplyAnchor};

/// The chat platform as seen from the dispatcher.
///
/// `delete_message` is only ever used best-effort (failures are discarded
/// by the caller); `send` and `fetch_document` failures propagate.
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Delete a message from the chat.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), VigilError>;

    /// Deliver a message. When the anchor names a message, the transport
    /// edits it in place; otherwise it sends a fresh message to the chat.
    async fn send(
        &self,
        text: &str,
        anchor: ReplyAnchor,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), VigilError>;

    /// Resolve a document reference to a link, download it, and decode the
    /// content as UTF-8 text. Bounded by the transport's configured timeout;
    /// exceeding it is `VigilError::Timeout`.
    async fn fetch_document(&self, document: &DocumentRef) -> Result<String, VigilError>;
}
