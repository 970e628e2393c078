// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock event transport: captures everything the dispatcher sends out and
//! serves scripted document fetches.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use vigil_core::{DocumentRef, EventTransport, Keyboard, ReplyAnchor, VigilError};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub text: String,
    pub anchor: ReplyAnchor,
    pub keyboard: Option<Keyboard>,
}

/// In-memory [`EventTransport`] for tests.
///
/// Sends and deletes are recorded for assertions. Document fetches pop from
/// a scripted queue; an empty queue or a scripted `Err` fails the fetch.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<(i64, i32)>>,
    fetches: Mutex<VecDeque<Result<String, String>>>,
    fail_sends: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one successful document fetch returning `content`.
    pub fn script_fetch(&self, content: &str) {
        self.fetches.lock().unwrap().push_back(Ok(content.to_string()));
    }

    /// Queue one failing document fetch.
    pub fn script_fetch_failure(&self, message: &str) {
        self.fetches.lock().unwrap().push_back(Err(message.to_string()));
    }

    /// Make every subsequent `send` fail. Deletes are unaffected.
    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    /// All messages sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts of all messages sent so far, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.text.clone()).collect()
    }

    /// All `(chat_id, message_id)` pairs deleted so far, in order.
    pub fn deleted(&self) -> Vec<(i64, i32)> {
        self.deleted.lock().unwrap().clone()
    }

    /// Drop all captured traffic.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
        self.deleted.lock().unwrap().clear();
    }
}

#[async_trait]
impl EventTransport for MockTransport {
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), VigilError> {
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }

    async fn send(
        &self,
        text: &str,
        anchor: ReplyAnchor,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), VigilError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(VigilError::Transport {
                message: "scripted send failure".into(),
                source: None,
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            text: text.to_string(),
            anchor,
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn fetch_document(&self, _document: &DocumentRef) -> Result<String, VigilError> {
        match self.fetches.lock().unwrap().pop_front() {
            Some(Ok(content)) => Ok(content),
            Some(Err(message)) => Err(VigilError::Transport { message, source: None }),
            None => Err(VigilError::Transport {
                message: "no scripted fetch available".into(),
                source: None,
            }),
        }
    }
}
