// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-rule validation and the best-effort combinator.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use vigil_core::{
    EventTransport, InboundEvent, ReplyAnchor, TextRule, ValidationHook, VigilError,
};

/// Run a best-effort side effect, discarding (and logging) any failure.
///
/// Used for cosmetic operations like deleting the user's prompt reply or
/// delivering an error notice: their failure must never abort the turn.
pub async fn attempt<T>(
    what: &'static str,
    fut: impl Future<Output = Result<T, VigilError>>,
) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(%error, what, "best-effort operation failed, discarding");
            None
        }
    }
}

/// [`ValidationHook`] that checks a [`TextRule`] and, on failure, tells the
/// user why before the dispatcher ends the turn with the waiter intact.
pub struct PromptValidator {
    transport: Arc<dyn EventTransport>,
}

impl PromptValidator {
    pub fn new(transport: Arc<dyn EventTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ValidationHook for PromptValidator {
    async fn validate(&self, event: &InboundEvent, rule: &TextRule) -> bool {
        let chars = rule.value.trim().chars().count();
        if chars >= rule.min_chars && chars <= rule.max_chars {
            return true;
        }

        // The hook owns the failure prompt; delivery problems are swallowed
        // because the verdict itself must stay infallible.
        attempt(
            "send validation error prompt",
            self.transport.send(
                &rule.error_text,
                ReplyAnchor {
                    chat_id: event.chat_id,
                    message_id: None,
                },
                None,
            ),
        )
        .await;

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vigil_core::{ConversationKind, DocumentRef, Keyboard, event_title_rule};

    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
        fail_sends: bool,
    }

    #[async_trait]
    impl EventTransport for RecordingTransport {
        async fn delete_message(&self, _chat_id: i64, _message_id: i32) -> Result<(), VigilError> {
            Ok(())
        }

        async fn send(
            &self,
            text: &str,
            _anchor: ReplyAnchor,
            _keyboard: Option<&Keyboard>,
        ) -> Result<(), VigilError> {
            if self.fail_sends {
                return Err(VigilError::Transport {
                    message: "scripted send failure".into(),
                    source: None,
                });
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn fetch_document(&self, _document: &DocumentRef) -> Result<String, VigilError> {
            unreachable!("not used by validation tests")
        }
    }

    fn make_event() -> InboundEvent {
        InboundEvent {
            conversation: ConversationKind::Private,
            sender_id: "tg-1".to_string(),
            chat_id: 10,
            message_id: 20,
            text: Some("hi".to_string()),
            document: None,
        }
    }

    #[tokio::test]
    async fn passing_rule_sends_nothing() {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        });
        let validator = PromptValidator::new(transport.clone());

        assert!(validator.validate(&make_event(), &event_title_rule("My Trip")).await);
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_rule_sends_error_text() {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        });
        let validator = PromptValidator::new(transport.clone());

        let rule = event_title_rule("");
        assert!(!validator.validate(&make_event(), &rule).await);
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], rule.error_text);
    }

    #[tokio::test]
    async fn over_length_value_fails() {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            fail_sends: false,
        });
        let validator = PromptValidator::new(transport);

        let rule = event_title_rule("x".repeat(129));
        assert!(!validator.validate(&make_event(), &rule).await);
    }

    #[tokio::test]
    async fn verdict_survives_prompt_delivery_failure() {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        });
        let validator = PromptValidator::new(transport);

        // The send fails, but validate still returns its verdict.
        assert!(!validator.validate(&make_event(), &event_title_rule("")).await);
    }

    #[tokio::test]
    async fn attempt_discards_failure() {
        let failing = async {
            Err::<(), _>(VigilError::Internal("boom".into()))
        };
        assert!(attempt("test op", failing).await.is_none());

        let succeeding = async { Ok::<_, VigilError>(42) };
        assert_eq!(attempt("test op", succeeding).await, Some(42));
    }
}
