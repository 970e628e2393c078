// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The listener dispatcher: routes inbound events to pending waiters.
//!
//! Both entry points funnel into one generic turn which runs entirely inside
//! the sending user's critical section (see [`crate::locks::UserLocks`]):
//! lookup, payload extraction, handler dispatch, and the consuming delete are
//! atomic with respect to other events from the same user.
//!
//! Waiter fate per path:
//! - no waiter / non-private chat / unresolved user: nothing touched;
//! - validation rejected by the handler's hook: waiter survives;
//! - file fetch or decode failure: waiter survives, the user is notified,
//!   error propagates;
//! - handler error: waiter survives, the user is notified, error propagates;
//! - unknown flow tag: the user's waiters are cleared (the flow is
//!   unservable) and [`VigilError::HandlerNotFound`] propagates;
//! - completion: every waiter of the user is deleted, collapsing any other
//!   pending kind -- one conversation thread at a time.

use std::sync::Arc;

use tracing::{debug, warn};

use vigil_core::{
    ConversationKind, EventTransport, FlowContext, FlowOutcome, InboundEvent, Keyboard,
    ReplyAnchor, UserResolver, ValidationHook, VigilError, WaiterFilter, WaiterKind,
    WaiterStore,
};

use crate::locks::UserLocks;
use crate::registry::HandlerRegistry;
use crate::validation::attempt;

/// Notice sent when a document could not be retrieved or decoded. The waiter
/// stays in place, so sending the file again retries the same flow.
const FILE_FETCH_FAILED_TEXT: &str =
    "Couldn't read that file. Please send it again as a plain text document.";

/// Notice sent when a waiter names a flow nothing is registered for.
const UNKNOWN_FLOW_TEXT: &str =
    "Something went wrong with this action. Please start over from the menu.";

/// Notice sent when the matched handler itself fails. The waiter stays in
/// place, so the user can retry by sending the same input again.
const HANDLER_FAILED_TEXT: &str =
    "Something went wrong while processing your input. Please try again.";

/// Orchestrates one dispatch turn per inbound event.
pub struct ListenerDispatcher {
    store: Arc<dyn WaiterStore>,
    users: Arc<dyn UserResolver>,
    transport: Arc<dyn EventTransport>,
    validator: Arc<dyn ValidationHook>,
    registry: Arc<HandlerRegistry>,
    locks: UserLocks,
    delete_prompt_replies: bool,
}

impl ListenerDispatcher {
    pub fn new(
        store: Arc<dyn WaiterStore>,
        users: Arc<dyn UserResolver>,
        transport: Arc<dyn EventTransport>,
        validator: Arc<dyn ValidationHook>,
        registry: Arc<HandlerRegistry>,
        delete_prompt_replies: bool,
    ) -> Self {
        Self {
            store,
            users,
            transport,
            validator,
            registry,
            locks: UserLocks::new(),
            delete_prompt_replies,
        }
    }

    /// Handle an inbound text message: match it against the sender's active
    /// `text`-kind waiter, if any.
    pub async fn on_text_event(&self, event: &InboundEvent) -> Result<(), VigilError> {
        self.dispatch(event, WaiterKind::Text).await
    }

    /// Handle an inbound document message: match it against the sender's
    /// active `file`-kind waiter, if any.
    pub async fn on_file_event(&self, event: &InboundEvent) -> Result<(), VigilError> {
        self.dispatch(event, WaiterKind::File).await
    }

    async fn dispatch(&self, event: &InboundEvent, kind: WaiterKind) -> Result<(), VigilError> {
        // Group and channel events are out of scope for the waiter mechanism.
        if event.conversation != ConversationKind::Private {
            return Ok(());
        }

        // An unresolved sender is the common case of an uncontextualized
        // message, not an error.
        let Some(user) = self.users.find_by_external_id(&event.sender_id).await? else {
            return Ok(());
        };

        // Critical section: everything from lookup to the consuming delete
        // must be atomic per user.
        let _guard = self.locks.acquire(user.id).await;

        let Some(waiter) = self.store.find_active(user.id, kind).await? else {
            return Ok(());
        };
        debug!(user_id = user.id, flow = %waiter.flow, %kind, "matched active waiter");

        // Cosmetic cleanup of the user's reply; never aborts the flow.
        if self.delete_prompt_replies {
            attempt(
                "delete prompt reply",
                self.transport.delete_message(event.chat_id, event.message_id),
            )
            .await;
        }

        let payload = match kind {
            WaiterKind::Text => event.text.as_deref().unwrap_or("").trim().to_string(),
            WaiterKind::File => match self.fetch_file_payload(event).await {
                Ok(text) => text,
                Err(e) => {
                    // Waiter preserved: re-sending the file retries the flow.
                    warn!(user_id = user.id, error = %e, "file payload extraction failed");
                    attempt(
                        "send file failure notice",
                        self.transport.send(
                            FILE_FETCH_FAILED_TEXT,
                            ReplyAnchor { chat_id: event.chat_id, message_id: None },
                            None,
                        ),
                    )
                    .await;
                    return Err(e);
                }
            },
        };

        let Some(handler) = self.registry.get(&waiter.flow) else {
            // A waiter nothing can serve will never resolve; clear it so the
            // user is not stuck, then fail loudly -- this is a wiring error.
            warn!(user_id = user.id, flow = %waiter.flow, "no handler registered for flow");
            self.store
                .delete_where(WaiterFilter::User { user_id: user.id })
                .await?;
            attempt(
                "send unknown flow notice",
                self.transport.send(
                    UNKNOWN_FLOW_TEXT,
                    ReplyAnchor { chat_id: event.chat_id, message_id: None },
                    None,
                ),
            )
            .await;
            return Err(VigilError::HandlerNotFound { flow: waiter.flow });
        };

        let ctx = FlowContext {
            waiter: &waiter,
            user: &user,
            event,
            validator: self.validator.as_ref(),
        };

        let outcome = match handler.handle(ctx, &payload).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Waiter preserved: the same input can be sent again once
                // whatever failed downstream recovers.
                warn!(user_id = user.id, flow = %waiter.flow, error = %e, "handler failed");
                attempt(
                    "send handler failure notice",
                    self.transport.send(
                        HANDLER_FAILED_TEXT,
                        ReplyAnchor { chat_id: event.chat_id, message_id: None },
                        None,
                    ),
                )
                .await;
                return Err(e);
            }
        };

        match outcome {
            FlowOutcome::Rejected => {
                // The one path where the waiter survives a completed turn:
                // the hook already told the user, who gets another attempt.
                debug!(user_id = user.id, flow = %waiter.flow, "validation rejected, waiter preserved");
                Ok(())
            }
            FlowOutcome::Completed(reply) => {
                // Consumption collapses every pending kind for the user.
                self.store
                    .delete_where(WaiterFilter::User { user_id: user.id })
                    .await?;
                debug!(user_id = user.id, flow = %waiter.flow, "waiter consumed");

                if let Some(reply) = reply {
                    let anchor = ReplyAnchor {
                        chat_id: waiter.chat_id.unwrap_or(event.chat_id),
                        message_id: waiter.message_id,
                    };
                    let keyboard = reply.keyboard.unwrap_or_else(Keyboard::back);
                    self.transport.send(&reply.text, anchor, Some(&keyboard)).await?;
                }
                Ok(())
            }
        }
    }

    async fn fetch_file_payload(&self, event: &InboundEvent) -> Result<String, VigilError> {
        let Some(document) = &event.document else {
            return Err(VigilError::Transport {
                message: "file event carries no document".into(),
                source: None,
            });
        };
        self.transport.fetch_document(document).await
    }
}
