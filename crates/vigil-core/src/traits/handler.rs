// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow handler contract: the downstream action invoked when a waiter
//! matches an inbound event.

use async_trait::async_trait;

use crate::error::VigilError;
use crate::traits::validation::ValidationHook;
use crate::types::{InboundEvent, Reply, User, Waiter};

/// Everything a flow handler sees for one dispatch turn.
pub struct FlowContext<'a> {
    /// The matched waiter, still persisted at this point.
    pub waiter: &'a Waiter,
    /// The resolved internal user.
    pub user: &'a User,
    /// The triggering inbound event.
    pub event: &'a InboundEvent,
    /// Validation hook supplied by the dispatcher; handlers run their own
    /// rules through it before doing their work.
    pub validator: &'a dyn ValidationHook,
}

/// What a handler turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The business action ran. The waiter will be consumed; an optional
    /// follow-up reply is delivered anchored to the waiter's origin.
    Completed(Option<Reply>),
    /// A validation hook said no. The waiter must survive the turn so the
    /// user gets another attempt; the hook already informed them.
    Rejected,
}

/// A registered flow, keyed by its tag in the handler registry.
#[async_trait]
pub trait WaiterHandler: Send + Sync {
    /// The flow tag this handler serves. Registry key.
    fn flow(&self) -> &str;

    /// Run the flow against the extracted payload (trimmed text, or decoded
    /// file content for file-kind waiters).
    async fn handle(&self, ctx: FlowContext<'_>, payload: &str)
    -> Result<FlowOutcome, VigilError>;
}

/// The command surface: inbound messages that are slash commands rather than
/// waiter fulfillments land here. Commands arm and clear waiters.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Handle one command. `name` is the bare command, without the leading
    /// slash or a bot mention.
    async fn on_command(&self, name: &str, event: &InboundEvent) -> Result<(), VigilError>;
}
