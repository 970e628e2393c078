// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vigil bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Vigil workspace. The dispatcher, the
//! storage layer, and the transport adapter all meet at the contracts
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VigilError;
pub use types::{
    Button, ConversationKind, DocumentRef, Draft, DraftStatus, InboundEvent, Keyboard,
    NewWaiter, Reply, ReplyAnchor, TextRule, User, Waiter, WaiterFilter, WaiterKind,
    event_title_rule,
};

// Re-export all collaborator traits at crate root.
pub use traits::{
    CommandSink, DraftPurge, EventTransport, FlowContext, FlowOutcome, UserResolver,
    ValidationHook, WaiterHandler, WaiterStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_object_safe() {
        // The dispatcher holds every collaborator behind Arc<dyn _>; this
        // fails to compile if any trait loses object safety.
        fn _store(_: &dyn WaiterStore) {}
        fn _users(_: &dyn UserResolver) {}
        fn _hook(_: &dyn ValidationHook) {}
        fn _purge(_: &dyn DraftPurge) {}
        fn _transport(_: &dyn EventTransport) {}
        fn _handler(_: &dyn WaiterHandler) {}
        fn _commands(_: &dyn CommandSink) {}
    }

    #[test]
    fn flow_outcome_variants() {
        let completed = FlowOutcome::Completed(Some(Reply::text("done")));
        let rejected = FlowOutcome::Rejected;
        assert_ne!(completed, rejected);
        assert_eq!(FlowOutcome::Completed(None), FlowOutcome::Completed(None));
    }
}
