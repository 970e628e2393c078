// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the waiter state machine.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility and
//! are object-safe so the dispatcher can hold them behind `Arc<dyn _>`.

pub mod handler;
pub mod store;
pub mod transport;
pub mod validation;

// Re-export all traits at the traits module level for convenience.
pub use handler::{CommandSink, FlowContext, FlowOutcome, WaiterHandler};
pub use store::{DraftPurge, UserResolver, WaiterStore};
pub use transport::EventTransport;
pub use validation::ValidationHook;
