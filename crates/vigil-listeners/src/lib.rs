// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversational core of the Vigil bot: a single-active-waiter state
//! machine over the contracts in `vigil-core`.
//!
//! Per user and kind, the machine is `NO_WAITER -> WAITING -> NO_WAITER`.
//! `WAITING` is re-entrant: creating while already waiting supersedes the
//! old waiter wholesale, never errors and never merges fields. Consumption
//! (a completed handler turn) and explicit clearing both return to
//! `NO_WAITER`; the only turn a waiter survives is a validation rejection.

pub mod dispatcher;
pub mod lifecycle;
pub mod locks;
pub mod registry;
pub mod validation;

pub use dispatcher::ListenerDispatcher;
pub use lifecycle::LifecycleManager;
pub use locks::{UserGuard, UserLocks};
pub use registry::HandlerRegistry;
pub use validation::{PromptValidator, attempt};
