// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable input validation invoked before a waiter is consumed.

use async_trait::async_trait;

use crate::types::{InboundEvent, TextRule};

/// Synchronous-or-async check run by a handler before doing its work.
///
/// The hook owns its side effects: on failure it informs the user itself
/// (typically by sending `rule.error_text` to the event's chat). Callers
/// branch only on the boolean. The verdict itself is infallible; errors
/// while delivering the failure prompt are the hook's to swallow.
#[async_trait]
pub trait ValidationHook: Send + Sync {
    async fn validate(&self, event: &InboundEvent, rule: &TextRule) -> bool;
}
