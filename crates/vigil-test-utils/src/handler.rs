// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted flow handler that records every dispatch it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use vigil_core::{FlowContext, FlowOutcome, VigilError, WaiterHandler};

/// One captured handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledCall {
    pub flow: String,
    pub user_id: i64,
    pub payload: String,
    pub extra_data: Option<String>,
}

/// A [`WaiterHandler`] returning a fixed scripted outcome, capturing the
/// context of every call for assertions.
pub struct RecordingHandler {
    flow: String,
    outcome: FlowOutcome,
    calls: Mutex<Vec<HandledCall>>,
}

impl RecordingHandler {
    /// Handler that completes every turn without a follow-up reply.
    pub fn completing(flow: &str) -> Self {
        Self::new(flow, FlowOutcome::Completed(None))
    }

    /// Handler that rejects every turn, as a failed validation would.
    pub fn rejecting(flow: &str) -> Self {
        Self::new(flow, FlowOutcome::Rejected)
    }

    pub fn new(flow: &str, outcome: FlowOutcome) -> Self {
        Self {
            flow: flow.to_string(),
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All captured invocations, in dispatch order.
    pub fn calls(&self) -> Vec<HandledCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Payloads of all captured invocations, in dispatch order.
    pub fn payloads(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.payload.clone()).collect()
    }
}

#[async_trait]
impl WaiterHandler for RecordingHandler {
    fn flow(&self) -> &str {
        &self.flow
    }

    async fn handle(
        &self,
        ctx: FlowContext<'_>,
        payload: &str,
    ) -> Result<FlowOutcome, VigilError> {
        self.calls.lock().unwrap().push(HandledCall {
            flow: ctx.waiter.flow.clone(),
            user_id: ctx.user.id,
            payload: payload.to_string(),
            extra_data: ctx.waiter.extra_data.clone(),
        });
        Ok(self.outcome.clone())
    }
}
