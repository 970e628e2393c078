// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in calendar-event title flows.
//!
//! Both flows wait for the user to type a title for the calendar event they
//! are creating: one for personal calendars, one for shared ones. The title
//! goes through the dispatcher-supplied validation hook; a rejected title
//! keeps the waiter alive so the user can simply type again.

use async_trait::async_trait;
use tracing::info;

use vigil_core::{
    FlowContext, FlowOutcome, Reply, VigilError, WaiterHandler, event_title_rule,
};

pub const PERSONAL_EVENT_TITLE_FLOW: &str = "create_pers_cal_event_title";
pub const SHARED_EVENT_TITLE_FLOW: &str = "create_share_cal_event_title";

/// Captures a calendar-event title typed by the user.
pub struct EventTitleFlow {
    flow: &'static str,
    confirmation: &'static str,
}

impl EventTitleFlow {
    /// The personal-calendar variant.
    pub fn personal() -> Self {
        Self {
            flow: PERSONAL_EVENT_TITLE_FLOW,
            confirmation: "Title saved. Your personal event is taking shape.",
        }
    }

    /// The shared-calendar variant.
    pub fn shared() -> Self {
        Self {
            flow: SHARED_EVENT_TITLE_FLOW,
            confirmation: "Title saved. Your shared event is taking shape.",
        }
    }
}

#[async_trait]
impl WaiterHandler for EventTitleFlow {
    fn flow(&self) -> &str {
        self.flow
    }

    async fn handle(
        &self,
        ctx: FlowContext<'_>,
        payload: &str,
    ) -> Result<FlowOutcome, VigilError> {
        if !ctx.validator.validate(ctx.event, &event_title_rule(payload)).await {
            return Ok(FlowOutcome::Rejected);
        }

        info!(user_id = ctx.user.id, flow = self.flow, title = payload, "event title captured");
        Ok(FlowOutcome::Completed(Some(Reply::text(self.confirmation))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_tags_match_registry_keys() {
        assert_eq!(EventTitleFlow::personal().flow(), PERSONAL_EVENT_TITLE_FLOW);
        assert_eq!(EventTitleFlow::shared().flow(), SHARED_EVENT_TITLE_FLOW);
    }
}
