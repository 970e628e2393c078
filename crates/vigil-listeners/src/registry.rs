// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow-tag to handler mapping, built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use vigil_core::{VigilError, WaiterHandler};

/// Maps a waiter's flow tag to the downstream action invoked on fulfillment.
///
/// Populated during wiring; duplicate registrations are configuration errors.
/// A lookup miss at dispatch time is handled by the dispatcher as
/// [`VigilError::HandlerNotFound`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn WaiterHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its flow tag.
    pub fn register(&mut self, handler: Arc<dyn WaiterHandler>) -> Result<(), VigilError> {
        let flow = handler.flow().to_string();
        if self.handlers.contains_key(&flow) {
            return Err(VigilError::Config(format!(
                "duplicate handler registration for flow `{flow}`"
            )));
        }
        self.handlers.insert(flow, handler);
        Ok(())
    }

    /// Look up the handler for a flow tag.
    pub fn get(&self, flow: &str) -> Option<Arc<dyn WaiterHandler>> {
        self.handlers.get(flow).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
