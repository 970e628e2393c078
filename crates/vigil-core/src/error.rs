// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vigil bot.

use thiserror::Error;

/// The primary error type used across all Vigil crate boundaries.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    /// Always propagated; retry policy belongs to the storage layer or caller.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (send, delete, file download or decode).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A waiter carried a flow tag with no registered handler.
    /// This is a wiring error and must surface loudly, never be ignored.
    #[error("no handler registered for flow `{flow}`")]
    HandlerNotFound { flow: String },

    /// Operation timed out (bounded file fetch).
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
