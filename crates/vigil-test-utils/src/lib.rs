// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vigil integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a live chat platform.
//!
//! # Components
//!
//! - [`MockTransport`] - records outbound traffic, scriptable document fetches
//! - [`RecordingHandler`] - scripted flow handler capturing dispatched payloads
//! - [`TestBot`] - full stack (temp SQLite, dispatcher, lifecycle) behind mocks

pub mod handler;
pub mod harness;
pub mod transport;

pub use handler::RecordingHandler;
pub use harness::TestBot;
pub use transport::{MockTransport, SentMessage};
