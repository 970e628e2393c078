// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `vigil-core::types` for use across
//! collaborator trait boundaries. This module re-exports them for
//! convenience within the storage crate.

pub use vigil_core::types::{Draft, DraftStatus, User, Waiter, WaiterKind};
