// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data-access contracts: waiter persistence, user resolution, draft purging.

use async_trait::async_trait;

use crate::error::VigilError;
use crate::types::{NewWaiter, User, Waiter, WaiterFilter, WaiterKind};

/// Durable mapping from `(user, kind)` to at most one pending waiter.
///
/// `create` is an unconditional insert; uniqueness per `(user_id, kind)` is
/// enforced at the storage level (last write wins, never a merge of fields
/// from two calls, never duplicate rows).
#[async_trait]
pub trait WaiterStore: Send + Sync {
    /// Insert a waiter, superseding any existing one for the same
    /// `(user_id, kind)`. Returns the persisted record.
    async fn create(&self, waiter: NewWaiter) -> Result<Waiter, VigilError>;

    /// Return the single active waiter for the user and kind, if present.
    /// Absence is `None`, never an error.
    async fn find_active(
        &self,
        user_id: i64,
        kind: WaiterKind,
    ) -> Result<Option<Waiter>, VigilError>;

    /// Delete all waiters matching the filter. Idempotent: deleting zero
    /// matches is success. Returns the number of rows deleted.
    async fn delete_where(&self, filter: WaiterFilter) -> Result<u64, VigilError>;
}

/// Maps an external platform identity to an internal user.
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// Look up a user by external platform id. Absence is `None`; an
    /// unresolved sender is the common case of an uncontextualized message.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, VigilError>;
}

/// Purge contract for one draft family. An abandoned waiter implies an
/// abandoned draft, so clearing a user's listeners purges every family's
/// `CREATING`-status drafts for that user.
#[async_trait]
pub trait DraftPurge: Send + Sync {
    /// Delete all of the user's drafts still in `CREATING` status.
    /// Idempotent. Returns the number of rows deleted.
    async fn purge_creating(&self, user_id: i64) -> Result<u64, VigilError>;
}
