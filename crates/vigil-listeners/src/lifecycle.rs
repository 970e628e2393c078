// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Waiter lifecycle: explicit creation and bulk teardown.

use std::sync::Arc;

use tracing::debug;

use vigil_core::{
    DraftPurge, InboundEvent, NewWaiter, UserResolver, VigilError, Waiter, WaiterFilter,
    WaiterStore,
};

/// Creates waiters and clears them (with their abandoned drafts) in bulk.
pub struct LifecycleManager {
    store: Arc<dyn WaiterStore>,
    users: Arc<dyn UserResolver>,
    draft_families: Vec<Arc<dyn DraftPurge>>,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn WaiterStore>,
        users: Arc<dyn UserResolver>,
        draft_families: Vec<Arc<dyn DraftPurge>>,
    ) -> Self {
        Self {
            store,
            users,
            draft_families,
        }
    }

    /// Create a waiter, superseding any existing one of the same kind.
    ///
    /// With an originating event, `user_id`, `chat_id`, and `message_id` are
    /// derived from it -- event context wins over explicit arguments when
    /// both are present. An event whose sender cannot be resolved yields a
    /// waiter with no owner, unreachable by lookup until cleared.
    pub async fn create_waiter(
        &self,
        mut args: NewWaiter,
        event: Option<&InboundEvent>,
    ) -> Result<Waiter, VigilError> {
        if let Some(event) = event {
            let user = self.users.find_by_external_id(&event.sender_id).await?;
            args.user_id = user.map(|u| u.id);
            args.chat_id = Some(event.chat_id);
            args.message_id = Some(event.message_id);
        }
        let waiter = self.store.create(args).await?;
        debug!(flow = %waiter.flow, kind = %waiter.kind, user_id = ?waiter.user_id, "waiter created");
        Ok(waiter)
    }

    /// Clear every waiter and every `CREATING`-status draft for the user
    /// behind an external id. A no-op, not an error, when the user cannot
    /// be resolved.
    pub async fn clear_user_listeners(&self, external_id: &str) -> Result<(), VigilError> {
        let Some(user) = self.users.find_by_external_id(external_id).await? else {
            return Ok(());
        };

        let waiters = self
            .store
            .delete_where(WaiterFilter::User { user_id: user.id })
            .await?;
        let mut drafts = 0;
        for family in &self.draft_families {
            drafts += family.purge_creating(user.id).await?;
        }
        debug!(user_id = user.id, waiters, drafts, "cleared user listeners");
        Ok(())
    }
}
