// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementations of the store contracts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use vigil_config::model::StorageConfig;
use vigil_core::{
    Draft, DraftPurge, DraftStatus, NewWaiter, User, UserResolver, VigilError, Waiter,
    WaiterFilter, WaiterKind, WaiterStore,
};

use crate::database::Database;
use crate::queries;
use crate::queries::drafts::DraftFamily;

/// SQLite-backed store.
///
/// Owns the [`Database`] handle and delegates all query operations to the
/// typed query modules. Implements [`WaiterStore`] and [`UserResolver`];
/// per-family [`DraftPurge`] implementations are exposed as thin handles
/// sharing the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    /// Open the database at the configured path (creating it and running
    /// migrations as needed) and wrap it in a store.
    pub async fn open(config: &StorageConfig) -> Result<Self, VigilError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db: Arc::new(db) })
    }

    /// Wrap an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create a user keyed by external platform id. Used by wiring and tests;
    /// the dispatcher itself only ever resolves.
    pub async fn create_user(&self, tg_id: &str) -> Result<User, VigilError> {
        queries::users::create(&self.db, tg_id).await
    }

    /// Create a draft in `CREATING` status for the given family.
    pub async fn create_draft(
        &self,
        family: DraftFamily,
        user_id: i64,
        title: Option<&str>,
    ) -> Result<Draft, VigilError> {
        queries::drafts::create(&self.db, family, user_id, title).await
    }

    /// Move a draft out of `CREATING` into the given status.
    pub async fn set_draft_status(
        &self,
        family: DraftFamily,
        id: i64,
        status: DraftStatus,
    ) -> Result<(), VigilError> {
        queries::drafts::set_status(&self.db, family, id, status).await
    }

    /// List a user's drafts of one family in one status.
    pub async fn drafts_in_status(
        &self,
        family: DraftFamily,
        user_id: i64,
        status: DraftStatus,
    ) -> Result<Vec<Draft>, VigilError> {
        queries::drafts::list_in_status(&self.db, family, user_id, status).await
    }

    /// Purge handle for the mailings draft family.
    pub fn mailing_drafts(&self) -> DraftFamilyStore {
        DraftFamilyStore {
            db: self.db.clone(),
            family: DraftFamily::Mailings,
        }
    }

    /// Purge handle for the mailing-templates draft family.
    pub fn mailing_template_drafts(&self) -> DraftFamilyStore {
        DraftFamilyStore {
            db: self.db.clone(),
            family: DraftFamily::MailingTemplates,
        }
    }

    /// One purge handle per known draft family, in registration order.
    pub fn all_draft_families(&self) -> Vec<Arc<dyn DraftPurge>> {
        DraftFamily::ALL
            .into_iter()
            .map(|family| {
                Arc::new(DraftFamilyStore {
                    db: self.db.clone(),
                    family,
                }) as Arc<dyn DraftPurge>
            })
            .collect()
    }
}

#[async_trait]
impl WaiterStore for SqliteStore {
    async fn create(&self, waiter: NewWaiter) -> Result<Waiter, VigilError> {
        queries::waiters::create(&self.db, waiter).await
    }

    async fn find_active(
        &self,
        user_id: i64,
        kind: WaiterKind,
    ) -> Result<Option<Waiter>, VigilError> {
        queries::waiters::find_active(&self.db, user_id, kind).await
    }

    async fn delete_where(&self, filter: WaiterFilter) -> Result<u64, VigilError> {
        queries::waiters::delete_where(&self.db, filter).await
    }
}

#[async_trait]
impl UserResolver for SqliteStore {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, VigilError> {
        queries::users::find_by_tg_id(&self.db, external_id).await
    }
}

/// A [`DraftPurge`] implementation scoped to one draft family.
pub struct DraftFamilyStore {
    db: Arc<Database>,
    family: DraftFamily,
}

#[async_trait]
impl DraftPurge for DraftFamilyStore {
    async fn purge_creating(&self, user_id: i64) -> Result<u64, VigilError> {
        queries::drafts::delete_in_status(&self.db, self.family, user_id, DraftStatus::Creating)
            .await
    }
}
