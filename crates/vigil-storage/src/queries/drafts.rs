// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Draft CRUD shared by both draft families.
//!
//! Mailings and mailing templates have the same shape; one module serves
//! both, parameterized by [`DraftFamily`]. The table name always comes from
//! the closed enum, never from caller input.

use std::str::FromStr;

use rusqlite::params;
use vigil_core::{Draft, DraftStatus, VigilError};

use crate::database::Database;

/// The known draft families. Clearing a user's listeners purges the
/// `CREATING` drafts of every family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftFamily {
    Mailings,
    MailingTemplates,
}

impl DraftFamily {
    pub const ALL: [DraftFamily; 2] = [DraftFamily::Mailings, DraftFamily::MailingTemplates];

    fn table(self) -> &'static str {
        match self {
            DraftFamily::Mailings => "mailings",
            DraftFamily::MailingTemplates => "mailing_templates",
        }
    }
}

fn row_to_draft(row: &rusqlite::Row<'_>) -> Result<Draft, rusqlite::Error> {
    let status_raw: String = row.get(3)?;
    let status = DraftStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Draft {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        status,
        created_at: row.get(4)?,
    })
}

/// Create a draft in `CREATING` status.
pub async fn create(
    db: &Database,
    family: DraftFamily,
    user_id: i64,
    title: Option<&str>,
) -> Result<Draft, VigilError> {
    let title = title.map(|t| t.to_string());
    db.connection()
        .call(move |conn| {
            let draft = conn.query_row(
                &format!(
                    "INSERT INTO {} (user_id, title) VALUES (?1, ?2)
                     RETURNING id, user_id, title, status, created_at",
                    family.table()
                ),
                params![user_id, title],
                row_to_draft,
            )?;
            Ok(draft)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Move a draft out of `CREATING` into the given status.
pub async fn set_status(
    db: &Database,
    family: DraftFamily,
    id: i64,
    status: DraftStatus,
) -> Result<(), VigilError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!("UPDATE {} SET status = ?1 WHERE id = ?2", family.table()),
                params![status.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a user's drafts in one status.
pub async fn list_in_status(
    db: &Database,
    family: DraftFamily,
    user_id: i64,
    status: DraftStatus,
) -> Result<Vec<Draft>, VigilError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, user_id, title, status, created_at FROM {}
                 WHERE user_id = ?1 AND status = ?2 ORDER BY created_at DESC",
                family.table()
            ))?;
            let rows = stmt.query_map(params![user_id, status.to_string()], row_to_draft)?;
            let mut drafts = Vec::new();
            for row in rows {
                drafts.push(row?);
            }
            Ok(drafts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete all of a user's drafts in one status. Idempotent; returns rows deleted.
pub async fn delete_in_status(
    db: &Database,
    family: DraftFamily,
    user_id: i64,
    status: DraftStatus,
) -> Result<u64, VigilError> {
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                &format!(
                    "DELETE FROM {} WHERE user_id = ?1 AND status = ?2",
                    family.table()
                ),
                params![user_id, status.to_string()],
            )?;
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;
    use tempfile::tempdir;

    async fn setup() -> (Database, i64, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("drafts.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let user = users::create(&db, "tg-1").await.unwrap();
        (db, user.id, dir)
    }

    #[tokio::test]
    async fn create_defaults_to_creating_status() {
        let (db, user_id, _dir) = setup().await;
        let draft = create(&db, DraftFamily::Mailings, user_id, Some("hello")).await.unwrap();
        assert_eq!(draft.status, DraftStatus::Creating);
        assert_eq!(draft.title.as_deref(), Some("hello"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_in_status_only_touches_creating() {
        let (db, user_id, _dir) = setup().await;

        let d1 = create(&db, DraftFamily::Mailings, user_id, None).await.unwrap();
        let _d2 = create(&db, DraftFamily::Mailings, user_id, None).await.unwrap();
        set_status(&db, DraftFamily::Mailings, d1.id, DraftStatus::Active).await.unwrap();

        let deleted = delete_in_status(&db, DraftFamily::Mailings, user_id, DraftStatus::Creating)
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let active = list_in_status(&db, DraftFamily::Mailings, user_id, DraftStatus::Active)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, d1.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn families_are_independent() {
        let (db, user_id, _dir) = setup().await;

        create(&db, DraftFamily::Mailings, user_id, None).await.unwrap();
        create(&db, DraftFamily::MailingTemplates, user_id, None).await.unwrap();

        let deleted =
            delete_in_status(&db, DraftFamily::Mailings, user_id, DraftStatus::Creating)
                .await
                .unwrap();
        assert_eq!(deleted, 1);

        let templates =
            list_in_status(&db, DraftFamily::MailingTemplates, user_id, DraftStatus::Creating)
                .await
                .unwrap();
        assert_eq!(templates.len(), 1);
        db.close().await.unwrap();
    }
}
