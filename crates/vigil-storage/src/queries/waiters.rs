// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Waiter CRUD operations.
//!
//! `create` is an UPSERT against the unique `(user_id, kind)` index: a second
//! create for the same pair replaces every column of the existing row. This
//! closes the concurrent-create race at the storage level -- last write wins,
//! never a merge, never duplicate rows.

use std::str::FromStr;

use rusqlite::params;
use vigil_core::{NewWaiter, VigilError, Waiter, WaiterFilter, WaiterKind};

use crate::database::Database;

const WAITER_COLUMNS: &str = "id, flow, kind, user_id, chat_id, message_id, extra_data, created_at";

fn row_to_waiter(row: &rusqlite::Row<'_>) -> Result<Waiter, rusqlite::Error> {
    let kind_raw: String = row.get(2)?;
    let kind = WaiterKind::from_str(&kind_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Waiter {
        id: row.get(0)?,
        flow: row.get(1)?,
        kind,
        user_id: row.get(3)?,
        chat_id: row.get(4)?,
        message_id: row.get(5)?,
        extra_data: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a waiter, superseding any existing one for the same `(user_id, kind)`.
///
/// A waiter created without a kind defaults to `text`, matching how almost
/// every flow prompts for typed input.
pub async fn create(db: &Database, new: NewWaiter) -> Result<Waiter, VigilError> {
    let kind = new.kind.unwrap_or(WaiterKind::Text);
    db.connection()
        .call(move |conn| {
            let waiter = conn.query_row(
                &format!(
                    "INSERT INTO waiters (flow, kind, user_id, chat_id, message_id, extra_data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT (user_id, kind) DO UPDATE SET
                         flow = excluded.flow,
                         chat_id = excluded.chat_id,
                         message_id = excluded.message_id,
                         extra_data = excluded.extra_data,
                         created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     RETURNING {WAITER_COLUMNS}"
                ),
                params![
                    new.flow,
                    kind.to_string(),
                    new.user_id,
                    new.chat_id,
                    new.message_id,
                    new.extra_data,
                ],
                row_to_waiter,
            )?;
            Ok(waiter)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the single active waiter for a user and kind, if present.
pub async fn find_active(
    db: &Database,
    user_id: i64,
    kind: WaiterKind,
) -> Result<Option<Waiter>, VigilError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!(
                    "SELECT {WAITER_COLUMNS} FROM waiters WHERE user_id = ?1 AND kind = ?2"
                ),
                params![user_id, kind.to_string()],
                row_to_waiter,
            );
            match result {
                Ok(waiter) => Ok(Some(waiter)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete all waiters matching the filter. Idempotent; returns rows deleted.
pub async fn delete_where(db: &Database, filter: WaiterFilter) -> Result<u64, VigilError> {
    db.connection()
        .call(move |conn| {
            let deleted = match filter {
                WaiterFilter::User { user_id } => conn.execute(
                    "DELETE FROM waiters WHERE user_id = ?1",
                    params![user_id],
                )?,
                WaiterFilter::UserKind { user_id, kind } => conn.execute(
                    "DELETE FROM waiters WHERE user_id = ?1 AND kind = ?2",
                    params![user_id, kind.to_string()],
                )?,
            };
            Ok(deleted as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_new(flow: &str, kind: WaiterKind, user_id: i64) -> NewWaiter {
        NewWaiter {
            flow: flow.to_string(),
            kind: Some(kind),
            user_id: Some(user_id),
            chat_id: Some(100),
            message_id: Some(7),
            extra_data: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trips() {
        let (db, _dir) = setup_db().await;

        let created = create(&db, make_new("flow_a", WaiterKind::Text, 1))
            .await
            .unwrap();
        assert_eq!(created.flow, "flow_a");
        assert_eq!(created.kind, WaiterKind::Text);
        assert_eq!(created.user_id, Some(1));
        assert_eq!(created.chat_id, Some(100));

        let found = find_active(&db, 1, WaiterKind::Text).await.unwrap().unwrap();
        assert_eq!(found, created);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(find_active(&db, 99, WaiterKind::Text).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_same_user_kind_supersedes() {
        let (db, _dir) = setup_db().await;

        create(&db, make_new("flow_a", WaiterKind::Text, 1)).await.unwrap();
        let mut second = make_new("flow_b", WaiterKind::Text, 1);
        second.chat_id = Some(200);
        second.extra_data = Some("p".to_string());
        create(&db, second).await.unwrap();

        // Exactly one row, entirely from the second create.
        let found = find_active(&db, 1, WaiterKind::Text).await.unwrap().unwrap();
        assert_eq!(found.flow, "flow_b");
        assert_eq!(found.chat_id, Some(200));
        assert_eq!(found.extra_data.as_deref(), Some("p"));

        let count: i64 = db
            .connection()
            .call(|conn| {
                Ok::<_, rusqlite::Error>(conn.query_row(
                    "SELECT COUNT(*) FROM waiters WHERE user_id = 1",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn different_kinds_coexist() {
        let (db, _dir) = setup_db().await;

        create(&db, make_new("flow_a", WaiterKind::Text, 1)).await.unwrap();
        create(&db, make_new("flow_b", WaiterKind::File, 1)).await.unwrap();

        assert!(find_active(&db, 1, WaiterKind::Text).await.unwrap().is_some());
        assert!(find_active(&db, 1, WaiterKind::File).await.unwrap().is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn kind_defaults_to_text() {
        let (db, _dir) = setup_db().await;
        let mut new = make_new("flow_a", WaiterKind::Text, 1);
        new.kind = None;
        let created = create(&db, new).await.unwrap();
        assert_eq!(created.kind, WaiterKind::Text);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_by_user_clears_all_kinds() {
        let (db, _dir) = setup_db().await;

        create(&db, make_new("flow_a", WaiterKind::Text, 1)).await.unwrap();
        create(&db, make_new("flow_b", WaiterKind::File, 1)).await.unwrap();
        create(&db, make_new("flow_c", WaiterKind::Text, 2)).await.unwrap();

        let deleted = delete_where(&db, WaiterFilter::User { user_id: 1 }).await.unwrap();
        assert_eq!(deleted, 2);

        assert!(find_active(&db, 1, WaiterKind::Text).await.unwrap().is_none());
        assert!(find_active(&db, 1, WaiterKind::File).await.unwrap().is_none());
        // Other users untouched.
        assert!(find_active(&db, 2, WaiterKind::Text).await.unwrap().is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_by_user_kind_is_scoped() {
        let (db, _dir) = setup_db().await;

        create(&db, make_new("flow_a", WaiterKind::Text, 1)).await.unwrap();
        create(&db, make_new("flow_b", WaiterKind::File, 1)).await.unwrap();

        let deleted = delete_where(
            &db,
            WaiterFilter::UserKind { user_id: 1, kind: WaiterKind::Text },
        )
        .await
        .unwrap();
        assert_eq!(deleted, 1);
        assert!(find_active(&db, 1, WaiterKind::File).await.unwrap().is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_zero_matches_is_success() {
        let (db, _dir) = setup_db().await;
        let deleted = delete_where(&db, WaiterFilter::User { user_id: 42 }).await.unwrap();
        assert_eq!(deleted, 0);
        db.close().await.unwrap();
    }
}
