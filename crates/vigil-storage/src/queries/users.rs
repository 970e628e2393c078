// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookup and creation.

use rusqlite::params;
use vigil_core::{User, VigilError};

use crate::database::Database;

fn row_to_user(row: &rusqlite::Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        tg_id: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Create a user keyed by external platform id.
pub async fn create(db: &Database, tg_id: &str) -> Result<User, VigilError> {
    let tg_id = tg_id.to_string();
    db.connection()
        .call(move |conn| {
            let user = conn.query_row(
                "INSERT INTO users (tg_id) VALUES (?1)
                 RETURNING id, tg_id, created_at",
                params![tg_id],
                row_to_user,
            )?;
            Ok(user)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a user by external platform id.
pub async fn find_by_tg_id(db: &Database, tg_id: &str) -> Result<Option<User>, VigilError> {
    let tg_id = tg_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, tg_id, created_at FROM users WHERE tg_id = ?1",
                params![tg_id],
                row_to_user,
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
