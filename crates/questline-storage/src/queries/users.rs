// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookup and creation.

use rusqlite::{OptionalExtension, params};
use uuid::Uuid;

use questline_core::QuestlineError;
use questline_core::time::now_rfc3339;

use crate::database::Database;
use crate::models::ChatUser;

/// Look up a user by external id, creating the row on first sight.
///
/// The display name recorded at creation time is kept as-is on later calls;
/// users are immutable after insertion.
pub async fn get_or_create_user(
    db: &Database,
    external_id: &str,
    display_name: &str,
) -> Result<ChatUser, QuestlineError> {
    let external_id = external_id.to_string();
    let display_name = display_name.to_string();
    db.connection()
        .call(move |conn| {
            let existing = conn
                .query_row(
                    "SELECT id, external_id, display_name, created_at
                     FROM users WHERE external_id = ?1",
                    params![external_id],
                    |row| {
                        Ok(ChatUser {
                            id: row.get(0)?,
                            external_id: row.get(1)?,
                            display_name: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            if let Some(user) = existing {
                return Ok(user);
            }

            let user = ChatUser {
                id: Uuid::new_v4().to_string(),
                external_id,
                display_name,
                created_at: now_rfc3339(),
            };
            conn.execute(
                "INSERT INTO users (id, external_id, display_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user.id, user.external_id, user.display_name, user.created_at],
            )?;
            Ok(user)
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
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn first_sight_creates_a_user_row() {
        let (db, _dir) = setup_db().await;

        let user = get_or_create_user(&db, "U123", "alex").await.unwrap();
        assert_eq!(user.external_id, "U123");
        assert_eq!(user.display_name, "alex");
        assert!(!user.id.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_sight_returns_the_same_row() {
        let (db, _dir) = setup_db().await;

        let first = get_or_create_user(&db, "U123", "alex").await.unwrap();
        let second = get_or_create_user(&db, "U123", "alexandra").await.unwrap();
        assert_eq!(first.id, second.id);
        // Display name is immutable after creation.
        assert_eq!(second.display_name, "alex");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn distinct_external_ids_get_distinct_rows() {
        let (db, _dir) = setup_db().await;

        let a = get_or_create_user(&db, "U1", "a").await.unwrap();
        let b = get_or_create_user(&db, "U2", "b").await.unwrap();
        assert_ne!(a.id, b.id);

        db.close().await.unwrap();
    }
}
