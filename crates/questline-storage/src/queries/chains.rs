// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adventure chain persistence.

use rusqlite::{OptionalExtension, params};

use questline_core::QuestlineError;

use crate::database::Database;
use crate::models::Chain;

const CHAIN_COLUMNS: &str =
    "id, user_id, system_prompt, seed_prompt, seed_response, started_at, finished_at";

fn chain_from_row(row: &rusqlite::Row<'_>) -> Result<Chain, rusqlite::Error> {
    Ok(Chain {
        id: row.get(0)?,
        user_id: row.get(1)?,
        system_prompt: row.get(2)?,
        seed_prompt: row.get(3)?,
        seed_response: row.get(4)?,
        started_at: row.get(5)?,
        finished_at: row.get(6)?,
    })
}

/// The user's current chain: most recently started, or `None` if the user
/// has never begun an adventure.
pub async fn current_chain(db: &Database, user_id: &str) -> Result<Option<Chain>, QuestlineError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let chain = conn
                .query_row(
                    &format!(
                        "SELECT {CHAIN_COLUMNS} FROM adventure_chains
                         WHERE user_id = ?1 ORDER BY started_at DESC LIMIT 1"
                    ),
                    params![user_id],
                    chain_from_row,
                )
                .optional()?;
            Ok(chain)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

enum CreateOutcome {
    Created,
    AlreadyActive,
}

/// Insert a new chain. The active-chain check and the insert run in one
/// transaction so two racing starts cannot both succeed.
pub async fn create_chain(db: &Database, chain: &Chain) -> Result<(), QuestlineError> {
    let chain = chain.clone();
    let user_id = chain.user_id.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let existing: Option<String> = tx
                .query_row(
                    "SELECT id FROM adventure_chains WHERE user_id = ?1 LIMIT 1",
                    params![chain.user_id],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Ok(CreateOutcome::AlreadyActive);
            }
            tx.execute(
                "INSERT INTO adventure_chains
                     (id, user_id, system_prompt, seed_prompt, seed_response,
                      started_at, finished_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    chain.id,
                    chain.user_id,
                    chain.system_prompt,
                    chain.seed_prompt,
                    chain.seed_response,
                    chain.started_at,
                    chain.finished_at,
                ],
            )?;
            tx.commit()?;
            Ok(CreateOutcome::Created)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match outcome {
        CreateOutcome::Created => Ok(()),
        CreateOutcome::AlreadyActive => Err(QuestlineError::ChainActive { user_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::get_or_create_user;
    use tempfile::tempdir;

    async fn setup_db_with_user() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        let user = get_or_create_user(&db, "U1", "tester").await.unwrap();
        (db, user.id, dir)
    }

    fn make_chain(id: &str, user_id: &str, started_at: &str) -> Chain {
        Chain {
            id: id.to_string(),
            user_id: user_id.to_string(),
            system_prompt: "You are the narrator.".to_string(),
            seed_prompt: "Begin an adventure in a forest.".to_string(),
            seed_response: "You wake beneath tall pines.".to_string(),
            started_at: started_at.to_string(),
            finished_at: None,
        }
    }

    #[tokio::test]
    async fn no_chain_for_a_fresh_user() {
        let (db, user_id, _dir) = setup_db_with_user().await;
        assert!(current_chain(&db, &user_id).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        let chain = make_chain("c1", &user_id, "2026-01-01T00:00:00.000Z");
        create_chain(&db, &chain).await.unwrap();

        let current = current_chain(&db, &user_id).await.unwrap().unwrap();
        assert_eq!(current, chain);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_create_for_same_user_is_rejected() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        create_chain(&db, &make_chain("c1", &user_id, "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        let err = create_chain(&db, &make_chain("c2", &user_id, "2026-01-02T00:00:00.000Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestlineError::ChainActive { .. }));

        // The rejected insert left nothing behind.
        let current = current_chain(&db, &user_id).await.unwrap().unwrap();
        assert_eq!(current.id, "c1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn chains_are_scoped_per_user() {
        let (db, user_id, _dir) = setup_db_with_user().await;
        let other = get_or_create_user(&db, "U2", "other").await.unwrap();

        create_chain(&db, &make_chain("c1", &user_id, "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        create_chain(&db, &make_chain("c2", &other.id, "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();

        assert_eq!(current_chain(&db, &user_id).await.unwrap().unwrap().id, "c1");
        assert_eq!(current_chain(&db, &other.id).await.unwrap().unwrap().id, "c2");

        db.close().await.unwrap();
    }
}
