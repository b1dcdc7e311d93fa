// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User and AI message persistence, plus the rate-limit window aggregate.

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;

use questline_core::QuestlineError;
use questline_core::time::format_rfc3339;

use crate::database::Database;
use crate::models::{AiMessage, RateWindow, UserMessage};

/// Insert a new user message. `rate_limit_cost` starts at whatever the
/// caller set; generation-bearing turns charge it later via
/// [`charge_user_message`].
pub async fn insert_user_message(db: &Database, msg: &UserMessage) -> Result<(), QuestlineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO user_messages (id, user_id, content, rate_limit_cost, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    msg.id,
                    msg.user_id,
                    msg.content,
                    msg.rate_limit_cost,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set `rate_limit_cost = 1` on a previously inserted user message.
pub async fn charge_user_message(db: &Database, message_id: &str) -> Result<(), QuestlineError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE user_messages SET rate_limit_cost = 1 WHERE id = ?1",
                params![message_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a new AI message.
pub async fn insert_ai_message(db: &Database, msg: &AiMessage) -> Result<(), QuestlineError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO ai_messages (id, content, created_at) VALUES (?1, ?2, ?3)",
                params![msg.id, msg.content, msg.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Aggregate the user's trailing one-hour window ending at `now`.
///
/// The window is half-open: `[now - 1h, now)`. An empty window yields
/// `charged = 0` and `oldest = None`.
pub async fn rate_limit_window(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<RateWindow, QuestlineError> {
    let user_id = user_id.to_string();
    let upper = format_rfc3339(now);
    let lower = format_rfc3339(now - Duration::hours(1));
    db.connection()
        .call(move |conn| {
            let window = conn.query_row(
                "SELECT COALESCE(SUM(rate_limit_cost), 0), MIN(created_at)
                 FROM user_messages
                 WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3",
                params![user_id, lower, upper],
                |row| {
                    Ok(RateWindow {
                        charged: row.get(0)?,
                        oldest: row.get(1)?,
                    })
                },
            )?;
            Ok(window)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::get_or_create_user;
    use chrono::TimeZone;
    use tempfile::tempdir;

    async fn setup_db_with_user() -> (Database, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        let user = get_or_create_user(&db, "U1", "tester").await.unwrap();
        (db, user.id, dir)
    }

    fn make_msg(id: &str, user_id: &str, cost: i64, timestamp: &str) -> UserMessage {
        UserMessage {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: "go north".to_string(),
            rate_limit_cost: cost,
            created_at: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_window_is_zero_with_no_oldest() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let window = rate_limit_window(&db, &user_id, now).await.unwrap();
        assert_eq!(window.charged, 0);
        assert_eq!(window.oldest, None);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn window_sums_only_charged_messages() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        // Two charged, one uncharged command inside the window.
        insert_user_message(&db, &make_msg("m1", &user_id, 1, "2026-01-01T11:10:00.000Z"))
            .await
            .unwrap();
        insert_user_message(&db, &make_msg("m2", &user_id, 0, "2026-01-01T11:20:00.000Z"))
            .await
            .unwrap();
        insert_user_message(&db, &make_msg("m3", &user_id, 1, "2026-01-01T11:30:00.000Z"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let window = rate_limit_window(&db, &user_id, now).await.unwrap();
        assert_eq!(window.charged, 2);
        // Oldest reflects any message in the window, charged or not.
        assert_eq!(window.oldest.as_deref(), Some("2026-01-01T11:10:00.000Z"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn window_excludes_messages_older_than_one_hour() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        insert_user_message(&db, &make_msg("m1", &user_id, 1, "2026-01-01T10:59:59.999Z"))
            .await
            .unwrap();
        insert_user_message(&db, &make_msg("m2", &user_id, 1, "2026-01-01T11:00:00.000Z"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let window = rate_limit_window(&db, &user_id, now).await.unwrap();
        // Lower bound is inclusive, so only m2 counts.
        assert_eq!(window.charged, 1);
        assert_eq!(window.oldest.as_deref(), Some("2026-01-01T11:00:00.000Z"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn window_is_scoped_to_the_user() {
        let (db, user_id, _dir) = setup_db_with_user().await;
        let other = get_or_create_user(&db, "U2", "other").await.unwrap();

        insert_user_message(&db, &make_msg("m1", &other.id, 1, "2026-01-01T11:30:00.000Z"))
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let window = rate_limit_window(&db, &user_id, now).await.unwrap();
        assert_eq!(window.charged, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn charge_flips_cost_to_one() {
        let (db, user_id, _dir) = setup_db_with_user().await;

        insert_user_message(&db, &make_msg("m1", &user_id, 0, "2026-01-01T11:30:00.000Z"))
            .await
            .unwrap();
        charge_user_message(&db, "m1").await.unwrap();

        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let window = rate_limit_window(&db, &user_id, now).await.unwrap();
        assert_eq!(window.charged, 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ai_messages_insert_cleanly() {
        let (db, _user_id, _dir) = setup_db_with_user().await;

        let msg = AiMessage {
            id: "a1".to_string(),
            content: "You step into the clearing.".to_string(),
            created_at: "2026-01-01T11:30:01.000Z".to_string(),
        };
        insert_ai_message(&db, &msg).await.unwrap();

        db.close().await.unwrap();
    }
}
