// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit log of generation attempts.

use rusqlite::params;

use questline_core::QuestlineError;
use questline_core::time::now_rfc3339;

use crate::database::Database;

/// Append one request/response pair. Every attempt is logged, including
/// retried and failed ones.
pub async fn append(
    db: &Database,
    request_json: &str,
    response_json: &str,
) -> Result<(), QuestlineError> {
    let request_json = request_json.to_string();
    let response_json = response_json.to_string();
    let created_at = now_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO generation_log (request_json, response_json, created_at)
                 VALUES (?1, ?2, ?3)",
                params![request_json, response_json, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of logged attempts. Used by tests and diagnostics only.
pub async fn count(db: &Database) -> Result<i64, QuestlineError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM generation_log", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn append_accumulates_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        assert_eq!(count(&db).await.unwrap(), 0);
        append(&db, r#"{"model":"gpt-3.5-turbo"}"#, r#"{"choices":[]}"#)
            .await
            .unwrap();
        append(&db, r#"{"model":"gpt-3.5-turbo"}"#, r#"{"error":{"type":"server_error"}}"#)
            .await
            .unwrap();
        assert_eq!(count(&db).await.unwrap(), 2);

        db.close().await.unwrap();
    }
}
