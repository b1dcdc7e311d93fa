// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn links and chain context reconstruction.

use rusqlite::params;
use uuid::Uuid;

use questline_core::QuestlineError;
use questline_core::types::{ChatTurn, Role};

use crate::database::Database;
use crate::models::{Chain, TurnKind};

/// Link a user message and an AI message into a chain's turn history.
pub async fn record_turn(
    db: &Database,
    chain_id: &str,
    user_message_id: &str,
    ai_message_id: &str,
    kind: TurnKind,
) -> Result<(), QuestlineError> {
    let id = Uuid::new_v4().to_string();
    let chain_id = chain_id.to_string();
    let user_message_id = user_message_id.to_string();
    let ai_message_id = ai_message_id.to_string();
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO turn_links (id, chain_id, user_message_id, ai_message_id, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, chain_id, user_message_id, ai_message_id, kind],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rebuild the chain's conversation context: the system prompt, the seed
/// exchange, then every valid turn in user-message timestamp order.
/// Invalid turns (rejected actions) are left out so a rejection never
/// steers later narration.
pub async fn chain_context(db: &Database, chain: &Chain) -> Result<Vec<ChatTurn>, QuestlineError> {
    let chain_id = chain.id.clone();
    let mut context = vec![
        ChatTurn::new(Role::System, chain.system_prompt.clone()),
        ChatTurn::new(Role::User, chain.seed_prompt.clone()),
        ChatTurn::new(Role::Assistant, chain.seed_response.clone()),
    ];
    let turns: Vec<(String, String)> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT um.content, am.content
                 FROM turn_links tl
                 JOIN user_messages um ON tl.user_message_id = um.id
                 JOIN ai_messages am ON tl.ai_message_id = am.id
                 WHERE tl.chain_id = ?1 AND tl.kind = 'valid'
                 ORDER BY um.created_at ASC",
            )?;
            let rows = stmt.query_map(params![chain_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            let mut turns = Vec::new();
            for row in rows {
                turns.push(row?);
            }
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    for (action, reply) in turns {
        context.push(ChatTurn::new(Role::User, action));
        context.push(ChatTurn::new(Role::Assistant, reply));
    }
    Ok(context)
}
