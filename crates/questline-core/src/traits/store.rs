// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chain store trait: the persistence contract consumed by the turn
//! controller and the generation backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QuestlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    AiMessage, Chain, ChatTurn, ChatUser, RateWindow, TurnKind, UserMessage,
};

/// Adapter for the adventure-chain persistence backend.
///
/// All cross-turn state lives behind this trait; the controller holds only
/// transient references during a turn. Callers construct model structs
/// (ids, timestamps) themselves and pass them in for insertion.
#[async_trait]
pub trait ChainStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), QuestlineError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), QuestlineError>;

    /// Looks up a user by external id, creating the row on first sight.
    async fn get_or_create_user(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<ChatUser, QuestlineError>;

    /// Returns the user's current chain: the one with the latest start
    /// timestamp, or `None` if the user has never started an adventure.
    async fn current_chain(&self, user_id: &str) -> Result<Option<Chain>, QuestlineError>;

    /// Inserts a new chain. The active-chain check and the insert happen
    /// inside one transaction; fails with [`QuestlineError::ChainActive`]
    /// if the user already has a chain.
    async fn create_chain(&self, chain: &Chain) -> Result<(), QuestlineError>;

    /// Reconstructs the chain's context: system prompt, seed prompt, seed
    /// response, then every valid turn ordered by user-message timestamp
    /// ascending. Invalid turns are excluded.
    async fn context(&self, chain: &Chain) -> Result<Vec<ChatTurn>, QuestlineError>;

    /// Persists one inbound user message.
    async fn insert_user_message(&self, msg: &UserMessage) -> Result<(), QuestlineError>;

    /// Sets `rate_limit_cost = 1` on a previously inserted user message.
    /// This is the charge point for a generation-bearing turn.
    async fn charge_user_message(&self, message_id: &str) -> Result<(), QuestlineError>;

    /// Persists one generated reply.
    async fn insert_ai_message(&self, msg: &AiMessage) -> Result<(), QuestlineError>;

    /// Links a user message and an AI message into a chain's turn history.
    async fn record_turn(
        &self,
        chain_id: &str,
        user_message_id: &str,
        ai_message_id: &str,
        kind: TurnKind,
    ) -> Result<(), QuestlineError>;

    /// Aggregates the user's trailing one-hour window: total charged cost
    /// and the oldest message timestamp in the window.
    async fn rate_limit_window(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RateWindow, QuestlineError>;

    /// Appends one generation-attempt audit row. Write-only; never read
    /// back except for diagnostics.
    async fn append_generation_log(
        &self,
        request_json: &str,
        response_json: &str,
    ) -> Result<(), QuestlineError>;
}
