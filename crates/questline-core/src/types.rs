// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Questline workspace.
//!
//! Persistence models keep timestamps as RFC 3339 strings; chrono enters
//! only at the computation edges (rate-limit arithmetic, clock reads).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Generation,
    Storage,
}

/// Speaker role of one context entry, matching the wire protocol's
/// `"system" | "user" | "assistant"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of a chain's conversation context.
///
/// Serializes directly into the chat-completion `messages` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One chat participant. Created on first observed message, immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: String,
    /// Identity assigned by the external chat transport.
    pub external_id: String,
    pub display_name: String,
    pub created_at: String,
}

/// One adventure session: a system prompt, a seed exchange, and a turn history.
///
/// `finished_at` exists in the schema but is never set by current logic; the
/// "current" chain for a user is simply the most recently started one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,
    pub user_id: String,
    pub system_prompt: String,
    pub seed_prompt: String,
    pub seed_response: String,
    pub started_at: String,
    pub finished_at: Option<String>,
}

/// One inbound turn from a user, including commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub id: String,
    pub user_id: String,
    pub content: String,
    /// Generation calls this message triggered: 0 for commands and
    /// rejections, 1 once a turn is charged.
    pub rate_limit_cost: i64,
    pub created_at: String,
}

/// One generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiMessage {
    pub id: String,
    pub content: String,
    pub created_at: String,
}

/// Classification of a persisted turn link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TurnKind {
    /// The action continued the adventure.
    Valid,
    /// The backend rejected the action; excluded from context rebuilds.
    Invalid,
}

/// Aggregate over a user's trailing one-hour message window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    /// Sum of `rate_limit_cost` over the window; 0 for an empty window.
    pub charged: i64,
    /// Oldest message timestamp in the window, if any message exists.
    pub oldest: Option<String>,
}

/// Result of one logical generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The backend returned a completion payload.
    Reply(String),
    /// Attempts were exhausted or a fatal error stopped the call; the
    /// caller degrades this to the fixed busy reply.
    Busy,
}

/// An inbound message received from a channel adapter, mention markup
/// already stripped by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender_external_id: String,
    pub sender_name: String,
    pub content: String,
}

/// An outbound reply to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient_external_id: String,
    pub text: String,
}
