// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Questline adventure bot.

use thiserror::Error;

/// The primary error type used across all Questline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum QuestlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation backend errors (transport failure, unusable endpoint).
    #[error("backend error: {message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A new chain was requested while one is still current for the user.
    #[error("user {user_id} already has a current adventure chain")]
    ChainActive { user_id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
