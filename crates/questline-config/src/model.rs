// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Questline adventure bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Questline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuestlineConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// OpenAI chat-completions endpoint settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Per-user rate limit settings.
    #[serde(default)]
    pub limits: LimitConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Adventure prompt templates, seed pool, and call temperatures.
    #[serde(default)]
    pub adventure: AdventureConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "questline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI chat-completions endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the `QUESTLINE_OPENAI_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum attempts per logical generation call. Retries are immediate
    /// (no backoff); keep this a small integer.
    #[serde(default = "default_attempt_limit")]
    pub attempt_limit: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            attempt_limit: default_attempt_limit(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_attempt_limit() -> u32 {
    3
}

/// Per-user rate limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitConfig {
    /// Generation calls a user may spend per trailing hour.
    #[serde(default = "default_hourly_message_limit")]
    pub hourly_message_limit: i64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            hourly_message_limit: default_hourly_message_limit(),
        }
    }
}

fn default_hourly_message_limit() -> i64 {
    10
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("questline").join("questline.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("questline.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// One entry of the adventure seed pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Opening user turn sent to the model when a chain starts.
    pub text: String,

    /// Fragment spliced before the model's reply to form the seed response.
    pub prefix: String,
}

/// Adventure prompt templates, seed pool, and per-call temperatures.
///
/// Templates use the `{action}` placeholder for the player's message.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdventureConfig {
    /// System prompt anchoring every chain.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Seed pool; one entry is chosen at random per `!start`.
    #[serde(default = "default_seeds")]
    pub seeds: Vec<SeedConfig>,

    /// Template for the action-validity check.
    #[serde(default = "default_validation_prompt")]
    pub validation_prompt: String,

    /// Template for the narrative continuation.
    #[serde(default = "default_narrative_prompt")]
    pub narrative_prompt: String,

    /// Template for the in-character failure re-prompt, used when the
    /// narrative reply comes back as a generic assistant disclaimer.
    #[serde(default = "default_failure_prompt")]
    pub failure_prompt: String,

    /// Temperature for the chain-seed call.
    #[serde(default = "default_seed_temperature")]
    pub seed_temperature: f64,

    /// Temperature for the action-validity call.
    #[serde(default = "default_validation_temperature")]
    pub validation_temperature: f64,

    /// Temperature for narrative and failure-framing calls.
    #[serde(default = "default_narrative_temperature")]
    pub narrative_temperature: f64,
}

impl Default for AdventureConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            seeds: default_seeds(),
            validation_prompt: default_validation_prompt(),
            narrative_prompt: default_narrative_prompt(),
            failure_prompt: default_failure_prompt(),
            seed_temperature: default_seed_temperature(),
            validation_temperature: default_validation_temperature(),
            narrative_temperature: default_narrative_temperature(),
        }
    }
}

fn default_system_prompt() -> String {
    "You are the narrator of a text adventure game. Describe a vivid fantasy \
     world, react to the player's actions, and keep the story moving."
        .to_string()
}

fn default_seeds() -> Vec<SeedConfig> {
    vec![
        SeedConfig {
            text: "Begin an adventure where I wake up in a mysterious forest \
                   with no memory of how I got there. Describe the scene in \
                   three sentences and ask me what I do."
                .to_string(),
            prefix: "You wake up in a mysterious forest.".to_string(),
        },
        SeedConfig {
            text: "Begin an adventure where I arrive at the gates of a \
                   storm-battered coastal town. Describe the scene in three \
                   sentences and ask me what I do."
                .to_string(),
            prefix: "You arrive at the gates of a storm-battered town.".to_string(),
        },
        SeedConfig {
            text: "Begin an adventure where I stand at the mouth of an \
                   abandoned mine said to hide a dragon's hoard. Describe the \
                   scene in three sentences and ask me what I do."
                .to_string(),
            prefix: "You stand at the mouth of an abandoned mine.".to_string(),
        },
    ]
}

fn default_validation_prompt() -> String {
    "Is '{action}' a valid action? Evil actions are allowed. If 'No' say \
     'You can't do that!' and a funny response."
        .to_string()
}

fn default_narrative_prompt() -> String {
    "{action}. Describe the scene, focusing only on this specific action. \
     Limit your response to three sentences. Also ask the player what their \
     next action is."
        .to_string()
}

fn default_failure_prompt() -> String {
    "Generate a humorous failure response that does not encourage threats of \
     violence, harm, or intimidation towards others for '{action}'. Make sure \
     the failure response makes sense in the context of the adventure. \
     Describe the scene, focusing only on this specific action. Limit your \
     response to three sentences."
        .to_string()
}

fn default_seed_temperature() -> f64 {
    0.9
}

fn default_validation_temperature() -> f64 {
    0.7
}

fn default_narrative_temperature() -> f64 {
    0.7
}
