// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./questline.toml` > `~/.config/questline/questline.toml`
//! > `/etc/questline/questline.toml` with environment variable overrides via
//! the `QUESTLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuestlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/questline/questline.toml` (system-wide)
/// 3. `~/.config/questline/questline.toml` (user XDG config)
/// 4. `./questline.toml` (local directory)
/// 5. `QUESTLINE_*` environment variables
pub fn load_config() -> Result<QuestlineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<QuestlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuestlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuestlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuestlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QuestlineConfig::default()))
        .merge(Toml::file("/etc/questline/questline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("questline/questline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("questline.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `QUESTLINE_OPENAI_API_KEY` must map to
/// `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("QUESTLINE_").map(|key| {
        // `key` arrives with the prefix stripped but the original casing;
        // figment lowercases only after this mapper runs, so the section
        // needles must match on a lowercased copy.
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("adventure_", "adventure.", 1);
        mapped.into()
    })
}
