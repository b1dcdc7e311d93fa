// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading, merging, and validation.

use questline_config::{QuestlineConfig, load_and_validate_str, load_config_from_str};

#[test]
fn defaults_load_without_any_config() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.agent.name, "questline");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.openai.model, "gpt-3.5-turbo");
    assert_eq!(config.openai.attempt_limit, 3);
    assert_eq!(config.limits.hourly_message_limit, 10);
    assert!(config.storage.wal_mode);
    assert!(!config.adventure.seeds.is_empty());
}

#[test]
fn toml_values_override_defaults() {
    let toml = r#"
[agent]
name = "dungeon-bot"
log_level = "debug"

[openai]
model = "gpt-4"
attempt_limit = 5

[limits]
hourly_message_limit = 3
"#;
    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.agent.name, "dungeon-bot");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.openai.model, "gpt-4");
    assert_eq!(config.openai.attempt_limit, 5);
    assert_eq!(config.limits.hourly_message_limit, 3);
}

#[test]
fn seed_pool_deserializes_from_toml() {
    let toml = r#"
[[adventure.seeds]]
text = "Begin an adventure on a pirate ship."
prefix = "You stand on the deck of a pirate ship."

[[adventure.seeds]]
text = "Begin an adventure in a desert ruin."
prefix = "You step into a desert ruin."
"#;
    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.adventure.seeds.len(), 2);
    assert_eq!(
        config.adventure.seeds[0].prefix,
        "You stand on the deck of a pirate ship."
    );
}

#[test]
fn unknown_key_is_rejected() {
    let toml = r#"
[openai]
modle = "gpt-4"
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn env_vars_override_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "questline.toml",
            r#"
[openai]
model = "gpt-3.5-turbo"
"#,
        )?;
        jail.set_env("QUESTLINE_OPENAI_MODEL", "gpt-4");
        jail.set_env("QUESTLINE_OPENAI_API_KEY", "sk-test");
        jail.set_env("QUESTLINE_LIMITS_HOURLY_MESSAGE_LIMIT", "7");

        let config: QuestlineConfig = questline_config::loader::build_figment().extract()?;
        assert_eq!(config.openai.model, "gpt-4");
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.limits.hourly_message_limit, 7);
        Ok(())
    });
}

#[test]
fn validation_runs_after_load() {
    let toml = r#"
[openai]
attempt_limit = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn default_templates_contain_action_placeholder() {
    let config = load_config_from_str("").unwrap();
    assert!(config.adventure.validation_prompt.contains("{action}"));
    assert!(config.adventure.narrative_prompt.contains("{action}"));
    assert!(config.adventure.failure_prompt.contains("{action}"));
}

#[test]
fn default_validation_prompt_carries_rejection_marker() {
    let config = load_config_from_str("").unwrap();
    assert!(
        config
            .adventure
            .validation_prompt
            .contains("You can't do that!")
    );
}
