// SPDX-FileCopyrightText: 2026 Questline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as temperature ranges and non-empty prompt pools.

use crate::diagnostic::ConfigError;
use crate::model::QuestlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QuestlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.openai.attempt_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.attempt_limit must be at least 1, got {}",
                config.openai.attempt_limit
            ),
        });
    }

    if config.limits.hourly_message_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "limits.hourly_message_limit must be at least 1, got {}",
                config.limits.hourly_message_limit
            ),
        });
    }

    for (name, value) in [
        ("adventure.seed_temperature", config.adventure.seed_temperature),
        (
            "adventure.validation_temperature",
            config.adventure.validation_temperature,
        ),
        (
            "adventure.narrative_temperature",
            config.adventure.narrative_temperature,
        ),
    ] {
        if !(0.0..=2.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be within 0.0..=2.0, got {value}"),
            });
        }
    }

    if config.adventure.seeds.is_empty() {
        errors.push(ConfigError::Validation {
            message: "adventure.seeds must contain at least one seed".to_string(),
        });
    }

    for (name, template) in [
        ("adventure.validation_prompt", &config.adventure.validation_prompt),
        ("adventure.narrative_prompt", &config.adventure.narrative_prompt),
        ("adventure.failure_prompt", &config.adventure.failure_prompt),
    ] {
        if !template.contains("{action}") {
            errors.push(ConfigError::Validation {
                message: format!("{name} must contain the `{{action}}` placeholder"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = QuestlineConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = QuestlineConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_attempt_limit_fails_validation() {
        let mut config = QuestlineConfig::default();
        config.openai.attempt_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("attempt_limit"))
        ));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = QuestlineConfig::default();
        config.adventure.validation_temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("validation_temperature"))
        ));
    }

    #[test]
    fn empty_seed_pool_fails_validation() {
        let mut config = QuestlineConfig::default();
        config.adventure.seeds.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("seeds"))
        ));
    }

    #[test]
    fn template_without_placeholder_fails_validation() {
        let mut config = QuestlineConfig::default();
        config.adventure.narrative_prompt = "describe the scene".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("narrative_prompt"))
        ));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = QuestlineConfig::default();
        config.openai.attempt_limit = 0;
        config.limits.hourly_message_limit = 0;
        config.adventure.seeds.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
