// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive durations and well-formed templates.

use crate::diagnostic::ConfigError;
use crate::model::WaitlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &WaitlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.policy.retention_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "policy.retention_hours must be positive".to_string(),
        });
    }

    if config.policy.default_wait_time_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "policy.default_wait_time_minutes must be positive".to_string(),
        });
    }

    if config.policy.default_max_queue_length == Some(0) {
        errors.push(ConfigError::Validation {
            message: "policy.default_max_queue_length must be positive when set".to_string(),
        });
    }

    if !config.messages.wait_time_template.contains("{minutes}") {
        errors.push(ConfigError::Validation {
            message: "messages.wait_time_template must contain the `{minutes}` placeholder"
                .to_string(),
        });
    }

    // Superusers are implicitly admins; an id in both lists is redundant
    // but harmless, so it is not flagged.

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WaitlineConfig;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&WaitlineConfig::default()).is_ok());
    }

    #[test]
    fn zero_retention_is_rejected() {
        let mut config = WaitlineConfig::default();
        config.policy.retention_hours = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn all_errors_are_collected_not_just_first() {
        let mut config = WaitlineConfig::default();
        config.storage.database_path = " ".to_string();
        config.policy.retention_hours = 0;
        config.messages.wait_time_template = "no placeholder".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
