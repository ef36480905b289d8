// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./waitline.toml` > `~/.config/waitline/waitline.toml`
//! > `/etc/waitline/waitline.toml` with environment variable overrides via
//! the `WAITLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WaitlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/waitline/waitline.toml` (system-wide)
/// 3. `~/.config/waitline/waitline.toml` (user XDG config)
/// 4. `./waitline.toml` (local directory)
/// 5. `WAITLINE_*` environment variables
pub fn load_config() -> Result<WaitlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WaitlineConfig::default()))
        .merge(Toml::file("/etc/waitline/waitline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("waitline/waitline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("waitline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<WaitlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WaitlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WaitlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WaitlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `WAITLINE_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("WAITLINE_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("storage_", "storage.", 1)
            .replacen("policy_", "policy.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("messages_", "messages.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.storage.database_path, "waitline.db");
        assert_eq!(config.policy.retention_hours, 48);
        assert_eq!(config.policy.retry_budget, 3);
        assert!(config.auth.admins.is_empty());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = load_config_from_str(
            r#"
            [storage]
            database_path = "/var/lib/waitline/queues.db"

            [policy]
            retention_hours = 24
            default_max_queue_length = 20

            [auth]
            admins = [101, 102]
            superusers = [1]
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.database_path, "/var/lib/waitline/queues.db");
        assert_eq!(config.policy.retention_hours, 24);
        assert_eq!(config.policy.default_max_queue_length, Some(20));
        assert_eq!(config.auth.admins, vec![101, 102]);
        assert_eq!(config.auth.superusers, vec![1]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [policy]
            retention_hrs = 24
            "#,
        );
        assert!(result.is_err(), "typo'd key should be rejected");
    }

    #[test]
    #[serial]
    fn env_vars_override_file_values() {
        // SAFETY: test-only env mutation, serialized via #[serial].
        unsafe { std::env::set_var("WAITLINE_POLICY_RETENTION_HOURS", "12") };
        let config = load_config_from_path(Path::new("/nonexistent/waitline.toml")).unwrap();
        unsafe { std::env::remove_var("WAITLINE_POLICY_RETENTION_HOURS") };
        assert_eq!(config.policy.retention_hours, 12);
    }

    #[test]
    #[serial]
    fn env_mapping_keeps_underscored_key_names_intact() {
        // SAFETY: test-only env mutation, serialized via #[serial].
        unsafe { std::env::set_var("WAITLINE_STORAGE_DATABASE_PATH", "/tmp/env.db") };
        let config = load_config_from_path(Path::new("/nonexistent/waitline.toml")).unwrap();
        unsafe { std::env::remove_var("WAITLINE_STORAGE_DATABASE_PATH") };
        assert_eq!(config.storage.database_path, "/tmp/env.db");
    }
}
