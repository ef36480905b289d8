// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the waitline queue engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup rather than silently ignoring typos.

use serde::{Deserialize, Serialize};

/// Top-level waitline configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WaitlineConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Queue policy settings.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Administrator and superuser id sets.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Fixed notification templates.
    #[serde(default)]
    pub messages: MessageConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journal mode.
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
    "waitline.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Queue policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Retention window, in hours, for stale queue entries, cache rows,
    /// and pending listener ids.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    /// Bootstrap value for the global `wait_time` master variable, in
    /// minutes. Only applied when the variable is absent.
    #[serde(default = "default_wait_time_minutes")]
    pub default_wait_time_minutes: u32,

    /// Bootstrap value for the global `max_length` master variable.
    /// `None` leaves stations without a per-station capacity unbounded.
    #[serde(default)]
    pub default_max_queue_length: Option<u32>,

    /// Number of retries after a storage conflict before giving up.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            retention_hours: default_retention_hours(),
            default_wait_time_minutes: default_wait_time_minutes(),
            default_max_queue_length: None,
            retry_budget: default_retry_budget(),
        }
    }
}

fn default_retention_hours() -> u32 {
    48
}

fn default_wait_time_minutes() -> u32 {
    5
}

fn default_retry_budget() -> u32 {
    3
}

/// Administrator and superuser id sets.
///
/// Authorization is plain set membership; there is no elevation logic.
/// Superusers are implicitly admins.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub admins: Vec<i64>,

    #[serde(default)]
    pub superusers: Vec<i64>,
}

/// Fixed notification templates.
///
/// These are the only user-facing text the engine ever emits; all other
/// phrasing belongs to the front end.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessageConfig {
    /// Template for the global wait-time estimate. `{minutes}` is
    /// replaced with the current `wait_time` master variable.
    #[serde(default = "default_wait_time_template")]
    pub wait_time_template: String,

    /// Default front-of-queue notification for stations without their
    /// own `front_message`.
    #[serde(default = "default_front_message")]
    pub front_message: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            wait_time_template: default_wait_time_template(),
            front_message: default_front_message(),
        }
    }
}

fn default_wait_time_template() -> String {
    "Estimated wait time: {minutes} minutes".to_string()
}

fn default_front_message() -> String {
    "You are at the front of the queue. Please proceed to the station.".to_string()
}
