// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the waitline queue engine.

use thiserror::Error;

/// The primary error type used across the waitline workspace.
///
/// Variants split into two families. Business outcomes (`StationNotFound`,
/// `AlreadyQueued`, `QueueFull`, ...) are expected results of user actions
/// and are returned to the front end for phrasing, never logged as errors.
/// Infrastructure failures (`Storage`, `Conflict`) are logged with context
/// and surfaced as generic failures.
#[derive(Debug, Error)]
pub enum WaitlineError {
    /// The referenced station does not exist in the registry.
    #[error("station {station_id} not found")]
    StationNotFound { station_id: i64 },

    /// The participant already holds an active queue position somewhere.
    ///
    /// Admission never silently re-admits or moves a participant; the
    /// front end must ask them to leave their current queue first.
    #[error("participant {participant_id} is already queued at station {station_id}")]
    AlreadyQueued {
        participant_id: i64,
        station_id: i64,
    },

    /// The station's queue is at capacity.
    #[error("station {station_id} is full (capacity {capacity})")]
    QueueFull { station_id: i64, capacity: u32 },

    /// A controlling group maps to more than one station.
    ///
    /// The registry fails closed on this instead of picking an arbitrary
    /// match; it indicates corrupted administrative data.
    #[error("group {group_id} controls more than one station")]
    AmbiguousGroup { group_id: i64 },

    /// The requested master variable does not exist.
    #[error("setting `{key}` not found")]
    SettingNotFound { key: String },

    /// The master variable key matched more than one row.
    ///
    /// Key uniqueness is enforced structurally by the schema, so this is
    /// only reachable against a store that lacks the constraint.
    #[error("setting `{key}` matches more than one row")]
    AmbiguousKey { key: String },

    /// A serialization conflict or busy store; eligible for bounded retry.
    #[error("storage conflict; operation may be retried")]
    Conflict,

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid values, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors, including cross-record inconsistency.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WaitlineError {
    /// Whether this error is an expected business outcome rather than a
    /// failure of the engine or its store.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            WaitlineError::StationNotFound { .. }
                | WaitlineError::AlreadyQueued { .. }
                | WaitlineError::QueueFull { .. }
                | WaitlineError::SettingNotFound { .. }
        )
    }

    /// Whether the failed operation may be retried with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WaitlineError::Conflict)
    }
}
