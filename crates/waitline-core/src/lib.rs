// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the waitline queue engine.
//!
//! This crate provides the error taxonomy, domain types, and collaborator
//! trait definitions shared across the waitline workspace. The engine,
//! storage, and front-end integration crates all build on the types here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WaitlineError;
pub use traits::Messenger;
pub use types::{
    ChatId, ExpiryTable, FrontStatus, GroupId, LeaveOutcome, ParticipantId, ParticipantRecord,
    QueueEntry, Station, StationId, StationSlots,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_can_be_constructed() {
        let _station = WaitlineError::StationNotFound { station_id: 7 };
        let _queued = WaitlineError::AlreadyQueued {
            participant_id: 1,
            station_id: 7,
        };
        let _full = WaitlineError::QueueFull {
            station_id: 7,
            capacity: 2,
        };
        let _group = WaitlineError::AmbiguousGroup { group_id: 42 };
        let _setting = WaitlineError::SettingNotFound {
            key: "wait_time".into(),
        };
        let _dup = WaitlineError::AmbiguousKey {
            key: "wait_time".into(),
        };
        let _conflict = WaitlineError::Conflict;
        let _storage = WaitlineError::Storage {
            source: Box::new(std::io::Error::other("boom")),
        };
        let _config = WaitlineError::Config("bad".into());
        let _internal = WaitlineError::Internal("oops".into());
    }

    #[test]
    fn business_outcomes_are_benign_and_not_retryable() {
        let full = WaitlineError::QueueFull {
            station_id: 1,
            capacity: 2,
        };
        assert!(full.is_benign());
        assert!(!full.is_retryable());

        let conflict = WaitlineError::Conflict;
        assert!(conflict.is_retryable());
        assert!(!conflict.is_benign());
    }

    #[test]
    fn expiry_table_names_are_snake_case() {
        assert_eq!(ExpiryTable::Cache.to_string(), "cache");
        assert_eq!(ExpiryTable::Listeners.to_string(), "listeners");
        assert_eq!(ExpiryTable::Entries.to_string(), "entries");
    }
}
