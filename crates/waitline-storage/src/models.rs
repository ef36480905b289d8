// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `waitline-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use waitline_core::types::{
    ChatId, ExpiryTable, GroupId, LeaveOutcome, ParticipantId, ParticipantRecord, QueueEntry,
    Station, StationId,
};
