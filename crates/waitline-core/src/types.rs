// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across the waitline workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable integer identifier of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationId(pub i64);

/// Identity of a participant. At most one active queue position across all
/// stations is permitted per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub i64);

/// Identity of the administrative group controlling a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub i64);

/// Identity of a conversation with the front end, used to key pending
/// reply listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named, independently ordered admission queue.
///
/// `capacity` of `None` means unbounded; the engine may still apply the
/// global `max_length` master variable as a fallback limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    /// Maximum concurrent queue entries; `None` for unbounded.
    pub capacity: Option<u32>,
    /// Estimated per-person service duration, in minutes.
    pub service_minutes: u32,
    /// Station-specific front-of-queue notification text; `None` falls
    /// back to the configured default template.
    pub front_message: Option<String>,
    pub group_id: GroupId,
}

/// An active position in one station's queue.
///
/// Sequence numbers are per-station, strictly increasing in admission
/// order, and never reused, so the minimum active seq is the front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub station_id: StationId,
    pub participant_id: ParticipantId,
    pub seq: i64,
    pub joined_at: String,
}

/// The single authoritative record of where a participant is queued.
///
/// `station_id`/`seq` of `None` means not queued anywhere. The admission
/// transactions are the only writers of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub participant_id: ParticipantId,
    pub station_id: Option<StationId>,
    pub seq: Option<i64>,
}

/// Outcome of a leave request. Leaving while not queued is a benign
/// signal, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Removed,
    NotQueued,
}

/// Front-of-queue status for a station, with the display name already
/// resolved through the messenger collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontStatus {
    Empty,
    Occupied {
        participant_id: ParticipantId,
        display_name: String,
    },
}

/// One row of the per-station occupancy overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationSlots {
    pub station_id: StationId,
    pub name: String,
    pub queue_length: u32,
    /// Remaining capacity; `None` when the station is unbounded.
    pub slots_available: Option<u32>,
}

/// Logical tables subject to the fixed retention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ExpiryTable {
    Cache,
    Listeners,
    Entries,
}
