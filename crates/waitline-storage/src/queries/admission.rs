// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admission transactions: the coupled write to the queue entries and the
//! participant index.
//!
//! Every admission or removal is one SQLite transaction. The entry row,
//! the participant record, and the per-station sequence counter commit
//! together or not at all; a dropped transaction rolls back, so a caller
//! abandoning a request pre-commit leaves no partial effect.

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use waitline_core::types::{LeaveOutcome, ParticipantId, ParticipantRecord, StationId};
use waitline_core::WaitlineError;

use crate::database::{map_tr_err, Database};

/// Result of an admission attempt, produced inside the transaction and
/// mapped to the error taxonomy outside it.
enum AdmitOutcome {
    Admitted { seq: i64 },
    NoSuchStation,
    AlreadyQueued { station_id: i64 },
    Full { capacity: u32 },
}

/// Result of a removal attempt.
enum RemoveOutcome {
    Removed,
    NotQueued,
    /// The participant index pointed at an entry that does not exist.
    IndexMismatch { station_id: i64 },
}

/// Admit a participant to a station's queue, returning the assigned
/// sequence number.
///
/// Inside one immediate transaction: the station is checked, the
/// single-active-queue invariant is enforced against the participant
/// index, the effective capacity (station capacity, else the global
/// `max_length` master variable, else unbounded) is enforced, and the
/// station's `last_seq` counter is bumped. The counter only ever grows,
/// so sequence numbers are strictly increasing and never reused even
/// after entries are removed.
pub async fn enqueue(
    db: &Database,
    participant_id: ParticipantId,
    station_id: StationId,
) -> Result<i64, WaitlineError> {
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let station: Option<Option<u32>> = tx
                .query_row(
                    "SELECT capacity FROM stations WHERE station_id = ?1",
                    params![station_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(station_capacity) = station else {
                return Ok(AdmitOutcome::NoSuchStation);
            };

            let occupied: Option<i64> = tx
                .query_row(
                    "SELECT station_id FROM participants
                     WHERE participant_id = ?1 AND station_id IS NOT NULL",
                    params![participant_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            if let Some(current) = occupied {
                return Ok(AdmitOutcome::AlreadyQueued {
                    station_id: current,
                });
            }

            let effective_capacity = match station_capacity {
                Some(cap) => Some(cap),
                None => tx
                    .query_row(
                        "SELECT value FROM variables WHERE key = 'max_length'",
                        [],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?
                    .and_then(|v| v.parse::<u32>().ok()),
            };

            if let Some(capacity) = effective_capacity {
                let length: u32 = tx.query_row(
                    "SELECT COUNT(*) FROM entries WHERE station_id = ?1",
                    params![station_id.0],
                    |row| row.get(0),
                )?;
                if length >= capacity {
                    return Ok(AdmitOutcome::Full { capacity });
                }
            }

            tx.execute(
                "UPDATE stations SET last_seq = last_seq + 1 WHERE station_id = ?1",
                params![station_id.0],
            )?;
            let seq: i64 = tx.query_row(
                "SELECT last_seq FROM stations WHERE station_id = ?1",
                params![station_id.0],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO entries (station_id, seq, participant_id) VALUES (?1, ?2, ?3)",
                params![station_id.0, seq, participant_id.0],
            )?;
            tx.execute(
                "INSERT INTO participants (participant_id, station_id, seq)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(participant_id)
                 DO UPDATE SET station_id = excluded.station_id, seq = excluded.seq",
                params![participant_id.0, station_id.0, seq],
            )?;

            tx.commit()?;
            Ok(AdmitOutcome::Admitted { seq })
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        AdmitOutcome::Admitted { seq } => Ok(seq),
        AdmitOutcome::NoSuchStation => Err(WaitlineError::StationNotFound {
            station_id: station_id.0,
        }),
        AdmitOutcome::AlreadyQueued { station_id } => Err(WaitlineError::AlreadyQueued {
            participant_id: participant_id.0,
            station_id,
        }),
        AdmitOutcome::Full { capacity } => Err(WaitlineError::QueueFull {
            station_id: station_id.0,
            capacity,
        }),
    }
}

/// Remove a participant from whatever queue they occupy.
///
/// Deleting the entry and clearing the participant record happen in the
/// same transaction; a disagreement between the two records aborts the
/// transaction and is surfaced, never papered over. Leaving while not
/// queued is the benign `NotQueued` outcome.
pub async fn leave(
    db: &Database,
    participant_id: ParticipantId,
) -> Result<LeaveOutcome, WaitlineError> {
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let occupied: Option<i64> = tx
                .query_row(
                    "SELECT station_id FROM participants
                     WHERE participant_id = ?1 AND station_id IS NOT NULL",
                    params![participant_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(station_id) = occupied else {
                return Ok(RemoveOutcome::NotQueued);
            };

            let deleted = tx.execute(
                "DELETE FROM entries WHERE station_id = ?1 AND participant_id = ?2",
                params![station_id, participant_id.0],
            )?;
            if deleted == 0 {
                // Roll back rather than clear an index that disagrees
                // with the queue store.
                return Ok(RemoveOutcome::IndexMismatch { station_id });
            }

            tx.execute(
                "UPDATE participants SET station_id = NULL, seq = NULL
                 WHERE participant_id = ?1",
                params![participant_id.0],
            )?;

            tx.commit()?;
            Ok(RemoveOutcome::Removed)
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        RemoveOutcome::Removed => Ok(LeaveOutcome::Removed),
        RemoveOutcome::NotQueued => Ok(LeaveOutcome::NotQueued),
        RemoveOutcome::IndexMismatch { station_id } => Err(WaitlineError::Internal(format!(
            "participant {participant_id} indexed at station {station_id} has no queue entry"
        ))),
    }
}

/// Read the authoritative participant record.
pub async fn participant_record(
    db: &Database,
    participant_id: ParticipantId,
) -> Result<ParticipantRecord, WaitlineError> {
    let row: Option<(Option<i64>, Option<i64>)> = db
        .connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT station_id, seq FROM participants WHERE participant_id = ?1",
                    params![participant_id.0],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(map_tr_err)?;

    let (station_id, seq) = row.unwrap_or((None, None));
    Ok(ParticipantRecord {
        participant_id,
        station_id: station_id.map(StationId),
        seq,
    })
}

/// Expire queue entries older than the retention window, clearing the
/// matching participant records in the same transaction. Returns the
/// number of entries removed.
pub async fn expire_stale_entries(
    db: &Database,
    retention_hours: u32,
) -> Result<usize, WaitlineError> {
    let cutoff = format!("-{retention_hours} hours");
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "UPDATE participants SET station_id = NULL, seq = NULL
                 WHERE participant_id IN (
                     SELECT participant_id FROM entries
                     WHERE joined_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)
                 )",
                params![cutoff],
            )?;
            let removed = tx.execute(
                "DELETE FROM entries
                 WHERE joined_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)",
                params![cutoff],
            )?;
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}
