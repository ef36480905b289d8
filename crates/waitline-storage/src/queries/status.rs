// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only status queries over the queue store and participant index.
//!
//! These run outside the admission transactions with snapshot semantics;
//! a count may be off by one relative to a concurrently-committing
//! admission, which callers tolerate.

use rusqlite::{params, OptionalExtension};
use waitline_core::types::{ParticipantId, QueueEntry, StationId};
use waitline_core::WaitlineError;

use crate::database::{map_tr_err, Database};

/// Number of active entries in a station's queue.
pub async fn queue_length(db: &Database, station_id: StationId) -> Result<u32, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let n = conn.query_row(
                "SELECT COUNT(*) FROM entries WHERE station_id = ?1",
                params![station_id.0],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

/// How many active entries precede the participant in their station.
///
/// `None` when the participant is not queued anywhere; `Some(0)` exactly
/// when they are at the front.
pub async fn position_ahead(
    db: &Database,
    participant_id: ParticipantId,
) -> Result<Option<u32>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let ahead = conn
                .query_row(
                    "SELECT (
                         SELECT COUNT(*) FROM entries e
                         WHERE e.station_id = p.station_id AND e.seq < p.seq
                     )
                     FROM participants p
                     WHERE p.participant_id = ?1 AND p.station_id IS NOT NULL",
                    params![participant_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(ahead)
        })
        .await
        .map_err(map_tr_err)
}

/// The participant at the front of a station's queue, if any.
pub async fn front(
    db: &Database,
    station_id: StationId,
) -> Result<Option<ParticipantId>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let id: Option<i64> = conn
                .query_row(
                    "SELECT participant_id FROM entries
                     WHERE station_id = ?1 ORDER BY seq LIMIT 1",
                    params![station_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
        .map(|id| id.map(ParticipantId))
}

/// All participants in a station, in queue (sequence) order.
pub async fn participants_in_order(
    db: &Database,
    station_id: StationId,
) -> Result<Vec<ParticipantId>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT participant_id FROM entries WHERE station_id = ?1 ORDER BY seq",
            )?;
            let rows = stmt.query_map(params![station_id.0], |row| row.get::<_, i64>(0))?;
            let mut ids = Vec::new();
            for row in rows {
                ids.push(ParticipantId(row?));
            }
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

/// The full entry rows for a station, in queue order.
pub async fn entries_in_order(
    db: &Database,
    station_id: StationId,
) -> Result<Vec<QueueEntry>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT station_id, participant_id, seq, joined_at
                 FROM entries WHERE station_id = ?1 ORDER BY seq",
            )?;
            let rows = stmt.query_map(params![station_id.0], |row| {
                Ok(QueueEntry {
                    station_id: StationId(row.get(0)?),
                    participant_id: ParticipantId(row.get(1)?),
                    seq: row.get(2)?,
                    joined_at: row.get(3)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{admission, stations};
    use waitline_core::types::{GroupId, Station};

    use tempfile::tempdir;

    async fn setup_queue() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("status.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        stations::create_station(
            &db,
            &Station {
                id: StationId(1),
                name: "Desk".to_string(),
                capacity: None,
                service_minutes: 5,
                front_message: None,
                group_id: GroupId(100),
            },
        )
        .await
        .unwrap();
        for participant in [10, 11, 12] {
            admission::enqueue(&db, ParticipantId(participant), StationId(1))
                .await
                .unwrap();
        }
        (db, dir)
    }

    #[tokio::test]
    async fn length_front_and_order_agree() {
        let (db, _dir) = setup_queue().await;

        assert_eq!(queue_length(&db, StationId(1)).await.unwrap(), 3);
        assert_eq!(front(&db, StationId(1)).await.unwrap(), Some(ParticipantId(10)));
        assert_eq!(
            participants_in_order(&db, StationId(1)).await.unwrap(),
            vec![ParticipantId(10), ParticipantId(11), ParticipantId(12)]
        );

        assert_eq!(queue_length(&db, StationId(9)).await.unwrap(), 0);
        assert_eq!(front(&db, StationId(9)).await.unwrap(), None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn position_ahead_counts_smaller_seqs_only() {
        let (db, _dir) = setup_queue().await;

        assert_eq!(position_ahead(&db, ParticipantId(10)).await.unwrap(), Some(0));
        assert_eq!(position_ahead(&db, ParticipantId(11)).await.unwrap(), Some(1));
        assert_eq!(position_ahead(&db, ParticipantId(12)).await.unwrap(), Some(2));
        assert_eq!(position_ahead(&db, ParticipantId(99)).await.unwrap(), None);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mid_queue_removal_shifts_positions_without_renumbering() {
        let (db, _dir) = setup_queue().await;
        admission::leave(&db, ParticipantId(11)).await.unwrap();

        // Front is unchanged, the entry behind the gap moves up one, and
        // sequence numbers themselves are untouched.
        assert_eq!(front(&db, StationId(1)).await.unwrap(), Some(ParticipantId(10)));
        assert_eq!(position_ahead(&db, ParticipantId(12)).await.unwrap(), Some(1));

        let seqs: Vec<i64> = entries_in_order(&db, StationId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.seq)
            .collect();
        assert_eq!(seqs, vec![1, 3]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn leave_is_immediately_visible() {
        let (db, _dir) = setup_queue().await;
        admission::leave(&db, ParticipantId(10)).await.unwrap();
        assert_eq!(position_ahead(&db, ParticipantId(10)).await.unwrap(), None);
        assert_eq!(front(&db, StationId(1)).await.unwrap(), Some(ParticipantId(11)));
        db.close().await.unwrap();
    }
}
