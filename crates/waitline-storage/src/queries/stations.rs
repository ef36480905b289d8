// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Station registry operations.
//!
//! The registry is administrable but never deletes a station while entries
//! reference it; there is deliberately no delete operation here.

use rusqlite::params;
use waitline_core::types::{GroupId, Station, StationId};
use waitline_core::WaitlineError;

use crate::database::{map_tr_err, Database};

fn station_from_row(row: &rusqlite::Row<'_>) -> Result<Station, rusqlite::Error> {
    Ok(Station {
        id: StationId(row.get(0)?),
        name: row.get(1)?,
        capacity: row.get(2)?,
        service_minutes: row.get(3)?,
        front_message: row.get(4)?,
        group_id: GroupId(row.get(5)?),
    })
}

const STATION_COLUMNS: &str =
    "station_id, name, capacity, service_minutes, front_message, group_id";

/// Create a station with an explicit, stable id.
pub async fn create_station(db: &Database, station: &Station) -> Result<(), WaitlineError> {
    let station = station.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stations (station_id, name, capacity, service_minutes, front_message, group_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    station.id.0,
                    station.name,
                    station.capacity,
                    station.service_minutes,
                    station.front_message,
                    station.group_id.0,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a station by id.
pub async fn get_station(
    db: &Database,
    station_id: StationId,
) -> Result<Option<Station>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STATION_COLUMNS} FROM stations WHERE station_id = ?1"
            ))?;
            let result = stmt.query_row(params![station_id.0], station_from_row);
            match result {
                Ok(station) => Ok(Some(station)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all stations ordered by display name.
pub async fn list_stations(db: &Database) -> Result<Vec<Station>, WaitlineError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STATION_COLUMNS} FROM stations ORDER BY name"
            ))?;
            let rows = stmt.query_map([], station_from_row)?;
            let mut stations = Vec::new();
            for row in rows {
                stations.push(row?);
            }
            Ok(stations)
        })
        .await
        .map_err(map_tr_err)
}

/// Resolve the station controlled by an administrative group.
///
/// Fails closed with `AmbiguousGroup` when the group maps to more than one
/// station; that is corrupted registry data, not a policy to guess around.
pub async fn station_by_group(
    db: &Database,
    group_id: GroupId,
) -> Result<Option<Station>, WaitlineError> {
    let matches: Vec<Station> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {STATION_COLUMNS} FROM stations WHERE group_id = ?1 LIMIT 2"
            ))?;
            let rows = stmt.query_map(params![group_id.0], station_from_row)?;
            let mut stations = Vec::new();
            for row in rows {
                stations.push(row?);
            }
            Ok(stations)
        })
        .await
        .map_err(map_tr_err)?;

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.into_iter().next()),
        _ => Err(WaitlineError::AmbiguousGroup {
            group_id: group_id.0,
        }),
    }
}

/// Set a station's capacity. The caller validates positivity.
pub async fn set_capacity(
    db: &Database,
    station_id: StationId,
    capacity: u32,
) -> Result<(), WaitlineError> {
    let updated = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE stations SET capacity = ?2 WHERE station_id = ?1",
                params![station_id.0, capacity],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(WaitlineError::StationNotFound {
            station_id: station_id.0,
        });
    }
    Ok(())
}

/// Set a station's per-person service time estimate, in minutes.
pub async fn set_service_time(
    db: &Database,
    station_id: StationId,
    minutes: u32,
) -> Result<(), WaitlineError> {
    let updated = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE stations SET service_minutes = ?2 WHERE station_id = ?1",
                params![station_id.0, minutes],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(WaitlineError::StationNotFound {
            station_id: station_id.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_station(id: i64, name: &str, group: i64) -> Station {
        Station {
            id: StationId(id),
            name: name.to_string(),
            capacity: None,
            service_minutes: 5,
            front_message: None,
            group_id: GroupId(group),
        }
    }

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("stations.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let (db, _dir) = setup_db().await;
        let station = Station {
            capacity: Some(4),
            front_message: Some("front desk is ready for you".to_string()),
            ..sample_station(1, "Registration", 900)
        };
        create_station(&db, &station).await.unwrap();

        let fetched = get_station(&db, StationId(1)).await.unwrap().unwrap();
        assert_eq!(fetched, station);

        assert!(get_station(&db, StationId(99)).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let (db, _dir) = setup_db().await;
        create_station(&db, &sample_station(1, "Zeta", 1)).await.unwrap();
        create_station(&db, &sample_station(2, "Alpha", 2)).await.unwrap();
        create_station(&db, &sample_station(3, "Mid", 3)).await.unwrap();

        let names: Vec<String> = list_stations(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn group_lookup_fails_closed_on_duplicates() {
        let (db, _dir) = setup_db().await;
        create_station(&db, &sample_station(1, "A", 500)).await.unwrap();
        create_station(&db, &sample_station(2, "B", 500)).await.unwrap();
        create_station(&db, &sample_station(3, "C", 501)).await.unwrap();

        let unique = station_by_group(&db, GroupId(501)).await.unwrap();
        assert_eq!(unique.unwrap().id, StationId(3));

        assert!(station_by_group(&db, GroupId(999)).await.unwrap().is_none());

        let err = station_by_group(&db, GroupId(500)).await.unwrap_err();
        assert!(matches!(err, WaitlineError::AmbiguousGroup { group_id: 500 }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn setters_update_and_reject_missing_station() {
        let (db, _dir) = setup_db().await;
        create_station(&db, &sample_station(1, "A", 1)).await.unwrap();

        set_capacity(&db, StationId(1), 10).await.unwrap();
        set_service_time(&db, StationId(1), 7).await.unwrap();

        let station = get_station(&db, StationId(1)).await.unwrap().unwrap();
        assert_eq!(station.capacity, Some(10));
        assert_eq!(station.service_minutes, 7);

        let err = set_capacity(&db, StationId(2), 10).await.unwrap_err();
        assert!(matches!(err, WaitlineError::StationNotFound { station_id: 2 }));
        db.close().await.unwrap();
    }
}
