// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master variable store: global key -> string settings.
//!
//! Keys are seeded at bootstrap and mutated by admin commands; rows are
//! never deleted.

use rusqlite::params;
use waitline_core::WaitlineError;

use crate::database::{map_tr_err, Database};

/// Get a master variable.
///
/// Zero rows is `SettingNotFound`. More than one row is `AmbiguousKey`;
/// the schema's primary key makes that unreachable here, but the check is
/// kept so a store without the constraint still reports it.
pub async fn get_variable(db: &Database, key: &str) -> Result<String, WaitlineError> {
    let key_owned = key.to_string();
    let values: Vec<String> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM variables WHERE key = ?1 LIMIT 2")?;
            let rows = stmt.query_map(params![key_owned], |row| row.get(0))?;
            let mut values = Vec::new();
            for row in rows {
                values.push(row?);
            }
            Ok(values)
        })
        .await
        .map_err(map_tr_err)?;

    match values.len() {
        0 => Err(WaitlineError::SettingNotFound {
            key: key.to_string(),
        }),
        1 => Ok(values.into_iter().next().unwrap_or_default()),
        _ => Err(WaitlineError::AmbiguousKey {
            key: key.to_string(),
        }),
    }
}

/// Set (upsert) a master variable.
pub async fn set_variable(db: &Database, key: &str, value: &str) -> Result<(), WaitlineError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO variables (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Seed default variables at bootstrap, leaving existing values untouched.
pub async fn seed_defaults(
    db: &Database,
    defaults: &[(&str, String)],
) -> Result<(), WaitlineError> {
    let defaults: Vec<(String, String)> = defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    db.connection()
        .call(move |conn| {
            for (key, value) in &defaults {
                conn.execute(
                    "INSERT OR IGNORE INTO variables (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )?;
            }
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("settings.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn set_then_get_round_trip() {
        let (db, _dir) = setup_db().await;
        set_variable(&db, "wait_time", "15").await.unwrap();
        assert_eq!(get_variable(&db, "wait_time").await.unwrap(), "15");

        // Overwrite wins.
        set_variable(&db, "wait_time", "20").await.unwrap();
        assert_eq!(get_variable(&db, "wait_time").await.unwrap(), "20");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let (db, _dir) = setup_db().await;
        let err = get_variable(&db, "no_such_key").await.unwrap_err();
        assert!(matches!(err, WaitlineError::SettingNotFound { .. }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn seeding_does_not_overwrite_existing_values() {
        let (db, _dir) = setup_db().await;
        set_variable(&db, "wait_time", "30").await.unwrap();
        seed_defaults(
            &db,
            &[("wait_time", "5".to_string()), ("max_length", "10".to_string())],
        )
        .await
        .unwrap();

        assert_eq!(get_variable(&db, "wait_time").await.unwrap(), "30");
        assert_eq!(get_variable(&db, "max_length").await.unwrap(), "10");
        db.close().await.unwrap();
    }
}
