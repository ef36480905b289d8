// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiring auxiliary store: keyed JSON payloads and per-chat pending
//! listener ids.
//!
//! Both tables support conversational continuation in the front end and
//! expire after the configured retention window. Payloads are opaque to
//! the engine.

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use waitline_core::types::{ChatId, ExpiryTable};
use waitline_core::WaitlineError;

use crate::database::{map_tr_err, Database};

/// Store a payload under a key. The key must not already exist.
pub async fn put_data(
    db: &Database,
    key: &str,
    data: &serde_json::Value,
) -> Result<(), WaitlineError> {
    let key = key.to_string();
    let payload = data.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO cache (key, data) VALUES (?1, ?2)",
                params![key, payload],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the payload under an existing key, refreshing its timestamp.
/// Returns false when the key does not exist.
pub async fn update_data(
    db: &Database,
    key: &str,
    data: &serde_json::Value,
) -> Result<bool, WaitlineError> {
    let key = key.to_string();
    let payload = data.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE cache
                 SET data = ?2, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE key = ?1",
                params![key, payload],
            )?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(updated > 0)
}

/// Fetch the payload under a key, if present.
pub async fn get_data(db: &Database, key: &str) -> Result<Option<serde_json::Value>, WaitlineError> {
    let key = key.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let raw = conn
                .query_row(
                    "SELECT data FROM cache WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(raw)
        })
        .await
        .map_err(map_tr_err)?;

    match raw {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| WaitlineError::Storage {
                source: Box::new(e),
            }),
    }
}

/// Append a pending listener id to a chat's list.
pub async fn append_listener(
    db: &Database,
    chat_id: ChatId,
    listener_id: i64,
) -> Result<(), WaitlineError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO listeners (chat_id, listener_id) VALUES (?1, ?2)",
                params![chat_id.0, listener_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Read and remove all pending listener ids for a chat in one transaction.
///
/// The caller deregisters each returned id with the messenger; the list
/// itself is already cleared by the time this returns, so a crashed
/// caller can at worst lose deregistrations, never replay them.
pub async fn drain_listeners(db: &Database, chat_id: ChatId) -> Result<Vec<i64>, WaitlineError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let ids = {
                let mut stmt = tx.prepare(
                    "SELECT listener_id FROM listeners WHERE chat_id = ?1
                     ORDER BY created_at, listener_id",
                )?;
                let rows = stmt.query_map(params![chat_id.0], |row| row.get::<_, i64>(0))?;
                let mut ids = Vec::new();
                for row in rows {
                    ids.push(row?);
                }
                ids
            };
            tx.execute(
                "DELETE FROM listeners WHERE chat_id = ?1",
                params![chat_id.0],
            )?;
            tx.commit()?;
            Ok(ids)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete rows older than the retention window from one logical table.
/// Returns the number of rows removed.
pub async fn sweep_expired(
    db: &Database,
    table: ExpiryTable,
    retention_hours: u32,
) -> Result<usize, WaitlineError> {
    let cutoff = format!("-{retention_hours} hours");
    // Table and column names are fixed per enum variant; only the cutoff
    // is interpolated, and it goes through a bound parameter.
    let statement = match table {
        ExpiryTable::Cache => {
            "DELETE FROM cache WHERE updated_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)"
        }
        ExpiryTable::Listeners => {
            "DELETE FROM listeners WHERE created_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)"
        }
        ExpiryTable::Entries => {
            return crate::queries::admission::expire_stale_entries(db, retention_hours).await;
        }
    };
    db.connection()
        .call(move |conn| {
            let n = conn.execute(statement, params![cutoff])?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("cache.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn put_get_update_lifecycle() {
        let (db, _dir) = setup_db().await;
        let payload = json!({"step": "pick_station", "chosen": null});
        put_data(&db, "msg-42", &payload).await.unwrap();

        assert_eq!(get_data(&db, "msg-42").await.unwrap(), Some(payload));
        assert_eq!(get_data(&db, "msg-404").await.unwrap(), None);

        let updated = json!({"step": "pick_station", "chosen": 3});
        assert!(update_data(&db, "msg-42", &updated).await.unwrap());
        assert_eq!(get_data(&db, "msg-42").await.unwrap(), Some(updated));

        assert!(!update_data(&db, "msg-404", &json!(1)).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn drain_returns_ids_and_clears_the_list() {
        let (db, _dir) = setup_db().await;
        append_listener(&db, ChatId(7), 100).await.unwrap();
        append_listener(&db, ChatId(7), 101).await.unwrap();
        append_listener(&db, ChatId(8), 200).await.unwrap();

        let drained = drain_listeners(&db, ChatId(7)).await.unwrap();
        assert_eq!(drained, vec![100, 101]);

        // A second drain finds nothing; the other chat is untouched.
        assert!(drain_listeners(&db, ChatId(7)).await.unwrap().is_empty());
        assert_eq!(drain_listeners(&db, ChatId(8)).await.unwrap(), vec![200]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sweep_removes_only_rows_past_retention() {
        let (db, _dir) = setup_db().await;
        put_data(&db, "old", &json!(1)).await.unwrap();
        put_data(&db, "fresh", &json!(2)).await.unwrap();

        db.connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE cache
                     SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '-72 hours')
                     WHERE key = 'old'",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let removed = sweep_expired(&db, ExpiryTable::Cache, 48).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(get_data(&db, "old").await.unwrap(), None);
        assert!(get_data(&db, "fresh").await.unwrap().is_some());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn listener_sweep_uses_created_at() {
        let (db, _dir) = setup_db().await;
        append_listener(&db, ChatId(7), 100).await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE listeners
                     SET created_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '-72 hours')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let removed = sweep_expired(&db, ExpiryTable::Listeners, 48).await.unwrap();
        assert_eq!(removed, 1);
        db.close().await.unwrap();
    }
}
