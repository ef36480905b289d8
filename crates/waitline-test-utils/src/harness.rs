// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine harness: a throwaway database, a mock messenger, and a ready
//! engine for integration tests.

use std::sync::Arc;

use waitline_config::model::WaitlineConfig;
use waitline_core::types::{GroupId, Station, StationId};
use waitline_core::WaitlineError;
use waitline_engine::QueueEngine;
use waitline_storage::Database;

use crate::mock_messenger::MockMessenger;

/// A ready-to-use engine over a temporary database.
///
/// The temp directory lives as long as the harness; dropping the harness
/// deletes the database file.
pub struct EngineHarness {
    pub engine: QueueEngine,
    pub messenger: Arc<MockMessenger>,
    _dir: tempfile::TempDir,
}

impl EngineHarness {
    /// Build a harness with default configuration.
    pub async fn new() -> Result<Self, WaitlineError> {
        Self::with_config(WaitlineConfig::default()).await
    }

    /// Build a harness with explicit configuration (the storage path is
    /// always overridden to the temp directory).
    pub async fn with_config(config: WaitlineConfig) -> Result<Self, WaitlineError> {
        let dir = tempfile::tempdir().map_err(|e| WaitlineError::Storage {
            source: Box::new(e),
        })?;
        let db_path = dir.path().join("waitline-test.db");
        let db = Database::open(db_path.to_str().unwrap_or_default()).await?;

        let messenger = Arc::new(MockMessenger::new());
        let engine = QueueEngine::from_database(db, &config, messenger.clone()).await?;
        Ok(Self {
            engine,
            messenger,
            _dir: dir,
        })
    }

    /// Register a plain station: unbounded, five-minute service time,
    /// no custom front message.
    pub async fn add_station(&self, id: i64, name: &str, group: i64) -> Result<(), WaitlineError> {
        self.engine
            .create_station(&Station {
                id: StationId(id),
                name: name.to_string(),
                capacity: None,
                service_minutes: 5,
                front_message: None,
                group_id: GroupId(group),
            })
            .await
    }

    /// Register a station with a capacity limit.
    pub async fn add_bounded_station(
        &self,
        id: i64,
        name: &str,
        group: i64,
        capacity: u32,
    ) -> Result<(), WaitlineError> {
        self.engine
            .create_station(&Station {
                id: StationId(id),
                name: name.to_string(),
                capacity: Some(capacity),
                service_minutes: 5,
                front_message: None,
                group_id: GroupId(group),
            })
            .await
    }
}
