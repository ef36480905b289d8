// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retention sweeping for the expiring tables.
//!
//! Queue entries, cache payloads, and pending listener ids all expire
//! after the configured retention window (48 hours by default).

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use waitline_core::types::ExpiryTable;
use waitline_core::WaitlineError;
use waitline_storage::queries::cache;

use crate::engine::QueueEngine;

/// Rows removed by one retention sweep, per logical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub entries: usize,
    pub cache: usize,
    pub listeners: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.entries + self.cache + self.listeners
    }
}

impl QueueEngine {
    /// Run one retention sweep across all expiring tables, using the
    /// configured retention window.
    pub async fn sweep_expired(&self) -> Result<SweepReport, WaitlineError> {
        let retention_hours = self.retention_hours();
        let db = self.database();
        let report = SweepReport {
            entries: cache::sweep_expired(db, ExpiryTable::Entries, retention_hours).await?,
            cache: cache::sweep_expired(db, ExpiryTable::Cache, retention_hours).await?,
            listeners: cache::sweep_expired(db, ExpiryTable::Listeners, retention_hours).await?,
        };
        if report.total() > 0 {
            info!(
                entries = report.entries,
                cache = report.cache,
                listeners = report.listeners,
                "retention sweep removed stale rows"
            );
        }
        Ok(report)
    }
}

/// Spawn a background task sweeping at the given cadence. Sweep failures
/// are logged and the loop continues.
pub fn spawn_retention_sweeper(engine: Arc<QueueEngine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a freshly started
        // service does not sweep during startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = engine.sweep_expired().await {
                warn!(error = %err, "retention sweep failed");
            }
        }
    })
}
