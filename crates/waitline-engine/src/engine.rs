// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The queue engine: admission, status, policy, and auxiliary store
//! operations composed over the storage layer.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use waitline_config::model::{AuthConfig, MessageConfig, PolicyConfig, WaitlineConfig};
use waitline_core::types::{
    ChatId, FrontStatus, GroupId, LeaveOutcome, ParticipantId, Station, StationId, StationSlots,
};
use waitline_core::{Messenger, WaitlineError};
use waitline_storage::queries::{admission, cache, settings, stations, status};
use waitline_storage::Database;

/// Master variable key for the global wait-time estimate, in minutes.
pub const WAIT_TIME_KEY: &str = "wait_time";
/// Master variable key for the global fallback queue length limit.
pub const MAX_LENGTH_KEY: &str = "max_length";

/// The queue admission & position engine.
///
/// One instance is shared across all concurrent front-end interactions.
/// All mutations go through single-transaction storage operations, with
/// bounded retry on storage conflicts.
pub struct QueueEngine {
    db: Database,
    policy: PolicyConfig,
    auth: AuthConfig,
    messages: MessageConfig,
    messenger: Arc<dyn Messenger>,
}

impl QueueEngine {
    /// Open the database named by the configuration, seed master variable
    /// defaults, and build the engine.
    pub async fn open(
        config: &WaitlineConfig,
        messenger: Arc<dyn Messenger>,
    ) -> Result<Self, WaitlineError> {
        let db =
            Database::open_with_wal(&config.storage.database_path, config.storage.wal_mode).await?;
        Self::from_database(db, config, messenger).await
    }

    /// Build the engine over an already-open database. Used by tests and
    /// operator tooling that manage the database lifecycle themselves.
    pub async fn from_database(
        db: Database,
        config: &WaitlineConfig,
        messenger: Arc<dyn Messenger>,
    ) -> Result<Self, WaitlineError> {
        let mut defaults = vec![(
            WAIT_TIME_KEY,
            config.policy.default_wait_time_minutes.to_string(),
        )];
        if let Some(max) = config.policy.default_max_queue_length {
            defaults.push((MAX_LENGTH_KEY, max.to_string()));
        }
        settings::seed_defaults(&db, &defaults).await?;

        Ok(Self {
            db,
            policy: config.policy.clone(),
            auth: config.auth.clone(),
            messages: config.messages.clone(),
            messenger,
        })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The configured retention window, in hours.
    pub fn retention_hours(&self) -> u32 {
        self.policy.retention_hours
    }

    /// Run an operation, retrying on storage conflicts up to the
    /// configured budget with doubling backoff. Benign business outcomes
    /// pass straight through; exhausted or non-retryable infrastructure
    /// failures are logged with operation context.
    async fn with_retry<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, WaitlineError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WaitlineError>>,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Err(err) if err.is_retryable() && attempt < self.policy.retry_budget => {
                    attempt += 1;
                    warn!(operation, attempt, "storage conflict, retrying");
                    tokio::time::sleep(Duration::from_millis(25 << attempt)).await;
                }
                Err(err) if !err.is_benign() => {
                    error!(operation, error = %err, "operation failed");
                    return Err(err);
                }
                other => return other,
            }
        }
    }

    // --- Admission ---

    /// Admit a participant to a station's queue; returns the assigned
    /// sequence number.
    pub async fn enqueue(
        &self,
        participant_id: ParticipantId,
        station_id: StationId,
    ) -> Result<i64, WaitlineError> {
        let seq = self
            .with_retry("enqueue", || {
                admission::enqueue(&self.db, participant_id, station_id)
            })
            .await?;
        debug!(%participant_id, %station_id, seq, "admitted");
        Ok(seq)
    }

    /// Remove a participant from whatever queue they occupy. Leaving
    /// while not queued is the benign `NotQueued` outcome.
    pub async fn leave(&self, participant_id: ParticipantId) -> Result<LeaveOutcome, WaitlineError> {
        let outcome = self
            .with_retry("leave", || admission::leave(&self.db, participant_id))
            .await?;
        if outcome == LeaveOutcome::Removed {
            debug!(%participant_id, "left queue");
        }
        Ok(outcome)
    }

    // --- Status queries ---

    /// The station a participant currently occupies, if any.
    pub async fn current_station(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Option<StationId>, WaitlineError> {
        let record = admission::participant_record(&self.db, participant_id).await?;
        Ok(record.station_id)
    }

    /// Number of active entries in a station's queue.
    pub async fn queue_length(&self, station_id: StationId) -> Result<u32, WaitlineError> {
        self.require_station(station_id).await?;
        status::queue_length(&self.db, station_id).await
    }

    /// Count of entries ahead of the participant; `None` when not queued,
    /// `Some(0)` exactly when they are at the front.
    pub async fn position_ahead(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Option<u32>, WaitlineError> {
        status::position_ahead(&self.db, participant_id).await
    }

    /// The participant at the front of a station's queue.
    pub async fn front(
        &self,
        station_id: StationId,
    ) -> Result<Option<ParticipantId>, WaitlineError> {
        self.require_station(station_id).await?;
        status::front(&self.db, station_id).await
    }

    /// Every station's queue as `(station name, display names in queue
    /// order)`, iterating the registry in name order.
    pub async fn all_participants(&self) -> Result<Vec<(String, Vec<String>)>, WaitlineError> {
        let mut result = Vec::new();
        for station in stations::list_stations(&self.db).await? {
            let ids = status::participants_in_order(&self.db, station.id).await?;
            let mut handles = Vec::with_capacity(ids.len());
            for id in ids {
                handles.push(self.messenger.resolve_display_name(id).await?);
            }
            result.push((station.name, handles));
        }
        Ok(result)
    }

    /// Remaining capacity of a station; `None` when unbounded.
    pub async fn capacity_remaining(
        &self,
        station_id: StationId,
    ) -> Result<Option<u32>, WaitlineError> {
        let station = self.require_station(station_id).await?;
        let Some(capacity) = self.effective_capacity(&station).await? else {
            return Ok(None);
        };
        let length = status::queue_length(&self.db, station_id).await?;
        Ok(Some(capacity.saturating_sub(length)))
    }

    /// Per-station occupancy overview in registry (name) order.
    pub async fn station_overview(&self) -> Result<Vec<StationSlots>, WaitlineError> {
        let mut overview = Vec::new();
        for station in stations::list_stations(&self.db).await? {
            let length = status::queue_length(&self.db, station.id).await?;
            let slots = self
                .effective_capacity(&station)
                .await?
                .map(|capacity| capacity.saturating_sub(length));
            overview.push(StationSlots {
                station_id: station.id,
                name: station.name,
                queue_length: length,
                slots_available: slots,
            });
        }
        Ok(overview)
    }

    /// A station's capacity, falling back to the global `max_length`
    /// master variable; `None` means unbounded.
    async fn effective_capacity(&self, station: &Station) -> Result<Option<u32>, WaitlineError> {
        if station.capacity.is_some() {
            return Ok(station.capacity);
        }
        match settings::get_variable(&self.db, MAX_LENGTH_KEY).await {
            Ok(value) => Ok(value.parse::<u32>().ok()),
            Err(WaitlineError::SettingNotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn require_station(&self, station_id: StationId) -> Result<Station, WaitlineError> {
        stations::get_station(&self.db, station_id)
            .await?
            .ok_or(WaitlineError::StationNotFound {
                station_id: station_id.0,
            })
    }

    // --- Registry ---

    /// Register a station. Administrative bootstrap only.
    pub async fn create_station(&self, station: &Station) -> Result<(), WaitlineError> {
        stations::create_station(&self.db, station).await
    }

    /// Get a station by id.
    pub async fn station(&self, station_id: StationId) -> Result<Station, WaitlineError> {
        self.require_station(station_id).await
    }

    /// All stations ordered by display name.
    pub async fn stations(&self) -> Result<Vec<Station>, WaitlineError> {
        stations::list_stations(&self.db).await
    }

    /// The station a controlling group administers, if any. Fails closed
    /// with `AmbiguousGroup` when the mapping is not unique.
    pub async fn station_by_group(
        &self,
        group_id: GroupId,
    ) -> Result<Option<Station>, WaitlineError> {
        stations::station_by_group(&self.db, group_id).await
    }

    // --- Policy setters (front end gates these behind is_admin) ---

    /// Set a station's capacity.
    pub async fn set_capacity(
        &self,
        station_id: StationId,
        capacity: NonZeroU32,
    ) -> Result<(), WaitlineError> {
        stations::set_capacity(&self.db, station_id, capacity.get()).await
    }

    /// Set a station's per-person service time, in minutes.
    pub async fn set_service_time(
        &self,
        station_id: StationId,
        minutes: NonZeroU32,
    ) -> Result<(), WaitlineError> {
        stations::set_service_time(&self.db, station_id, minutes.get()).await
    }

    /// Set the global wait-time estimate, in minutes.
    pub async fn set_wait_time_estimate(&self, minutes: NonZeroU32) -> Result<(), WaitlineError> {
        settings::set_variable(&self.db, WAIT_TIME_KEY, &minutes.to_string()).await
    }

    /// Set the global fallback queue length limit.
    pub async fn set_max_queue_length(&self, length: NonZeroU32) -> Result<(), WaitlineError> {
        settings::set_variable(&self.db, MAX_LENGTH_KEY, &length.to_string()).await
    }

    /// The global wait-time estimate, in minutes.
    ///
    /// A single shared policy value, not derived from position and
    /// per-person service time.
    pub async fn wait_time_estimate(&self) -> Result<u32, WaitlineError> {
        let raw = settings::get_variable(&self.db, WAIT_TIME_KEY).await?;
        raw.parse::<u32>().map_err(|_| {
            WaitlineError::Internal(format!("master variable {WAIT_TIME_KEY} is not a number: {raw}"))
        })
    }

    /// The wait-time estimate rendered through the configured template.
    pub async fn wait_time_message(&self) -> Result<String, WaitlineError> {
        let minutes = self.wait_time_estimate().await?;
        Ok(render_minutes(&self.messages.wait_time_template, minutes))
    }

    // --- Authorization (static membership, no elevation logic) ---

    pub fn is_superuser(&self, id: i64) -> bool {
        self.auth.superusers.contains(&id)
    }

    pub fn is_admin(&self, id: i64) -> bool {
        self.auth.admins.contains(&id) || self.is_superuser(id)
    }

    // --- Front-of-queue ---

    /// Front-of-queue status for the station a controlling group
    /// administers, with the display name resolved through the messenger.
    /// `None` when the group controls no station.
    pub async fn front_status_for_group(
        &self,
        group_id: GroupId,
    ) -> Result<Option<FrontStatus>, WaitlineError> {
        let Some(station) = self.station_by_group(group_id).await? else {
            return Ok(None);
        };
        let status = match status::front(&self.db, station.id).await? {
            None => FrontStatus::Empty,
            Some(participant_id) => FrontStatus::Occupied {
                participant_id,
                display_name: self.messenger.resolve_display_name(participant_id).await?,
            },
        };
        Ok(Some(status))
    }

    /// Notify the participant at the front of a station with its
    /// configured front-of-queue template. Returns false when the queue
    /// is empty. This template is the only user-facing text the engine
    /// sends itself.
    pub async fn notify_front(&self, station_id: StationId) -> Result<bool, WaitlineError> {
        let station = self.require_station(station_id).await?;
        let Some(participant_id) = status::front(&self.db, station_id).await? else {
            return Ok(false);
        };
        let text = station
            .front_message
            .unwrap_or_else(|| self.messages.front_message.clone());
        self.messenger.notify(participant_id, &text).await?;
        Ok(true)
    }

    // --- Expiring auxiliary store ---

    /// Store a conversational continuation payload under a key.
    pub async fn store_data(
        &self,
        key: &str,
        data: &serde_json::Value,
    ) -> Result<(), WaitlineError> {
        cache::put_data(&self.db, key, data).await
    }

    /// Replace a stored payload; false when the key does not exist.
    pub async fn update_data(
        &self,
        key: &str,
        data: &serde_json::Value,
    ) -> Result<bool, WaitlineError> {
        cache::update_data(&self.db, key, data).await
    }

    /// Fetch a stored payload.
    pub async fn get_data(&self, key: &str) -> Result<Option<serde_json::Value>, WaitlineError> {
        cache::get_data(&self.db, key).await
    }

    /// Register a pending reply listener for a chat.
    pub async fn store_listener_id(
        &self,
        chat_id: ChatId,
        listener_id: i64,
    ) -> Result<(), WaitlineError> {
        cache::append_listener(&self.db, chat_id, listener_id).await
    }

    /// Drain a chat's pending listeners and deregister each with the
    /// messenger. The list is cleared atomically before deregistration,
    /// so a failed callback can not cause a replay; failures are logged
    /// and skipped. Returns the number of ids drained.
    pub async fn drain_pending_listeners(&self, chat_id: ChatId) -> Result<usize, WaitlineError> {
        let ids = cache::drain_listeners(&self.db, chat_id).await?;
        let drained = ids.len();
        for listener_id in ids {
            if let Err(err) = self.messenger.deregister_pending_reply(listener_id).await {
                warn!(%chat_id, listener_id, error = %err, "listener deregistration failed");
            }
        }
        Ok(drained)
    }
}

/// Render a `{minutes}` template.
pub(crate) fn render_minutes(template: &str, minutes: u32) -> String {
    template.replace("{minutes}", &minutes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_template_renders_in_place() {
        assert_eq!(
            render_minutes("Estimated wait time: {minutes} minutes", 15),
            "Estimated wait time: 15 minutes"
        );
        assert_eq!(render_minutes("no placeholder", 15), "no placeholder");
    }
}
