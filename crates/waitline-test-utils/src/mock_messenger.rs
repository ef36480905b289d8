// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messenger collaborator for deterministic testing.
//!
//! `MockMessenger` implements `Messenger` with injectable display names
//! and captured notifications/deregistrations for assertion in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use waitline_core::types::ParticipantId;
use waitline_core::{Messenger, WaitlineError};

/// A mock front-end messenger for testing.
///
/// Display names default to `participant-<id>` unless injected via
/// `set_display_name()`. Everything sent through `notify()` and
/// `deregister_pending_reply()` is captured for assertions.
#[derive(Default)]
pub struct MockMessenger {
    names: Mutex<HashMap<i64, String>>,
    notifications: Mutex<Vec<(ParticipantId, String)>>,
    deregistered: Mutex<Vec<i64>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a display name for a participant.
    pub async fn set_display_name(&self, participant_id: ParticipantId, name: &str) {
        self.names
            .lock()
            .await
            .insert(participant_id.0, name.to_string());
    }

    /// All notifications delivered through `notify()`.
    pub async fn notifications(&self) -> Vec<(ParticipantId, String)> {
        self.notifications.lock().await.clone()
    }

    /// All listener ids passed to `deregister_pending_reply()`.
    pub async fn deregistered(&self) -> Vec<i64> {
        self.deregistered.lock().await.clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn resolve_display_name(
        &self,
        participant_id: ParticipantId,
    ) -> Result<String, WaitlineError> {
        Ok(self
            .names
            .lock()
            .await
            .get(&participant_id.0)
            .cloned()
            .unwrap_or_else(|| format!("participant-{participant_id}")))
    }

    async fn notify(
        &self,
        participant_id: ParticipantId,
        text: &str,
    ) -> Result<(), WaitlineError> {
        self.notifications
            .lock()
            .await
            .push((participant_id, text.to_string()));
        Ok(())
    }

    async fn deregister_pending_reply(&self, listener_id: i64) -> Result<(), WaitlineError> {
        self.deregistered.lock().await.push(listener_id);
        Ok(())
    }
}
