// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger collaborator trait for the conversational front end.
//!
//! The engine never owns a module-level messaging handle; implementations
//! are injected through the engine constructor so tests can substitute a
//! capture double.

use async_trait::async_trait;

use crate::error::WaitlineError;
use crate::types::ParticipantId;

/// Identity and delivery services provided by the front end.
///
/// The engine only calls out through this trait: resolving display names
/// for status text, delivering fixed configured notification templates,
/// and deregistering pending reply listeners drained from the auxiliary
/// store. Message parsing and command routing stay on the other side.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Resolve a participant id to a user-facing display name.
    async fn resolve_display_name(
        &self,
        participant_id: ParticipantId,
    ) -> Result<String, WaitlineError>;

    /// Deliver a text notification to a participant.
    async fn notify(
        &self,
        participant_id: ParticipantId,
        text: &str,
    ) -> Result<(), WaitlineError>;

    /// Cancel a pending reply listener previously registered by the front
    /// end. Called once per id drained from the listener store.
    async fn deregister_pending_reply(&self, listener_id: i64) -> Result<(), WaitlineError>;
}
