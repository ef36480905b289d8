// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue admission and position engine.
//!
//! [`QueueEngine`] is the operation surface consumed by the conversational
//! front end: admission and removal, position and status queries, policy
//! setters, and the expiring auxiliary store. Messaging and identity
//! resolution stay behind the injected [`waitline_core::Messenger`].

pub mod engine;
pub mod sweep;

pub use engine::QueueEngine;
pub use sweep::{spawn_retention_sweeper, SweepReport};
