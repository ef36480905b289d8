// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.

pub mod messenger;

pub use messenger::Messenger;
