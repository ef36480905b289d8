// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for waitline integration tests.

pub mod harness;
pub mod mock_messenger;

pub use harness::EngineHarness;
pub use mock_messenger::MockMessenger;
