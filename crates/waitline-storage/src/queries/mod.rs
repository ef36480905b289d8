// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the waitline storage entities.

pub mod admission;
pub mod cache;
pub mod settings;
pub mod stations;
pub mod status;
