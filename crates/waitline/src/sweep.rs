// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `waitline sweep` command implementation.

use waitline_core::WaitlineError;
use waitline_engine::QueueEngine;

/// Run one retention sweep and report what was removed.
pub async fn run_sweep(engine: &QueueEngine) -> Result<(), WaitlineError> {
    let report = engine.sweep_expired().await?;
    println!(
        "swept {} rows (entries {}, cache {}, listeners {})",
        report.total(),
        report.entries,
        report.cache,
        report.listeners
    );
    Ok(())
}
