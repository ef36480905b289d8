// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `waitline status` command implementation.

use waitline_core::WaitlineError;
use waitline_engine::QueueEngine;

/// Print per-station occupancy, remaining slots, and the global wait
/// time estimate.
pub async fn run_status(engine: &QueueEngine, json: bool) -> Result<(), WaitlineError> {
    let overview = engine.station_overview().await?;
    let wait_minutes = engine.wait_time_estimate().await?;

    if json {
        let body = serde_json::json!({
            "wait_time_minutes": wait_minutes,
            "stations": overview,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        return Ok(());
    }

    println!("wait time estimate: {wait_minutes} minutes");
    if overview.is_empty() {
        println!("no stations registered");
        return Ok(());
    }
    for station in overview {
        let slots = match station.slots_available {
            Some(n) => n.to_string(),
            None => "unbounded".to_string(),
        };
        println!(
            "{:<4} {:<24} queued {:<4} slots {}",
            station.station_id, station.name, station.queue_length, slots
        );
    }
    Ok(())
}
