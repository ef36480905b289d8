// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! waitline - operator CLI for the queue admission engine.
//!
//! The conversational front end talks to the engine in-process; this
//! binary is for operators inspecting or maintaining the same database.

mod status;
mod sweep;

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use waitline_core::types::ParticipantId;
use waitline_core::{Messenger, WaitlineError};
use waitline_engine::QueueEngine;

/// waitline - queue admission engine operator tools.
#[derive(Parser, Debug)]
#[command(name = "waitline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show per-station occupancy and remaining slots.
    Status {
        /// Output structured JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run one retention sweep over the expiring tables.
    Sweep,
}

/// Messenger used when no front end is attached. Display names fall back
/// to the raw id; notifications have nowhere to go and are rejected.
struct DetachedMessenger;

#[async_trait]
impl Messenger for DetachedMessenger {
    async fn resolve_display_name(
        &self,
        participant_id: ParticipantId,
    ) -> Result<String, WaitlineError> {
        Ok(participant_id.to_string())
    }

    async fn notify(&self, _: ParticipantId, _: &str) -> Result<(), WaitlineError> {
        Err(WaitlineError::Internal(
            "no front end attached; cannot deliver notifications".to_string(),
        ))
    }

    async fn deregister_pending_reply(&self, _: i64) -> Result<(), WaitlineError> {
        Err(WaitlineError::Internal(
            "no front end attached; cannot deregister listeners".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match waitline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            waitline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let engine = match QueueEngine::open(&config, Arc::new(DetachedMessenger)).await {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("waitline: {err}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Status { json } => status::run_status(&engine, json).await,
        Commands::Sweep => sweep::run_sweep(&engine).await,
    };

    if let Err(err) = result {
        eprintln!("waitline: {err}");
        std::process::exit(1);
    }
}
