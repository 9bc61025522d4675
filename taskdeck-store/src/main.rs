//! `TaskDeck` task store -- in-memory HTTP system of record for tasks.
//!
//! An axum server exposing list/create/update/delete over `/tasks`. Tasks
//! live in memory only; ids and creation timestamps are assigned here, never
//! by clients.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:7070
//! cargo run --bin taskdeck-store
//!
//! # Run on custom address
//! cargo run --bin taskdeck-store -- --bind 127.0.0.1:8080
//!
//! # Or via environment variable
//! TASKDECK_STORE_ADDR=127.0.0.1:8080 cargo run --bin taskdeck-store
//! ```

use std::sync::Arc;

use clap::Parser;
use taskdeck_store::config::{StoreCliArgs, StoreConfig};
use taskdeck_store::server::{self, StoreState};
use taskdeck_store::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = StoreCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match StoreConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskdeck task store");

    let tasks = TaskStore::with_max_tasks(config.max_tasks);
    let state = Arc::new(StoreState::with_config(config.max_title_len, tasks));

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "task store listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "task store server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start task store");
            std::process::exit(1);
        }
    }
}
