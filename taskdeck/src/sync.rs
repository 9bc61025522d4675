//! Synchronization worker wiring the TUI to the remote task store.
//!
//! This module bridges the synchronous TUI event loop (crossterm poll-based)
//! with the async [`StoreClient`]. It spawns background tokio tasks and
//! communicates with the main thread via [`SyncCommand`] / [`SyncEvent`]
//! channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── SyncEvent ───  tokio background tasks
//!                     ─── SyncCommand →
//! ```
//!
//! Each command runs in its own spawned task: requests are never cancelled
//! or reordered once issued, and responses are applied to local state in
//! whatever order they complete. The only sequencing guard is the Load
//! sequence number, which the app uses to discard stale list snapshots.

use std::time::Duration;

use tokio::sync::mpsc;

use taskdeck_proto::{Task, TaskId};

use crate::client::{StoreClient, StoreError};

/// Commands sent from the TUI main loop to the sync background tasks.
#[derive(Debug)]
pub enum SyncCommand {
    /// Fetch the full task list from the store.
    Load {
        /// Monotonic sequence number minted by the app.
        seq: u64,
    },
    /// Create a task with the given raw (untrimmed) title.
    Create {
        /// Title exactly as the user typed it.
        title: String,
    },
    /// Replace the title of the task with the given id.
    Update {
        /// Target task id.
        id: TaskId,
        /// Replacement title.
        title: String,
    },
    /// Delete the task with the given id.
    Delete {
        /// Target task id.
        id: TaskId,
    },
    /// Gracefully shut down the sync tasks.
    Shutdown,
}

/// Which store operation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    /// Full list fetch.
    Load,
    /// Task creation.
    Create,
    /// Title update.
    Update,
    /// Task deletion.
    Delete,
}

impl std::fmt::Display for SyncOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Events sent from the sync background tasks to the TUI main loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// A full list snapshot arrived from the store.
    Loaded {
        /// Sequence number of the Load this answers.
        seq: u64,
        /// The store's task list, in store order.
        tasks: Vec<Task>,
    },
    /// The store created a task and returned the authoritative record.
    Created {
        /// The created task with store-assigned id and timestamp.
        task: Task,
    },
    /// The store accepted a title update.
    Updated {
        /// The updated task's id.
        id: TaskId,
        /// The title that was sent (the response body is ignored).
        title: String,
    },
    /// The store deleted a task.
    Deleted {
        /// The deleted task's id.
        id: TaskId,
    },
    /// A store request failed; local state must be left unchanged.
    Failed {
        /// Which operation failed.
        op: SyncOp,
        /// Human-readable failure description.
        message: String,
    },
}

/// Configuration for the sync worker.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the task store (e.g., `http://127.0.0.1:7070`).
    pub store_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

impl SyncConfig {
    /// Creates a `SyncConfig` with default timeouts and channel capacity.
    #[must_use]
    pub const fn new(store_url: String) -> Self {
        Self {
            store_url,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the sync background tasks and return channel handles.
///
/// Builds a [`StoreClient`] for the configured store and spawns a command
/// handler that dispatches each [`SyncCommand`] in its own task, so a slow
/// request never blocks later ones.
///
/// # Errors
///
/// Returns [`StoreError`] if the store URL is invalid or the HTTP client
/// cannot be built. No connection is attempted up front; an unreachable
/// store surfaces as [`SyncEvent::Failed`] on the first command.
pub fn spawn_sync(
    config: &SyncConfig,
) -> Result<(mpsc::Sender<SyncCommand>, mpsc::Receiver<SyncEvent>), StoreError> {
    let client = StoreClient::new(
        &config.store_url,
        config.request_timeout,
        config.connect_timeout,
    )?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<SyncCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<SyncEvent>(config.channel_capacity);

    tokio::spawn(command_handler(client, cmd_rx, evt_tx));

    Ok((cmd_tx, evt_rx))
}

/// Background task: dispatch commands from the TUI main loop.
///
/// Each command gets its own spawned task; in-flight requests of any kind
/// may overlap and complete out of order.
async fn command_handler(
    client: StoreClient,
    mut cmd_rx: mpsc::Receiver<SyncCommand>,
    evt_tx: mpsc::Sender<SyncEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, SyncCommand::Shutdown) {
            tracing::info!("sync command handler shutting down");
            break;
        }
        let client = client.clone();
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            run_command(&client, &evt_tx, cmd).await;
        });
    }
}

/// Executes a single store request and reports the outcome as a `SyncEvent`.
async fn run_command(client: &StoreClient, evt_tx: &mpsc::Sender<SyncEvent>, cmd: SyncCommand) {
    let event = match cmd {
        SyncCommand::Load { seq } => match client.list_tasks().await {
            Ok(tasks) => SyncEvent::Loaded { seq, tasks },
            Err(e) => failed(SyncOp::Load, &e),
        },
        SyncCommand::Create { title } => match client.create_task(&title).await {
            Ok(task) => SyncEvent::Created { task },
            Err(e) => failed(SyncOp::Create, &e),
        },
        SyncCommand::Update { id, title } => match client.update_task(&id, &title).await {
            Ok(()) => SyncEvent::Updated { id, title },
            Err(e) => failed(SyncOp::Update, &e),
        },
        SyncCommand::Delete { id } => match client.delete_task(&id).await {
            Ok(()) => SyncEvent::Deleted { id },
            Err(e) => failed(SyncOp::Delete, &e),
        },
        SyncCommand::Shutdown => return,
    };

    // TUI dropped; nothing left to notify.
    let _ = evt_tx.send(event).await;
}

/// Logs a failed store request and builds the matching event.
fn failed(op: SyncOp, err: &StoreError) -> SyncEvent {
    tracing::warn!(op = %op, error = %err, "store request failed");
    SyncEvent::Failed {
        op,
        message: err.to_string(),
    }
}
