//! `TaskDeck` — terminal task manager backed by a remote store.
//!
//! Launches the TUI and synchronizes the task list with a remote HTTP task
//! store. Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Talk to a store on the default address
//! cargo run --bin taskdeck
//!
//! # Point at a different store
//! cargo run --bin taskdeck -- --store-url http://127.0.0.1:8080
//!
//! # Or via environment variable
//! TASKDECK_STORE_URL=http://127.0.0.1:8080 cargo run --bin taskdeck
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::sync::{self, SyncCommand, SyncEvent};
use taskdeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(store = %config.store_url, "taskdeck starting");

    // Spawn the sync worker before taking over the terminal, so a bad store
    // URL fails with a plain error message.
    let (cmd_tx, evt_rx) = match sync::spawn_sync(&config.to_sync_config()) {
        Ok(channels) => channels,
        Err(e) => {
            eprintln!("Error: cannot reach task store at {}: {e}", config.store_url);
            std::process::exit(1);
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, &cmd_tx, evt_rx).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    cmd_tx: &mpsc::Sender<SyncCommand>,
    mut evt_rx: mpsc::Receiver<SyncEvent>,
) -> io::Result<()> {
    let mut app = App::new()
        .with_max_title_len(config.max_task_title_len)
        .with_timestamp_format(config.timestamp_format.clone())
        .with_notice_ticks(config.notice_ticks)
        .with_store_label(config.store_url.clone());

    // Fetch the initial task list.
    let initial_load = app.load_command();
    dispatch(&mut app, cmd_tx, initial_load);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending SyncEvents (non-blocking).
        drain_sync_events(&mut app, cmd_tx, &mut evt_rx);

        // Step 3: Tick the notice timer.
        app.tick_notice();

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(SyncCommand) when the action
            // requires a store request (create, update, delete, reload).
            if let Some(cmd) = app.handle_key_event(key) {
                dispatch(&mut app, cmd_tx, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(SyncCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Drain all pending `SyncEvent`s and apply them to the app.
///
/// Follow-up commands (the re-fetch after a successful update) are
/// dispatched in the same pass.
fn drain_sync_events(
    app: &mut App,
    cmd_tx: &mpsc::Sender<SyncCommand>,
    evt_rx: &mut mpsc::Receiver<SyncEvent>,
) {
    while let Ok(event) = evt_rx.try_recv() {
        if let Some(follow_up) = app.apply_sync_event(event) {
            dispatch(app, cmd_tx, follow_up);
        }
    }
}

/// Send a command to the sync worker, surfacing channel failures as notices.
fn dispatch(app: &mut App, cmd_tx: &mpsc::Sender<SyncCommand>, cmd: SyncCommand) {
    match cmd_tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            app.set_notice("store busy, request dropped".to_string());
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            app.set_notice("store connection lost".to_string());
        }
    }
}
