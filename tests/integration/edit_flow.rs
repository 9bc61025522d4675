//! Key-event-driven edit flow against a live task store.
//!
//! These tests feed raw key events through `App::handle_key_event`, the
//! same path the terminal event loop uses, and route the resulting
//! commands through the sync worker.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio::time::timeout;

use taskdeck::app::{App, EditMode, PanelFocus};
use taskdeck::sync::{SyncCommand, SyncConfig, SyncEvent, spawn_sync};
use taskdeck_store::server::start_server;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Types a string into the app, one key at a time.
fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key_event(key(KeyCode::Char(c)));
    }
}

struct Harness {
    app: App,
    cmd_tx: mpsc::Sender<SyncCommand>,
    evt_rx: mpsc::Receiver<SyncEvent>,
}

impl Harness {
    async fn new() -> Self {
        let (addr, _handle) = start_server("127.0.0.1:0").await.expect("start store");
        let config = SyncConfig::new(format!("http://{addr}"));
        let (cmd_tx, evt_rx) = spawn_sync(&config).expect("spawn sync");
        Self {
            app: App::new(),
            cmd_tx,
            evt_rx,
        }
    }

    /// Sends a command and applies events (including follow-up rounds).
    async fn run(&mut self, cmd: SyncCommand) {
        self.cmd_tx.send(cmd).await.expect("send command");
        let event = timeout(Duration::from_secs(2), self.evt_rx.recv())
            .await
            .expect("event within deadline")
            .expect("sync channel open");
        if let Some(follow_up) = self.app.apply_sync_event(event) {
            Box::pin(self.run(follow_up)).await;
        }
    }

    /// Creates a task by typing its title and pressing Enter.
    async fn create_via_keys(&mut self, title: &str) {
        type_text(&mut self.app, title);
        let cmd = self
            .app
            .handle_key_event(key(KeyCode::Enter))
            .expect("create dispatched");
        self.run(cmd).await;
    }
}

#[tokio::test]
async fn full_edit_flow_rewrites_the_selected_task() {
    let mut h = Harness::new().await;
    h.create_via_keys("groceries").await;
    h.create_via_keys("laundry").await;

    // Move to the list, select the second task, start editing.
    h.app.handle_key_event(key(KeyCode::Tab));
    h.app.handle_key_event(key(KeyCode::Down));
    h.app.handle_key_event(key(KeyCode::Enter));

    // The input was pre-filled with the current title and focused.
    assert_eq!(h.app.input, "laundry");
    assert_eq!(h.app.focus, PanelFocus::Input);
    assert!(matches!(h.app.edit, EditMode::Editing(_)));

    // Rewrite it.
    type_text(&mut h.app, " (done)");
    let cmd = h
        .app
        .handle_key_event(key(KeyCode::Enter))
        .expect("update dispatched");
    h.run(cmd).await;

    // Back in viewing mode with the store's version of the list.
    assert_eq!(h.app.edit, EditMode::Viewing);
    assert!(h.app.input.is_empty());
    let titles: Vec<&str> = h.app.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["groceries", "laundry (done)"]);
}

#[tokio::test]
async fn clearing_the_input_mid_edit_blocks_submission() {
    let mut h = Harness::new().await;
    h.create_via_keys("important").await;

    h.app.handle_key_event(key(KeyCode::Tab));
    h.app.handle_key_event(key(KeyCode::Enter));
    assert_eq!(h.app.input, "important");

    // Backspace everything, then try to submit.
    while !h.app.input.is_empty() {
        h.app.handle_key_event(key(KeyCode::Backspace));
    }
    let cmd = h.app.handle_key_event(key(KeyCode::Enter));

    // No request was dispatched, the edit stays active, and the notice
    // explains why.
    assert!(cmd.is_none());
    assert!(matches!(h.app.edit, EditMode::Editing(_)));
    assert_eq!(h.app.notice.as_deref(), Some("fill in the task field"));

    // The stored task is untouched.
    let reload = h.app.load_command();
    h.run(reload).await;
    assert_eq!(h.app.tasks[0].title, "important");
}

#[tokio::test]
async fn escape_abandons_the_edit_without_a_request() {
    let mut h = Harness::new().await;
    h.create_via_keys("unchanged").await;

    h.app.handle_key_event(key(KeyCode::Tab));
    h.app.handle_key_event(key(KeyCode::Enter));
    type_text(&mut h.app, " scribbles");

    let cmd = h.app.handle_key_event(key(KeyCode::Esc));
    assert!(cmd.is_none());
    assert_eq!(h.app.edit, EditMode::Viewing);
    assert!(!h.app.should_quit);

    let reload = h.app.load_command();
    h.run(reload).await;
    assert_eq!(h.app.tasks[0].title, "unchanged");
}

#[tokio::test]
async fn delete_key_removes_the_selected_task_from_the_store() {
    let mut h = Harness::new().await;
    h.create_via_keys("stays").await;
    h.create_via_keys("goes").await;

    h.app.handle_key_event(key(KeyCode::Tab));
    h.app.handle_key_event(key(KeyCode::Down));
    let cmd = h
        .app
        .handle_key_event(key(KeyCode::Char('d')))
        .expect("delete dispatched");
    h.run(cmd).await;

    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "stays");

    let reload = h.app.load_command();
    h.run(reload).await;
    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "stays");
}
