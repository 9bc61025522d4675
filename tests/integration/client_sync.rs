//! End-to-end synchronization tests: TUI state against a live task store.
//!
//! Drives the app the way the event loop does — dispatch a `SyncCommand`,
//! wait for the matching `SyncEvent`, apply it — and asserts that local
//! state converges to what the store holds.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use taskdeck::app::App;
use taskdeck::sync::{SyncCommand, SyncConfig, SyncEvent, spawn_sync};
use taskdeck_store::server::start_server;

/// Test harness: an app wired to a real store through the sync worker.
struct Harness {
    app: App,
    cmd_tx: mpsc::Sender<SyncCommand>,
    evt_rx: mpsc::Receiver<SyncEvent>,
}

impl Harness {
    /// Starts a store on an ephemeral port and connects a sync worker to it.
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

    /// Dispatches a command and applies the next event, plus any follow-up
    /// round it triggers. Panics if no event arrives within two seconds.
    async fn round_trip(&mut self, cmd: SyncCommand) {
        self.cmd_tx.send(cmd).await.expect("send command");
        let event = timeout(Duration::from_secs(2), self.evt_rx.recv())
            .await
            .expect("event within deadline")
            .expect("sync channel open");
        if let Some(follow_up) = self.app.apply_sync_event(event) {
            Box::pin(self.round_trip(follow_up)).await;
        }
    }

    /// Fetches the store's list into the app.
    async fn reload(&mut self) {
        let cmd = self.app.load_command();
        self.round_trip(cmd).await;
    }
}

#[tokio::test]
async fn startup_load_mirrors_the_store() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "pre-existing".to_string(),
    })
    .await;

    // A second app connecting to the same store starts from its list.
    let mut fresh = App::new();
    let cmd = fresh.load_command();
    h.cmd_tx.send(cmd).await.expect("send");
    let event = timeout(Duration::from_secs(2), h.evt_rx.recv())
        .await
        .expect("event")
        .expect("open");
    fresh.apply_sync_event(event);

    assert_eq!(fresh.tasks.len(), 1);
    assert_eq!(fresh.tasks[0].title, "pre-existing");
}

#[tokio::test]
async fn created_tasks_append_in_dispatch_order() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "first".to_string(),
    })
    .await;
    h.round_trip(SyncCommand::Create {
        title: "second".to_string(),
    })
    .await;

    let titles: Vec<&str> = h.app.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);

    // The local list matches a fresh fetch of the store.
    let local: Vec<String> = h.app.tasks.iter().map(|t| t.title.clone()).collect();
    h.reload().await;
    let remote: Vec<String> = h.app.tasks.iter().map(|t| t.title.clone()).collect();
    assert_eq!(local, remote);
}

#[tokio::test]
async fn created_task_uses_the_store_record() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "authoritative".to_string(),
    })
    .await;

    let task = &h.app.tasks[0];
    assert!(!task.id.as_str().is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&task.created_at).is_ok());
}

#[tokio::test]
async fn delete_removes_locally_and_remotely() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "doomed".to_string(),
    })
    .await;
    h.round_trip(SyncCommand::Create {
        title: "survivor".to_string(),
    })
    .await;

    let doomed = h.app.tasks[0].id.clone();
    h.round_trip(SyncCommand::Delete { id: doomed }).await;

    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "survivor");

    h.reload().await;
    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "survivor");
}

#[tokio::test]
async fn update_converges_through_the_refetch() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "draft".to_string(),
    })
    .await;

    let id = h.app.tasks[0].id.clone();
    let created_at = h.app.tasks[0].created_at.clone();

    // round_trip follows the re-fetch the app requests after an update.
    h.round_trip(SyncCommand::Update {
        id: id.clone(),
        title: "final".to_string(),
    })
    .await;

    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "final");
    assert_eq!(h.app.tasks[0].id, id);
    assert_eq!(h.app.tasks[0].created_at, created_at);
}

#[tokio::test]
async fn failed_request_surfaces_as_notice_and_leaves_state_alone() {
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: "keep".to_string(),
    })
    .await;

    // Updating a task the store never had fails with 404.
    h.round_trip(SyncCommand::Update {
        id: taskdeck_proto::TaskId::from("no-such-task"),
        title: "irrelevant".to_string(),
    })
    .await;

    assert!(h.app.notice.is_some());
    assert_eq!(h.app.tasks.len(), 1);
    assert_eq!(h.app.tasks[0].title, "keep");
}

#[tokio::test]
async fn empty_title_rejection_comes_back_as_a_create_failure() {
    // The app never sends empty titles, but the store enforces the rule
    // for any client. Send one directly through the sync worker.
    let mut h = Harness::new().await;
    h.round_trip(SyncCommand::Create {
        title: String::new(),
    })
    .await;

    assert!(h.app.tasks.is_empty());
    let notice = h.app.notice.as_deref().expect("notice set");
    assert!(notice.starts_with("create failed"));
}
