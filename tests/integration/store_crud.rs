//! Integration tests for the task store REST contract.
//!
//! Starts a real store on an ephemeral port and exercises the full CRUD
//! surface through the client's `StoreClient`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use reqwest::StatusCode;
use taskdeck::client::StoreClient;
use taskdeck_proto::TaskId;
use taskdeck_store::server::start_server;

/// Starts a store on an ephemeral port and returns a client for it.
async fn start_store() -> StoreClient {
    let (addr, _handle) = start_server("127.0.0.1:0").await.expect("start store");
    StoreClient::new(
        &format!("http://{addr}"),
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .expect("build client")
}

#[tokio::test]
async fn fresh_store_lists_no_tasks() {
    let client = start_store().await;
    let tasks = client.list_tasks().await.expect("list");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn created_task_carries_store_assigned_id_and_timestamp() {
    let client = start_store().await;
    let task = client.create_task("Buy milk").await.expect("create");

    assert_eq!(task.title, "Buy milk");
    assert!(!task.id.as_str().is_empty());
    // createdAt must be RFC 3339.
    assert!(chrono::DateTime::parse_from_rfc3339(&task.created_at).is_ok());
}

#[tokio::test]
async fn tasks_are_listed_in_creation_order() {
    let client = start_store().await;
    let a = client.create_task("first").await.expect("create");
    let b = client.create_task("second").await.expect("create");
    let c = client.create_task("third").await.expect("create");

    let tasks = client.list_tasks().await.expect("list");
    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);
}

#[tokio::test]
async fn empty_title_is_rejected_with_422() {
    let client = start_store().await;
    let err = client.create_task("").await.expect_err("should reject");
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));

    // Nothing was stored.
    let tasks = client.list_tasks().await.expect("list");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn whitespace_only_title_is_accepted() {
    let client = start_store().await;
    let task = client.create_task("   ").await.expect("create");
    assert_eq!(task.title, "   ");
}

#[tokio::test]
async fn update_persists_across_a_fresh_list() {
    let client = start_store().await;
    let task = client.create_task("draft").await.expect("create");

    client
        .update_task(&task.id, "final")
        .await
        .expect("update");

    let tasks = client.list_tasks().await.expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "final");
    // Identity and creation time are untouched by updates.
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].created_at, task.created_at);
}

#[tokio::test]
async fn updating_unknown_id_yields_404() {
    let client = start_store().await;
    let err = client
        .update_task(&TaskId::from("missing"), "anything")
        .await
        .expect_err("should fail");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn delete_removes_the_task_and_only_that_task() {
    let client = start_store().await;
    let a = client.create_task("keep").await.expect("create");
    let b = client.create_task("drop").await.expect("create");

    client.delete_task(&b.id).await.expect("delete");

    let tasks = client.list_tasks().await.expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, a.id);
}

#[tokio::test]
async fn deleting_twice_yields_404_the_second_time() {
    let client = start_store().await;
    let task = client.create_task("once").await.expect("create");

    client.delete_task(&task.id).await.expect("first delete");
    let err = client
        .delete_task(&task.id)
        .await
        .expect_err("second delete should fail");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}
