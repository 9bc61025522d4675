//! HTTP surface of the task store: shared state, routes, and handlers.
//!
//! Serves the REST contract the `taskdeck` client consumes:
//!
//! | Operation | Method & path        | Success            |
//! |-----------|----------------------|--------------------|
//! | List      | `GET /tasks`         | 200, array of Task |
//! | Create    | `POST /tasks`        | 201, created Task  |
//! | Update    | `PUT /tasks/{id}`    | 200, updated Task  |
//! | Delete    | `DELETE /tasks/{id}` | 204                |
//!
//! Unknown ids yield 404, invalid titles 422, and a full store 503.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taskdeck_proto::{CreateTask, MAX_TASK_TITLE_LENGTH, Task, UpdateTask};

use crate::store::{TaskStore, TaskStoreError};

/// Shared server state holding the task list and validation limits.
pub struct StoreState {
    /// The authoritative task list.
    pub tasks: TaskStore,
    /// Maximum accepted title length in characters.
    max_title_len: usize,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    /// Creates server state with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: TaskStore::new(),
            max_title_len: MAX_TASK_TITLE_LENGTH,
        }
    }

    /// Creates server state with custom limits and a pre-built store.
    #[must_use]
    pub const fn with_config(max_title_len: usize, tasks: TaskStore) -> Self {
        Self {
            tasks,
            max_title_len,
        }
    }
}

/// JSON error body returned for all failure responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An HTTP-mapped store error.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self { status, message }
    }

    fn invalid_title(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message.to_string())
    }
}

impl From<TaskStoreError> for ApiError {
    fn from(err: TaskStoreError) -> Self {
        let status = match err {
            TaskStoreError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskStoreError::Full(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Validates a client-supplied title.
///
/// Only the exact empty string is rejected as empty; whitespace-only titles
/// are accepted (the client sends titles verbatim, untrimmed).
fn validate_title(title: &str, max_len: usize) -> Result<(), ApiError> {
    if title.is_empty() {
        return Err(ApiError::invalid_title("task title cannot be empty"));
    }
    if title.chars().count() > max_len {
        return Err(ApiError::invalid_title(&format!(
            "task title too long (max {max_len} characters)"
        )));
    }
    Ok(())
}

/// `GET /tasks` — all tasks in creation order.
async fn list_tasks(State(state): State<Arc<StoreState>>) -> Json<Vec<Task>> {
    let tasks = state.tasks.list().await;
    tracing::debug!(count = tasks.len(), "listing tasks");
    Json(tasks)
}

/// `POST /tasks` — create a task; the store assigns id and creation time.
async fn create_task(
    State(state): State<Arc<StoreState>>,
    Json(body): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    validate_title(&body.title, state.max_title_len)?;
    let task = state.tasks.create(body.title).await?;
    tracing::info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}` — replace the title of an existing task.
async fn update_task(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTask>,
) -> Result<Json<Task>, ApiError> {
    validate_title(&body.title, state.max_title_len)?;
    let task = state.tasks.update_title(&id, body.title).await?;
    tracing::info!(id = %id, "task updated");
    Ok(Json(task))
}

/// `DELETE /tasks/{id}` — remove an existing task.
async fn delete_task(
    State(state): State<Arc<StoreState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.tasks.remove(&id).await?;
    tracing::info!(id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Builds the axum router over the given state.
fn router(state: Arc<StoreState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/tasks",
            axum::routing::get(list_tasks).post(create_task),
        )
        .route(
            "/tasks/{id}",
            axum::routing::put(update_task).delete(delete_task),
        )
        .with_state(state)
}

/// Starts the task store on the given address and returns the bound address
/// and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(StoreState::new())).await
}

/// Starts the task store with a pre-configured [`StoreState`].
///
/// This is the primary entry point used by both `main.rs` and test code;
/// tests bind to `127.0.0.1:0` and read the returned address.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<StoreState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task store server error");
        }
    });

    Ok((bound_addr, handle))
}
