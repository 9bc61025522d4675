//! In-memory task list, the authoritative state behind the HTTP routes.
//!
//! The [`TaskStore`] owns the full task list in insertion order and mints
//! the server-assigned fields: ids (UUID v7, rendered as opaque strings)
//! and RFC 3339 creation timestamps. Clients never compute either.

use chrono::{SecondsFormat, Utc};
use taskdeck_proto::{Task, TaskId};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Default maximum number of tasks held before creates are refused.
const DEFAULT_MAX_TASKS: usize = 10_000;

/// Errors produced by task store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// No task with the given id exists.
    #[error("task not found: {0}")]
    NotFound(String),
    /// The store has reached its configured capacity.
    #[error("task store is full (max {0} tasks)")]
    Full(usize),
}

/// Insertion-ordered in-memory task list.
///
/// Thread-safe via [`RwLock`]. List order is creation order, which is the
/// order `GET /tasks` returns and the order clients render.
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    max_tasks: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates a new, empty task store with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }

    /// Creates a new, empty task store with a custom capacity.
    #[must_use]
    pub fn with_max_tasks(max_tasks: usize) -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            max_tasks,
        }
    }

    /// Returns all tasks in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks.clone()
    }

    /// Creates a task with a store-assigned id and creation timestamp,
    /// appending it to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Full`] if the store is at capacity.
    pub async fn create(&self, title: String) -> Result<Task, TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.len() >= self.max_tasks {
            return Err(TaskStoreError::Full(self.max_tasks));
        }
        let task = Task {
            id: TaskId::new(Uuid::now_v7().to_string()),
            title,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        tasks.push(task.clone());
        Ok(task)
    }

    /// Replaces the title of the task with the given id, leaving its id
    /// and creation timestamp untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] if no task has that id.
    pub async fn update_title(&self, id: &str, title: String) -> Result<Task, TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id.as_str() == id)
            .ok_or_else(|| TaskStoreError::NotFound(id.to_string()))?;
        task.title = title;
        Ok(task.clone())
    }

    /// Removes the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] if no task has that id.
    pub async fn remove(&self, id: &str) -> Result<(), TaskStoreError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id.as_str() != id);
        if tasks.len() == before {
            return Err(TaskStoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Returns the number of tasks currently stored.
    pub async fn len(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks.len()
    }

    /// Returns `true` when the store holds no tasks.
    pub async fn is_empty(&self) -> bool {
        let tasks = self.tasks.read().await;
        tasks.is_empty()
    }
}
