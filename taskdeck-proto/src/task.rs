//! Task resource and request body types for the store's HTTP contract.
//!
//! The store is the source of truth: it assigns `id` and `created_at` at
//! creation time and the client never computes either. Field names follow
//! the JSON contract (`createdAt`), hence the serde renames.

use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Opaque unique identifier for a task, assigned by the store.
///
/// The client treats this as an opaque string; only the store knows (or
/// cares) that it mints them as UUID v7 values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A task as stored and served by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, immutable once assigned by the store.
    pub id: TaskId,
    /// User-supplied title; the only mutable field.
    pub title: String,
    /// RFC 3339 creation timestamp, set by the store, immutable.
    pub created_at: String,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title for the new task, sent exactly as the user typed it.
    pub title: String,
}

/// Request body for `PUT /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// Replacement title for the task.
    pub title: String,
}
