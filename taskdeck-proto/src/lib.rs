//! `TaskDeck` wire types.
//!
//! Shared JSON types for the task store HTTP contract, used by both the
//! `taskdeck` client and the `taskdeck-store` server.

pub mod task;

pub use task::{CreateTask, MAX_TASK_TITLE_LENGTH, Task, TaskId, UpdateTask};
