//! `TaskDeck` task store library.
//!
//! Exposes the HTTP task store for use in tests and embedding. The store
//! serves the `/tasks` REST contract over an in-memory, insertion-ordered
//! task list; it is the system of record for task ids and creation times.

pub mod config;
pub mod server;
pub mod store;
