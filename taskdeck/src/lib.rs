//! `TaskDeck` — terminal task manager backed by a remote store library.

pub mod app;
pub mod client;
pub mod config;
pub mod sync;
pub mod ui;
