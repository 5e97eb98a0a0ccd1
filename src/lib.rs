//! Core library surface for the person registry TUI.
//!
//! The binary only glues these pieces together: configuration and logging
//! come up first, then the SQLite store, then the interactive screen.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;
pub mod workflow;

/// Convenience re-exports for the persistence layer.
pub use db::{open_db, open_db_in_memory, DbError, RecordStore};

/// The record type and the form fields that edit it.
pub use models::{Field, Record};

/// Form controller and its outcomes.
pub use workflow::{EntryWorkflow, SaveEvent, Submission};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
