//! Transport-agnostic application state.
//!
//! `AppState` is the single shared state behind the HTTP API. It holds the
//! database location; handlers open their own short-lived connection per
//! request, so there is no shared mutable state outside SQLite itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::config;
use crate::db::{self, DatabaseError};

/// Shared application state, wrapped in `Arc` at startup.
pub struct AppState {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl AppState {
    /// Create state pointing at the default database location.
    pub fn new() -> Self {
        Self {
            db_path: config::database_path(),
        }
    }

    /// Create state for a specific database path (tests, alternate data dirs).
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Open a database connection.
    ///
    /// Opens, migrates if needed, and returns a connection. Most common
    /// operation in handlers — one connection per request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
