//! Shared application state.
//!
//! Each request opens its own SQLite connection from the stored path;
//! write serialization is left to SQLite's locking (plus the IMMEDIATE
//! transactions inside the booking engine), so no connection pool or
//! application-level lock is needed.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::notify::Notifier;

pub struct AppState {
    db_path: PathBuf,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(db_path: PathBuf, notifier: Arc<dyn Notifier>) -> Self {
        Self { db_path, notifier }
    }

    /// Open a database connection. Migrations are a no-op after the first
    /// open, so this stays cheap per request.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }
}
