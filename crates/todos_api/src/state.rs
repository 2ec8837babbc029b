//! Shared handler state.

use crate::config::DbLocation;
use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use todos_core::db::{open_db, open_db_in_memory, DbResult};
use todos_core::{ServiceResult, SqliteTodoRepository, TodoService};

/// State passed to all handlers.
///
/// The connection lock is held for one service call and never across an `.await`.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the configured database.
    pub fn open(location: &DbLocation) -> DbResult<Self> {
        let conn = match location {
            DbLocation::File(path) => open_db(path)?,
            DbLocation::Memory => open_db_in_memory()?,
        };
        Ok(Self::new(conn))
    }

    /// Runs `f` against a todo service bound to the shared connection.
    pub fn with_todo_service<T>(
        &self,
        f: impl FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> ServiceResult<T>,
    ) -> Result<T, ApiError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
        let repo = SqliteTodoRepository::try_new(&conn)?;
        let service = TodoService::new(repo);
        f(&service).map_err(ApiError::from)
    }
}
