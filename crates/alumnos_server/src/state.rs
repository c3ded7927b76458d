//! Shared handler state.
//!
//! # Responsibility
//! - Own the single long-lived store connection and hand it to handlers.
//! - Run blocking SQLite work off the async worker threads.
//!
//! # Invariants
//! - The mutex serializes statements only; it does not make
//!   check-then-write sequences atomic.

use crate::error::ApiError;
use alumnos_core::{AlumnoService, ServiceResult, SqliteAlumnoRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Injected store capability, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a connection already bootstrapped by `open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` against a service bound to the shared connection.
    ///
    /// The closure executes on the blocking pool; the calling request
    /// suspends until it finishes.
    pub async fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&AlumnoService<SqliteAlumnoRepository<'_>>) -> ServiceResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("store connection lock poisoned".to_string()))?;
            let service = AlumnoService::new(SqliteAlumnoRepository::new(&guard));
            op(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
