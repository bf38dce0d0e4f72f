//! Shared server state.
//!
//! Holds the one long-lived store handle; cloned into each handler via
//! Axum's `State` extractor.

use std::sync::Arc;

use notes_core::{NoteService, NoteServiceError, SharedDb, SqliteNoteRepository};

use crate::error::{ApiError, ApiResult};

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<SharedDb>,
}

impl AppState {
    pub fn new(db: SharedDb) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Runs one service call against the shared connection on the blocking
    /// pool.
    pub async fn with_service<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || {
            db.with_conn(|conn| {
                let repo = SqliteNoteRepository::try_new(conn)?;
                f(&NoteService::new(repo))
            })
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => Err(ApiError::Internal(format!("store task failed: {err}"))),
        }
    }
}
