//! Long-lived connection handle shared across callers.
//!
//! # Invariants
//! - The connection is opened at most once, on first use.
//! - A failed open is not cached; the next caller retries.
//! - Callers get exclusive access for the duration of one closure.
//! - A panic inside one closure does not lock out later callers.

use super::{open_db, DbError, DbResult, DbTarget};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};

/// Lazily opened, mutex-guarded SQLite connection.
pub struct SharedDb {
    target: DbTarget,
    conn: OnceCell<Mutex<Connection>>,
}

impl SharedDb {
    /// Creates a handle without touching storage.
    pub fn new(target: DbTarget) -> Self {
        Self {
            target,
            conn: OnceCell::new(),
        }
    }

    /// Returns whether the underlying connection has been opened.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Opens the connection now instead of on first use.
    pub fn warm_up(&self) -> DbResult<()> {
        self.connection().map(|_| ())
    }

    /// Runs `f` with exclusive access to the shared connection.
    ///
    /// Opens and migrates the database on first call.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        // Callers never hold a transaction open, so a poisoned lock is reusable.
        let guard = self
            .connection()?
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn connection(&self) -> DbResult<&Mutex<Connection>> {
        self.conn
            .get_or_try_init(|| open_db(&self.target).map(Mutex::new))
    }
}

#[cfg(test)]
mod tests {
    use super::SharedDb;
    use crate::db::{DbError, DbTarget};

    #[test]
    fn opens_lazily_and_reuses_connection() {
        let db = SharedDb::new(DbTarget::Memory);
        assert!(!db.is_open());

        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, title, content, created_at) VALUES ('a', 't', 'c', 1);",
                [],
            )?;
            Ok::<_, DbError>(())
        })
        .unwrap();
        assert!(db.is_open());

        // Same in-memory database means the same connection was reused.
        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn failed_open_is_reported_and_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("missing").join("notes.sqlite3");
        let db = SharedDb::new(DbTarget::File(missing_parent));

        assert!(db.warm_up().is_err());
        assert!(!db.is_open());
    }

    #[test]
    fn panic_in_one_caller_does_not_block_the_next() {
        let db = SharedDb::new(DbTarget::Memory);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            db.with_conn(|_| -> Result<(), DbError> { panic!("handler bug") })
        }));
        assert!(outcome.is_err());

        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
