//! Core domain logic for the notes service.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, DbError, DbResult, DbTarget, SharedDb};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::note::{NewNote, Note, NoteField, NoteId, NotePatch, NoteValidationError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{DeleteConfirmation, NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
