//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/find-all/find-one/update/delete for notes.
//! - Validate inputs and translate missing rows into `NoteNotFound`.
//!
//! # Invariants
//! - `create` rejects blank title or content before touching storage.
//! - `update` is a partial update and rejects present-but-blank fields.
//! - Identifiers that do not parse never reach storage; they are not found.

use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, NotePatch, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Missing or blank required field.
    Validation(NoteValidationError),
    /// Identifier does not resolve to a stored note. Holds the raw identifier.
    NoteNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "Note with ID {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id.to_string()),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for NoteServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: NoteId,
    pub message: &'static str,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new note, returning the stored record.
    pub fn create(&self, input: NewNote) -> Result<Note, NoteServiceError> {
        input.validate()?;

        let note = Note::new(input.title, input.content);
        let id = self.repo.insert_note(&note)?;
        debug!("event=note_create module=service status=ok id={id}");

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Returns every note, unsorted and unpaginated.
    pub fn find_all(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    /// Fetches one note by identifier.
    pub fn find_one(&self, id: &str) -> Result<Note, NoteServiceError> {
        let note_id = parse_note_id(id)?;
        self.repo
            .get_note(note_id)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))
    }

    /// Applies a partial update and returns the updated record.
    pub fn update(&self, id: &str, patch: NotePatch) -> Result<Note, NoteServiceError> {
        patch.validate()?;
        let note_id = parse_note_id(id)?;

        self.repo.update_note(note_id, &patch)?;
        debug!(
            "event=note_update module=service status=ok id={note_id} title_changed={} content_changed={}",
            patch.title.is_some(),
            patch.content.is_some()
        );

        self.repo
            .get_note(note_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Removes a note by identifier.
    pub fn delete(&self, id: &str) -> Result<DeleteConfirmation, NoteServiceError> {
        let note_id = parse_note_id(id)?;
        self.repo.delete_note(note_id)?;
        debug!("event=note_delete module=service status=ok id={note_id}");

        Ok(DeleteConfirmation {
            id: note_id,
            message: "Note deleted successfully",
        })
    }
}

/// Parses a raw identifier in canonical hyphenated form.
///
/// Other spellings of the same UUID (simple, braced, urn, padded) are
/// reported as not found so each note has exactly one identifier.
pub fn parse_note_id(raw: &str) -> Result<NoteId, NoteServiceError> {
    Uuid::try_parse(raw)
        .ok()
        .filter(|id| id.hyphenated().to_string().eq_ignore_ascii_case(raw))
        .ok_or_else(|| NoteServiceError::NoteNotFound(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_note_id, NoteServiceError};

    #[test]
    fn malformed_id_is_not_found() {
        let err = parse_note_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, NoteServiceError::NoteNotFound(ref id) if id == "not-a-uuid"));
        assert_eq!(err.to_string(), "Note with ID not-a-uuid not found");
    }

    #[test]
    fn canonical_uuid_parses() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_note_id(&id.to_string().to_uppercase()).unwrap(), id);
    }

    #[test]
    fn alternate_uuid_spellings_are_not_found() {
        let id = uuid::Uuid::new_v4();
        for raw in [
            id.simple().to_string(),
            id.braced().to_string(),
            id.urn().to_string(),
            format!(" {id} "),
        ] {
            assert!(
                matches!(parse_note_id(&raw), Err(NoteServiceError::NoteNotFound(_))),
                "`{raw}` should not resolve"
            );
        }
    }
}
