//! Note domain model.
//!
//! # Responsibility
//! - Define the stored note record and its wire shape.
//! - Define create/update inputs and their validation rules.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - `created_at` is set once at creation and never modified.
//! - Title and content must be non-blank after trimming whenever they are
//!   written.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Canonical note record.
///
/// Serialized with camelCase keys (`createdAt`) to match the REST contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned identifier.
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    /// Creates a note with a freshly generated id and the current timestamp.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, content, now_epoch_ms())
    }

    /// Creates a note with caller-provided identity and timestamp.
    ///
    /// Used by read paths and tests where identity already exists.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at,
        }
    }

    /// Checks the stored shape against write rules.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        require_text(NoteField::Title, &self.title)?;
        require_text(NoteField::Content, &self.content)
    }
}

/// Create payload.
///
/// Missing fields deserialize to empty strings so that they are reported by
/// validation rather than by the JSON layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Both fields are required and must be non-blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        require_text(NoteField::Title, &self.title)?;
        require_text(NoteField::Content, &self.content)
    }
}

/// Partial update payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NotePatch {
    /// Present fields must be non-blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if let Some(title) = self.title.as_deref() {
            require_text(NoteField::Title, title)?;
        }
        if let Some(content) = self.content.as_deref() {
            require_text(NoteField::Content, content)?;
        }
        Ok(())
    }
}

/// Writable note fields, used to report which input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
}

impl NoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }
}

/// Validation failure for note inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Field is missing, empty, or whitespace only.
    BlankField(NoteField),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{} must not be blank", field.as_str()),
        }
    }
}

impl Error for NoteValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn require_text(field: NoteField, value: &str) -> Result<(), NoteValidationError> {
    if value.trim().is_empty() {
        return Err(NoteValidationError::BlankField(field));
    }
    Ok(())
}
