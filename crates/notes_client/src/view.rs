//! Headless notes view.
//!
//! # Responsibility
//! - Hold all client-side state: the note list, the editor, the sort
//!   direction and the in-flight-save flag.
//! - Turn user actions into API calls and merge the results into local state.
//!
//! # Invariants
//! - A failed action leaves local state unchanged, is logged, and is
//!   reported to the user through `Prompter::alert`.
//! - At most one save is in flight; extra save attempts are ignored.
//! - The state lock is never held across an await.
//! - The list is always ordered by `(created_at, arrival)` in the current
//!   direction, so toggling the sort twice restores the previous order
//!   exactly, including after adds.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{error, info};

use crate::api::{NoteDraft, NoteRecord, NotesApi};

/// User-facing dialogs.
pub trait Prompter {
    /// Asks a yes/no question; `true` means proceed.
    fn confirm(&self, message: &str) -> bool;
    /// Shows a blocking error message.
    fn alert(&self, message: &str);
}

/// Order of the note list by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first. Matches the store's natural order.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Whether the editor creates a new note or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit { id: String },
}

/// Open editor (modal) state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub mode: EditorMode,
    pub draft: NoteDraft,
}

/// Result of one user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran and local state reflects it.
    Applied,
    /// Nothing to do (no editor open, or a save already in flight).
    Ignored,
    /// The user declined a confirmation.
    Cancelled,
    /// The action failed; the user was alerted and state is unchanged.
    Failed,
}

#[derive(Debug, Clone)]
struct Entry {
    note: NoteRecord,
    // Order in which the note entered local state; breaks `created_at` ties.
    arrival: u64,
}

#[derive(Debug)]
struct ViewState {
    entries: Vec<Entry>,
    next_arrival: u64,
    editor: Option<Editor>,
    sort: SortDirection,
    saving: bool,
}

impl ViewState {
    fn admit(&mut self, note: NoteRecord) -> Entry {
        let entry = Entry {
            note,
            arrival: self.next_arrival,
        };
        self.next_arrival += 1;
        entry
    }

    fn apply_sort(&mut self) {
        self.entries
            .sort_by_key(|entry| (entry.note.created_at, entry.arrival));
        if self.sort == SortDirection::Descending {
            self.entries.reverse();
        }
    }
}

/// Stateful notes view driven by user actions.
pub struct NotesView<A, P> {
    api: A,
    prompter: P,
    state: Mutex<ViewState>,
}

impl<A: NotesApi, P: Prompter> NotesView<A, P> {
    pub fn new(api: A, prompter: P) -> Self {
        Self {
            api,
            prompter,
            state: Mutex::new(ViewState {
                entries: Vec::new(),
                next_arrival: 0,
                editor: None,
                sort: SortDirection::Ascending,
                saving: false,
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Snapshot of the notes in display order.
    pub fn notes(&self) -> Vec<NoteRecord> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.note.clone())
            .collect()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.lock().sort
    }

    /// Snapshot of the open editor, if any.
    pub fn editor(&self) -> Option<Editor> {
        self.lock().editor.clone()
    }

    pub fn is_saving(&self) -> bool {
        self.lock().saving
    }

    /// Loads every note from the server, replacing local state.
    pub async fn load(&self) -> Outcome {
        match self.api.fetch_notes().await {
            Ok(notes) => {
                let mut state = self.lock();
                state.entries.clear();
                for note in notes {
                    let entry = state.admit(note);
                    state.entries.push(entry);
                }
                state.apply_sort();
                info!(
                    "event=notes_load module=view status=ok count={}",
                    state.entries.len()
                );
                Outcome::Applied
            }
            Err(err) => self.fail("load", "Failed to load notes.", &err),
        }
    }

    /// Flips the sort direction and re-sorts by creation time.
    pub fn toggle_sort(&self) -> SortDirection {
        let mut state = self.lock();
        state.sort = state.sort.flipped();
        state.apply_sort();
        state.sort
    }

    /// Opens the editor with empty fields.
    pub fn open_add(&self) {
        self.lock().editor = Some(Editor {
            mode: EditorMode::Add,
            draft: NoteDraft::default(),
        });
    }

    /// Opens the editor pre-filled with the note `id`. Returns `false` when
    /// the note is not in local state.
    pub fn open_edit(&self, id: &str) -> bool {
        let mut state = self.lock();
        let Some(draft) = state
            .entries
            .iter()
            .find(|entry| entry.note.id == id)
            .map(|entry| NoteDraft::from(&entry.note))
        else {
            return false;
        };
        state.editor = Some(Editor {
            mode: EditorMode::Edit { id: id.to_string() },
            draft,
        });
        true
    }

    pub fn close_editor(&self) {
        self.lock().editor = None;
    }

    /// Replaces the editor's title. No-op when the editor is closed.
    pub fn set_title(&self, title: impl Into<String>) {
        if let Some(editor) = self.lock().editor.as_mut() {
            editor.draft.title = title.into();
        }
    }

    /// Replaces the editor's content. No-op when the editor is closed.
    pub fn set_content(&self, content: impl Into<String>) {
        if let Some(editor) = self.lock().editor.as_mut() {
            editor.draft.content = content.into();
        }
    }

    /// Submits the open editor.
    ///
    /// Add mode places the created note at its sorted position; edit mode
    /// replaces the local entry with the server's record. The editor closes on success if it still
    /// holds the submitted draft.
    pub async fn save(&self) -> Outcome {
        let submitted = {
            let mut state = self.lock();
            if state.saving {
                return Outcome::Ignored;
            }
            let Some(editor) = state.editor.clone() else {
                return Outcome::Ignored;
            };
            state.saving = true;
            editor
        };

        let result = match &submitted.mode {
            EditorMode::Add => self.api.create_note(&submitted.draft).await,
            EditorMode::Edit { id } => self.api.update_note(id, &submitted.draft).await,
        };

        let mut state = self.lock();
        state.saving = false;
        let saved = match result {
            Ok(saved) => saved,
            Err(err) => {
                drop(state);
                return self.fail("save", "Failed to save the note. Please try again.", &err);
            }
        };

        match &submitted.mode {
            EditorMode::Add => {
                let entry = state.admit(saved);
                state.entries.push(entry);
            }
            EditorMode::Edit { id } => {
                if let Some(entry) = state.entries.iter_mut().find(|entry| entry.note.id == *id) {
                    entry.note = saved;
                }
            }
        }
        state.apply_sort();
        if state.editor.as_ref() == Some(&submitted) {
            state.editor = None;
        }
        info!("event=note_save module=view status=ok mode={}", mode_label(&submitted.mode));
        Outcome::Applied
    }

    /// Deletes the note `id` after user confirmation.
    pub async fn delete(&self, id: Option<&str>) -> Outcome {
        let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
            error!("event=note_delete module=view status=error error_code=missing_id");
            self.prompter
                .alert("Failed to delete note. No ID provided.");
            return Outcome::Failed;
        };

        if !self
            .prompter
            .confirm("Are you sure you want to delete this note?")
        {
            return Outcome::Cancelled;
        }

        match self.api.delete_note(id).await {
            Ok(_) => {
                self.lock().entries.retain(|entry| entry.note.id != id);
                info!("event=note_delete module=view status=ok id={id}");
                Outcome::Applied
            }
            Err(err) => self.fail("delete", "Failed to delete the note. Please try again.", &err),
        }
    }

    fn fail(&self, action: &str, message: &str, err: &dyn std::error::Error) -> Outcome {
        error!("event=note_{action} module=view status=error error={err}");
        self.prompter.alert(message);
        Outcome::Failed
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn mode_label(mode: &EditorMode) -> &'static str {
    match mode {
        EditorMode::Add => "add",
        EditorMode::Edit { .. } => "edit",
    }
}
