//! Notes client: REST API wrapper plus the headless notes view.

pub mod api;
pub mod error;
pub mod view;

pub use api::{ApiClient, DeleteConfirmation, NoteDraft, NoteRecord, NotesApi, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use view::{Editor, EditorMode, NotesView, Outcome, Prompter, SortDirection};
