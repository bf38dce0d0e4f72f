//! Domain model for notes.
//!
//! # Responsibility
//! - Define the canonical note record exchanged by every layer.
//! - Own input validation for create/update payloads.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
