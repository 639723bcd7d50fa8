//! Use-case layer between callers and storage.
//!
//! # Responsibility
//! - Own the note collection and its mutation rules (`note_store`).
//! - Stage editor drafts until commit (`note_editor`).
//! - Derive display projections (`preview`).

pub mod note_editor;
pub mod note_store;
pub mod preview;
