//! Core of the notepad: note model, local persistence and list queries.
//! Hosts (FFI, CLI) call in through `NoteStore` and never touch storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    ChecklistItem, ChecklistItemId, Note, NoteContent, NoteDraft, NoteId, NoteKind,
    NoteValidationError,
};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use search::filter::{empty_list_reason, filter_notes, EmptyListReason, NoteFilter};
pub use service::note_editor::NoteEditor;
pub use service::note_store::{
    NoteStore, StorageFailure, StoreError, StoreResult, DEFAULT_STORAGE_KEY,
};
pub use service::preview::{derive_preview, viewer_title, NotePreview, PreviewBody};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
