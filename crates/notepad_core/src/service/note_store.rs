//! Note store: owner of the note collection.
//!
//! # Responsibility
//! - Hold the in-memory collection (newest-created first).
//! - Funnel every mutation through one persist-then-swap path.
//! - Apply the save-gate and blank-item trimming before writing drafts.
//!
//! # Invariants
//! - The in-memory collection only advances after the blob write succeeded.
//!   A failed write leaves memory at the last durable state; the store does
//!   not re-read or retry.
//! - Mutators on an unknown id are no-ops returning `Ok(None)` and write
//!   nothing.
//! - Logs carry ids and counts only, never titles or bodies.

use crate::model::note::{ChecklistItemId, Note, NoteContent, NoteDraft, NoteId};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::search::filter::{filter_notes, NoteFilter};
use chrono::Utc;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized collection.
///
/// The suffix is the schema version; a shape change needs a new key.
pub const DEFAULT_STORAGE_KEY: &str = "@notepad:notes_v1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Low-level cause behind a [`StoreError`].
#[derive(Debug)]
pub enum StorageFailure {
    Repo(RepoError),
    /// The blob could not be encoded or decoded as a note collection.
    Codec(serde_json::Error),
}

impl Display for StorageFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "invalid note collection: {err}"),
        }
    }
}

impl Error for StorageFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

/// Store-level error surfaced to callers.
#[derive(Debug)]
pub enum StoreError {
    /// Durable read failed or returned unparseable data.
    StorageRead(StorageFailure),
    /// Durable write failed; in-memory state is unchanged.
    StorageWrite(StorageFailure),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageRead(err) => write!(f, "failed to load notes: {err}"),
            Self::StorageWrite(err) => write!(f, "failed to save notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageRead(err) | Self::StorageWrite(err) => Some(err),
        }
    }
}

/// Owned note collection backed by a key-value repository.
pub struct NoteStore<R: KvRepository> {
    repo: R,
    storage_key: String,
    notes: Vec<Note>,
}

impl<R: KvRepository> NoteStore<R> {
    /// Creates an empty, not yet loaded store under [`DEFAULT_STORAGE_KEY`].
    pub fn new(repo: R) -> Self {
        Self::with_storage_key(repo, DEFAULT_STORAGE_KEY)
    }

    /// Creates an empty, not yet loaded store under a custom key.
    pub fn with_storage_key(repo: R, storage_key: impl Into<String>) -> Self {
        Self {
            repo,
            storage_key: storage_key.into(),
            notes: Vec::new(),
        }
    }

    /// Creates a store and loads it, degrading to an empty collection when
    /// the stored data cannot be read.
    pub fn open(repo: R, storage_key: impl Into<String>) -> Self {
        let mut store = Self::with_storage_key(repo, storage_key);
        if let Err(err) = store.load() {
            error!(
                "event=store_load module=store status=degraded fallback=empty error={}",
                err
            );
        }
        store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Full collection, newest-created first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get_note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Notes visible under `filter`, in collection order.
    pub fn visible_notes(&self, filter: &NoteFilter) -> Vec<&Note> {
        filter_notes(&self.notes, filter)
    }

    /// Replaces the in-memory collection with the stored one.
    ///
    /// Returns the number of loaded notes. A missing blob loads as empty.
    ///
    /// # Errors
    /// - `StoreError::StorageRead` when the read fails or the blob does not
    ///   decode. The in-memory collection is emptied in that case.
    pub fn load(&mut self) -> StoreResult<usize> {
        let loaded = self
            .repo
            .get_item(&self.storage_key)
            .map_err(|err| StoreError::StorageRead(StorageFailure::Repo(err)))
            .and_then(|blob| match blob {
                Some(json) => serde_json::from_str::<Vec<Note>>(&json)
                    .map_err(|err| StoreError::StorageRead(StorageFailure::Codec(err))),
                None => Ok(Vec::new()),
            });

        match loaded {
            Ok(notes) => {
                info!(
                    "event=store_load module=store status=ok count={}",
                    notes.len()
                );
                self.notes = notes;
                Ok(self.notes.len())
            }
            Err(err) => {
                self.notes.clear();
                Err(err)
            }
        }
    }

    /// Persists `notes` as the whole collection, then adopts it in memory.
    ///
    /// # Errors
    /// - `StoreError::StorageWrite` when encoding or writing fails. Memory is
    ///   left untouched.
    pub fn save(&mut self, notes: Vec<Note>) -> StoreResult<()> {
        let written = serde_json::to_string(&notes)
            .map_err(StorageFailure::Codec)
            .and_then(|json| {
                self.repo
                    .set_item(&self.storage_key, &json)
                    .map_err(StorageFailure::Repo)
            });

        if let Err(err) = written {
            error!(
                "event=store_save module=store status=error count={} error={}",
                notes.len(),
                err
            );
            return Err(StoreError::StorageWrite(err));
        }

        self.notes = notes;
        Ok(())
    }

    /// Creates a note from `draft` and prepends it.
    ///
    /// Returns `Ok(None)` when the normalized draft fails the save-gate.
    pub fn create_note(&mut self, draft: NoteDraft) -> StoreResult<Option<Note>> {
        let draft = draft.normalized();
        if !draft.is_savable() {
            warn!("event=note_create module=store status=skipped reason=save_gate");
            return Ok(None);
        }

        let note = Note::from_draft(draft, Utc::now());
        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.push(note.clone());
        next.extend(self.notes.iter().cloned());
        self.save(next)?;

        info!(
            "event=note_create module=store status=ok note_id={} type={}",
            note.id,
            note.kind()
        );
        Ok(Some(note))
    }

    /// Replaces the editable fields of note `id` and refreshes its date.
    ///
    /// Returns `Ok(None)` when the note is absent or the draft fails the
    /// save-gate.
    pub fn update_note(&mut self, id: NoteId, draft: NoteDraft) -> StoreResult<Option<Note>> {
        let draft = draft.normalized();
        if !draft.is_savable() {
            warn!("event=note_update module=store status=skipped reason=save_gate note_id={id}");
            return Ok(None);
        }

        let updated = self.mutate(id, |note| {
            note.apply_draft(draft, Utc::now());
            true
        })?;
        if let Some(note) = &updated {
            info!(
                "event=note_update module=store status=ok note_id={} type={}",
                note.id,
                note.kind()
            );
        }
        Ok(updated)
    }

    /// Removes note `id`. Returns the removed note.
    pub fn delete_note(&mut self, id: NoteId) -> StoreResult<Option<Note>> {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            return Ok(None);
        };

        let mut next = self.notes.clone();
        let removed = next.remove(position);
        self.save(next)?;

        info!("event=note_delete module=store status=ok note_id={id}");
        Ok(Some(removed))
    }

    pub fn toggle_favorite(&mut self, id: NoteId) -> StoreResult<Option<Note>> {
        self.mutate(id, |note| {
            note.is_favorite = !note.is_favorite;
            true
        })
    }

    pub fn toggle_private(&mut self, id: NoteId) -> StoreResult<Option<Note>> {
        self.mutate(id, |note| {
            note.is_private = !note.is_private;
            true
        })
    }

    /// Flips `is_checked` on one item of a checklist note.
    ///
    /// No-op for text notes and unknown item ids.
    pub fn toggle_checklist_item(
        &mut self,
        note_id: NoteId,
        item_id: ChecklistItemId,
    ) -> StoreResult<Option<Note>> {
        self.mutate(note_id, |note| match &mut note.content {
            NoteContent::Checklist(items) => match items.iter_mut().find(|item| item.id == item_id)
            {
                Some(item) => {
                    item.is_checked = !item.is_checked;
                    true
                }
                None => false,
            },
            NoteContent::Text(_) => false,
        })
    }

    /// Applies `change` to a copy of note `id` and persists the result when
    /// `change` reports a modification.
    fn mutate(
        &mut self,
        id: NoteId,
        change: impl FnOnce(&mut Note) -> bool,
    ) -> StoreResult<Option<Note>> {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            return Ok(None);
        };

        let mut next = self.notes.clone();
        if !change(&mut next[position]) {
            return Ok(None);
        }
        let updated = next[position].clone();
        self.save(next)?;
        Ok(Some(updated))
    }
}
