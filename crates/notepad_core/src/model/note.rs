//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its checklist items.
//! - Keep the text/checklist split as an explicit sum type.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - The note type is always the type of its content; the two cannot drift.
//! - Decoding rejects records whose declared `type` disagrees with `content`.
//! - Checklist item ids are non-nil and unique within their note.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Identifier of a checklist item, unique within its note.
pub type ChecklistItemId = Uuid;

/// Note shape discriminator, serialized as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Text,
    Checklist,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checklist => "checklist",
        }
    }
}

impl Display for NoteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a checklist note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub is_checked: bool,
}

impl ChecklistItem {
    /// Creates an unchecked item with a fresh id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_checked: false,
        }
    }

    /// Whether the item text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Body of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteContent {
    Text(String),
    /// Insertion order is display order.
    Checklist(Vec<ChecklistItem>),
}

impl NoteContent {
    pub fn kind(&self) -> NoteKind {
        match self {
            Self::Text(_) => NoteKind::Text,
            Self::Checklist(_) => NoteKind::Checklist,
        }
    }

    /// Empty content of the given kind.
    pub fn empty(kind: NoteKind) -> Self {
        match kind {
            NoteKind::Text => Self::Text(String::new()),
            NoteKind::Checklist => Self::Checklist(Vec::new()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(body) => Some(body.as_str()),
            Self::Checklist(_) => None,
        }
    }

    pub fn checklist_items(&self) -> Option<&[ChecklistItem]> {
        match self {
            Self::Text(_) => None,
            Self::Checklist(items) => Some(items.as_slice()),
        }
    }

    /// True when there is nothing worth saving: a blank body, or no
    /// non-blank checklist item.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(body) => body.trim().is_empty(),
            Self::Checklist(items) => items.iter().all(ChecklistItem::is_blank),
        }
    }

    /// Drops blank checklist items. Text content is returned unchanged.
    pub fn without_blank_items(self) -> Self {
        match self {
            Self::Text(body) => Self::Text(body),
            Self::Checklist(items) => {
                Self::Checklist(items.into_iter().filter(|item| !item.is_blank()).collect())
            }
        }
    }

    /// Gives a fresh id to every checklist item whose id is nil or already
    /// taken by an earlier item.
    pub fn with_unique_item_ids(self) -> Self {
        match self {
            Self::Text(body) => Self::Text(body),
            Self::Checklist(mut items) => {
                let mut seen = HashSet::with_capacity(items.len());
                for item in &mut items {
                    if item.id.is_nil() || !seen.insert(item.id) {
                        item.id = Uuid::new_v4();
                        seen.insert(item.id);
                    }
                }
                Self::Checklist(items)
            }
        }
    }
}

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteRecord", into = "NoteRecord")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: NoteContent,
    pub is_private: bool,
    pub is_favorite: bool,
    /// Time of the most recent successful save.
    pub date: DateTime<Utc>,
}

impl Note {
    /// Builds a fresh note from a draft, stamped with `date`.
    ///
    /// The draft is taken as-is; callers normalize and gate it first.
    pub fn from_draft(draft: NoteDraft, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            is_private: draft.is_private,
            is_favorite: false,
            date,
        }
    }

    pub fn kind(&self) -> NoteKind {
        self.content.kind()
    }

    /// Replaces the editable fields with `draft`, keeping id and favorite flag.
    pub fn apply_draft(&mut self, draft: NoteDraft, date: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.is_private = draft.is_private;
        self.date = date;
    }
}

/// Editable fields of a note, staged before commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: NoteContent,
    pub is_private: bool,
}

impl NoteDraft {
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: NoteContent::Text(body.into()),
            is_private: false,
        }
    }

    /// Checklist draft where every line becomes a fresh unchecked item.
    pub fn checklist<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: NoteContent::Checklist(lines.into_iter().map(ChecklistItem::new).collect()),
            is_private: false,
        }
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    /// Save-gate: a non-blank title, or non-blank content.
    pub fn is_savable(&self) -> bool {
        !self.title.trim().is_empty() || !self.content.is_blank()
    }

    /// Returns the draft with blank checklist items dropped and item ids
    /// made unique.
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.without_blank_items().with_unique_item_ids(),
            ..self
        }
    }
}

/// Record-level validation failures raised while decoding notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NilId,
    ContentMismatch { declared: NoteKind },
    NilItemId,
    DuplicateItemId { item_id: ChecklistItemId },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::ContentMismatch { declared } => {
                write!(f, "note content does not match declared type `{declared}`")
            }
            Self::NilItemId => write!(f, "checklist item id must not be nil"),
            Self::DuplicateItemId { item_id } => {
                write!(f, "checklist item id `{item_id}` appears more than once")
            }
        }
    }
}

impl Error for NoteValidationError {}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: NoteId,
    #[serde(default)]
    title: String,
    #[serde(rename = "type")]
    kind: NoteKind,
    #[serde(default)]
    content: Option<RecordContent>,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    is_favorite: bool,
    date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RecordContent {
    Text(String),
    Checklist(Vec<ChecklistItem>),
}

impl TryFrom<NoteRecord> for Note {
    type Error = NoteValidationError;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        if record.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }

        let content = match (record.kind, record.content) {
            (kind, None) => NoteContent::empty(kind),
            (NoteKind::Text, Some(RecordContent::Text(body))) => NoteContent::Text(body),
            (NoteKind::Checklist, Some(RecordContent::Checklist(items))) => {
                ensure_unique_item_ids(&items)?;
                NoteContent::Checklist(items)
            }
            (declared, Some(_)) => return Err(NoteValidationError::ContentMismatch { declared }),
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            content,
            is_private: record.is_private,
            is_favorite: record.is_favorite,
            date: record.date,
        })
    }
}

fn ensure_unique_item_ids(items: &[ChecklistItem]) -> Result<(), NoteValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.id.is_nil() {
            return Err(NoteValidationError::NilItemId);
        }
        if !seen.insert(item.id) {
            return Err(NoteValidationError::DuplicateItemId { item_id: item.id });
        }
    }
    Ok(())
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        let kind = note.kind();
        let content = match note.content {
            NoteContent::Text(body) => RecordContent::Text(body),
            NoteContent::Checklist(items) => RecordContent::Checklist(items),
        };
        Self {
            id: note.id,
            title: note.title,
            kind,
            content: Some(content),
            is_private: note.is_private,
            is_favorite: note.is_favorite,
            date: note.date,
        }
    }
}
