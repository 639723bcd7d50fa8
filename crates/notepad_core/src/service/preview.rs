//! Card and viewer projections of a note.
//!
//! # Invariants
//! - Private notes never expose their body in a card.
//! - Projections are derived on read and never persisted.

use crate::model::note::{ChecklistItem, Note, NoteContent, NoteId};
use chrono::{DateTime, Utc};

pub const CARD_TEXT_MAX_LINES: usize = 5;
pub const CARD_CHECKLIST_MAX_ITEMS: usize = 4;
pub const UNTITLED_CARD_TITLE: &str = "Untitled Note";
pub const UNTITLED_VIEWER_TITLE: &str = "Note";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Body withheld because the note is private.
    Hidden,
    Text(String),
    Checklist {
        items: Vec<ChecklistItem>,
        /// Items not shown in the card.
        remaining: usize,
        checked: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePreview {
    pub note_id: NoteId,
    pub title: String,
    pub body: PreviewBody,
    pub is_favorite: bool,
    pub date: DateTime<Utc>,
}

/// Builds the list-card projection of `note`.
pub fn derive_preview(note: &Note) -> NotePreview {
    let body = if note.is_private {
        PreviewBody::Hidden
    } else {
        match &note.content {
            NoteContent::Text(text) => PreviewBody::Text(leading_lines(text, CARD_TEXT_MAX_LINES)),
            NoteContent::Checklist(items) => PreviewBody::Checklist {
                items: items.iter().take(CARD_CHECKLIST_MAX_ITEMS).cloned().collect(),
                remaining: items.len().saturating_sub(CARD_CHECKLIST_MAX_ITEMS),
                checked: items.iter().filter(|item| item.is_checked).count(),
                total: items.len(),
            },
        }
    };

    NotePreview {
        note_id: note.id,
        title: title_or(note, UNTITLED_CARD_TITLE),
        body,
        is_favorite: note.is_favorite,
        date: note.date,
    }
}

/// Heading shown by the full-screen viewer.
pub fn viewer_title(note: &Note) -> String {
    title_or(note, UNTITLED_VIEWER_TITLE)
}

fn title_or(note: &Note, fallback: &str) -> String {
    if note.title.is_empty() {
        fallback.to_string()
    } else {
        note.title.clone()
    }
}

fn leading_lines(text: &str, max_lines: usize) -> String {
    text.lines().take(max_lines).collect::<Vec<_>>().join("\n")
}
