//! Favorites and substring filtering for the note list.
//!
//! # Invariants
//! - Filtering never reorders; output order is input order.
//! - Only titles and text-note bodies are searched. Checklist item text is
//!   not matched.
//! - A search string that is blank after trimming disables text matching.

use crate::model::note::Note;

/// View parameters for the note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub favorites_only: bool,
    /// Raw search box contents.
    pub search_text: String,
}

impl NoteFilter {
    pub fn new(favorites_only: bool, search_text: impl Into<String>) -> Self {
        Self {
            favorites_only,
            search_text: search_text.into(),
        }
    }

    /// Lowercased needle, or `None` when the search box is blank.
    ///
    /// Only emptiness is judged on the trimmed text; the needle itself keeps
    /// surrounding whitespace.
    fn needle(&self) -> Option<String> {
        if self.search_text.trim().is_empty() {
            None
        } else {
            Some(self.search_text.to_lowercase())
        }
    }
}

/// Returns the notes visible under `filter`, in collection order.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    let needle = filter.needle();
    notes
        .iter()
        .filter(|note| !filter.favorites_only || note.is_favorite)
        .filter(|note| {
            needle
                .as_deref()
                .map_or(true, |needle| matches_search(note, needle))
        })
        .collect()
}

fn matches_search(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note
            .content
            .as_text()
            .is_some_and(|body| body.to_lowercase().contains(needle))
}

/// Which empty-state a caller shows when the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyListReason {
    NoSearchMatches,
    NoFavorites,
    NoNotes,
}

impl EmptyListReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoSearchMatches => "No notes match your search.",
            Self::NoFavorites => "You have no favorite notes.",
            Self::NoNotes => "Create your first note!",
        }
    }
}

/// Picks the empty-state for `filter`.
///
/// Any non-empty search text wins, even whitespace.
pub fn empty_list_reason(filter: &NoteFilter) -> EmptyListReason {
    if !filter.search_text.is_empty() {
        EmptyListReason::NoSearchMatches
    } else if filter.favorites_only {
        EmptyListReason::NoFavorites
    } else {
        EmptyListReason::NoNotes
    }
}
