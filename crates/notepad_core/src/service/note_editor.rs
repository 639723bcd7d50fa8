//! Editor draft staging.
//!
//! # Responsibility
//! - Hold the unsaved state of the note being created or edited.
//! - Decide whether the draft may be committed, then commit it.
//!
//! # Invariants
//! - Nothing reaches the store before `commit`.
//! - Text and checklist buffers are kept separately; switching kind never
//!   discards the other buffer.
//! - `commit` borrows the editor, so a failed write keeps the draft.

use crate::model::note::{
    ChecklistItem, ChecklistItemId, Note, NoteContent, NoteDraft, NoteId, NoteKind,
};
use crate::repo::kv_repo::KvRepository;
use crate::service::note_store::{NoteStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditor {
    editing: Option<NoteId>,
    title: String,
    text: String,
    items: Vec<ChecklistItem>,
    kind: NoteKind,
    is_private: bool,
}

impl NoteEditor {
    /// Starts a new note. Checklists open with one blank item to type into.
    pub fn new(kind: NoteKind) -> Self {
        let items = match kind {
            NoteKind::Text => Vec::new(),
            NoteKind::Checklist => vec![ChecklistItem::new("")],
        };
        Self {
            editing: None,
            title: String::new(),
            text: String::new(),
            items,
            kind,
            is_private: false,
        }
    }

    /// Starts editing an existing note.
    pub fn edit(note: &Note) -> Self {
        let (text, items) = match &note.content {
            NoteContent::Text(body) => (body.clone(), Vec::new()),
            NoteContent::Checklist(items) => (String::new(), items.clone()),
        };
        Self {
            editing: Some(note.id),
            title: note.title.clone(),
            text,
            items,
            kind: note.kind(),
            is_private: note.is_private,
        }
    }

    /// Id of the note being edited, `None` for a new note.
    pub fn editing_id(&self) -> Option<NoteId> {
        self.editing
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            NoteKind::Text => NoteKind::Checklist,
            NoteKind::Checklist => NoteKind::Text,
        };
    }

    pub fn toggle_private(&mut self) {
        self.is_private = !self.is_private;
    }

    /// Appends a blank item and returns its id.
    pub fn add_item(&mut self) -> ChecklistItemId {
        let item = ChecklistItem::new("");
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Returns `false` when no item has `id`.
    pub fn set_item_text(&mut self, id: ChecklistItemId, text: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no item has `id`.
    pub fn remove_item(&mut self, id: ChecklistItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Save-gate over the active buffer.
    pub fn can_save(&self) -> bool {
        self.to_draft().is_savable()
    }

    /// Draft for the active kind, blank checklist items dropped.
    pub fn to_draft(&self) -> NoteDraft {
        let content = match self.kind {
            NoteKind::Text => NoteContent::Text(self.text.clone()),
            NoteKind::Checklist => NoteContent::Checklist(self.items.clone()),
        };
        NoteDraft {
            title: self.title.clone(),
            content,
            is_private: self.is_private,
        }
        .normalized()
    }

    /// Creates or updates the note in `store`.
    ///
    /// Returns `Ok(None)` when the draft is not savable or the edited note
    /// no longer exists.
    pub fn commit<R: KvRepository>(&self, store: &mut NoteStore<R>) -> StoreResult<Option<Note>> {
        match self.editing {
            Some(id) => store.update_note(id, self.to_draft()),
            None => store.create_note(self.to_draft()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteEditor;
    use crate::model::note::NoteKind;

    #[test]
    fn new_checklist_starts_with_one_blank_item() {
        let editor = NoteEditor::new(NoteKind::Checklist);
        assert_eq!(editor.items().len(), 1);
        assert!(!editor.can_save());
    }

    #[test]
    fn toggling_kind_keeps_both_buffers() {
        let mut editor = NoteEditor::new(NoteKind::Text);
        editor.set_text("body");
        editor.toggle_kind();
        let id = editor.add_item();
        assert!(editor.set_item_text(id, "eggs"));
        editor.toggle_kind();

        assert_eq!(editor.kind(), NoteKind::Text);
        assert_eq!(editor.text(), "body");
        assert_eq!(editor.items().len(), 1);
    }
}
