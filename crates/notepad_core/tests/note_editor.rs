use notepad_core::{
    derive_preview, viewer_title, KvRepository, NoteContent, NoteEditor, NoteKind, NoteStore,
    PreviewBody, RepoError, RepoResult,
};
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct ToggleableRepo {
    blob: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
}

impl KvRepository for ToggleableRepo {
    fn get_item(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(self.blob.borrow().clone())
    }

    fn set_item(&self, _key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Backend("disk full".to_string()));
        }
        *self.blob.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

#[test]
fn commit_creates_then_updates_existing_note() {
    let mut store = NoteStore::new(ToggleableRepo::default());

    let mut editor = NoteEditor::new(NoteKind::Checklist);
    let first = editor.items()[0].id;
    editor.set_item_text(first, "Milk");
    editor.add_item();
    editor.set_title("Shop");
    let created = editor.commit(&mut store).unwrap().unwrap();
    assert_eq!(created.content.checklist_items().unwrap().len(), 1);

    let mut editor = NoteEditor::edit(&created);
    assert_eq!(editor.editing_id(), Some(created.id));
    editor.toggle_kind();
    editor.set_text("now prose");
    let updated = editor.commit(&mut store).unwrap().unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.content, NoteContent::Text("now prose".to_string()));
    assert_eq!(store.notes().len(), 1);
}

#[test]
fn unsavable_draft_is_not_committed() {
    let mut store = NoteStore::new(ToggleableRepo::default());
    let mut editor = NoteEditor::new(NoteKind::Text);
    editor.set_text("   ");

    assert!(!editor.can_save());
    assert_eq!(editor.commit(&mut store).unwrap(), None);
    assert!(store.notes().is_empty());
}

#[test]
fn failed_commit_keeps_draft_for_retry() {
    let mut store = NoteStore::new(ToggleableRepo::default());
    let mut editor = NoteEditor::new(NoteKind::Text);
    editor.set_title("Keep me");
    editor.toggle_private();

    store.repo().fail_writes.set(true);
    assert!(editor.commit(&mut store).is_err());
    assert_eq!(editor.title(), "Keep me");
    assert!(store.notes().is_empty());

    store.repo().fail_writes.set(false);
    let created = editor.commit(&mut store).unwrap().unwrap();
    assert!(created.is_private);
}

#[test]
fn editing_text_note_starts_without_checklist_items() {
    let mut store = NoteStore::new(ToggleableRepo::default());
    let mut editor = NoteEditor::new(NoteKind::Text);
    editor.set_text("body");
    let note = editor.commit(&mut store).unwrap().unwrap();

    let mut editor = NoteEditor::edit(&note);
    editor.toggle_kind();
    assert!(editor.items().is_empty());
    assert!(!editor.can_save());
    assert!(!editor.remove_item(uuid::Uuid::new_v4()));
}

#[test]
fn preview_hides_private_body_and_caps_checklist() {
    let mut store = NoteStore::new(ToggleableRepo::default());
    let mut editor = NoteEditor::new(NoteKind::Checklist);
    editor.remove_item(editor.items()[0].id);
    for text in ["a", "b", "c", "d", "e", "f"] {
        let id = editor.add_item();
        editor.set_item_text(id, text);
    }
    let list = editor.commit(&mut store).unwrap().unwrap();
    let third = list.content.checklist_items().unwrap()[2].id;
    let list = store.toggle_checklist_item(list.id, third).unwrap().unwrap();

    let preview = derive_preview(&list);
    assert_eq!(preview.title, "Untitled Note");
    assert_eq!(viewer_title(&list), "Note");
    match preview.body {
        PreviewBody::Checklist {
            items,
            remaining,
            checked,
            total,
        } => {
            assert_eq!(items.len(), 4);
            assert_eq!(remaining, 2);
            assert_eq!(checked, 1);
            assert_eq!(total, 6);
        }
        other => panic!("unexpected preview body: {other:?}"),
    }

    let hidden = store.toggle_private(list.id).unwrap().unwrap();
    assert_eq!(derive_preview(&hidden).body, PreviewBody::Hidden);
}
