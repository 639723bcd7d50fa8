use chrono::{TimeZone, Utc};
use notepad_core::{ChecklistItem, Note, NoteContent, NoteDraft, NoteKind, NoteValidationError};
use serde_json::json;
use uuid::Uuid;

fn fixed_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap()
}

#[test]
fn from_draft_sets_defaults() {
    let note = Note::from_draft(NoteDraft::text("Hello", "").private(true), fixed_date());

    assert!(!note.id.is_nil());
    assert_eq!(note.kind(), NoteKind::Text);
    assert_eq!(note.title, "Hello");
    assert!(note.is_private);
    assert!(!note.is_favorite);
    assert_eq!(note.date, fixed_date());
}

#[test]
fn text_note_serializes_with_camel_case_wire_fields() {
    let mut note = Note::from_draft(NoteDraft::text("Trip", "pack bags"), fixed_date());
    note.is_favorite = true;

    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(value["id"], note.id.to_string());
    assert_eq!(value["type"], "text");
    assert_eq!(value["content"], "pack bags");
    assert_eq!(value["isPrivate"], false);
    assert_eq!(value["isFavorite"], true);
    assert_eq!(value["date"], "2026-02-13T10:00:00Z");

    let decoded: Note = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn checklist_note_serializes_items_in_order() {
    let note = Note::from_draft(NoteDraft::checklist("Shop", ["Milk", "Eggs"]), fixed_date());

    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(value["type"], "checklist");
    assert_eq!(value["content"][0]["text"], "Milk");
    assert_eq!(value["content"][0]["isChecked"], false);
    assert_eq!(value["content"][1]["text"], "Eggs");
}

#[test]
fn decode_rejects_content_that_disagrees_with_type() {
    let value = json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "broken",
        "type": "checklist",
        "content": "not a list",
        "isPrivate": false,
        "isFavorite": false,
        "date": "2026-02-13T10:00:00.000Z"
    });

    let err = serde_json::from_value::<Note>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("does not match declared type `checklist`"),
        "unexpected error: {err}"
    );
}

#[test]
fn decode_rejects_nil_id() {
    let value = json!({
        "id": Uuid::nil().to_string(),
        "type": "text",
        "content": "",
        "date": "2026-02-13T10:00:00Z"
    });

    let err = serde_json::from_value::<Note>(value).unwrap_err();
    assert!(err.to_string().contains("nil"), "unexpected error: {err}");
}

#[test]
fn decode_fills_defaults_and_tolerates_null_checklist_content() {
    let value = json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "type": "checklist",
        "content": null,
        "date": "2026-02-13T10:00:00.000Z"
    });

    let note: Note = serde_json::from_value(value).unwrap();
    assert_eq!(note.title, "");
    assert_eq!(note.content, NoteContent::Checklist(Vec::new()));
    assert!(!note.is_private);
    assert!(!note.is_favorite);
    assert_eq!(note.date, fixed_date());
}

#[test]
fn save_gate_follows_title_or_content() {
    assert!(!NoteDraft::text("", "").is_savable());
    assert!(!NoteDraft::text("  ", "\n\t").is_savable());
    assert!(NoteDraft::text("Hello", "").is_savable());
    assert!(NoteDraft::text("", "body").is_savable());
    assert!(!NoteDraft::checklist("", [""]).is_savable());
    assert!(!NoteDraft::checklist("", ["   "]).is_savable());
    assert!(NoteDraft::checklist("", ["Milk"]).is_savable());
}

#[test]
fn checklist_items_get_distinct_ids() {
    let first = ChecklistItem::new("a");
    let second = ChecklistItem::new("a");
    assert_ne!(first.id, second.id);
}

#[test]
fn decode_rejects_repeated_checklist_item_ids() {
    let value = json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "type": "checklist",
        "content": [
            {"id": "aaaaaaaa-2222-4333-8444-555555555555", "text": "Milk", "isChecked": false},
            {"id": "aaaaaaaa-2222-4333-8444-555555555555", "text": "Eggs", "isChecked": true}
        ],
        "date": "2026-02-13T10:00:00Z"
    });

    let err = serde_json::from_value::<Note>(value).unwrap_err();
    assert!(
        err.to_string()
            .contains("`aaaaaaaa-2222-4333-8444-555555555555` appears more than once"),
        "unexpected error: {err}"
    );
}

#[test]
fn decode_rejects_nil_checklist_item_id() {
    let value = json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "type": "checklist",
        "content": [{"id": Uuid::nil().to_string(), "text": "Milk"}],
        "date": "2026-02-13T10:00:00Z"
    });

    let err = serde_json::from_value::<Note>(value).unwrap_err();
    assert!(
        err.to_string().contains("checklist item id must not be nil"),
        "unexpected error: {err}"
    );
}

#[test]
fn item_id_errors_name_the_offending_id() {
    let item_id = Uuid::new_v4();
    let err = NoteValidationError::DuplicateItemId { item_id };
    assert!(err.to_string().contains(&item_id.to_string()));
}
