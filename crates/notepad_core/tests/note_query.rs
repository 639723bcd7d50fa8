use chrono::Utc;
use notepad_core::{empty_list_reason, filter_notes, EmptyListReason, Note, NoteDraft, NoteFilter};

fn note(title: &str, body: &str, favorite: bool) -> Note {
    let mut note = Note::from_draft(NoteDraft::text(title, body), Utc::now());
    note.is_favorite = favorite;
    note
}

fn titles(notes: &[&Note]) -> Vec<String> {
    notes.iter().map(|note| note.title.clone()).collect()
}

#[test]
fn favorites_and_search_compose() {
    let notes = vec![note("Trip", "", true), note("Work", "", false)];

    let favorites = filter_notes(&notes, &NoteFilter::new(true, ""));
    assert_eq!(titles(&favorites), vec!["Trip"]);

    let searched = filter_notes(&notes, &NoteFilter::new(false, "work"));
    assert_eq!(titles(&searched), vec!["Work"]);

    let both = filter_notes(&notes, &NoteFilter::new(true, "work"));
    assert!(both.is_empty());
}

#[test]
fn search_is_case_insensitive_over_title_and_text_body() {
    let notes = vec![
        note("Groceries", "buy OAT milk", false),
        note("oatmeal recipe", "", false),
        note("Unrelated", "nothing here", false),
    ];

    let hits = filter_notes(&notes, &NoteFilter::new(false, "OAT"));
    assert_eq!(titles(&hits), vec!["Groceries", "oatmeal recipe"]);
}

#[test]
fn checklist_item_text_is_not_searched() {
    let list = Note::from_draft(NoteDraft::checklist("Shopping", ["Bananas"]), Utc::now());
    let notes = vec![list];

    assert!(filter_notes(&notes, &NoteFilter::new(false, "banana")).is_empty());
    assert_eq!(
        filter_notes(&notes, &NoteFilter::new(false, "shop")).len(),
        1
    );
}

#[test]
fn blank_search_keeps_everything_in_order() {
    let notes = vec![note("c", "", false), note("a", "", true), note("b", "", false)];

    let visible = filter_notes(&notes, &NoteFilter::new(false, "   "));
    assert_eq!(titles(&visible), vec!["c", "a", "b"]);
}

#[test]
fn search_keeps_inner_whitespace_of_query() {
    let notes = vec![note("road trip", "", false), note("roadtrip", "", false)];

    let hits = filter_notes(&notes, &NoteFilter::new(false, "road trip"));
    assert_eq!(titles(&hits), vec!["road trip"]);
}

#[test]
fn filtering_is_pure() {
    let notes = vec![note("Trip", "x", true), note("Work", "y", false)];
    let filter = NoteFilter::new(false, "t");

    let first = titles(&filter_notes(&notes, &filter));
    let second = titles(&filter_notes(&notes, &filter));
    assert_eq!(first, second);
}

#[test]
fn empty_list_reason_prefers_search_then_favorites() {
    assert_eq!(
        empty_list_reason(&NoteFilter::new(true, "x")),
        EmptyListReason::NoSearchMatches
    );
    assert_eq!(
        empty_list_reason(&NoteFilter::new(true, "")),
        EmptyListReason::NoFavorites
    );
    assert_eq!(
        empty_list_reason(&NoteFilter::default()).message(),
        "Create your first note!"
    );
}
