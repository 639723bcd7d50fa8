//! FFI use-case API for the Flutter notepad screen.
//!
//! # Responsibility
//! - Expose note list/create/update/delete/toggle calls to Dart via FRB.
//! - Translate store outcomes into flat envelopes the UI can branch on.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Every call opens the configured database, loads the collection, and
//!   drops both before returning; no store state outlives a call.
//! - `ok=false` only for storage or input failures. Unknown ids and empty
//!   drafts are `ok=true` with no note.

use notepad_core::config::DEFAULT_DB_FILE_NAME;
use notepad_core::db::open_db;
use notepad_core::{
    core_version as core_version_inner, empty_list_reason, init_logging as init_logging_inner,
    ping as ping_inner, ChecklistItem, Note, NoteContent, NoteDraft, NoteFilter, NoteStore,
    SqliteKvRepository, StoreError, DEFAULT_STORAGE_KEY,
};
use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// # FFI contract
/// - Call once at startup with an absolute path inside app storage.
/// - Repeating the same path is a no-op; a different path is rejected.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "store already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// Flat view of one checklist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub id: String,
    pub text: String,
    pub is_checked: bool,
}

/// Checklist line sent by the editor. `id` is `None` for lines typed in
/// this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntryInput {
    pub id: Option<String>,
    pub text: String,
    pub is_checked: bool,
}

/// Flat view of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    /// `text|checklist`.
    pub kind: String,
    /// Body of a text note; `None` for checklists.
    pub text: Option<String>,
    /// Items of a checklist note; empty for text notes.
    pub checklist: Vec<ChecklistEntry>,
    pub is_private: bool,
    pub is_favorite: bool,
    /// RFC 3339 timestamp of the last save.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    /// Empty-state text when `items` is empty, diagnostics on failure.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Note after the change; `None` when nothing changed.
    pub note: Option<NoteItem>,
    pub message: String,
}

impl NoteActionResponse {
    fn from_outcome(op: &str, outcome: Result<Option<Note>, String>) -> Self {
        match outcome {
            Ok(Some(note)) => Self {
                ok: true,
                note: Some(to_note_item(&note)),
                message: "Done.".to_string(),
            },
            Ok(None) => Self {
                ok: true,
                note: None,
                message: "Nothing changed.".to_string(),
            },
            Err(err) => Self {
                ok: false,
                note: None,
                message: format!("{op} failed: {err}"),
            },
        }
    }
}

/// Lists visible notes for the given view state.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(favorites_only: bool, search_text: String) -> NotesListResponse {
    let filter = NoteFilter::new(favorites_only, search_text);
    let listed = with_note_store(|store| {
        Ok(store
            .visible_notes(&filter)
            .into_iter()
            .map(to_note_item)
            .collect::<Vec<_>>())
    });

    match listed {
        Ok(items) => {
            let message = if items.is_empty() {
                empty_list_reason(&filter).message().to_string()
            } else {
                String::new()
            };
            NotesListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_create_text(title: String, body: String, is_private: bool) -> NoteActionResponse {
    let draft = NoteDraft::text(title, body).private(is_private);
    NoteActionResponse::from_outcome(
        "note_create_text",
        with_note_store(|store| store.create_note(draft).map_err(store_error)),
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_create_checklist(
    title: String,
    items: Vec<ChecklistEntryInput>,
    is_private: bool,
) -> NoteActionResponse {
    let outcome = to_checklist_draft(title, items, is_private)
        .and_then(|draft| with_note_store(|store| store.create_note(draft).map_err(store_error)));
    NoteActionResponse::from_outcome("note_create_checklist", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_update_text(
    note_id: String,
    title: String,
    body: String,
    is_private: bool,
) -> NoteActionResponse {
    let draft = NoteDraft::text(title, body).private(is_private);
    let outcome = parse_id(&note_id).and_then(|id| {
        with_note_store(|store| store.update_note(id, draft).map_err(store_error))
    });
    NoteActionResponse::from_outcome("note_update_text", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_update_checklist(
    note_id: String,
    title: String,
    items: Vec<ChecklistEntryInput>,
    is_private: bool,
) -> NoteActionResponse {
    let outcome = parse_id(&note_id).and_then(|id| {
        let draft = to_checklist_draft(title, items, is_private)?;
        with_note_store(|store| store.update_note(id, draft).map_err(store_error))
    });
    NoteActionResponse::from_outcome("note_update_checklist", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(note_id: String) -> NoteActionResponse {
    let outcome = parse_id(&note_id)
        .and_then(|id| with_note_store(|store| store.delete_note(id).map_err(store_error)));
    NoteActionResponse::from_outcome("note_delete", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_favorite(note_id: String) -> NoteActionResponse {
    let outcome = parse_id(&note_id)
        .and_then(|id| with_note_store(|store| store.toggle_favorite(id).map_err(store_error)));
    NoteActionResponse::from_outcome("note_toggle_favorite", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_private(note_id: String) -> NoteActionResponse {
    let outcome = parse_id(&note_id)
        .and_then(|id| with_note_store(|store| store.toggle_private(id).map_err(store_error)));
    NoteActionResponse::from_outcome("note_toggle_private", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_toggle_checklist_item(note_id: String, item_id: String) -> NoteActionResponse {
    let outcome = parse_id(&note_id).and_then(|note_id| {
        let item_id = parse_id(&item_id)?;
        with_note_store(|store| {
            store
                .toggle_checklist_item(note_id, item_id)
                .map_err(store_error)
        })
    });
    NoteActionResponse::from_outcome("note_toggle_checklist_item", outcome)
}

fn with_note_store<T, F>(f: F) -> Result<T, String>
where
    F: for<'conn> FnOnce(&mut NoteStore<SqliteKvRepository<'conn>>) -> Result<T, String>,
{
    let conn = open_db(resolve_db_path()).map_err(|err| {
        error!("event=ffi_store_open module=ffi status=error error={err}");
        err.to_string()
    })?;
    let repo = SqliteKvRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let mut store = NoteStore::open(repo, DEFAULT_STORAGE_KEY);
    f(&mut store)
}

fn resolve_db_path() -> PathBuf {
    STORE_DB_PATH
        .get()
        .cloned()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

fn store_error(err: StoreError) -> String {
    err.to_string()
}

fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{raw}`"))
}

fn to_checklist_draft(
    title: String,
    items: Vec<ChecklistEntryInput>,
    is_private: bool,
) -> Result<NoteDraft, String> {
    let items = items
        .into_iter()
        .map(|entry| {
            let id = match entry.id.as_deref() {
                Some(raw) => parse_id(raw)?,
                None => Uuid::new_v4(),
            };
            Ok(ChecklistItem {
                id,
                text: entry.text,
                is_checked: entry.is_checked,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(NoteDraft {
        title,
        content: NoteContent::Checklist(items),
        is_private,
    })
}

fn to_note_item(note: &Note) -> NoteItem {
    let (text, checklist) = match &note.content {
        NoteContent::Text(body) => (Some(body.clone()), Vec::new()),
        NoteContent::Checklist(items) => (
            None,
            items
                .iter()
                .map(|item| ChecklistEntry {
                    id: item.id.to_string(),
                    text: item.text.clone(),
                    is_checked: item.is_checked,
                })
                .collect(),
        ),
    };

    NoteItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        kind: note.kind().as_str().to_string(),
        text,
        checklist,
        is_private: note.is_private,
        is_favorite: note.is_favorite,
        date: note.date.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store, note_create_checklist, note_create_text, note_delete,
        note_toggle_checklist_item, note_toggle_favorite, note_update_text, notes_list, parse_id,
        ChecklistEntryInput,
    };

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").unwrap_err().contains("invalid id"));
        assert!(parse_id(" 11111111-2222-4333-8444-555555555555 ").is_ok());
    }

    #[test]
    fn note_lifecycle_through_envelopes() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ffi.sqlite3");
        let db_path = db_path.to_str().unwrap().to_string();
        assert_eq!(configure_store(db_path.clone()), "");
        assert_eq!(configure_store(db_path), "");

        let empty = note_create_text(String::new(), "  ".to_string(), false);
        assert!(empty.ok);
        assert!(empty.note.is_none());

        let created = note_create_text("Trip".to_string(), "pack".to_string(), false);
        let trip = created.note.unwrap();
        assert_eq!(trip.kind, "text");

        let list = note_create_checklist(
            "Shop".to_string(),
            vec![
                ChecklistEntryInput {
                    id: None,
                    text: "Milk".to_string(),
                    is_checked: false,
                },
                ChecklistEntryInput {
                    id: None,
                    text: " ".to_string(),
                    is_checked: false,
                },
            ],
            false,
        )
        .note
        .unwrap();
        assert_eq!(list.checklist.len(), 1);

        let toggled = note_toggle_checklist_item(list.id.clone(), list.checklist[0].id.clone());
        assert!(toggled.note.unwrap().checklist[0].is_checked);

        let shared = "11111111-2222-4333-8444-555555555555".to_string();
        let entry = |id: &str, text: &str| ChecklistEntryInput {
            id: Some(id.to_string()),
            text: text.to_string(),
            is_checked: false,
        };
        let dup = note_create_checklist(
            "Dup".to_string(),
            vec![
                entry(&shared, "Milk"),
                entry(&shared, "Eggs"),
                entry("00000000-0000-0000-0000-000000000000", "Bread"),
            ],
            false,
        )
        .note
        .unwrap();
        let ids: Vec<&str> = dup.checklist.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids[0], shared);
        assert_ne!(ids[1], shared);
        assert_ne!(ids[2], "00000000-0000-0000-0000-000000000000");
        assert_ne!(ids[1], ids[2]);

        let second = note_toggle_checklist_item(dup.id.clone(), ids[1].to_string());
        let checked: Vec<bool> = second
            .note
            .unwrap()
            .checklist
            .iter()
            .map(|item| item.is_checked)
            .collect();
        assert_eq!(checked, vec![false, true, false]);
        assert!(note_delete(dup.id.clone()).note.is_some());

        assert!(note_toggle_favorite(trip.id.clone()).note.unwrap().is_favorite);
        let favorites = notes_list(true, String::new());
        assert_eq!(favorites.items.len(), 1);
        assert_eq!(favorites.items[0].id, trip.id);

        let renamed = note_update_text(
            trip.id.clone(),
            "Road trip".to_string(),
            "pack".to_string(),
            true,
        );
        assert!(renamed.note.unwrap().is_private);

        assert!(note_delete(trip.id.clone()).note.is_some());
        let missing = note_delete(trip.id);
        assert!(missing.ok);
        assert!(missing.note.is_none());

        let none = notes_list(true, String::new());
        assert!(none.items.is_empty());
        assert_eq!(none.message, "You have no favorite notes.");

        let bad = note_toggle_favorite("nope".to_string());
        assert!(!bad.ok);
    }
}
