//! Command-line front end for the notepad core.
//!
//! # Responsibility
//! - Drive list/show/create/edit/toggle/delete against a local database.
//! - Print card previews the same way the app list renders them.
//!
//! # Invariants
//! - A collection that fails to load is reported, never overwritten.
//! - Exit code is non-zero on any storage, config or input failure.

use clap::{Parser, Subcommand};
use log::debug;
use notepad_core::db::open_db;
use notepad_core::{
    derive_preview, empty_list_reason, init_logging, viewer_title, CoreConfig, KvRepository,
    Note, NoteContent, NoteEditor, NoteFilter, NoteKind, NoteStore, PreviewBody,
    SqliteKvRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "notepad")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local notes with checklists, favorites and private notes")]
struct Cli {
    /// JSON config file (db_path, storage_key, log_level, log_dir)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file; overrides the config
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List notes, newest first
    List {
        /// Only favorite notes
        #[arg(long)]
        favorites: bool,

        /// Case-insensitive match on title or text body
        #[arg(long, short, default_value = "")]
        search: String,
    },

    /// Print one note in full, private or not
    Show { id: String },

    /// Create a text note
    AddText {
        #[arg(long, short, default_value = "")]
        title: String,

        #[arg(default_value = "")]
        body: String,

        #[arg(long)]
        private: bool,
    },

    /// Create a checklist note, one argument per item
    AddList {
        #[arg(long, short, default_value = "")]
        title: String,

        items: Vec<String>,

        #[arg(long)]
        private: bool,
    },

    /// Edit an existing note
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Replace the body of a text note
        #[arg(long)]
        body: Option<String>,

        /// Append item(s) to a checklist note
        #[arg(long = "add-item", value_name = "TEXT")]
        add_items: Vec<String>,
    },

    /// Delete a note
    Delete { id: String },

    /// Toggle the favorite flag
    Favorite { id: String },

    /// Toggle the private flag
    Private { id: String },

    /// Toggle one checklist item
    Check { id: String, item: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    debug!(
        "event=cli_start module=cli status=ok db_path={} storage_key={}",
        config.db_path.display(),
        config.storage_key
    );
    let conn = open_db(&config.db_path)?;
    let repo = SqliteKvRepository::try_new(&conn)?;
    let mut store = NoteStore::with_storage_key(repo, config.storage_key.as_str());
    store.load()?;

    match cli.command {
        Command::List { favorites, search } => list(&store, NoteFilter::new(favorites, search)),
        Command::Show { id } => {
            let id = parse_id(&id)?;
            let note = store
                .get_note(id)
                .ok_or_else(|| format!("no note with id {id}"))?;
            print_full(note);
            Ok(())
        }
        Command::AddText {
            title,
            body,
            private,
        } => {
            let mut editor = NoteEditor::new(NoteKind::Text);
            editor.set_title(title);
            editor.set_text(body);
            if private {
                editor.toggle_private();
            }
            report(editor.commit(&mut store)?, "created")
        }
        Command::AddList {
            title,
            items,
            private,
        } => {
            let mut editor = NoteEditor::new(NoteKind::Checklist);
            editor.set_title(title);
            fill_items(&mut editor, items);
            if private {
                editor.toggle_private();
            }
            report(editor.commit(&mut store)?, "created")
        }
        Command::Edit {
            id,
            title,
            body,
            add_items,
        } => {
            let id = parse_id(&id)?;
            let note = store
                .get_note(id)
                .ok_or_else(|| format!("no note with id {id}"))?;
            let mut editor = NoteEditor::edit(note);
            if let Some(title) = title {
                editor.set_title(title);
            }
            if let Some(body) = body {
                if editor.kind() != NoteKind::Text {
                    return Err("--body only applies to text notes".into());
                }
                editor.set_text(body);
            }
            if !add_items.is_empty() {
                if editor.kind() != NoteKind::Checklist {
                    return Err("--add-item only applies to checklist notes".into());
                }
                for text in add_items {
                    let item = editor.add_item();
                    editor.set_item_text(item, text);
                }
            }
            report(editor.commit(&mut store)?, "updated")
        }
        Command::Delete { id } => report(store.delete_note(parse_id(&id)?)?, "deleted"),
        Command::Favorite { id } => report(store.toggle_favorite(parse_id(&id)?)?, "updated"),
        Command::Private { id } => report(store.toggle_private(parse_id(&id)?)?, "updated"),
        Command::Check { id, item } => {
            let note_id = parse_id(&id)?;
            let item_id = parse_id(&item)?;
            report(store.toggle_checklist_item(note_id, item_id)?, "updated")
        }
    }
}

fn list<R: KvRepository>(store: &NoteStore<R>, filter: NoteFilter) -> CliResult<()> {
    let visible = store.visible_notes(&filter);
    if visible.is_empty() {
        println!("{}", empty_list_reason(&filter).message());
        return Ok(());
    }

    for note in visible {
        let preview = derive_preview(note);
        let star = if preview.is_favorite { "*" } else { " " };
        println!(
            "{star} {}  {}  {}",
            preview.note_id,
            preview.date.format("%Y-%m-%d %H:%M"),
            preview.title
        );
        match preview.body {
            PreviewBody::Hidden => println!("    [private]"),
            PreviewBody::Text(text) => {
                for line in text.lines() {
                    println!("    {line}");
                }
            }
            PreviewBody::Checklist {
                items,
                remaining,
                checked,
                total,
            } => {
                for item in items {
                    println!("    [{}] {}", if item.is_checked { "x" } else { " " }, item.text);
                }
                if remaining > 0 {
                    println!("    +{remaining} more");
                }
                println!("    {checked}/{total} done");
            }
        }
    }
    Ok(())
}

fn print_full(note: &Note) {
    println!("{}", viewer_title(note));
    println!("id: {}", note.id);
    println!("date: {}", note.date.to_rfc3339());
    println!(
        "favorite: {}  private: {}",
        note.is_favorite, note.is_private
    );
    println!();
    match &note.content {
        NoteContent::Text(body) => println!("{body}"),
        NoteContent::Checklist(items) => {
            for item in items {
                let mark = if item.is_checked { "x" } else { " " };
                println!("[{mark}] {}  ({})", item.text, item.id);
            }
        }
    }
}

/// Reuses the editor's starting blank item for the first line.
fn fill_items(editor: &mut NoteEditor, items: Vec<String>) {
    for (idx, text) in items.into_iter().enumerate() {
        let id = match editor.items().first() {
            Some(first) if idx == 0 => first.id,
            _ => editor.add_item(),
        };
        editor.set_item_text(id, text);
    }
}

fn report(outcome: Option<Note>, verb: &str) -> CliResult<()> {
    match outcome {
        Some(note) => println!("{verb} {}", note.id),
        None => println!("nothing changed"),
    }
    Ok(())
}

fn parse_id(raw: &str) -> CliResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid id `{raw}`").into())
}
