//! Key-value blob repository and its SQLite implementation.
//!
//! # Responsibility
//! - Store whole string blobs under fixed keys.
//! - Report storage failures as values; never panic.
//!
//! # Invariants
//! - A missing key reads as `None`, not as an error.
//! - `set_item` either replaces the whole value or leaves the old one intact.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_store";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The connection has not been migrated to a usable schema.
    NotReady(String),
    /// Failure from a non-SQLite backend.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotReady(message) => write!(f, "key-value store not ready: {message}"),
            Self::Backend(message) => write!(f, "key-value backend failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotReady(_) | Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string blobs addressed by key.
pub trait KvRepository {
    /// Reads the blob stored under `key`.
    fn get_item(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<R: KvRepository + ?Sized> KvRepository for &R {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_item(key, value)
    }
}

/// SQLite-backed key-value repository over the `kv_store` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `RepoError::NotReady` when the `kv_store` table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_kv_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

fn ensure_kv_table_ready(conn: &Connection) -> RepoResult<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;

    if !exists {
        return Err(RepoError::NotReady(format!(
            "table `{KV_TABLE}` is missing; open the database through db::open_db"
        )));
    }
    Ok(())
}
