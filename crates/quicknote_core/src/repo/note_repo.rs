//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert notes with store-issued ids and timestamps.
//! - List an owner's notes newest first.
//! - Delete a note only on behalf of its owner.
//!
//! # Invariants
//! - Ids come from SQLite `AUTOINCREMENT`; application code never picks one.
//! - `delete_note` reports `false` for both missing and foreign notes.
//! - The connection is only touched while its mutex is held.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, OwnerId};
use log::debug;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure surfaced by note repository operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
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

/// Owner-partitioned note store.
///
/// Implementations must be safe to share between concurrently handled chat
/// updates.
pub trait NoteRepository: Send + Sync {
    /// Inserts one note and returns its freshly issued id.
    fn create_note(&self, owner_id: OwnerId, content: &str) -> RepoResult<NoteId>;
    /// Lists every note of `owner_id`, most recent first.
    fn list_notes(&self, owner_id: OwnerId) -> RepoResult<Vec<Note>>;
    /// Deletes note `id` if and only if it belongs to `owner_id`.
    fn delete_note(&self, owner_id: OwnerId, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note store with serialized connection access.
pub struct SqliteNoteRepository {
    conn: Mutex<Connection>,
}

impl SqliteNoteRepository {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    ///
    /// Fails with `InvalidData` when the `notes` table is missing, which means
    /// the connection skipped migrations.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_notes_table(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn create_note(&self, owner_id: OwnerId, content: &str) -> RepoResult<NoteId> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO notes (owner_id, content) VALUES (?1, ?2);",
            params![owner_id, content],
        )?;
        // Read under the same lock so a concurrent insert cannot interleave.
        let id = conn.last_insert_rowid();
        debug!("event=note_insert module=repo status=ok owner_id={owner_id} note_id={id}");
        Ok(id)
    }

    fn list_notes(&self, owner_id: OwnerId) -> RepoResult<Vec<Note>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, content, created_at
             FROM notes
             WHERE owner_id = ?1
             ORDER BY created_at DESC, id DESC;",
        )?;
        let mut rows = stmt.query([owner_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, owner_id: OwnerId, id: NoteId) -> RepoResult<bool> {
        let changed = self.conn.lock().execute(
            "DELETE FROM notes WHERE id = ?1 AND owner_id = ?2;",
            params![id, owner_id],
        )?;
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_notes_table(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'notes'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::InvalidData(
            "required table `notes` is missing; run migrations first".to_string(),
        ))
    }
}
