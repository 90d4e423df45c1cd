//! Note record as stored and listed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-issued note identifier (SQLite rowid, never reused).
pub type NoteId = i64;

/// Opaque chat user identifier supplied by the transport.
pub type OwnerId = i64;

/// One persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: OwnerId,
    /// Free text exactly as the user sent it.
    pub content: String,
    /// Unix epoch milliseconds, assigned by the store at insert time.
    pub created_at: i64,
}

impl Note {
    /// Creation time as a UTC timestamp.
    ///
    /// Returns `None` only for values outside chrono's representable range.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.created_at)
    }
}
