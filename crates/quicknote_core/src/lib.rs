//! Core domain logic for QuickNote.
//! The note store and the per-user dialog live here; chat transports only
//! translate updates into [`Event`]s and render [`Reply`]s.

pub mod db;
pub mod dialog;
pub mod logging;
pub mod model;
pub mod repo;

pub use dialog::{DialogController, DialogError, DialogMode, Event, MenuAction, MenuHint, Reply};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, OwnerId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
