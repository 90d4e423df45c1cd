//! Per-user note-entry dialog.
//!
//! # Responsibility
//! - Track whether each user is idle or mid note-entry.
//! - Turn inbound events into note store calls and reply directives.
//!
//! # Invariants
//! - Events of one user never run concurrently; events of different users
//!   never wait on each other's store calls.
//! - Leaving `AwaitingNoteText` after note text happens only once the note
//!   was persisted.

mod controller;
mod format;
pub mod menu;
mod session;

pub use controller::{DialogController, DialogError, Event, Reply};
pub use menu::{MenuAction, MenuHint};
pub use session::DialogMode;
