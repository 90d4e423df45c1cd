//! Note persistence contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the owner-partitioned note store used by the dialog layer.
//! - Keep SQL details behind the `NoteRepository` trait.
//!
//! # Invariants
//! - Every read and delete is scoped by `owner_id`.
//! - One statement per operation, auto-committed.

pub mod note_repo;
