//! Domain model for persisted notes.
//!
//! # Invariants
//! - Every note is identified by a store-issued `NoteId`, unique across owners.
//! - A note's owner never changes after creation.

pub mod note;
