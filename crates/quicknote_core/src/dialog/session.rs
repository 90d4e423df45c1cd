//! In-memory per-user dialog modes.
//!
//! # Invariants
//! - A user without an entry is `Idle`; entries live only for the process.
//! - Each user has one `Mutex` slot; holding it serializes that user's events.
//! - The map shard lock is released before a slot mutex is taken, so one
//!   user's slow event never blocks lookups for other users.

use crate::model::note::OwnerId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Conversation mode of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogMode {
    #[default]
    Idle,
    AwaitingNoteText,
}

type Slot = Arc<Mutex<DialogMode>>;

/// In-memory dialog modes keyed by user.
///
/// A user without an entry is `Idle`. Each user gets their own mutex so a
/// long store call for one user does not block anybody else; the map shard
/// lock is only held while the slot is looked up.
#[derive(Default)]
pub(crate) struct SessionMap {
    slots: DashMap<OwnerId, Slot>,
}

impl SessionMap {
    /// Returns the user's slot, creating an idle one on first contact.
    pub(crate) fn slot(&self, owner_id: OwnerId) -> Slot {
        let entry = self.slots.entry(owner_id).or_default();
        Arc::clone(entry.value())
    }

    pub(crate) fn mode(&self, owner_id: OwnerId) -> DialogMode {
        // Clone the slot first so the shard guard is released before locking.
        let slot = self.slots.get(&owner_id).map(|entry| Arc::clone(entry.value()));
        slot.map(|slot| *slot.lock()).unwrap_or_default()
    }
}
