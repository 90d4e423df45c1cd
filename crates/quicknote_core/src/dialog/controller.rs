//! Dialog controller: event dispatch and the note-entry state machine.
//!
//! # Invariants
//! - A user's slot mutex is held for the whole event, store calls included.
//! - `AwaitingNoteText` is only left through a successful `create_note`, a
//!   `Cancel`, or another successful command (which abandons the pending
//!   entry).
//! - Events run against a copy of the mode that is committed only on `Ok`,
//!   so validation, not-found and store failures never change the mode.

use super::format;
use super::menu::{self, MenuAction, MenuHint};
use super::session::{DialogMode, SessionMap};
use crate::model::note::{NoteId, OwnerId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inbound event, already parsed from the transport's raw update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start`: greeting plus the main menu.
    Start { first_name: Option<String> },
    /// `/new`: begin note entry.
    StartNote,
    /// Any text that is not a command: note body, menu label, or chatter.
    SubmitText(String),
    ListNotes,
    /// `/delete <argument>`; the argument is validated by the controller.
    DeleteNote { argument: String },
    Help,
    /// `/cancel`: abandon a pending note entry.
    Cancel,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::StartNote => "start_note",
            Self::SubmitText(_) => "submit_text",
            Self::ListNotes => "list_notes",
            Self::DeleteNote { .. } => "delete_note",
            Self::Help => "help",
            Self::Cancel => "cancel",
        }
    }
}

/// Response directive handed back to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub menu: MenuHint,
}

impl Reply {
    fn new(text: impl Into<String>, menu: MenuHint) -> Self {
        Self {
            text: text.into(),
            menu,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, MenuHint::None)
    }
}

/// Recoverable failure while handling one event.
///
/// Every variant is turned into a plain reply at the controller boundary;
/// callers of [`DialogController::handle`] never see it.
#[derive(Debug)]
pub enum DialogError {
    /// The delete argument is not a positive integer.
    Validation(String),
    /// The note does not exist or belongs to someone else.
    NotFound(NoteId),
    Storage(RepoError),
}

impl Display for DialogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(argument) => write!(f, "invalid note id argument `{argument}`"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DialogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DialogError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl DialogError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_failed",
        }
    }

    fn into_reply(self) -> Reply {
        match self {
            Self::Validation(_) => Reply::plain(format::DELETE_USAGE),
            Self::NotFound(_) => Reply::plain(format::NOT_FOUND),
            Self::Storage(_) => Reply::plain(format::STORAGE_FAILURE),
        }
    }
}

/// Owns every user's dialog mode and drives the note store.
pub struct DialogController<R: NoteRepository> {
    repo: R,
    sessions: SessionMap,
}

impl<R: NoteRepository> DialogController<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            sessions: SessionMap::default(),
        }
    }

    /// Current mode of `owner_id`; users never seen before are idle.
    pub fn mode(&self, owner_id: OwnerId) -> DialogMode {
        self.sessions.mode(owner_id)
    }

    /// Read access to the underlying store.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Handles one event for `owner_id` and returns the reply to send.
    ///
    /// Never fails: validation, not-found and storage problems become reply
    /// text. Concurrent calls for the same user are serialized.
    pub fn handle(&self, owner_id: OwnerId, event: Event) -> Reply {
        let slot = self.sessions.slot(owner_id);
        let mut mode = slot.lock();
        let event_name = event.name();
        let interrupts_entry = !matches!(event, Event::SubmitText(_) | Event::Cancel);

        let mut next = *mode;
        let result = self.dispatch(owner_id, &mut next, event);
        match result {
            Ok(reply) => {
                if interrupts_entry && *mode == DialogMode::AwaitingNoteText {
                    info!(
                        "event=note_entry_abandoned module=dialog status=ok owner_id={owner_id} interrupted_by={event_name}"
                    );
                }
                *mode = next;
                reply
            }
            Err(err) => {
                match &err {
                    DialogError::Storage(source) => error!(
                        "event=dialog_{event_name} module=dialog status=error owner_id={owner_id} error_code=storage_failed error={source}"
                    ),
                    other => info!(
                        "event=dialog_{event_name} module=dialog status=rejected owner_id={owner_id} reason={}",
                        other.code()
                    ),
                }
                err.into_reply()
            }
        }
    }

    fn dispatch(
        &self,
        owner_id: OwnerId,
        mode: &mut DialogMode,
        event: Event,
    ) -> Result<Reply, DialogError> {
        if *mode == DialogMode::AwaitingNoteText {
            // Free text is the note body, even when it equals a menu label.
            // Any other command abandons the pending entry; `handle` only
            // commits that when the command succeeds.
            match &event {
                Event::SubmitText(text) => return self.save_note(owner_id, mode, text),
                Event::Cancel => {}
                _ => *mode = DialogMode::Idle,
            }
        }

        match event {
            Event::Start { first_name } => Ok(self.home(first_name.as_deref())),
            Event::StartNote => Ok(self.begin_note(mode)),
            Event::ListNotes => self.list_notes(owner_id),
            Event::DeleteNote { argument } => self.delete_note(owner_id, &argument),
            Event::Help => Ok(Reply::plain(format::HELP)),
            Event::Cancel => Ok(self.cancel(owner_id, mode)),
            Event::SubmitText(text) => match menu::lookup(&text) {
                Some(action) => self.run_menu_action(owner_id, mode, action),
                None => Ok(Reply::plain(format::UNRECOGNIZED)),
            },
        }
    }

    fn run_menu_action(
        &self,
        owner_id: OwnerId,
        mode: &mut DialogMode,
        action: MenuAction,
    ) -> Result<Reply, DialogError> {
        match action {
            MenuAction::NewNote => Ok(self.begin_note(mode)),
            MenuAction::ListNotes => self.list_notes(owner_id),
            MenuAction::DeleteHint => Ok(Reply::plain(format::DELETE_USAGE)),
            MenuAction::Help => Ok(Reply::plain(format::HELP)),
            MenuAction::Home => Ok(self.home(None)),
        }
    }

    fn home(&self, first_name: Option<&str>) -> Reply {
        Reply::new(format::greeting(first_name), MenuHint::DefaultMenu)
    }

    fn begin_note(&self, mode: &mut DialogMode) -> Reply {
        *mode = DialogMode::AwaitingNoteText;
        Reply::plain(format::NOTE_PROMPT)
    }

    fn save_note(
        &self,
        owner_id: OwnerId,
        mode: &mut DialogMode,
        text: &str,
    ) -> Result<Reply, DialogError> {
        let id = self.repo.create_note(owner_id, text)?;
        *mode = DialogMode::Idle;
        info!(
            "event=note_create module=dialog status=ok owner_id={owner_id} note_id={id} content_chars={}",
            text.chars().count()
        );
        Ok(Reply::new(format::note_saved(id), MenuHint::PostNoteMenu))
    }

    fn list_notes(&self, owner_id: OwnerId) -> Result<Reply, DialogError> {
        let notes = self.repo.list_notes(owner_id)?;
        info!(
            "event=note_list module=dialog status=ok owner_id={owner_id} total={}",
            notes.len()
        );
        if notes.is_empty() {
            return Ok(Reply::plain(format::NO_NOTES));
        }
        Ok(Reply::plain(format::note_list(&notes)))
    }

    fn delete_note(&self, owner_id: OwnerId, argument: &str) -> Result<Reply, DialogError> {
        let id = parse_note_id(argument)?;
        if !self.repo.delete_note(owner_id, id)? {
            return Err(DialogError::NotFound(id));
        }
        info!("event=note_delete module=dialog status=ok owner_id={owner_id} note_id={id}");
        Ok(Reply::plain(format::note_deleted(id)))
    }

    fn cancel(&self, owner_id: OwnerId, mode: &mut DialogMode) -> Reply {
        if *mode == DialogMode::Idle {
            return Reply::plain(format::NOTHING_TO_CANCEL);
        }
        *mode = DialogMode::Idle;
        info!("event=note_entry_cancelled module=dialog status=ok owner_id={owner_id}");
        Reply::new(format::NOTE_CANCELLED, MenuHint::DefaultMenu)
    }
}

/// Parses a user-supplied note number; only positive integers are ids.
fn parse_note_id(argument: &str) -> Result<NoteId, DialogError> {
    let trimmed = argument.trim();
    match trimmed.parse::<NoteId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DialogError::Validation(trimmed.to_string())),
    }
}
