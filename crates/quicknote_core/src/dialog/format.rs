//! Reply texts.
//!
//! All user-visible wording lives here so the controller only decides which
//! text to send.

use crate::model::note::{Note, NoteId};

/// Most recent notes shown by one list reply.
pub(crate) const LIST_WINDOW: usize = 10;

pub(crate) const NOTE_PROMPT: &str = "✍️ Send me the text of your note:";
pub(crate) const NO_NOTES: &str = "📭 You don't have any notes yet";
pub(crate) const NOT_FOUND: &str = "❌ Note not found";
pub(crate) const DELETE_USAGE: &str =
    "Usage: /delete <note number>\nExample: /delete 5";
pub(crate) const STORAGE_FAILURE: &str =
    "⚠️ Something went wrong while accessing your notes. Please try again.";
pub(crate) const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
pub(crate) const NOTE_CANCELLED: &str = "🚫 Note discarded.";
pub(crate) const UNRECOGNIZED: &str =
    "🤔 I didn't get that. Use the buttons below or /help to see what I can do.";

pub(crate) const HELP: &str = "📝 QuickNote keeps your notes right in this chat.

Commands:
/new - create a new note
/list - show your latest notes
/delete <number> - delete a note
/cancel - discard the note you are writing
/help - show this help

How to use:
1. Tap \"📝 New note\"
2. Send the text
3. Done! The note is saved";

pub(crate) fn greeting(first_name: Option<&str>) -> String {
    let salutation = match first_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Hi, {name}! 👋"),
        None => "Hi! 👋".to_string(),
    };
    format!("{salutation}\n\nI'm your personal notes bot.\nUse the buttons below:")
}

pub(crate) fn note_saved(id: NoteId) -> String {
    format!("✅ Note #{id} saved!")
}

pub(crate) fn note_deleted(id: NoteId) -> String {
    format!("✅ Note #{id} deleted")
}

/// Renders the newest `LIST_WINDOW` notes of an owner's full, newest-first
/// list. Older notes are summarized in a footer, never dropped from storage.
pub(crate) fn note_list(notes: &[Note]) -> String {
    let shown = &notes[..notes.len().min(LIST_WINDOW)];
    let mut text = String::from("📋 Your notes:\n\n");
    for note in shown {
        text.push_str(&format!("#{} - {}\n", note.id, note.content));
        if let Some(created) = note.created_at_utc() {
            text.push_str(&format!("📅 {}\n", created.format("%Y-%m-%d %H:%M")));
        }
        text.push('\n');
    }

    let hidden = notes.len() - shown.len();
    if hidden > 0 {
        text.push_str(&format!("…and {hidden} older note(s) not shown"));
    }
    text.trim_end().to_string()
}
