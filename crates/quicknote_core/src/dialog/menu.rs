//! Reply keyboard labels and the label-to-action table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const NEW_NOTE_LABEL: &str = "📝 New note";
pub const LIST_NOTES_LABEL: &str = "📋 My notes";
pub const DELETE_NOTE_LABEL: &str = "❌ Delete note";
pub const HELP_LABEL: &str = "ℹ️ Help";
pub const HOME_LABEL: &str = "🏠 Main menu";

/// Action bound to a menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    NewNote,
    ListNotes,
    DeleteHint,
    Help,
    Home,
}

static MENU_ACTIONS: Lazy<HashMap<&'static str, MenuAction>> = Lazy::new(|| {
    HashMap::from([
        (NEW_NOTE_LABEL, MenuAction::NewNote),
        (LIST_NOTES_LABEL, MenuAction::ListNotes),
        (DELETE_NOTE_LABEL, MenuAction::DeleteHint),
        (HELP_LABEL, MenuAction::Help),
        (HOME_LABEL, MenuAction::Home),
    ])
});

/// Looks up the action for an exact button label.
///
/// Matching is literal: surrounding whitespace or different casing is plain
/// text, not a button press.
pub fn lookup(label: &str) -> Option<MenuAction> {
    MENU_ACTIONS.get(label).copied()
}

/// Which button layout the transport should show with a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuHint {
    DefaultMenu,
    PostNoteMenu,
    /// Leave whatever keyboard is currently shown.
    None,
}

impl MenuHint {
    /// Button rows for this layout; empty for `MenuHint::None`.
    pub fn layout(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::DefaultMenu => &[
                &[NEW_NOTE_LABEL, LIST_NOTES_LABEL],
                &[DELETE_NOTE_LABEL, HELP_LABEL],
            ],
            Self::PostNoteMenu => &[&[NEW_NOTE_LABEL, LIST_NOTES_LABEL], &[HOME_LABEL]],
            Self::None => &[],
        }
    }
}
