use quicknote_core::db::open_db_in_memory;
use quicknote_core::dialog::menu::{
    DELETE_NOTE_LABEL, HELP_LABEL, HOME_LABEL, LIST_NOTES_LABEL, NEW_NOTE_LABEL,
};
use quicknote_core::{
    DialogController, DialogMode, Event, MenuHint, Note, NoteId, NoteRepository, OwnerId,
    RepoError, RepoResult, SqliteNoteRepository,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Real SQLite store that counts calls and can be switched into failure.
struct FlakyRepo {
    inner: SqliteNoteRepository,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl FlakyRepo {
    fn new() -> Self {
        Self {
            inner: SqliteNoteRepository::try_new(open_db_in_memory().unwrap()).unwrap(),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn enter(&self) -> RepoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::InvalidData("simulated outage".to_string()));
        }
        Ok(())
    }
}

impl NoteRepository for FlakyRepo {
    fn create_note(&self, owner_id: OwnerId, content: &str) -> RepoResult<NoteId> {
        self.enter()?;
        self.inner.create_note(owner_id, content)
    }

    fn list_notes(&self, owner_id: OwnerId) -> RepoResult<Vec<Note>> {
        self.enter()?;
        self.inner.list_notes(owner_id)
    }

    fn delete_note(&self, owner_id: OwnerId, id: NoteId) -> RepoResult<bool> {
        self.enter()?;
        self.inner.delete_note(owner_id, id)
    }
}

/// Real SQLite store that records the highest number of calls in flight at
/// once. Each call lingers briefly so overlapping callers would be seen.
struct OverlapRepo {
    inner: SqliteNoteRepository,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl OverlapRepo {
    fn new() -> Self {
        Self {
            inner: SqliteNoteRepository::try_new(open_db_in_memory().unwrap()).unwrap(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn track<T>(&self, call: impl FnOnce() -> T) -> T {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(2));
        let result = call();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl NoteRepository for OverlapRepo {
    fn create_note(&self, owner_id: OwnerId, content: &str) -> RepoResult<NoteId> {
        self.track(|| self.inner.create_note(owner_id, content))
    }

    fn list_notes(&self, owner_id: OwnerId) -> RepoResult<Vec<Note>> {
        self.track(|| self.inner.list_notes(owner_id))
    }

    fn delete_note(&self, owner_id: OwnerId, id: NoteId) -> RepoResult<bool> {
        self.track(|| self.inner.delete_note(owner_id, id))
    }
}

fn controller() -> DialogController<FlakyRepo> {
    DialogController::new(FlakyRepo::new())
}

fn text(value: &str) -> Event {
    Event::SubmitText(value.to_string())
}

fn delete(argument: &str) -> Event {
    Event::DeleteNote {
        argument: argument.to_string(),
    }
}

#[test]
fn new_note_dialog_saves_text_and_returns_to_idle() {
    let bot = controller();

    let prompt = bot.handle(1, Event::StartNote);
    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);
    assert_eq!(prompt.menu, MenuHint::None);
    assert_eq!(bot.repo().calls(), 0);

    let saved = bot.handle(1, text("hello"));
    assert_eq!(bot.mode(1), DialogMode::Idle);
    assert_eq!(saved.menu, MenuHint::PostNoteMenu);

    let notes = bot.repo().list_notes(1).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "hello");
    assert!(saved.text.contains(&format!("#{}", notes[0].id)));
}

#[test]
fn listing_without_notes_says_so() {
    let bot = controller();

    let reply = bot.handle(1, Event::ListNotes);

    assert!(reply.text.contains("don't have any notes"));
    assert_eq!(bot.mode(1), DialogMode::Idle);
}

#[test]
fn listing_shows_ten_newest_and_keeps_the_rest() {
    let bot = controller();
    for idx in 1..=15 {
        bot.handle(1, Event::StartNote);
        bot.handle(1, text(&format!("entry {idx}")));
    }

    let reply = bot.handle(1, Event::ListNotes);

    assert_eq!(reply.text.matches(" - entry ").count(), 10);
    assert!(reply.text.contains("entry 15"));
    assert!(reply.text.contains("entry 6"));
    assert!(!reply.text.contains("entry 5\n"));
    assert!(reply.text.contains("5 older note(s) not shown"));
    assert_eq!(bot.repo().list_notes(1).unwrap().len(), 15);
}

#[test]
fn listing_never_shows_other_owners_notes() {
    let bot = controller();
    bot.handle(1, Event::StartNote);
    bot.handle(1, text("mine"));
    bot.handle(2, Event::StartNote);
    bot.handle(2, text("theirs"));

    let reply = bot.handle(1, Event::ListNotes);

    assert!(reply.text.contains("mine"));
    assert!(!reply.text.contains("theirs"));
}

#[test]
fn malformed_delete_argument_never_reaches_the_store() {
    let bot = controller();

    for argument in ["abc", "", "0", "-4", "2.5"] {
        let reply = bot.handle(1, delete(argument));
        assert!(reply.text.contains("Usage: /delete"), "argument `{argument}`");
    }
    assert_eq!(bot.repo().calls(), 0);
}

#[test]
fn deleting_own_note_confirms_and_removes_it() {
    let bot = controller();
    let id = bot.repo().create_note(1, "x").unwrap();

    let reply = bot.handle(1, delete(&id.to_string()));

    assert!(reply.text.contains(&format!("#{id} deleted")));
    let listed = bot.handle(1, Event::ListNotes);
    assert!(!listed.text.contains(&format!("#{id} ")));
}

#[test]
fn deleting_foreign_or_missing_note_reads_the_same() {
    let bot = controller();
    let foreign = bot.repo().create_note(2, "not yours").unwrap();

    let foreign_reply = bot.handle(1, delete(&foreign.to_string()));
    let missing_reply = bot.handle(1, delete("9999"));

    assert_eq!(foreign_reply, missing_reply);
    assert!(foreign_reply.text.contains("not found"));
    assert_eq!(bot.repo().list_notes(2).unwrap().len(), 1);
}

#[test]
fn storage_failure_keeps_user_awaiting_until_save_succeeds() {
    let bot = controller();
    bot.handle(1, Event::StartNote);
    bot.repo().set_failing(true);

    let failed = bot.handle(1, text("important"));
    assert!(failed.text.contains("Something went wrong"));
    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);

    bot.repo().set_failing(false);
    let saved = bot.handle(1, text("important"));
    assert_eq!(saved.menu, MenuHint::PostNoteMenu);
    assert_eq!(bot.mode(1), DialogMode::Idle);
    assert_eq!(bot.repo().list_notes(1).unwrap().len(), 1);
}

#[test]
fn storage_failure_on_list_is_a_generic_reply() {
    let bot = controller();
    bot.repo().set_failing(true);

    let reply = bot.handle(1, Event::ListNotes);

    assert!(reply.text.contains("Something went wrong"));
    assert!(!reply.text.contains("simulated outage"));
}

#[test]
fn failed_command_while_awaiting_keeps_pending_note() {
    let bot = controller();
    bot.handle(1, Event::StartNote);
    bot.repo().set_failing(true);

    let reply = bot.handle(1, Event::ListNotes);

    assert!(reply.text.contains("Something went wrong"));
    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);

    bot.repo().set_failing(false);
    bot.handle(1, text("still captured"));
    assert_eq!(bot.repo().list_notes(1).unwrap()[0].content, "still captured");
}

#[test]
fn malformed_delete_while_awaiting_keeps_pending_note() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    let reply = bot.handle(1, delete("abc"));

    assert!(reply.text.contains("Usage: /delete"));
    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);
    assert_eq!(bot.repo().calls(), 0);
}

#[test]
fn command_while_awaiting_abandons_pending_note() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    let reply = bot.handle(1, Event::ListNotes);

    assert!(reply.text.contains("don't have any notes"));
    assert_eq!(bot.mode(1), DialogMode::Idle);
    assert!(bot.repo().list_notes(1).unwrap().is_empty());
}

#[test]
fn start_note_while_awaiting_prompts_again() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    bot.handle(1, Event::StartNote);

    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);
}

#[test]
fn menu_label_while_awaiting_is_saved_as_content() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    let reply = bot.handle(1, text(LIST_NOTES_LABEL));

    assert_eq!(reply.menu, MenuHint::PostNoteMenu);
    let notes = bot.repo().list_notes(1).unwrap();
    assert_eq!(notes[0].content, LIST_NOTES_LABEL);
}

#[test]
fn cancel_discards_pending_note() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    let cancelled = bot.handle(1, Event::Cancel);
    assert_eq!(cancelled.menu, MenuHint::DefaultMenu);
    assert_eq!(bot.mode(1), DialogMode::Idle);

    let idle_cancel = bot.handle(1, Event::Cancel);
    assert!(idle_cancel.text.contains("Nothing to cancel"));
    assert_eq!(bot.repo().calls(), 0);
}

#[test]
fn menu_labels_dispatch_like_commands_when_idle() {
    let bot = controller();

    let new_note = bot.handle(1, text(NEW_NOTE_LABEL));
    assert_eq!(new_note, bot.handle(2, Event::StartNote));
    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);
    bot.handle(1, Event::Cancel);

    assert_eq!(
        bot.handle(1, text(LIST_NOTES_LABEL)),
        bot.handle(1, Event::ListNotes)
    );
    assert_eq!(bot.handle(1, text(HELP_LABEL)), bot.handle(1, Event::Help));
    assert!(bot
        .handle(1, text(DELETE_NOTE_LABEL))
        .text
        .contains("Usage: /delete"));

    let home = bot.handle(1, text(HOME_LABEL));
    assert_eq!(home.menu, MenuHint::DefaultMenu);
    assert_eq!(home, bot.handle(1, Event::Start { first_name: None }));
}

#[test]
fn start_greets_by_first_name() {
    let bot = controller();

    let reply = bot.handle(
        1,
        Event::Start {
            first_name: Some("Ann".to_string()),
        },
    );

    assert!(reply.text.starts_with("Hi, Ann!"));
    assert_eq!(reply.menu, MenuHint::DefaultMenu);
}

#[test]
fn unrecognized_idle_text_changes_nothing() {
    let bot = controller();

    let reply = bot.handle(1, text("what's the weather"));

    assert!(reply.text.contains("/help"));
    assert_eq!(bot.mode(1), DialogMode::Idle);
    assert_eq!(bot.repo().calls(), 0);
}

#[test]
fn users_have_independent_dialogs() {
    let bot = controller();
    bot.handle(1, Event::StartNote);

    bot.handle(2, text("just chatting"));

    assert_eq!(bot.mode(1), DialogMode::AwaitingNoteText);
    assert_eq!(bot.mode(2), DialogMode::Idle);
    assert!(bot.repo().list_notes(2).unwrap().is_empty());
}

#[test]
fn concurrent_users_all_complete_their_notes() {
    let bot = Arc::new(controller());

    let handles: Vec<_> = (1..=8)
        .map(|owner| {
            let bot = Arc::clone(&bot);
            std::thread::spawn(move || {
                for idx in 0..10 {
                    bot.handle(owner, Event::StartNote);
                    bot.handle(owner, Event::SubmitText(format!("{owner}-{idx}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for owner in 1..=8 {
        assert_eq!(bot.mode(owner), DialogMode::Idle);
        let notes = bot.repo().list_notes(owner).unwrap();
        assert_eq!(notes.len(), 10);
        assert!(notes
            .iter()
            .all(|note| note.content.starts_with(&format!("{owner}-"))));
    }
}

#[test]
fn events_of_one_user_never_overlap() {
    let bot = Arc::new(DialogController::new(OverlapRepo::new()));
    let threads = 6;

    let handles: Vec<_> = (0..threads)
        .map(|idx| {
            let bot = Arc::clone(&bot);
            std::thread::spawn(move || {
                bot.handle(1, Event::StartNote);
                bot.handle(1, Event::SubmitText(format!("draft {idx}")));
                bot.handle(1, Event::ListNotes);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bot.repo().max_in_flight.load(Ordering::SeqCst), 1);
    // Each thread ends with a list, which leaves the user idle.
    assert_eq!(bot.mode(1), DialogMode::Idle);
    // Interleaved prompts may turn a later text into chatter, but every
    // saved note is one thread's complete draft.
    let notes = bot.repo().list_notes(1).unwrap();
    assert!(!notes.is_empty() && notes.len() <= threads);
    assert!(notes.iter().all(|note| note.content.starts_with("draft ")));
}
