//! Raw chat text to dialog events.

use quicknote_core::Event;

/// Parses one incoming text message.
///
/// Known slash commands (optionally addressed as `/cmd@botname`) become their
/// event; everything else, unknown commands included, is `SubmitText`.
pub fn parse_event(text: &str, first_name: Option<&str>) -> Event {
    let Some(rest) = text.strip_prefix('/') else {
        return Event::SubmitText(text.to_string());
    };
    let (head, argument) = match rest.split_once(char::is_whitespace) {
        Some((head, argument)) => (head, argument.trim()),
        None => (rest, ""),
    };
    let command = head.split_once('@').map_or(head, |(command, _bot)| command);

    match command.to_ascii_lowercase().as_str() {
        "start" => Event::Start {
            first_name: first_name.map(str::to_string),
        },
        "new" => Event::StartNote,
        "list" => Event::ListNotes,
        "delete" => Event::DeleteNote {
            argument: argument.split_whitespace().next().unwrap_or("").to_string(),
        },
        "help" => Event::Help,
        "cancel" => Event::Cancel,
        _ => Event::SubmitText(text.to_string()),
    }
}
