//! Telegram transport: updates in, rendered replies out.
//!
//! # Invariants
//! - Only text messages with a known sender reach the dialog controller.
//! - The dispatcher handles updates of one chat in arrival order.

use crate::command::parse_event;
use log::{error, info, warn};
use quicknote_core::{DialogController, Event, MenuHint, OwnerId, Reply, SqliteNoteRepository};
use std::sync::Arc;
use teloxide::dptree;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};

pub type NoteBot = DialogController<SqliteNoteRepository>;

/// Long-polls Telegram until the process receives Ctrl-C.
pub async fn run(bot_token: String, controller: Arc<NoteBot>) {
    let bot = Bot::new(bot_token);
    let handler = Update::filter_message().endpoint(handle_message);

    info!("event=dispatch_start module=telegram status=ok");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![controller])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("event=dispatch_stop module=telegram status=ok");
}

async fn handle_message(bot: Bot, msg: Message, controller: Arc<NoteBot>) -> ResponseResult<()> {
    let (Some(user), Some(text)) = (msg.from(), msg.text()) else {
        return Ok(());
    };
    let Ok(owner_id) = OwnerId::try_from(user.id.0) else {
        warn!("event=message_skipped module=telegram status=error error_code=user_id_out_of_range");
        return Ok(());
    };

    let event = parse_event(text, Some(user.first_name.as_str()));
    let Some(reply) = handle_off_runtime(controller, owner_id, event).await else {
        return Ok(());
    };

    let mut request = bot.send_message(msg.chat.id, reply.text);
    if let Some(keyboard) = keyboard_for(reply.menu) {
        request = request.reply_markup(keyboard);
    }
    if let Err(err) = request.await {
        error!(
            "event=reply_send module=telegram status=error owner_id={owner_id} error={err}"
        );
        return Err(err);
    }
    Ok(())
}

/// Runs the controller on the blocking pool; store calls hold a user's slot
/// lock and must not stall the runtime's worker threads.
async fn handle_off_runtime(
    controller: Arc<NoteBot>,
    owner_id: OwnerId,
    event: Event,
) -> Option<Reply> {
    match tokio::task::spawn_blocking(move || controller.handle(owner_id, event)).await {
        Ok(reply) => Some(reply),
        Err(err) => {
            error!("event=dialog_handle module=telegram status=error owner_id={owner_id} error={err}");
            None
        }
    }
}

/// Reply keyboard for `hint`; `None` keeps the keyboard the chat already has.
fn keyboard_for(hint: MenuHint) -> Option<KeyboardMarkup> {
    let rows = hint.layout();
    if rows.is_empty() {
        return None;
    }
    let buttons = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>());
    Some(KeyboardMarkup::new(buttons).resize_keyboard(true))
}
