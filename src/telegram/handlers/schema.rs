//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::admin::{handle_add_command, handle_broadcast_command, handle_rem_command};
use super::callback::handle_callback;
use super::channel::handle_channel_post;
use super::commands::{
    handle_file_command, handle_help_command, handle_song_command, handle_start_command, run_search,
};
use super::types::{ensure_user_exists, HandlerDeps, HandlerError};
use crate::core::config;
use crate::telegram::bot::{is_owner, Command};
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the bot.
///
/// The same tree serves production and integration tests. Order matters:
/// channel posts feed the archive index, the hidden owner branches must
/// come before the free-text branch (whose filter ignores `/`-prefixed
/// text, so an unauthorized /add, /rem or /broadcast falls off the end of
/// the tree and gets no reply at all), and callbacks are independent of
/// messages.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_channel = deps.clone();
    let deps_add = deps.clone();
    let deps_rem = deps.clone();
    let deps_broadcast = deps.clone();
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(channel_post_handler(deps_channel))
        // Hidden owner commands (not in the Command enum)
        .branch(add_premium_handler(deps_add))
        .branch(rem_premium_handler(deps_rem))
        .branch(broadcast_handler(deps_broadcast))
        // Public command handler
        .branch(command_handler(deps_commands))
        // Free text in private chat is an implicit /song query
        .branch(message_handler(deps_messages))
        // Inline keyboard selections
        .branch(callback_handler(deps_callback))
}

/// True when `msg` is the given command, alone or with arguments.
fn is_command(msg: &Message, prefix: &str) -> bool {
    msg.text()
        .map(|t| t == prefix || t.starts_with(&format!("{} ", prefix)))
        .unwrap_or(false)
}

/// Handler for media posts in the archive channel.
fn channel_post_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_channel_post()
        .filter(|msg: Message| msg.chat.id.0 == *config::CHANNEL_ID)
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move { handle_channel_post(msg, deps).await }
        })
}

/// Handler for the owner-only /add command (hidden, not in Command enum).
/// The owner predicate is part of the filter: anyone else's /add simply
/// matches no branch.
fn add_premium_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| is_owner(&msg) && is_command(&msg, "/add"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move { handle_add_command(&bot, &msg, &deps).await }
        })
}

/// Handler for the owner-only /rem command (hidden, not in Command enum).
fn rem_premium_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| is_owner(&msg) && is_command(&msg, "/rem"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move { handle_rem_command(&bot, &msg, &deps).await }
        })
}

/// Handler for the owner-only /broadcast command (hidden, not in Command enum).
fn broadcast_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| is_owner(&msg) && is_command(&msg, "/broadcast"))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move { handle_broadcast_command(&bot, &msg, &deps).await }
        })
}

/// Handler for the public commands (/start, /help, /song, /file).
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .branch(dptree::entry().filter_command::<Command>().endpoint(
            move |bot: Bot, msg: Message, cmd: Command| {
                let deps = deps.clone();
                async move {
                    log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
                    ensure_user_exists(&deps, &msg);

                    match cmd {
                        Command::Start => handle_start_command(&bot, &msg, &deps).await?,
                        Command::Help => handle_help_command(&bot, &msg).await?,
                        Command::Song(query) => handle_song_command(&bot, &msg, &deps, &query).await?,
                        Command::File(filename) => handle_file_command(&bot, &msg, &deps, &filename).await?,
                    }
                    Ok(())
                }
            },
        ))
}

/// Handler for free text in private chats: treated as a song query.
/// `/`-prefixed text that reached this point is some unknown (or
/// unauthorized) command and is deliberately ignored.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| {
            msg.chat.is_private()
                && msg
                    .text()
                    .map(|t| !t.trim().is_empty() && !t.starts_with('/'))
                    .unwrap_or(false)
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                ensure_user_exists(&deps, &msg);
                let query = msg.text().unwrap_or_default().to_string();
                run_search(&bot, msg.chat.id, &deps, &query).await
            }
        })
}

/// Handler for inline keyboard selections.
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move { handle_callback(bot, q, deps).await }
    })
}
