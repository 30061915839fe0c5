//! Public command endpoints: /start, /help, /song, /file, and the
//! free-text-as-search flow.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};

use super::types::{HandlerDeps, HandlerError};
use crate::archive;
use crate::core::config;
use crate::core::error::AppError;
use crate::core::gate;
use crate::core::utils::truncate_label;
use crate::search::SearchCandidate;
use crate::storage::get_connection;
use crate::telegram::Bot;

/// Maximum characters of a title shown on a result button.
const BUTTON_TITLE_CHARS: usize = 40;

pub async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let premium = {
        let conn = get_connection(&deps.db_pool)?;
        gate::is_premium(&conn, msg.chat.id.0)?
    };

    let mut text = String::from(
        "👋 Hello! I'm a music & channel file bot.\n\n\
        Send me a song name, or use /song <query> to search YouTube.\n\
        Use /file <filename> to retrieve files from the channel.\n\n\
        Type /help for more commands.",
    );
    if premium {
        text.push_str("\n\n⭐ You have premium access.");
    }

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

pub async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    let text = "Commands:\n\
        /song <query> - Search YouTube and get an MP3.\n\
        Or just send a text query in private chat to search.\n\
        /file <filename> - Send a file from the configured channel to you (the bot must be in the channel).\n\n\
        Owner only:\n\
        /add <user_id> <days> - Add premium.\n\
        /rem <user_id> - Remove premium.\n\
        /broadcast <message> - Broadcast to all known users.\n\n\
        Examples:\n\
        /song never gonna give you up\n\
        /file MyCoolSong.mp3";
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

pub async fn handle_song_command(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    query: &str,
) -> Result<(), HandlerError> {
    let query = query.trim();
    if query.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /song <query>").await?;
        return Ok(());
    }
    run_search(bot, msg.chat.id, deps, query).await
}

/// Searches the external service and offers the candidates as an inline
/// keyboard. Zero results and a failed search get distinct messages; the
/// raw failure detail goes to the logs only.
pub async fn run_search(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps, query: &str) -> Result<(), HandlerError> {
    bot.send_message(chat_id, "🔎 Searching YouTube...").await?;

    let results = match deps.search.search(query, *config::MAX_SEARCH_RESULTS).await {
        Ok(results) => results,
        Err(AppError::SearchUnavailable { status, detail }) => {
            log::error!("YouTube search failed (status {:?}): {}", status, detail);
            bot.send_message(chat_id, "YouTube search failed. Try again later.").await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("YouTube search failed ({}): {:?}", e.category(), e);
            bot.send_message(chat_id, "YouTube search failed. Try again later.").await?;
            return Ok(());
        }
    };

    if results.is_empty() {
        bot.send_message(chat_id, "No results found.").await?;
        return Ok(());
    }

    bot.send_message(chat_id, "Select a result to download MP3:")
        .reply_markup(results_keyboard(&results))
        .await?;
    Ok(())
}

/// One button per candidate, bound to a `dl|<video_id>` token. The token
/// carries the whole selection state — there is no server-side session.
fn results_keyboard(results: &[SearchCandidate]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = results
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let label = format!("{}. {}", i + 1, truncate_label(&candidate.title, BUTTON_TITLE_CHARS));
            vec![InlineKeyboardButton::callback(
                label,
                format!("dl|{}", candidate.video_id),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

pub async fn handle_file_command(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    filename: &str,
) -> Result<(), HandlerError> {
    let filename = filename.trim();
    if filename.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /file <filename>").await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "🔎 Searching channel for file...").await?;

    let conn = get_connection(&deps.db_pool)?;
    let hit = match archive::find_file(&conn, filename) {
        Ok(Some(hit)) => hit,
        Ok(None) => {
            bot.send_message(msg.chat.id, "❌ No file matched that filename in the channel.")
                .await?;
            return Ok(());
        }
        Err(e) => {
            // Scan failure is a configuration problem, not a miss; the
            // message must not read like "not found".
            log::error!("Archive scan failed: {:?}", e);
            bot.send_message(
                msg.chat.id,
                "Failed to search the channel. Make sure the bot has access and the channel id is correct.",
            )
            .await?;
            return Ok(());
        }
    };

    let user_id = msg.chat.id.0;
    if !gate::can_send(&conn, user_id)? {
        let wait = gate::remaining_wait(&conn, user_id)?.unwrap_or(0);
        bot.send_message(
            msg.chat.id,
            format!("⏳ Please wait {} seconds between file sends.", wait),
        )
        .await?;
        return Ok(());
    }

    match bot
        .copy_message(msg.chat.id, ChatId(*config::CHANNEL_ID), MessageId(hit.message_id))
        .await
    {
        Ok(_) => {
            gate::mark_sent(&conn, user_id)?;
        }
        Err(e) => {
            log::error!("Failed to copy archive message {}: {}", hit.message_id, e);
            bot.send_message(
                msg.chat.id,
                "Failed to send the file. Ensure the bot can read and copy messages from the channel.",
            )
            .await?;
        }
    }
    Ok(())
}
