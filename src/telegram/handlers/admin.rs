//! Owner-only command endpoints: /add, /rem, /broadcast.
//!
//! These handlers are only ever reached through schema branches guarded by
//! the owner predicate — a non-owner typing the same text falls through
//! every branch and gets no reply. The usage replies below are therefore
//! owner-facing only.

use teloxide::prelude::*;

use super::types::{HandlerDeps, HandlerError};
use crate::core::gate;
use crate::storage::get_connection;
use crate::telegram::broadcast::broadcast_to_all;
use crate::telegram::Bot;

pub async fn handle_add_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let text = msg.text().unwrap_or_default();
    let mut parts = text.split_whitespace().skip(1);

    let (user_id, days) = match (parts.next(), parts.next()) {
        (Some(id_raw), Some(days_raw)) => match (id_raw.parse::<i64>(), days_raw.parse::<i64>()) {
            (Ok(id), Ok(days)) => (id, days),
            _ => {
                bot.send_message(msg.chat.id, "user_id and days must be integers.").await?;
                return Ok(());
            }
        },
        _ => {
            bot.send_message(msg.chat.id, "Usage: /add <user_id> <days>").await?;
            return Ok(());
        }
    };

    let conn = get_connection(&deps.db_pool)?;
    let until = gate::grant_premium(&conn, user_id, days)?;
    log::info!("Premium granted to {} for {} days (until {})", user_id, days, until);
    bot.send_message(
        msg.chat.id,
        format!("✅ Premium granted to {} until {} UTC.", user_id, until.format("%Y-%m-%d %H:%M:%S")),
    )
    .await?;
    Ok(())
}

pub async fn handle_rem_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let text = msg.text().unwrap_or_default();
    let user_id = match text.split_whitespace().nth(1).map(str::parse::<i64>) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            bot.send_message(msg.chat.id, "user_id must be an integer.").await?;
            return Ok(());
        }
        None => {
            bot.send_message(msg.chat.id, "Usage: /rem <user_id>").await?;
            return Ok(());
        }
    };

    let conn = get_connection(&deps.db_pool)?;
    gate::revoke_premium(&conn, user_id)?;
    log::info!("Premium removed from {}", user_id);
    bot.send_message(msg.chat.id, format!("✅ Premium removed from {}.", user_id))
        .await?;
    Ok(())
}

pub async fn handle_broadcast_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let text = msg.text().unwrap_or_default();
    let payload = text
        .strip_prefix("/broadcast")
        .map(str::trim_start)
        .unwrap_or_default();

    if payload.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /broadcast <message text>").await?;
        return Ok(());
    }

    let count = broadcast_to_all(bot, &deps.db_pool, payload).await?;
    bot.send_message(msg.chat.id, format!("Broadcast sent to {} users.", count))
        .await?;
    Ok(())
}
