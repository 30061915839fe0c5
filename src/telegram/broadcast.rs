//! Broadcast fanout: one message to every known user.
//!
//! Single pass over the user table, tolerating individual failures. A
//! process interrupted mid-fanout leaves a partial broadcast; that is
//! accepted, not resumed.

use std::future::Future;
use std::time::Duration;

use teloxide::prelude::*;

use crate::core::config;
use crate::core::error::AppError;
use crate::storage::db::{self, DbPool};
use crate::storage::get_connection;
use crate::telegram::Bot;

/// Runs the fanout over `user_ids` with the given send function, counting
/// successes and continuing past per-user failures. A short delay after
/// each successful send throttles the outbound rate.
///
/// Generic over the sender so the fanout policy is testable without a
/// live bot.
pub async fn broadcast_with_sender<F, Fut, E>(user_ids: &[i64], delay: Duration, send: F) -> usize
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut count = 0usize;
    for &user_id in user_ids {
        match send(user_id).await {
            Ok(()) => {
                count += 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log::warn!("Failed to send broadcast to {}: {}", user_id, e);
            }
        }
    }
    count
}

/// Broadcasts `text` to every user in the store and returns the number of
/// successful sends.
pub async fn broadcast_to_all(bot: &Bot, pool: &DbPool, text: &str) -> Result<usize, AppError> {
    let user_ids = {
        let conn = get_connection(pool)?;
        db::all_user_ids(&conn)?
    };
    log::info!("Broadcasting to {} users", user_ids.len());

    let message = format!("📣 Broadcast:\n\n{}", text);
    let count = broadcast_with_sender(&user_ids, config::broadcast::inter_send_delay(), |user_id| {
        let bot = bot.clone();
        let message = message.clone();
        async move { bot.send_message(ChatId(user_id), message).await.map(|_| ()) }
    })
    .await;

    Ok(count)
}
