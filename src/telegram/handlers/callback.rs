//! Selection callback handling.
//!
//! The `dl|<video_id>` token carries the user's choice back from the
//! inline keyboard; the pipeline run is spawned so the dispatcher stays
//! free for other interactions while yt-dlp works.

use teloxide::prelude::*;

use super::types::{HandlerDeps, HandlerError};
use crate::core::gate;
use crate::download::pipeline;
use crate::download::{DownloadOutcome, FailureKind, TelegramAudioDelivery, YtDlpSource};
use crate::storage::get_connection;
use crate::telegram::Bot;

pub async fn handle_callback(bot: Bot, q: CallbackQuery, deps: HandlerDeps) -> Result<(), HandlerError> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(video_id) = data.strip_prefix("dl|") else {
        // Unknown token shape; nothing here handles it.
        return Ok(());
    };

    let user_id = match i64::try_from(q.from.id.0) {
        Ok(id) => id,
        Err(_) => return Ok(()),
    };
    // The artifact goes to the requesting user's private conversation,
    // regardless of where the keyboard message lives.
    let user_chat = ChatId(user_id);
    let reply_chat = q.message.as_ref().map(|m| m.chat().id).unwrap_or(user_chat);

    // Answer the button press before any slow work: either the cooldown
    // alert or the "downloading" toast.
    {
        let conn = get_connection(&deps.db_pool)?;
        if !gate::can_send(&conn, user_id)? {
            let wait = gate::remaining_wait(&conn, user_id)?.unwrap_or(0);
            bot.answer_callback_query(q.id.clone())
                .text(format!("⏳ Wait {} seconds between downloads.", wait))
                .show_alert(true)
                .await?;
            return Ok(());
        }
    }
    let _ = bot
        .answer_callback_query(q.id.clone())
        .text("Downloading... please wait")
        .await;

    let video_id = video_id.to_string();
    let bot_task = bot.clone();
    let deps_task = deps.clone();

    tokio::spawn(async move {
        let source = YtDlpSource::new(deps_task.search.clone());
        let delivery = TelegramAudioDelivery::new(bot_task.clone(), user_chat);

        match pipeline::run(&deps_task.db_pool, &source, &delivery, user_id, &video_id).await {
            Ok(DownloadOutcome::Delivered { title }) => {
                log::info!("Delivered '{}' ({}) to user {}", title, video_id, user_id);
            }
            Ok(DownloadOutcome::RejectedCooldown { wait_secs }) => {
                // The pre-check passed but another request won the race;
                // same message as the alert path.
                let _ = bot_task
                    .send_message(reply_chat, format!("⏳ Please wait {} seconds between downloads.", wait_secs))
                    .await;
            }
            Ok(DownloadOutcome::Failed { kind }) => {
                let text = match kind {
                    FailureKind::Delivery => {
                        "❌ Failed to send audio. The file may be too large or Telegram rejected it."
                    }
                    FailureKind::Extraction | FailureKind::MissingArtifact => {
                        "❌ Failed to download audio. Try again later."
                    }
                };
                let _ = bot_task.send_message(reply_chat, text).await;
            }
            Err(e) => {
                log::error!(
                    "Pipeline error ({}) for user {} / video {}: {:?}",
                    e.category(),
                    user_id,
                    video_id,
                    e
                );
                let _ = bot_task
                    .send_message(reply_chat, "❌ Failed to download audio. Try again later.")
                    .await;
            }
        }
    });

    Ok(())
}
