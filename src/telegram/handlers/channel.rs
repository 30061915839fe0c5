//! Archive channel indexing.
//!
//! The Bot API cannot search a channel's history, so every media post the
//! bot sees in the archive channel is recorded into the local index that
//! /file scans against.

use teloxide::prelude::*;

use super::types::{HandlerDeps, HandlerError};
use crate::storage::archive::{record_channel_file, FileKind};
use crate::storage::get_connection;

pub async fn handle_channel_post(msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    let (kind, file_name) = if let Some(doc) = msg.document() {
        (FileKind::Document, doc.file_name.clone())
    } else if let Some(audio) = msg.audio() {
        (FileKind::Audio, audio.file_name.clone())
    } else if let Some(video) = msg.video() {
        (FileKind::Video, video.file_name.clone())
    } else {
        // Text-only channel posts carry nothing /file could deliver.
        return Ok(());
    };

    let conn = get_connection(&deps.db_pool)?;
    record_channel_file(&conn, msg.id.0, kind, file_name.as_deref(), msg.caption())?;
    log::info!(
        "Indexed archive message {} ({}, file_name: {:?})",
        msg.id.0,
        kind.as_str(),
        file_name
    );
    Ok(())
}
