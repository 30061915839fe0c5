//! Index of media posts in the archive channel.
//!
//! The Bot API has no server-side message search, so the bot records every
//! document/audio/video post it sees in the configured channel and runs the
//! /file scan against this index.

use chrono::Utc;
use rusqlite::{params, Result};

use crate::storage::db::{format_timestamp, DbConnection};

/// Attachment kind of an indexed channel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Audio,
    Video,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
        }
    }

    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "document" => Some(FileKind::Document),
            "audio" => Some(FileKind::Audio),
            "video" => Some(FileKind::Video),
            _ => None,
        }
    }
}

/// One indexed message from the archive channel.
#[derive(Debug, Clone)]
pub struct ChannelFile {
    /// Message ID inside the archive channel (the copy-message key)
    pub message_id: i32,
    pub kind: FileKind,
    pub file_name: Option<String>,
    pub caption: Option<String>,
}

/// Records (or refreshes) an archive channel post carrying an attachment.
pub fn record_channel_file(
    conn: &DbConnection,
    message_id: i32,
    kind: FileKind,
    file_name: Option<&str>,
    caption: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO channel_files (message_id, kind, file_name, caption, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(message_id) DO UPDATE SET
            kind = excluded.kind,
            file_name = excluded.file_name,
            caption = excluded.caption",
        params![
            message_id,
            kind.as_str(),
            file_name,
            caption,
            format_timestamp(&Utc::now())
        ],
    )?;
    Ok(())
}

/// Returns a window of indexed messages loosely matching `query` in either
/// the filename or the caption, newest first. The resolver applies the
/// exact matching policy on top of this window.
pub fn search_window(conn: &DbConnection, query: &str, limit: usize) -> Result<Vec<ChannelFile>> {
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(
        "SELECT message_id, kind, file_name, caption FROM channel_files
         WHERE file_name LIKE ?1 COLLATE NOCASE OR caption LIKE ?1 COLLATE NOCASE
         ORDER BY message_id DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![pattern, limit as i64], |row| {
        Ok((
            row.get::<_, i32>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut files = Vec::new();
    for row in rows {
        let (message_id, kind_raw, file_name, caption) = row?;
        // Unknown kinds would mean a schema mismatch; skip rather than fail
        // the whole scan.
        let Some(kind) = FileKind::from_str(&kind_raw) else {
            log::warn!("channel_files row {} has unknown kind '{}'", message_id, kind_raw);
            continue;
        };
        files.push(ChannelFile {
            message_id,
            kind,
            file_name,
            caption,
        });
    }
    Ok(files)
}
