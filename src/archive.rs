//! Channel file resolver.
//!
//! Answers "/file <name>" requests by scanning a bounded window of indexed
//! archive-channel messages and returning the first one whose attachment
//! filename or caption contains the query, case-insensitively.
//!
//! The match policy per message is fixed: document filename, then audio
//! filename, then video filename, then caption. First matching message
//! wins — no ranking beyond the window's own ordering. That can pick a
//! worse match when several attachments share a substring; kept as-is, it
//! is a deliberate simplicity tradeoff.

use crate::core::config;
use crate::core::error::AppError;
use crate::storage::archive::{self, ChannelFile};
use crate::storage::db::DbConnection;

/// Finds the first archive message matching `name_query`.
///
/// * `Ok(Some(..))` — a match inside the scan window.
/// * `Ok(None)` — the scan completed with no hit (expected outcome, not an
///   error).
/// * `Err(ArchiveUnavailable)` — the scan itself could not be performed;
///   callers must message this differently from "not found" because it is
///   a configuration problem, not a miss.
pub fn find_file(conn: &DbConnection, name_query: &str) -> Result<Option<ChannelFile>, AppError> {
    let window = archive::search_window(conn, name_query, config::archive::SCAN_WINDOW)
        .map_err(|e| AppError::ArchiveUnavailable(e.to_string()))?;

    Ok(window.into_iter().find(|entry| matches_query(entry, name_query)))
}

/// Applies the match policy to one indexed message: attachment filename
/// first (any of the document/audio/video kinds), caption second.
fn matches_query(entry: &ChannelFile, query: &str) -> bool {
    if entry
        .file_name
        .as_deref()
        .map(|n| contains_ignore_case(n, query))
        .unwrap_or(false)
    {
        return true;
    }

    entry
        .caption
        .as_deref()
        .map(|c| contains_ignore_case(c, query))
        .unwrap_or(false)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::archive::FileKind;

    fn entry(kind: FileKind, file_name: Option<&str>, caption: Option<&str>) -> ChannelFile {
        ChannelFile {
            message_id: 1,
            kind,
            file_name: file_name.map(str::to_string),
            caption: caption.map(str::to_string),
        }
    }

    #[test]
    fn test_filename_match_is_case_insensitive() {
        let e = entry(FileKind::Document, Some("Song.mp3"), None);
        assert!(matches_query(&e, "song"));
        assert!(matches_query(&e, "SONG.MP3"));
        assert!(!matches_query(&e, "ballad"));
    }

    #[test]
    fn test_caption_match_when_filename_misses() {
        let e = entry(FileKind::Video, Some("clip_0001.mp4"), Some("Live at Wembley"));
        assert!(matches_query(&e, "wembley"));
    }

    #[test]
    fn test_no_fields_no_match() {
        let e = entry(FileKind::Audio, None, None);
        assert!(!matches_query(&e, "anything"));
    }
}
