//! Integration tests for the channel file resolver and its index
//!
//! Run with: cargo test --test archive_test

use pretty_assertions::assert_eq;
use serenata::archive::find_file;
use serenata::core::error::AppError;
use serenata::storage::archive::{record_channel_file, FileKind};
use serenata::storage::db;
use tempfile::TempDir;

fn test_pool() -> (TempDir, db::DbPool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.sqlite");
    let pool = db::create_pool(path.to_str().unwrap()).expect("pool");
    (dir, pool)
}

#[test]
fn finds_file_by_case_insensitive_substring() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    record_channel_file(&conn, 1, FileKind::Audio, Some("Song.mp3"), None).unwrap();

    let hit = find_file(&conn, "song").unwrap().expect("match expected");
    assert_eq!(hit.message_id, 1);
    assert_eq!(hit.file_name.as_deref(), Some("Song.mp3"));
}

#[test]
fn finds_file_by_caption_when_filename_misses() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    record_channel_file(&conn, 2, FileKind::Video, Some("clip_0001.mp4"), Some("Live at Wembley")).unwrap();

    let hit = find_file(&conn, "wembley").unwrap().expect("match expected");
    assert_eq!(hit.message_id, 2);
}

#[test]
fn no_match_is_not_found_not_an_error() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    record_channel_file(&conn, 3, FileKind::Document, Some("Other.pdf"), None).unwrap();

    assert!(find_file(&conn, "missing").unwrap().is_none());
}

#[test]
fn newest_matching_message_wins() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    record_channel_file(&conn, 10, FileKind::Audio, Some("track one.mp3"), None).unwrap();
    record_channel_file(&conn, 11, FileKind::Audio, Some("track two.mp3"), None).unwrap();

    let hit = find_file(&conn, "track").unwrap().expect("match expected");
    assert_eq!(hit.message_id, 11);
}

#[test]
fn reposting_a_message_updates_the_index_entry() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    record_channel_file(&conn, 12, FileKind::Audio, Some("old name.mp3"), None).unwrap();
    record_channel_file(&conn, 12, FileKind::Audio, Some("new name.mp3"), None).unwrap();

    assert!(find_file(&conn, "old name").unwrap().is_none());
    let hit = find_file(&conn, "new name").unwrap().expect("updated entry");
    assert_eq!(hit.message_id, 12);
}

#[test]
fn scan_failure_is_archive_unavailable() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    // Simulate a broken index: the scan itself fails, which must be
    // distinguishable from "no match".
    conn.execute_batch("DROP TABLE channel_files").unwrap();

    let err = find_file(&conn, "anything").unwrap_err();
    assert!(matches!(err, AppError::ArchiveUnavailable(_)));
}
