//! Integration tests for the rate & access gate and user record store
//!
//! Run with: cargo test --test gate_test

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serenata::core::gate;
use serenata::storage::db;
use tempfile::TempDir;

fn test_pool() -> (TempDir, db::DbPool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.sqlite");
    let pool = db::create_pool(path.to_str().unwrap()).expect("pool");
    (dir, pool)
}

#[test]
fn can_send_true_for_unknown_user() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    assert!(gate::can_send(&conn, 1001).unwrap());
    assert_eq!(gate::remaining_wait(&conn, 1001).unwrap(), None);
}

#[test]
fn can_send_true_when_never_sent() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    db::ensure_user(&conn, 1002, Some("Alice")).unwrap();
    assert!(gate::can_send(&conn, 1002).unwrap());
}

#[test]
fn can_send_false_inside_cooldown_window() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    // One second short of the window
    let last = Utc::now() - Duration::seconds(9);
    db::set_last_sent(&conn, 1003, &last).unwrap();

    assert!(!gate::can_send(&conn, 1003).unwrap());
    let wait = gate::remaining_wait(&conn, 1003).unwrap().expect("some wait");
    assert!(wait >= 1 && wait <= 10, "unexpected wait: {}", wait);
}

#[test]
fn can_send_true_once_window_elapsed() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    let last = Utc::now() - Duration::seconds(10);
    db::set_last_sent(&conn, 1004, &last).unwrap();
    assert!(gate::can_send(&conn, 1004).unwrap());

    let last = Utc::now() - Duration::seconds(3600);
    db::set_last_sent(&conn, 1004, &last).unwrap();
    assert!(gate::can_send(&conn, 1004).unwrap());
}

#[test]
fn mark_sent_starts_cooldown_and_upserts() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    // No record beforehand: mark_sent must create one
    gate::mark_sent(&conn, 1005).unwrap();
    assert!(!gate::can_send(&conn, 1005).unwrap());

    let user = db::get_user(&conn, 1005).unwrap().expect("record created");
    assert!(user.last_sent.is_some());
}

#[test]
fn premium_grant_then_revoke() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    assert!(!gate::is_premium(&conn, 2001).unwrap());

    let until = gate::grant_premium(&conn, 2001, 30).unwrap();
    assert!(until > Utc::now());
    assert!(gate::is_premium(&conn, 2001).unwrap());

    gate::revoke_premium(&conn, 2001).unwrap();
    assert!(!gate::is_premium(&conn, 2001).unwrap());
}

#[test]
fn premium_grant_overwrites_instead_of_adding() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    gate::grant_premium(&conn, 2002, 30).unwrap();
    let second = gate::grant_premium(&conn, 2002, 5).unwrap();

    // If grants were additive this would be ~35 days out
    assert!(second < Utc::now() + Duration::days(6));
    let stored = db::get_user(&conn, 2002).unwrap().unwrap().premium_until.unwrap();
    assert_eq!(stored.timestamp(), second.timestamp());
}

#[test]
fn expired_premium_is_not_premium() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    let past = Utc::now() - Duration::hours(1);
    db::set_premium_until(&conn, 2003, &past).unwrap();
    assert!(!gate::is_premium(&conn, 2003).unwrap());
}

#[test]
fn revoke_without_record_is_noop() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    gate::revoke_premium(&conn, 2004).unwrap();
    // The clear must not have created a record on the side
    assert!(db::get_user(&conn, 2004).unwrap().is_none());
}

#[test]
fn ensure_user_never_overwrites_first_contact() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    db::ensure_user(&conn, 3001, Some("Alice")).unwrap();
    db::ensure_user(&conn, 3001, Some("Bob")).unwrap();

    let user = db::get_user(&conn, 3001).unwrap().unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Alice"));
}

#[test]
fn all_user_ids_scans_every_record() {
    let (_dir, pool) = test_pool();
    let conn = db::get_connection(&pool).unwrap();

    for id in [10, 20, 30] {
        db::ensure_user(&conn, id, None).unwrap();
    }
    let mut ids = db::all_user_ids(&conn).unwrap();
    ids.sort_unstable();
    assert_eq!(ids, vec![10, 20, 30]);
}
