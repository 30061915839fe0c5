//! Integration tests for the broadcast fanout policy
//!
//! Run with: cargo test --test broadcast_test

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serenata::telegram::broadcast::broadcast_with_sender;

#[tokio::test]
async fn fanout_counts_successes_and_survives_failures() {
    let attempts: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let attempts_inner = Arc::clone(&attempts);

    let count = broadcast_with_sender(&[1, 2, 3], Duration::from_millis(1), move |user_id| {
        let attempts = Arc::clone(&attempts_inner);
        async move {
            attempts.lock().unwrap().push(user_id);
            if user_id == 2 {
                Err("simulated transport error".to_string())
            } else {
                Ok(())
            }
        }
    })
    .await;

    // The 2nd send failed but the 3rd user was still processed
    assert_eq!(count, 2);
    assert_eq!(*attempts.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn fanout_over_empty_set_sends_nothing() {
    let count = broadcast_with_sender(&[], Duration::from_millis(1), |_user_id| async {
        Ok::<(), String>(())
    })
    .await;
    assert_eq!(count, 0);
}

#[tokio::test]
async fn fanout_preserves_single_pass_order() {
    let seen: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_inner = Arc::clone(&seen);

    let count = broadcast_with_sender(&[5, 4, 3, 2, 1], Duration::from_millis(1), move |user_id| {
        let seen = Arc::clone(&seen_inner);
        async move {
            seen.lock().unwrap().push(user_id);
            Ok::<(), String>(())
        }
    })
    .await;

    assert_eq!(count, 5);
    assert_eq!(*seen.lock().unwrap(), vec![5, 4, 3, 2, 1]);
}
