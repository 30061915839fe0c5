//! Rate & access gate.
//!
//! Decides, from the persisted user record, whether a delivery is currently
//! allowed (cooldown) and whether the user holds premium. Every call is one
//! read or one write against the store — no in-process caching, so each
//! check reflects the latest committed state. Store failures propagate to
//! the caller; the gate never retries.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Result;

use crate::core::config::rate_limit::COOLDOWN_SECONDS;
use crate::storage::db::{self, DbConnection};

/// Returns true if a delivery to `user_id` is currently allowed.
///
/// Allowed when no record exists, the record has no `last_sent`, or the
/// cooldown window has fully elapsed.
pub fn can_send(conn: &DbConnection, user_id: i64) -> Result<bool> {
    let last = match db::get_user(conn, user_id)? {
        Some(user) => user.last_sent,
        None => return Ok(true),
    };
    match last {
        Some(last_sent) => Ok(Utc::now() - last_sent >= Duration::seconds(COOLDOWN_SECONDS)),
        None => Ok(true),
    }
}

/// Seconds left until the cooldown clears, or `None` if sending is already
/// allowed. Rounded up so the user is never told to wait 0 seconds.
pub fn remaining_wait(conn: &DbConnection, user_id: i64) -> Result<Option<i64>> {
    let last = match db::get_user(conn, user_id)? {
        Some(user) => user.last_sent,
        None => return Ok(None),
    };
    let Some(last_sent) = last else {
        return Ok(None);
    };

    let elapsed_ms = (Utc::now() - last_sent).num_milliseconds();
    let remaining_ms = COOLDOWN_SECONDS * 1000 - elapsed_ms;
    if remaining_ms <= 0 {
        Ok(None)
    } else {
        Ok(Some((remaining_ms + 999) / 1000))
    }
}

/// Records a successful delivery, restarting the cooldown window.
/// Unconditional upsert.
pub fn mark_sent(conn: &DbConnection, user_id: i64) -> Result<()> {
    db::set_last_sent(conn, user_id, &Utc::now())
}

/// Returns true if the user holds an unexpired premium grant.
pub fn is_premium(conn: &DbConnection, user_id: i64) -> Result<bool> {
    let user = match db::get_user(conn, user_id)? {
        Some(user) => user,
        None => return Ok(false),
    };
    Ok(user.premium_until.map(|until| until > Utc::now()).unwrap_or(false))
}

/// Grants premium for `days` from now and returns the new expiry.
///
/// Overwrites any existing expiry — granting twice leaves only the latest
/// window in effect, never a sum.
pub fn grant_premium(conn: &DbConnection, user_id: i64, days: i64) -> Result<DateTime<Utc>> {
    let until = Utc::now() + Duration::days(days);
    db::set_premium_until(conn, user_id, &until)?;
    Ok(until)
}

/// Clears any premium grant. No-op when the user has no record.
pub fn revoke_premium(conn: &DbConnection, user_id: i64) -> Result<()> {
    db::clear_premium(conn, user_id)
}
