use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Result};

/// A user record as stored in the database.
///
/// A row exists for every user who has ever written to the bot in private;
/// rows are created lazily on first contact and never deleted.
pub struct User {
    /// Telegram ID of the user
    pub telegram_id: i64,
    /// First name captured on first contact, never updated afterwards
    pub first_name: Option<String>,
    /// Premium expiry; absent or in the past means not premium
    pub premium_until: Option<DateTime<Utc>>,
    /// Timestamp of the most recent successful delivery to this user
    pub last_sent: Option<DateTime<Utc>>,
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and ensures the
/// schema exists.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let conn = pool.get()?;
    if let Err(e) = init_schema(&conn) {
        log::warn!("Failed to initialize schema: {}", e);
    }

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Creates the tables used by the bot. Idempotent.
fn init_schema(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            telegram_id   INTEGER PRIMARY KEY,
            first_name    TEXT,
            premium_until TEXT,
            last_sent     TEXT,
            created_at    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS channel_files (
            message_id  INTEGER PRIMARY KEY,
            kind        TEXT NOT NULL,
            file_name   TEXT,
            caption     TEXT,
            recorded_at TEXT NOT NULL
        );",
    )
}

/// Serializes a UTC timestamp for storage.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parses a stored timestamp. Malformed values read as absent rather than
/// failing the whole row.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}

/// Inserts a user record if none exists yet, leaving existing rows
/// untouched. The ON CONFLICT form makes concurrent first contacts safe:
/// whichever insert lands first wins and the other is a no-op, so
/// `first_name` is never overwritten.
pub fn ensure_user(conn: &DbConnection, telegram_id: i64, first_name: Option<&str>) -> Result<()> {
    conn.execute(
        "INSERT INTO users (telegram_id, first_name, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(telegram_id) DO NOTHING",
        params![telegram_id, first_name, format_timestamp(&Utc::now())],
    )?;
    Ok(())
}

/// Fetches a user record by Telegram ID.
pub fn get_user(conn: &DbConnection, telegram_id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT telegram_id, first_name, premium_until, last_sent FROM users WHERE telegram_id = ?1",
        params![telegram_id],
        |row| {
            Ok(User {
                telegram_id: row.get(0)?,
                first_name: row.get(1)?,
                premium_until: row.get::<_, Option<String>>(2)?.as_deref().and_then(parse_timestamp),
                last_sent: row.get::<_, Option<String>>(3)?.as_deref().and_then(parse_timestamp),
            })
        },
    )
    .optional()
}

/// Upserts the premium expiry for a user. Overwrites any prior value; the
/// grant is never additive.
pub fn set_premium_until(conn: &DbConnection, telegram_id: i64, until: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO users (telegram_id, premium_until, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(telegram_id) DO UPDATE SET premium_until = excluded.premium_until",
        params![telegram_id, format_timestamp(until), format_timestamp(&Utc::now())],
    )?;
    Ok(())
}

/// Clears the premium expiry on an existing record. No-op when no record
/// exists (deliberately not an upsert).
pub fn clear_premium(conn: &DbConnection, telegram_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET premium_until = NULL WHERE telegram_id = ?1",
        params![telegram_id],
    )?;
    Ok(())
}

/// Upserts the last-successful-delivery timestamp for a user.
pub fn set_last_sent(conn: &DbConnection, telegram_id: i64, at: &DateTime<Utc>) -> Result<()> {
    conn.execute(
        "INSERT INTO users (telegram_id, last_sent, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(telegram_id) DO UPDATE SET last_sent = excluded.last_sent",
        params![telegram_id, format_timestamp(at), format_timestamp(&Utc::now())],
    )?;
    Ok(())
}

/// Returns the Telegram IDs of every known user (broadcast fanout scan).
pub fn all_user_ids(conn: &DbConnection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT telegram_id FROM users")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}
