use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Owner user ID — the only identity allowed to run /add, /rem, /broadcast.
/// Read from OWNER_ID environment variable. 0 means "not configured".
pub static OWNER_ID: Lazy<i64> = Lazy::new(|| {
    env::var("OWNER_ID")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
});

/// Archive channel ID for /file lookups (e.g. -1001234567890).
/// Read from CHANNEL_ID environment variable. 0 means "not configured".
pub static CHANNEL_ID: Lazy<i64> = Lazy::new(|| {
    env::var("CHANNEL_ID")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
});

/// YouTube Data API v3 key
/// Read from YT_API_KEY environment variable
pub static YT_API_KEY: Lazy<String> = Lazy::new(|| env::var("YT_API_KEY").unwrap_or_else(|_| String::new()));

/// Maximum number of search results offered per query
/// Read from MAX_SEARCH_RESULTS environment variable
/// Default: 8
pub static MAX_SEARCH_RESULTS: Lazy<u8> = Lazy::new(|| {
    env::var("MAX_SEARCH_RESULTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8)
});

/// Temporary directory for produced audio files
/// Read from DOWNLOAD_TEMP_DIR environment variable
/// Default: ./tmp
pub static DOWNLOAD_TEMP_DIR: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_TEMP_DIR").unwrap_or_else(|_| "./tmp".to_string()));

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: database.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "database.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Rate limiting configuration
pub mod rate_limit {
    /// Minimum elapsed time between two successful deliveries to the same
    /// user (in seconds)
    pub const COOLDOWN_SECONDS: i64 = 10;
}

/// Search service configuration
pub mod search {
    use super::Duration;

    /// Timeout for YouTube Data API requests (in seconds)
    pub const TIMEOUT_SECS: u64 = 15;

    /// Search request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(TIMEOUT_SECS)
    }
}

/// Download configuration
pub mod download {
    /// Target audio bitrate passed to yt-dlp's mp3 postprocessor
    pub const AUDIO_BITRATE: &str = "192K";
}

/// Archive scan configuration
pub mod archive {
    /// Maximum number of indexed channel messages scanned per /file query
    pub const SCAN_WINDOW: usize = 50;
}

/// Broadcast configuration
pub mod broadcast {
    use super::Duration;

    /// Delay between individual sends, to throttle outbound rate (ms)
    pub const INTER_SEND_DELAY_MS: u64 = 100;

    /// Inter-send delay duration
    pub fn inter_send_delay() -> Duration {
        Duration::from_millis(INTER_SEND_DELAY_MS)
    }
}

/// Network configuration for the Telegram client
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API requests (in seconds). Generous because
    /// audio uploads ride the same client.
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Validates that every required configuration value is present.
///
/// Called once at startup; a missing bot token, owner identity, archive
/// channel or API key is fatal, matching the documented contract that the
/// process refuses to start half-configured.
pub fn validate_required() -> anyhow::Result<()> {
    let mut missing = Vec::new();

    if BOT_TOKEN.is_empty() {
        missing.push("BOT_TOKEN");
    }
    if *OWNER_ID == 0 {
        missing.push("OWNER_ID");
    }
    if *CHANNEL_ID == 0 {
        missing.push("CHANNEL_ID");
    }
    if YT_API_KEY.is_empty() {
        missing.push("YT_API_KEY");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "Missing required environment variables: {}. Check .env.",
            missing.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_cooldown_constant() {
        assert_eq!(super::rate_limit::COOLDOWN_SECONDS, 10);
    }

    #[test]
    fn test_broadcast_delay_is_subsecond() {
        assert!(super::broadcast::inter_send_delay().as_millis() < 1000);
    }
}
