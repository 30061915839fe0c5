//! Logging initialization and startup diagnostics

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective (non-secret) configuration at startup.
pub fn log_startup_configuration() {
    log::info!("Owner ID: {}", *config::OWNER_ID);
    log::info!("Archive channel ID: {}", *config::CHANNEL_ID);
    log::info!("Max search results: {}", *config::MAX_SEARCH_RESULTS);
    log::info!("Temp directory: {}", &*config::DOWNLOAD_TEMP_DIR);
    log::info!("Database path: {}", &*config::DATABASE_PATH);
    log::info!("yt-dlp binary: {}", &*config::YTDL_BIN);
}
