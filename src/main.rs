use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;

use serenata::cli::{Cli, Commands};
use serenata::core::{config, init_logger, log_startup_configuration};
use serenata::search::SearchClient;
use serenata::storage::create_pool;
use serenata::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging,
/// database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Catch panics from handler tasks so one bad update can't take the
    // dispatcher down silently.
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Load .env before the first config access — the Lazy statics read the
    // environment exactly once.
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
    }
}

async fn run_bot() -> Result<()> {
    // Missing credentials are fatal; a half-configured bot must not start.
    config::validate_required()?;
    log_startup_configuration();

    std::fs::create_dir_all(&*config::DOWNLOAD_TEMP_DIR)?;

    let db_pool = Arc::new(
        create_pool(&config::DATABASE_PATH).map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let search = Arc::new(SearchClient::from_env());
    let deps = HandlerDeps::new(db_pool, search);

    log::info!("Starting bot...");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
