//! Bot initialization and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// The bot type used across handlers.
pub type Bot = teloxide::Bot;

/// Public bot commands. Owner-only commands are intentionally absent: they
/// are matched by hidden text-prefix branches in the dispatch schema so
/// that they never show up in the Telegram command menu.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "list commands and examples")]
    Help,
    #[command(description = "search YouTube and get an MP3")]
    Song(String),
    #[command(description = "send a file from the channel by name")]
    File(String),
}

/// Creates a Bot instance with a timeout-configured HTTP client.
///
/// The generous timeout covers audio uploads, which ride the same client
/// as ordinary API calls.
pub fn create_bot() -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::with_client(config::BOT_TOKEN.clone(), client))
}

/// Registers the public command set in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Returns true when the message comes from the configured owner.
///
/// Used as a dispatch predicate: owner-only branches simply don't match
/// for anyone else, so unauthorized attempts produce no reply at all.
pub fn is_owner(msg: &Message) -> bool {
    msg.from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .map(|id| id == *config::OWNER_ID)
        .unwrap_or(false)
}
