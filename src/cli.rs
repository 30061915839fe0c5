use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "serenata")]
#[command(version, about = "Telegram bot for searching music on YouTube and sharing channel files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
