//! Telegram integration: bot construction, dispatch schema, handlers,
//! broadcast fanout

pub mod bot;
pub mod broadcast;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, is_owner, setup_bot_commands, Bot, Command};
pub use broadcast::broadcast_to_all;
pub use handlers::{schema, HandlerDeps};
