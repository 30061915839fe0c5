//! Serenata - Telegram bot for searching music on YouTube, converting it
//! to MP3, and sharing files from a curated channel.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, the rate & access gate, utilities
//! - `storage`: database pool, user records, archive file index
//! - `search`: YouTube Data API client
//! - `archive`: channel file resolver (/file)
//! - `download`: yt-dlp extraction and the delivery pipeline
//! - `telegram`: bot construction, dispatch schema, handlers, broadcast

pub mod archive;
pub mod cli;
pub mod core;
pub mod download;
pub mod search;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::error::{AppError, AppResult};
pub use crate::download::{DownloadOutcome, FailureKind};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
