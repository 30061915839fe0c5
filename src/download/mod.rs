//! Download pipeline: source abstraction, yt-dlp extraction, delivery,
//! and the gated state machine tying them together.

pub mod error;
pub mod pipeline;
pub mod send;
pub mod source;

// Re-exports for convenience
pub use error::DownloadError;
pub use pipeline::{DownloadOutcome, FailureKind};
pub use send::{AudioDelivery, TelegramAudioDelivery};
pub use source::{AudioSource, YtDlpSource};
