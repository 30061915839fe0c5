//! Artifact delivery to the requesting user's private chat.

use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::download::error::DownloadError;
use crate::telegram::Bot;

/// Transport seam for the pipeline's delivery step.
#[async_trait]
pub trait AudioDelivery: Send + Sync {
    /// Transmits the artifact as an audio attachment carrying `title`.
    async fn deliver(&self, artifact: &Path, title: &str) -> Result<(), DownloadError>;
}

/// Sends the artifact to one Telegram chat.
pub struct TelegramAudioDelivery {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramAudioDelivery {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl AudioDelivery for TelegramAudioDelivery {
    async fn deliver(&self, artifact: &Path, title: &str) -> Result<(), DownloadError> {
        self.bot
            .send_audio(self.chat_id, InputFile::file(artifact.to_path_buf()))
            .title(title)
            .await
            .map(|_| ())
            .map_err(|e| DownloadError::Delivery(e.to_string()))
    }
}
