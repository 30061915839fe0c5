//! Audio acquisition abstraction.
//!
//! The pipeline talks to external services through two small traits so the
//! state machine can be exercised in tests without a network or a yt-dlp
//! binary. `YtDlpSource` is the production implementation: title lookup via
//! the search service's detail endpoint, extraction via yt-dlp.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use url::Url;

use crate::core::config;
use crate::core::utils::escape_filename;
use crate::download::error::DownloadError;
use crate::search::SearchClient;

/// Source of audio artifacts for selected candidates.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Best-effort authoritative title for the video. `None` on any
    /// failure; callers fall back to the raw id.
    async fn resolve_title(&self, video_id: &str) -> Option<String>;

    /// Produces a local MP3 for the video and returns its path. Must not
    /// leave a partial artifact behind on error.
    async fn extract(&self, video_id: &str, title: &str) -> Result<PathBuf, DownloadError>;
}

/// yt-dlp backed audio source.
pub struct YtDlpSource {
    search: Arc<SearchClient>,
}

impl YtDlpSource {
    pub fn new(search: Arc<SearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl AudioSource for YtDlpSource {
    async fn resolve_title(&self, video_id: &str) -> Option<String> {
        self.search.video_title(video_id).await
    }

    async fn extract(&self, video_id: &str, title: &str) -> Result<PathBuf, DownloadError> {
        let temp_dir = PathBuf::from(&*config::DOWNLOAD_TEMP_DIR);
        if let Err(e) = std::fs::create_dir_all(&temp_dir) {
            return Err(DownloadError::Extraction(format!(
                "failed to create temp dir {}: {}",
                temp_dir.display(),
                e
            )));
        }

        // The video id plus the escaped title is the collision-avoidance
        // key between concurrent requests for different content.
        let base = escape_filename(&format!("{}_{}", title, video_id));
        let template = temp_dir.join(format!("{}.%(ext)s", base));
        let expected = temp_dir.join(format!("{}.mp3", base));

        let url = watch_url(video_id)
            .map_err(|e| DownloadError::Extraction(format!("invalid video id '{}': {}", video_id, e)))?;

        let ytdl_bin = config::YTDL_BIN.clone();
        let template_str = template.to_string_lossy().into_owned();
        let url_str = url.to_string();

        // yt-dlp blocks for the whole download; run it off the async
        // scheduler so concurrent interactions keep flowing. No timeout:
        // a hung extraction occupies one blocking slot, nothing else.
        let output = tokio::task::spawn_blocking(move || {
            Command::new(&ytdl_bin)
                .args([
                    "-o",
                    template_str.as_str(),
                    "--extract-audio",
                    "--audio-format",
                    "mp3",
                    "--audio-quality",
                    config::download::AUDIO_BITRATE,
                    "--no-playlist",
                    "--no-warnings",
                    "--quiet",
                    "--force-overwrites",
                    url_str.as_str(),
                ])
                .output()
        })
        .await
        .map_err(|e| DownloadError::Extraction(format!("extraction task join error: {}", e)))?
        .map_err(|e| DownloadError::Extraction(format!("failed to spawn yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr.chars().take(500).collect();
            log::error!("yt-dlp failed for {} (status {}): {}", video_id, output.status, tail);
            // No partial artifact is retained on a failed extraction.
            let _ = std::fs::remove_file(&expected);
            return Err(DownloadError::Extraction(format!(
                "yt-dlp exited with status {}",
                output.status
            )));
        }

        if expected.exists() {
            return Ok(expected);
        }

        // yt-dlp occasionally picks a different final name than the
        // template predicts; scan the temp dir for a plausible match
        // before giving up.
        match find_fallback_artifact(&temp_dir, video_id) {
            Some(path) => {
                log::warn!(
                    "Expected artifact {} missing, using fallback {}",
                    expected.display(),
                    path.display()
                );
                Ok(path)
            }
            None => Err(DownloadError::MissingArtifact(format!(
                "no mp3 produced for {} (expected {})",
                video_id,
                expected.display()
            ))),
        }
    }
}

/// Builds the watch URL for a video id.
fn watch_url(video_id: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://www.youtube.com/watch?v={}", video_id))
}

/// Secondary artifact lookup: any mp3 in `dir` whose name contains the
/// video id.
pub(crate) fn find_fallback_artifact(dir: &Path, video_id: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".mp3") && name.contains(video_id) {
            return Some(entry.path());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_watch_url() {
        let url = watch_url("abc123").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_find_fallback_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Some Song_abc123.mp3"), b"x").unwrap();
        fs::write(dir.path().join("Other_zzz999.mp3"), b"x").unwrap();
        fs::write(dir.path().join("abc123.webm"), b"x").unwrap();

        let found = find_fallback_artifact(dir.path(), "abc123").unwrap();
        assert!(found.to_string_lossy().ends_with("Some Song_abc123.mp3"));

        assert!(find_fallback_artifact(dir.path(), "nope").is_none());
    }
}
