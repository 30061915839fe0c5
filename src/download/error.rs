use std::fmt;

/// Structured error type for the download pipeline.
///
/// Categorized so the terminal state (and the log line) can tell an
/// extraction failure from a missing artifact from a transport rejection,
/// even though the user-facing text stays generic.
#[derive(Debug)]
pub enum DownloadError {
    /// yt-dlp failed: spawn error, bad exit code, unsupported source
    Extraction(String),
    /// Extraction reported success but no artifact was found, even after
    /// the fallback directory scan
    MissingArtifact(String),
    /// Telegram rejected the outbound attachment (size limit, transport)
    Delivery(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Extraction(msg) => write!(f, "{}", msg),
            DownloadError::MissingArtifact(msg) => write!(f, "{}", msg),
            DownloadError::Delivery(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

impl DownloadError {
    /// Returns subcategory for log lines
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Extraction(_) => "extraction",
            DownloadError::MissingArtifact(_) => "missing_artifact",
            DownloadError::Delivery(_) => "delivery",
        }
    }

    /// Returns the inner message
    pub fn message(&self) -> &str {
        match self {
            DownloadError::Extraction(msg)
            | DownloadError::MissingArtifact(msg)
            | DownloadError::Delivery(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_display() {
        let err = DownloadError::Extraction("yt-dlp exited with status 1".into());
        assert_eq!(err.to_string(), "yt-dlp exited with status 1");
    }

    #[test]
    fn test_download_error_subcategory() {
        assert_eq!(DownloadError::Extraction("".into()).subcategory(), "extraction");
        assert_eq!(
            DownloadError::MissingArtifact("".into()).subcategory(),
            "missing_artifact"
        );
        assert_eq!(DownloadError::Delivery("".into()).subcategory(), "delivery");
    }
}
