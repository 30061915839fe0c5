use thiserror::Error;

/// Centralized error types for the application
///
/// All failures crossing a component boundary are converted to this enum.
/// Uses `thiserror` for automatic conversion and display formatting.
///
/// The `detail`/payload fields of the external-service variants are for
/// logs only; user-facing text is produced by the handlers and stays
/// generic.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP/Fetch errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The search service answered with a non-success status or the call
    /// timed out. `status` is `None` for transport-level failures.
    #[error("Search service unavailable (status: {status:?})")]
    SearchUnavailable {
        status: Option<reqwest::StatusCode>,
        detail: String,
    },

    /// The archive index could not be scanned at all. Distinct from a scan
    /// that completed without a match, which is `Ok(None)` at the resolver.
    #[error("Archive unavailable: {0}")]
    ArchiveUnavailable(String),

    /// Download/extraction errors surfaced outside the pipeline
    #[error("Download error: {0}")]
    Download(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Stable label for log lines and failure accounting.
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::DatabasePool(_) => "database",
            AppError::Telegram(_) => "telegram",
            AppError::Http(_) => "http",
            AppError::Io(_) => "io",
            AppError::SearchUnavailable { .. } => "search_unavailable",
            AppError::ArchiveUnavailable(_) => "archive_unavailable",
            AppError::Download(_) => "download",
            AppError::Validation(_) => "validation",
        }
    }
}
