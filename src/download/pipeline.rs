//! The search-select-download-deliver pipeline.
//!
//! One invocation per selection event, strictly sequential, no retries
//! between steps: gate check → title resolution (best-effort) → extraction
//! (offloaded) → delivery → mark-sent, with unconditional artifact cleanup
//! once an artifact exists. Failures become terminal outcomes, never
//! panics; the only `Err` out of here is store unavailability.

use std::path::Path;

use crate::core::error::AppError;
use crate::core::gate;
use crate::download::error::DownloadError;
use crate::download::send::AudioDelivery;
use crate::download::source::AudioSource;
use crate::storage::db::{get_connection, DbPool};

/// Which step a failed request died in. Reported generically to the user,
/// precisely in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Extraction,
    MissingArtifact,
    Delivery,
}

impl FailureKind {
    fn from_error(err: &DownloadError) -> Self {
        match err {
            DownloadError::Extraction(_) => FailureKind::Extraction,
            DownloadError::MissingArtifact(_) => FailureKind::MissingArtifact,
            DownloadError::Delivery(_) => FailureKind::Delivery,
        }
    }
}

/// Terminal state of one pipeline run.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Artifact delivered, `last_sent` updated, artifact deleted
    Delivered { title: String },
    /// Cooldown still active; nothing was attempted
    RejectedCooldown { wait_secs: i64 },
    /// Extraction, artifact resolution, or delivery failed
    Failed { kind: FailureKind },
}

/// Runs the pipeline for one selected candidate.
///
/// Two users (or one user, cooldown permitting) selecting the same video
/// concurrently run two fully independent extractions — there is no
/// in-flight dedup by video id.
pub async fn run(
    pool: &DbPool,
    source: &dyn AudioSource,
    delivery: &dyn AudioDelivery,
    user_id: i64,
    video_id: &str,
) -> Result<DownloadOutcome, AppError> {
    // Gate check first: a rejected request must do no work at all.
    {
        let conn = get_connection(pool)?;
        if !gate::can_send(&conn, user_id)? {
            let wait_secs = gate::remaining_wait(&conn, user_id)?.unwrap_or(0);
            return Ok(DownloadOutcome::RejectedCooldown { wait_secs });
        }
    }

    // Best-effort enrichment; the raw id is an acceptable title.
    let title = match source.resolve_title(video_id).await {
        Some(t) => t,
        None => video_id.to_string(),
    };

    let artifact = match source.extract(video_id, &title).await {
        Ok(path) => path,
        Err(e) => {
            log::error!(
                "Extraction failed for {} ({}): {}",
                video_id,
                e.subcategory(),
                e.message()
            );
            return Ok(DownloadOutcome::Failed {
                kind: FailureKind::from_error(&e),
            });
        }
    };

    let delivered = delivery.deliver(&artifact, &title).await;

    let outcome = match delivered {
        Ok(()) => {
            // Delivery succeeded; the user has the file even if the
            // bookkeeping below hiccups.
            match get_connection(pool) {
                Ok(conn) => {
                    if let Err(e) = gate::mark_sent(&conn, user_id) {
                        log::error!("Failed to mark delivery for user {}: {}", user_id, e);
                    }
                }
                Err(e) => log::error!("Failed to get connection for mark_sent: {}", e),
            }
            DownloadOutcome::Delivered { title }
        }
        Err(e) => {
            log::error!(
                "Delivery failed for {} to user {} ({}): {}",
                video_id,
                user_id,
                e.subcategory(),
                e.message()
            );
            DownloadOutcome::Failed {
                kind: FailureKind::from_error(&e),
            }
        }
    };

    cleanup_artifact(&artifact);
    Ok(outcome)
}

/// Deletes the produced artifact. Failures are logged and swallowed: they
/// cannot change the user-visible outcome.
fn cleanup_artifact(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Failed to delete artifact {}: {}", path.display(), e);
        }
    }
}
