//! Async filesystem helpers for staged temp artifacts.
//!
//! Every export stage writes a temp file that must be deleted by the stage
//! that consumed it, on both success and failure paths. These helpers keep
//! that cleanup best-effort and loud in the logs rather than fatal.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{debug, warn};

/// Current UNIX time in milliseconds. Used for export filenames.
pub fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Deletes a file, logging instead of failing.
///
/// Cleanup paths must never mask the error that got us there, so a failed
/// delete is a warning only.
pub async fn remove_file_quiet(path: impl AsRef<Path>) {
    let path = path.as_ref();
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed temp file: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove temp file {}: {}", path.display(), e),
    }
}

/// Deletes files in `dir` older than `max_age`.
///
/// When `max_age` is zero every file goes, which is the emergency-cleanup
/// variant. Returns the number of files removed; unreadable entries are
/// skipped with a warning.
pub async fn sweep_temp_files(dir: &Path, max_age: Duration) -> usize {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
        Err(e) => {
            warn!("Failed to read temp dir {}: {}", dir.display(), e);
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let expired = match entry.metadata().await {
            Ok(meta) if !meta.is_file() => false,
            Ok(meta) => meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .map(|age| age >= max_age)
                .unwrap_or(false),
            Err(e) => {
                warn!("Skipping {} during sweep: {}", path.display(), e);
                false
            }
        };
        if expired {
            remove_file_quiet(&path).await;
            removed += 1;
        }
    }
    if removed > 0 {
        debug!("Temp sweep removed {} file(s) from {}", removed, dir.display());
    }
    removed
}
