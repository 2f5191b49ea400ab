//! Download staging-directory polling.
//!
//! `BrowserDriver::enable_downloads` directs Chrome to write completed
//! downloads straight into a staging directory; chromiumoxide does not
//! expose a completion future for that CDP behavior, so this module polls
//! the staging directory for a new, non-empty, non-`.crdownload` file
//! rather than waiting on an event.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::errors::{HarvestError, HarvestResult};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Snapshot the staging directory's current entries, to diff against once a
/// download is expected to land.
pub async fn snapshot_dir(dir: &Path) -> HarvestResult<HashSet<OsString>> {
    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| HarvestError::Download(format!("reading staging dir {}: {e}", dir.display())))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| HarvestError::Download(format!("listing staging dir: {e}")))?
    {
        names.insert(entry.file_name());
    }
    Ok(names)
}

/// Poll `dir` until a file not present in `known_before` appears, is
/// non-empty, and isn't Chrome's in-progress `.crdownload` marker. Returns
/// a transient [`HarvestError::Download`] on timeout so the caller's retry
/// machinery applies uniformly.
pub async fn wait_for_download(
    dir: &Path,
    known_before: &HashSet<OsString>,
    timeout: Duration,
) -> HarvestResult<PathBuf> {
    let deadline = Instant::now() + timeout;
    loop {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| HarvestError::Download(format!("reading staging dir {}: {e}", dir.display())))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| HarvestError::Download(format!("listing staging dir: {e}")))?
        {
            let name = entry.file_name();
            if known_before.contains(&name) {
                continue;
            }
            if name.to_string_lossy().ends_with(".crdownload") {
                continue;
            }
            let size = entry
                .metadata()
                .await
                .map_err(|e| HarvestError::Download(format!("stat'ing candidate download: {e}")))?
                .len();
            if size == 0 {
                continue;
            }
            return Ok(entry.path());
        }

        if Instant::now() >= deadline {
            return Err(HarvestError::Download(format!(
                "timed out after {:?} waiting for a download in {}",
                timeout,
                dir.display()
            )));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_new_nonempty_file() {
        let dir = tempfile::tempdir().unwrap();
        let before = snapshot_dir(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("artifact.mp4"), b"data").await.unwrap();
        let found = wait_for_download(dir.path(), &before, Duration::from_secs(1)).await.unwrap();
        assert_eq!(found.file_name().unwrap(), "artifact.mp4");
    }

    #[tokio::test]
    async fn ignores_crdownload_marker_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let before = snapshot_dir(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("partial.crdownload"), b"x").await.unwrap();
        tokio::fs::write(dir.path().join("empty.mp4"), b"").await.unwrap();
        let result = wait_for_download(dir.path(), &before, Duration::from_millis(300)).await;
        assert!(matches!(result, Err(HarvestError::Download(_))));
    }

    #[tokio::test]
    async fn times_out_is_classified_transient() {
        let dir = tempfile::tempdir().unwrap();
        let before = snapshot_dir(dir.path()).await.unwrap();
        let err = wait_for_download(dir.path(), &before, Duration::from_millis(100)).await.unwrap_err();
        assert!(err.is_transient());
    }
}
