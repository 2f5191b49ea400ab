//! Canonical output filename derivation.
//!
//! Names take the form `YYYYMMDD-HHMMSS[-k].ext`, where `k` disambiguates
//! two artifacts that share a creation timestamp. Disambiguation is resolved
//! against the destination folder's current contents rather than an
//! in-memory counter, so a restarted run picks up where a prior one left off.

use std::path::{Path, PathBuf};

use crate::errors::{HarvestError, HarvestResult};
use crate::timestamp::{to_filename_prefix, CanonicalTimestamp};

/// Compute the destination path for a downloaded artifact, picking the
/// lowest `k` (omitted for the first collision) not already present in
/// `downloads_folder`.
pub fn canonical_destination(
    downloads_folder: &Path,
    creation_time: &CanonicalTimestamp,
    extension: &str,
) -> HarvestResult<PathBuf> {
    let prefix = to_filename_prefix(creation_time).ok_or_else(|| {
        HarvestError::Config(format!("cannot derive filename from timestamp: {creation_time}"))
    })?;
    let ext = extension.trim_start_matches('.');

    let unsuffixed = downloads_folder.join(format!("{prefix}.{ext}"));
    if !unsuffixed.exists() {
        return Ok(unsuffixed);
    }

    for k in 1.. {
        let candidate = downloads_folder.join(format!("{prefix}-{k}.{ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    unreachable!("disambiguation counter is unbounded")
}

/// Extract the extension from a source filename or URL path, defaulting to
/// `bin` when none is present.
#[must_use]
pub fn extension_from_source(source_name: &str) -> String {
    Path::new(source_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> CanonicalTimestamp {
        crate::timestamp::parse_exact_canonical(s).unwrap()
    }

    #[test]
    fn first_artifact_gets_unsuffixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = canonical_destination(dir.path(), &ts("25 Aug 2025 02:30:47"), "png").unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "20250825-023047.png");
    }

    #[test]
    fn collision_picks_next_disambiguator() {
        let dir = tempfile::tempdir().unwrap();
        let first = canonical_destination(dir.path(), &ts("25 Aug 2025 02:30:47"), "png").unwrap();
        std::fs::write(&first, b"x").unwrap();
        let second = canonical_destination(dir.path(), &ts("25 Aug 2025 02:30:47"), "png").unwrap();
        assert_eq!(second.file_name().unwrap().to_str().unwrap(), "20250825-023047-1.png");
    }

    #[test]
    fn extension_is_lowercased_and_dot_stripped() {
        assert_eq!(extension_from_source("clip.MP4"), "mp4");
        assert_eq!(extension_from_source("no_extension"), "bin");
    }
}
