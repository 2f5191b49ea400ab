//! Append-only Download Log file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, warn};

use crate::errors::{HarvestError, HarvestResult};
use crate::timestamp::CanonicalTimestamp;

use super::entry::LogEntry;

/// Lines per record: sequence-id, timestamp, prompt, separator.
const LINES_PER_RECORD: usize = 4;

/// Append-only log plus its in-memory duplicate index, built once on load.
pub struct DownloadLog {
    path: PathBuf,
    writer: BufWriter<tokio::fs::File>,
    index: HashSet<CanonicalTimestamp>,
    next_sequence_id: u64,
}

impl DownloadLog {
    /// Open (creating if absent) the log at `path`, scanning any existing
    /// content to rebuild the duplicate index and next sequence number.
    /// Returns [`HarvestError::LogCorruption`] if the file's line count
    /// isn't a multiple of four or a timestamp line fails validation.
    pub async fn open(path: &Path) -> HarvestResult<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HarvestError::Config(format!("creating logs folder: {e}")))?;
        }

        let (index, next_sequence_id) = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::scan(path).await?
        } else {
            (HashSet::new(), 1)
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| HarvestError::LogCorruption(format!("opening download log: {e}")))?;

        debug!(entries = index.len(), next_sequence_id, "download log opened");

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            index,
            next_sequence_id,
        })
    }

    async fn scan(path: &Path) -> HarvestResult<(HashSet<CanonicalTimestamp>, u64)> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| HarvestError::LogCorruption(format!("opening download log: {e}")))?;
        let mut reader = BufReader::new(file).lines();

        let mut lines = Vec::new();
        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|e| HarvestError::LogCorruption(format!("reading download log: {e}")))?
        {
            lines.push(line);
        }

        let significant: Vec<&String> = lines.iter().filter(|l| !l.is_empty()).collect();
        if significant.len() % LINES_PER_RECORD != 0 {
            return Err(HarvestError::LogCorruption(format!(
                "download log at {} has {} non-empty lines, not a multiple of {LINES_PER_RECORD}",
                path.display(),
                significant.len()
            )));
        }

        let mut index = HashSet::new();
        let mut max_sequence_id = 0u64;

        for chunk in significant.chunks(LINES_PER_RECORD) {
            let [seq, ts, _prompt, _sep] = chunk else {
                return Err(HarvestError::LogCorruption(
                    "malformed download log record".to_string(),
                ));
            };

            let seq: u64 = seq.trim_start_matches('#').parse().map_err(|_| {
                HarvestError::LogCorruption(format!("non-numeric sequence id: {seq}"))
            })?;
            max_sequence_id = max_sequence_id.max(seq);

            let ts = crate::timestamp::parse_exact_canonical(ts).ok_or_else(|| {
                HarvestError::LogCorruption(format!("non-canonical timestamp in log: {ts}"))
            })?;
            index.insert(ts);
        }

        Ok((index, max_sequence_id + 1))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn contains(&self, ts: &CanonicalTimestamp) -> bool {
        self.index.contains(ts)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Append `creation_time`/`prompt` as a new record, flushing before
    /// returning so a crash immediately after a download can't lose the
    /// record of it.
    pub async fn append(
        &mut self,
        creation_time: CanonicalTimestamp,
        prompt: String,
    ) -> HarvestResult<LogEntry> {
        if self.index.contains(&creation_time) {
            warn!(timestamp = %creation_time, "appending a timestamp already present in the index");
        }

        let entry = LogEntry {
            sequence_id: self.next_sequence_id,
            creation_time: creation_time.clone(),
            prompt,
        };

        self.writer
            .write_all(entry.to_lines().as_bytes())
            .await
            .map_err(|e| HarvestError::LogCorruption(format!("writing download log record: {e}")))?;
        self.writer
            .flush()
            .await
            .map_err(|e| HarvestError::LogCorruption(format!("flushing download log: {e}")))?;

        self.index.insert(creation_time);
        self.next_sequence_id += 1;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_empty_log_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut log = DownloadLog::open(&path).await.unwrap();
        assert!(log.is_empty());

        let ts = crate::timestamp::parse_any("25 Aug 2025 02:30:47").unwrap();
        let entry = log.append(ts.clone(), "a prompt with a\nnewline in it".to_string()).await.unwrap();
        assert_eq!(entry.sequence_id, 1);
        assert!(log.contains(&ts));
    }

    #[tokio::test]
    async fn reloading_rebuilds_index_and_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        {
            let mut log = DownloadLog::open(&path).await.unwrap();
            let ts1 = crate::timestamp::parse_any("25 Aug 2025 02:30:47").unwrap();
            let ts2 = crate::timestamp::parse_any("26 Aug 2025 03:00:00").unwrap();
            log.append(ts1, "first prompt".to_string()).await.unwrap();
            log.append(ts2, "second prompt".to_string()).await.unwrap();
        }

        let log = DownloadLog::open(&path).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.next_sequence_id, 3);
    }

    #[tokio::test]
    async fn malformed_log_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        tokio::fs::write(&path, "1\n25 Aug 2025 02:30:47\nprompt\n").await.unwrap();

        let result = DownloadLog::open(&path).await;
        assert!(matches!(result, Err(HarvestError::LogCorruption(_))));
    }

    #[tokio::test]
    async fn non_canonical_timestamp_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        tokio::fs::write(&path, "1\nnot-a-date\nprompt\n---\n").await.unwrap();

        let result = DownloadLog::open(&path).await;
        assert!(matches!(result, Err(HarvestError::LogCorruption(_))));
    }
}
