//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors surfaced by the harvester core.
#[derive(Debug, Clone, Error)]
pub enum HarvestError {
    /// Missing required key, unparseable timestamp, path outside permitted roots.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transient or permanent failure from the browser driver adapter.
    #[error("browser error: {0}")]
    Browser(String),

    /// All extraction strategies failed or returned low-confidence results.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Download timed out or produced an empty/unverifiable stream.
    #[error("download error: {0}")]
    Download(String),

    /// The Download Log on disk is malformed.
    #[error("download log corrupted: {0}")]
    LogCorruption(String),

    /// The run was cancelled by an external signal. Not a failure.
    #[error("operation cancelled")]
    Cancelled,

    /// Catch-all for errors that don't fit a more specific kind.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HarvestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(format!("{err:#}"))
    }
}

impl HarvestError {
    /// Classify a lower-level error as transient (safe to retry) or permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        let msg = self.to_string().to_lowercase();
        msg.contains("timeout")
            || msg.contains("timed out")
            || msg.contains("network")
            || msg.contains("connection")
            || msg.contains("not attached")
            || msg.contains("not visible")
            || msg.contains("navigation")
    }

    /// Process exit code for this error, per the batch-invocation contract.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 2,
            Self::Config(_) => 3,
            Self::Browser(_) => 4,
            Self::LogCorruption(_) => 5,
            Self::Extraction(_) | Self::Download(_) | Self::Other(_) => 1,
        }
    }
}

pub type HarvestResult<T> = Result<T, HarvestError>;
