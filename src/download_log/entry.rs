//! Download Log record shape.

use crate::timestamp::CanonicalTimestamp;

/// Separator line written between consecutive log records.
pub const SEPARATOR: &str = "========================================";

/// One harvested artifact's identity triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub sequence_id: u64,
    pub creation_time: CanonicalTimestamp,
    pub prompt: String,
}

impl LogEntry {
    /// Render the four-line grammar: `#SEQ`, timestamp, prompt (with
    /// embedded newlines flattened to spaces), separator.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let flattened_prompt = self.prompt.replace(['\n', '\r'], " ");
        format!(
            "#{}\n{}\n{}\n{SEPARATOR}\n",
            self.sequence_id,
            self.creation_time.as_str(),
            flattened_prompt
        )
    }
}
