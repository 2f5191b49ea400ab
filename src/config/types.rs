//! Configuration record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::timestamp::{CanonicalTimestamp, StartFromComparator};

use super::actions::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateMode {
    Finish,
    Skip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

/// Immutable-for-the-run configuration record.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub gallery_url: String,
    pub headless: bool,
    pub viewport: Viewport,
    pub keep_browser_open: bool,

    pub downloads_folder: PathBuf,
    pub logs_folder: PathBuf,
    pub max_downloads: Option<u64>,
    pub duplicate_mode: DuplicateMode,
    pub consecutive_duplicate_threshold: u32,
    pub start_from: Option<CanonicalTimestamp>,
    pub start_from_comparator: StartFromComparator,

    pub min_scroll_distance: u32,
    pub max_scroll_attempts: u32,
    pub max_consecutive_scroll_failures: u32,

    pub dom_wait_timeout_ms: u64,
    pub download_timeout_ms: u64,
    pub retry_attempts: u32,

    pub max_consecutive_extraction_failures: u32,

    pub action_script: Vec<Action>,
}
