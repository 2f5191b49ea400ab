//! Type-safe builder for [`Config`] using the typestate pattern.

use std::marker::PhantomData;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::timestamp::{self, StartFromComparator};
use crate::utils::constants::{
    CONSECUTIVE_DUPLICATE_THRESHOLD_MAX, CONSECUTIVE_DUPLICATE_THRESHOLD_MIN,
    DEFAULT_DOM_WAIT_TIMEOUT, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_CONSECUTIVE_EXTRACTION_FAILURES,
    DEFAULT_MAX_CONSECUTIVE_SCROLL_FAILURES, DEFAULT_MAX_SCROLL_ATTEMPTS, DEFAULT_MIN_SCROLL_DISTANCE,
    DEFAULT_RETRY_ATTEMPTS,
};

use super::actions::Action;
use super::types::{Config, DuplicateMode, Viewport};

pub struct Unset;
pub struct WithUrl;

pub struct ConfigBuilder<State = Unset> {
    name: String,
    gallery_url: Option<String>,
    headless: bool,
    viewport: Viewport,
    keep_browser_open: bool,
    downloads_folder: PathBuf,
    logs_folder: PathBuf,
    max_downloads: Option<u64>,
    duplicate_mode: DuplicateMode,
    consecutive_duplicate_threshold: Option<u32>,
    start_from: Option<String>,
    start_from_comparator: StartFromComparator,
    min_scroll_distance: u32,
    max_scroll_attempts: u32,
    max_consecutive_scroll_failures: u32,
    dom_wait_timeout_ms: u64,
    download_timeout_ms: u64,
    retry_attempts: u32,
    max_consecutive_extraction_failures: u32,
    action_script: Vec<Action>,
    _phantom: PhantomData<State>,
}

impl Default for ConfigBuilder<Unset> {
    fn default() -> Self {
        Self {
            name: String::new(),
            gallery_url: None,
            headless: true,
            viewport: Viewport::default(),
            keep_browser_open: false,
            downloads_folder: PathBuf::from("./downloads"),
            logs_folder: PathBuf::from("./logs"),
            max_downloads: None,
            duplicate_mode: DuplicateMode::Finish,
            consecutive_duplicate_threshold: None,
            start_from: None,
            start_from_comparator: StartFromComparator::Equals,
            min_scroll_distance: DEFAULT_MIN_SCROLL_DISTANCE,
            max_scroll_attempts: DEFAULT_MAX_SCROLL_ATTEMPTS,
            max_consecutive_scroll_failures: DEFAULT_MAX_CONSECUTIVE_SCROLL_FAILURES,
            dom_wait_timeout_ms: DEFAULT_DOM_WAIT_TIMEOUT.as_millis() as u64,
            download_timeout_ms: DEFAULT_DOWNLOAD_TIMEOUT.as_millis() as u64,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            max_consecutive_extraction_failures: DEFAULT_MAX_CONSECUTIVE_EXTRACTION_FAILURES,
            action_script: Vec::new(),
            _phantom: PhantomData,
        }
    }
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigBuilder<Unset> {
        ConfigBuilder::default()
    }
}

impl ConfigBuilder<Unset> {
    #[must_use]
    pub fn gallery_url(self, url: impl Into<String>) -> ConfigBuilder<WithUrl> {
        ConfigBuilder {
            gallery_url: Some(url.into()),
            name: self.name,
            headless: self.headless,
            viewport: self.viewport,
            keep_browser_open: self.keep_browser_open,
            downloads_folder: self.downloads_folder,
            logs_folder: self.logs_folder,
            max_downloads: self.max_downloads,
            duplicate_mode: self.duplicate_mode,
            consecutive_duplicate_threshold: self.consecutive_duplicate_threshold,
            start_from: self.start_from,
            start_from_comparator: self.start_from_comparator,
            min_scroll_distance: self.min_scroll_distance,
            max_scroll_attempts: self.max_scroll_attempts,
            max_consecutive_scroll_failures: self.max_consecutive_scroll_failures,
            dom_wait_timeout_ms: self.dom_wait_timeout_ms,
            download_timeout_ms: self.download_timeout_ms,
            retry_attempts: self.retry_attempts,
            max_consecutive_extraction_failures: self.max_consecutive_extraction_failures,
            action_script: self.action_script,
            _phantom: PhantomData,
        }
    }
}

/// Setter methods available regardless of builder state.
macro_rules! shared_setters {
    () => {
        #[must_use]
        pub fn name(mut self, name: impl Into<String>) -> Self {
            self.name = name.into();
            self
        }

        #[must_use]
        pub fn headless(mut self, headless: bool) -> Self {
            self.headless = headless;
            self
        }

        #[must_use]
        pub fn viewport(mut self, width: u32, height: u32) -> Self {
            self.viewport = Viewport { width, height };
            self
        }

        #[must_use]
        pub fn keep_browser_open(mut self, keep: bool) -> Self {
            self.keep_browser_open = keep;
            self
        }

        #[must_use]
        pub fn downloads_folder(mut self, path: impl Into<PathBuf>) -> Self {
            self.downloads_folder = path.into();
            self
        }

        #[must_use]
        pub fn logs_folder(mut self, path: impl Into<PathBuf>) -> Self {
            self.logs_folder = path.into();
            self
        }

        #[must_use]
        pub fn max_downloads(mut self, max: u64) -> Self {
            self.max_downloads = Some(max);
            self
        }

        #[must_use]
        pub fn duplicate_mode(mut self, mode: DuplicateMode) -> Self {
            self.duplicate_mode = mode;
            self
        }

        #[must_use]
        pub fn consecutive_duplicate_threshold(mut self, n: u32) -> Self {
            self.consecutive_duplicate_threshold = Some(n);
            self
        }

        #[must_use]
        pub fn start_from(mut self, canonical: impl Into<String>) -> Self {
            self.start_from = Some(canonical.into());
            self
        }

        #[must_use]
        pub fn min_scroll_distance(mut self, n: u32) -> Self {
            self.min_scroll_distance = n;
            self
        }

        #[must_use]
        pub fn max_scroll_attempts(mut self, n: u32) -> Self {
            self.max_scroll_attempts = n;
            self
        }

        #[must_use]
        pub fn max_consecutive_scroll_failures(mut self, n: u32) -> Self {
            self.max_consecutive_scroll_failures = n;
            self
        }

        #[must_use]
        pub fn dom_wait_timeout_ms(mut self, ms: u64) -> Self {
            self.dom_wait_timeout_ms = ms;
            self
        }

        #[must_use]
        pub fn download_timeout_ms(mut self, ms: u64) -> Self {
            self.download_timeout_ms = ms;
            self
        }

        #[must_use]
        pub fn retry_attempts(mut self, n: u32) -> Self {
            self.retry_attempts = n;
            self
        }

        #[must_use]
        pub fn action_script(mut self, actions: Vec<Action>) -> Self {
            self.action_script = actions;
            self
        }
    };
}

impl ConfigBuilder<WithUrl> {
    shared_setters!();

    /// Finalize the configuration, validating cross-field invariants that
    /// can't be enforced at the type level.
    pub fn build(self) -> Result<Config> {
        let gallery_url = self
            .gallery_url
            .ok_or_else(|| anyhow!("gallery_url is required"))?;

        let start_from = match self.start_from {
            Some(raw) => Some(
                timestamp::parse_exact_canonical(&raw)
                    .ok_or_else(|| anyhow!("start_from is not a canonical timestamp: {raw}"))?,
            ),
            None => None,
        };

        let consecutive_duplicate_threshold = match self.duplicate_mode {
            DuplicateMode::Skip => {
                let n = self.consecutive_duplicate_threshold.ok_or_else(|| {
                    anyhow!("consecutive_duplicate_threshold is required when duplicate_mode is skip")
                })?;
                if !(CONSECUTIVE_DUPLICATE_THRESHOLD_MIN..=CONSECUTIVE_DUPLICATE_THRESHOLD_MAX)
                    .contains(&n)
                {
                    return Err(anyhow!(
                        "consecutive_duplicate_threshold {n} out of bounds [{CONSECUTIVE_DUPLICATE_THRESHOLD_MIN}, {CONSECUTIVE_DUPLICATE_THRESHOLD_MAX}]"
                    ));
                }
                n
            }
            DuplicateMode::Finish => self.consecutive_duplicate_threshold.unwrap_or(CONSECUTIVE_DUPLICATE_THRESHOLD_MIN),
        };

        Ok(Config {
            name: self.name,
            gallery_url,
            headless: self.headless,
            viewport: self.viewport,
            keep_browser_open: self.keep_browser_open,
            downloads_folder: self.downloads_folder,
            logs_folder: self.logs_folder,
            max_downloads: self.max_downloads,
            duplicate_mode: self.duplicate_mode,
            consecutive_duplicate_threshold,
            start_from,
            start_from_comparator: self.start_from_comparator,
            min_scroll_distance: self.min_scroll_distance,
            max_scroll_attempts: self.max_scroll_attempts,
            max_consecutive_scroll_failures: self.max_consecutive_scroll_failures,
            dom_wait_timeout_ms: self.dom_wait_timeout_ms,
            download_timeout_ms: self.download_timeout_ms,
            retry_attempts: self.retry_attempts,
            max_consecutive_extraction_failures: self.max_consecutive_extraction_failures,
            action_script: self.action_script,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_gallery_url_at_compile_time_and_runtime() {
        let cfg = Config::builder()
            .gallery_url("https://gallery.example/feed")
            .build()
            .unwrap();
        assert_eq!(cfg.gallery_url, "https://gallery.example/feed");
        assert_eq!(cfg.min_scroll_distance, DEFAULT_MIN_SCROLL_DISTANCE);
    }

    #[test]
    fn skip_mode_requires_threshold_within_bounds() {
        let err = Config::builder()
            .gallery_url("https://gallery.example/feed")
            .duplicate_mode(DuplicateMode::Skip)
            .consecutive_duplicate_threshold(1)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn rejects_non_canonical_start_from() {
        let err = Config::builder()
            .gallery_url("https://gallery.example/feed")
            .start_from("not a timestamp")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("start_from"));
    }
}
