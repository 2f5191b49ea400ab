//! Shared default values, kept in one place to avoid magic numbers scattered
//! through the scroll/extraction/pipeline modules.

use std::time::Duration;

/// Default minimum scroll distance per attempt, in pixels.
pub const DEFAULT_MIN_SCROLL_DISTANCE: u32 = 2500;

/// Default cap on scroll attempts during boundary resolution.
pub const DEFAULT_MAX_SCROLL_ATTEMPTS: u32 = 2000;

/// Default cap on consecutive scroll failures before giving up.
pub const DEFAULT_MAX_CONSECUTIVE_SCROLL_FAILURES: u32 = 100;

/// Default DOM wait timeout for stability checks and selector waits.
pub const DEFAULT_DOM_WAIT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Default download timeout.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Default retry attempts for transient extraction/download failures.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Metadata extraction cache entry TTL.
pub const EXTRACTION_CACHE_TTL: Duration = Duration::from_secs(30);

/// Minimum confidence required to serve a cached extraction result.
pub const EXTRACTION_CACHE_MIN_CONFIDENCE: f32 = 0.7;

/// Extraction cache capacity before LRU eviction kicks in.
pub const EXTRACTION_CACHE_CAPACITY: usize = 512;

/// Minimum and maximum valid prompt length, in characters.
pub const PROMPT_MIN_LEN: usize = 50;
pub const PROMPT_MAX_LEN: usize = 2000;

/// Bounds on the consecutive-duplicate threshold in `skip` mode: callers
/// must supply an explicit value within these bounds rather than silently
/// defaulting below 2 or above 50.
pub const CONSECUTIVE_DUPLICATE_THRESHOLD_MIN: u32 = 2;
pub const CONSECUTIVE_DUPLICATE_THRESHOLD_MAX: u32 = 50;

/// Cap on consecutive extraction failures before the run aborts.
pub const DEFAULT_MAX_CONSECUTIVE_EXTRACTION_FAILURES: u32 = 20;
