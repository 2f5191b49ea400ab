//! Metadata Extractor: the strategy cascade that pulls a creation timestamp,
//! prompt, and media reference out of a container element.

pub mod cache;
pub mod metrics;
pub mod patterns;
pub mod strategy;
pub mod validation;

use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{BrowserDriver, ElementHandle, Session};
use crate::errors::HarvestResult;

use cache::{CacheKey, ExtractionCache};
use metrics::ExtractionMetricsTable;
pub use strategy::{ExtractionSelectors, ExtractionStrategy, ExtractionType, MediaType, MetadataRecord};

#[derive(Debug, Clone, Copy)]
pub struct ExtractorConfig {
    pub dom_wait_timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

/// Drives the strategy cascade, caching, retry, and performance tracking.
pub struct MetadataExtractor {
    config: ExtractorConfig,
    selectors: ExtractionSelectors,
    cache: ExtractionCache,
    metrics: ExtractionMetricsTable,
}

impl MetadataExtractor {
    #[must_use]
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            selectors: ExtractionSelectors::default(),
            cache: ExtractionCache::default(),
            metrics: ExtractionMetricsTable::default(),
        }
    }

    /// Attempt extraction for `container`, retrying transient empty results
    /// up to `retry_attempts` times when the container's text content has
    /// changed materially between attempts.
    pub async fn extract(
        &mut self,
        driver: &BrowserDriver,
        session: &Session,
        container: &ElementHandle,
        container_identity: &str,
        page_url: &str,
        extraction_type: ExtractionType,
    ) -> HarvestResult<Option<MetadataRecord>> {
        let key = CacheKey::new(page_url, container_identity, extraction_type);
        if let Some(cached) = self.cache.get(&key) {
            debug!(container_identity, "extraction cache hit");
            return Ok(Some(cached));
        }

        let mut previous_len: Option<usize> = None;
        let mut attempt_no = 0;

        loop {
            let strategy = self.metrics.select_best(extraction_type);
            let started = std::time::Instant::now();

            let outcome = strategy::attempt(strategy, driver, container, &self.selectors).await;

            let elapsed = started.elapsed();

            let record = match outcome {
                Ok(record) => record,
                Err(e) if e.is_transient() && attempt_no < self.config.retry_attempts => {
                    warn!(attempt_no, error = %e, "transient extraction error, retrying");
                    self.metrics.record(strategy, elapsed, false, 0.0);
                    attempt_no += 1;
                    tokio::time::sleep(self.config.retry_delay * attempt_no).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.metrics
                .record(strategy, elapsed, record.is_some(), record.as_ref().map_or(0.0, |r| r.confidence));

            if let Some(record) = record {
                self.cache.put(key, record.clone());
                return Ok(Some(record));
            }

            let current_len = driver.text_of(container).await.map(|t| t.chars().count()).unwrap_or(0);
            // No baseline yet on the first failed attempt, so there's nothing to
            // judge "material change" against; retry unconditionally and only
            // start requiring a material change from the second attempt on.
            let had_baseline = previous_len.is_some();
            let changed_materially = previous_len.is_none_or(|prev| {
                let ratio = current_len as f64 / prev.max(1) as f64;
                !(0.8..=1.2).contains(&ratio)
            });
            previous_len = Some(current_len);

            if attempt_no >= self.config.retry_attempts || (had_baseline && !changed_materially) {
                return Ok(None);
            }

            attempt_no += 1;
            tokio::time::sleep(self.config.dom_wait_timeout.min(self.config.retry_delay * attempt_no)).await;
        }
    }
}
