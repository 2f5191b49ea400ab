//! Extraction result cache, with an explicit TTL check layered on top of
//! `lru::LruCache` (which alone has no notion of expiry).

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::utils::constants::{EXTRACTION_CACHE_CAPACITY, EXTRACTION_CACHE_MIN_CONFIDENCE, EXTRACTION_CACHE_TTL};

use super::strategy::{ExtractionType, MetadataRecord};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub page_url_without_query: String,
    pub container_identity: String,
    pub extraction_type_tag: &'static str,
}

impl CacheKey {
    #[must_use]
    pub fn new(page_url: &str, container_identity: &str, extraction_type: ExtractionType) -> Self {
        let without_query = page_url.split('?').next().unwrap_or(page_url).to_string();
        let tag = match extraction_type {
            ExtractionType::Prompt => "prompt",
            ExtractionType::CreationTime => "creation_time",
            ExtractionType::All => "all",
        };
        Self {
            page_url_without_query: without_query,
            container_identity: container_identity.to_string(),
            extraction_type_tag: tag,
        }
    }
}

struct Entry {
    record: MetadataRecord,
    inserted_at: Instant,
}

pub struct ExtractionCache {
    inner: LruCache<CacheKey, Entry>,
    ttl: Duration,
}

impl Default for ExtractionCache {
    fn default() -> Self {
        Self::new(EXTRACTION_CACHE_CAPACITY, EXTRACTION_CACHE_TTL)
    }
}

impl ExtractionCache {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        Self {
            inner: LruCache::new(capacity),
            ttl,
        }
    }

    /// Return a cached record only if it's within TTL. Expired entries are
    /// evicted on lookup.
    pub fn get(&mut self, key: &CacheKey) -> Option<MetadataRecord> {
        let expired = self
            .inner
            .peek(key)
            .is_some_and(|e| e.inserted_at.elapsed() > self.ttl);
        if expired {
            self.inner.pop(key);
            return None;
        }
        self.inner.get(key).map(|e| e.record.clone())
    }

    /// Insert a record only if its confidence clears the serve threshold.
    pub fn put(&mut self, key: CacheKey, record: MetadataRecord) {
        if record.confidence < EXTRACTION_CACHE_MIN_CONFIDENCE {
            return;
        }
        self.inner.put(
            key,
            Entry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::strategy::{ExtractionStrategy, MediaType};
    use crate::timestamp::CanonicalTimestamp;

    fn record(confidence: f32) -> MetadataRecord {
        MetadataRecord {
            creation_time: Some(CanonicalTimestamp::from_trusted("25 Aug 2025 02:30:47".to_string())),
            prompt: Some("x".repeat(60)),
            media_type: MediaType::Unknown,
            confidence,
            strategy: ExtractionStrategy::TextPattern,
        }
    }

    #[test]
    fn low_confidence_is_not_cached() {
        let mut cache = ExtractionCache::new(8, Duration::from_secs(30));
        let key = CacheKey::new("https://example.com/g?x=1", "c__1", ExtractionType::All);
        cache.put(key.clone(), record(0.5));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn high_confidence_round_trips() {
        let mut cache = ExtractionCache::new(8, Duration::from_secs(30));
        let key = CacheKey::new("https://example.com/g?x=1", "c__1", ExtractionType::All);
        cache.put(key.clone(), record(0.9));
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn query_string_is_stripped_from_key() {
        let a = CacheKey::new("https://example.com/g?x=1", "c__1", ExtractionType::All);
        let b = CacheKey::new("https://example.com/g?x=2", "c__1", ExtractionType::All);
        assert_eq!(a, b);
    }

    #[test]
    fn expired_entry_is_evicted() {
        let mut cache = ExtractionCache::new(8, Duration::from_millis(0));
        let key = CacheKey::new("https://example.com/g", "c__1", ExtractionType::All);
        cache.put(key.clone(), record(0.9));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
    }
}
