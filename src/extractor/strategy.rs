//! Metadata extraction strategy cascade.
//!
//! Strategies are modeled the same way as the scroll strategies: a tagged
//! enum with one shared `attempt` operation, not a trait hierarchy.

use serde::{Deserialize, Serialize};

use crate::browser::{BrowserDriver, ElementHandle, Session};
use crate::errors::HarvestResult;
use crate::timestamp::{self, CanonicalTimestamp};

use super::validation::is_valid_prompt;

/// Ranked extraction strategies, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    TextPattern,
    DomAnalysis,
    RelativePositioning,
    FallbackPatterns,
    ComprehensiveScan,
}

impl ExtractionStrategy {
    pub const RANKED: [ExtractionStrategy; 5] = [
        ExtractionStrategy::TextPattern,
        ExtractionStrategy::DomAnalysis,
        ExtractionStrategy::RelativePositioning,
        ExtractionStrategy::FallbackPatterns,
        ExtractionStrategy::ComprehensiveScan,
    ];
}

/// What kind of metadata a caller needs, used to bias strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionType {
    Prompt,
    CreationTime,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Image,
    Video,
    Unknown,
}

/// A fully or partially resolved metadata extraction.
#[derive(Debug, Clone)]
pub struct MetadataRecord {
    pub creation_time: Option<CanonicalTimestamp>,
    pub prompt: Option<String>,
    pub media_type: MediaType,
    pub confidence: f32,
    pub strategy: ExtractionStrategy,
}

impl MetadataRecord {
    /// A record with `creation_time` set is identifiable and safe to log.
    #[must_use]
    pub fn is_identifiable(&self) -> bool {
        self.creation_time.is_some()
    }
}

/// CSS selectors consulted by the DOM-analysis strategy, carried as
/// configuration so a host redesign only requires updating this list.
#[derive(Debug, Clone)]
pub struct ExtractionSelectors {
    pub prompt_selectors: Vec<String>,
    pub date_selectors: Vec<String>,
}

impl Default for ExtractionSelectors {
    fn default() -> Self {
        Self {
            prompt_selectors: vec![
                "span[aria-describedby]".to_string(),
                "[class*=\"prompt\"] span".to_string(),
                "[class*=\"text\"] span".to_string(),
            ],
            date_selectors: vec![
                "[class*=\"date\"]".to_string(),
                "[class*=\"time\"]".to_string(),
            ],
        }
    }
}

fn media_type_from_text(text: &str) -> MediaType {
    let lower = text.to_lowercase();
    if lower.contains("image to video") {
        MediaType::Video
    } else if lower.contains("image") {
        MediaType::Image
    } else {
        MediaType::Unknown
    }
}

fn best_prompt_sentence(text: &str) -> Option<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| is_valid_prompt(s))
        .max_by_key(|s| s.len())
        .map(str::to_string)
}

/// Strategy 1: regex timestamp extraction plus sentence-level prompt scoring
/// over the container's full text.
fn text_pattern(full_text: &str) -> (Option<CanonicalTimestamp>, Option<String>) {
    (timestamp::parse_any(full_text), best_prompt_sentence(full_text))
}

/// Strategy 2: consult configured selectors in order, with a per-element
/// timeout, validating every candidate with the same pattern set.
async fn dom_analysis(
    driver: &BrowserDriver,
    container: &ElementHandle,
    selectors: &ExtractionSelectors,
) -> HarvestResult<(Option<CanonicalTimestamp>, Option<String>)> {
    let mut creation_time = None;
    for selector in &selectors.date_selectors {
        if let Some(handle) = driver.query_one_within(container, selector).await? {
            let text = tokio::time::timeout(
                std::time::Duration::from_secs(1),
                driver.text_of(&handle),
            )
            .await
            .ok()
            .and_then(Result::ok);
            if let Some(text) = text
                && let Some(ts) = timestamp::parse_any(&text)
            {
                creation_time = Some(ts);
                break;
            }
        }
    }

    let mut prompt = None;
    for selector in &selectors.prompt_selectors {
        for handle in driver.query_all_within(container, selector).await? {
            let text = tokio::time::timeout(
                std::time::Duration::from_secs(1),
                driver.text_of(&handle),
            )
            .await
            .ok()
            .and_then(Result::ok);
            if let Some(text) = text
                && is_valid_prompt(&text)
            {
                prompt = Some(text.trim().to_string());
                break;
            }
        }
        if prompt.is_some() {
            break;
        }
    }

    Ok((creation_time, prompt))
}

/// Strategy 3: locate the `"Creation Time"` anchor text and read the
/// sibling timestamp/prompt blocks relative to it. Most resilient to class
/// name churn since it relies only on text content and DOM adjacency.
async fn relative_positioning(
    driver: &BrowserDriver,
    container: &ElementHandle,
) -> HarvestResult<(Option<CanonicalTimestamp>, Option<String>)> {
    let full_text = driver.text_of(container).await?;
    if !full_text.to_lowercase().contains("creation time") {
        return Ok((None, None));
    }

    let mut creation_time = None;
    let mut prompt = None;

    for handle in driver.query_all_within(container, "span").await? {
        let text = driver.text_of(&handle).await.unwrap_or_default();
        if creation_time.is_none()
            && let Some(ts) = timestamp::parse_any(&text)
        {
            creation_time = Some(ts);
        }
        if prompt.is_none() && is_valid_prompt(&text) {
            prompt = Some(text.trim().to_string());
        }
    }

    // Fall back to text-level parsing if no span carried a clean match —
    // the anchor is present, so the timestamp/prompt are somewhere in the
    // surrounding text even if not isolated to a single span.
    if creation_time.is_none() {
        creation_time = timestamp::parse_any(&full_text);
    }
    if prompt.is_none() {
        prompt = best_prompt_sentence(&full_text);
    }

    Ok((creation_time, prompt))
}

/// Strategy 4: fuzzy regex sweep that collapses whitespace before
/// re-attempting the standard patterns, recovering timestamps split across
/// inline elements that `text_pattern` missed.
fn fallback_patterns(full_text: &str) -> (Option<CanonicalTimestamp>, Option<String>) {
    let collapsed: String = full_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let creation_time = timestamp::parse_any(&collapsed);
    let prompt = best_prompt_sentence(&collapsed);
    (creation_time, prompt)
}

/// Strategy 5: split on newlines/tabs/pipes/bullets and treat every
/// non-empty segment as an independent candidate, picking the longest valid
/// prompt and the first valid timestamp.
fn comprehensive_scan(full_text: &str) -> (Option<CanonicalTimestamp>, Option<String>) {
    let segments: Vec<&str> = full_text
        .split(['\n', '\t', '|', '\u{2022}'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let creation_time = segments.iter().find_map(|s| timestamp::parse_any(s));
    let prompt = segments
        .iter()
        .filter(|s| is_valid_prompt(s))
        .max_by_key(|s| s.len())
        .map(|s| (*s).to_string());

    (creation_time, prompt)
}

/// Confidence contribution per recovered field: prompt and date each worth
/// a partial score.
fn confidence_for(creation_time: &Option<CanonicalTimestamp>, prompt: &Option<String>) -> f32 {
    let mut score = 0.0;
    if creation_time.is_some() {
        score += 0.5;
    }
    if prompt.is_some() {
        score += 0.5;
    }
    score
}

/// Execute one strategy against `container`, returning a record only if at
/// least one field was recovered.
pub async fn attempt(
    strategy: ExtractionStrategy,
    driver: &BrowserDriver,
    container: &ElementHandle,
    selectors: &ExtractionSelectors,
) -> HarvestResult<Option<MetadataRecord>> {
    let full_text = driver.text_of(container).await?;

    let (creation_time, prompt) = match strategy {
        ExtractionStrategy::TextPattern => text_pattern(&full_text),
        ExtractionStrategy::DomAnalysis => dom_analysis(driver, container, selectors).await?,
        ExtractionStrategy::RelativePositioning => relative_positioning(driver, container).await?,
        ExtractionStrategy::FallbackPatterns => fallback_patterns(&full_text),
        ExtractionStrategy::ComprehensiveScan => comprehensive_scan(&full_text),
    };

    if creation_time.is_none() && prompt.is_none() {
        return Ok(None);
    }

    let media_type = media_type_from_text(&full_text);
    let confidence = confidence_for(&creation_time, &prompt);

    Ok(Some(MetadataRecord {
        creation_time,
        prompt,
        media_type,
        confidence,
        strategy,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Creation Time: 25 Aug 2025 02:30:47\nThe camera shows a wide \
        landscape view of a building as the scene begins, with light moving across the room.";

    #[test]
    fn text_pattern_recovers_both_fields() {
        let (ts, prompt) = text_pattern(SAMPLE);
        assert_eq!(ts.unwrap().as_str(), "25 Aug 2025 02:30:47");
        assert!(prompt.is_some());
    }

    #[test]
    fn fallback_patterns_survives_whitespace_noise() {
        let noisy = "Creation   Time:\n25   Aug   2025   02:30:47   \n\n The camera shows a \
            wide landscape view of a building as the scene begins with light in the room.";
        let (ts, _) = fallback_patterns(noisy);
        assert_eq!(ts.unwrap().as_str(), "25 Aug 2025 02:30:47");
    }

    #[test]
    fn comprehensive_scan_picks_longest_valid_segment() {
        let text = "junk\n25 Aug 2025 02:30:47\nThe camera shows a wide landscape view of a \
            building as the scene begins, with light moving gently across the quiet room.";
        let (ts, prompt) = comprehensive_scan(text);
        assert!(ts.is_some());
        assert!(prompt.unwrap().len() > 50);
    }

    #[test]
    fn media_type_detection() {
        assert_eq!(media_type_from_text("Image to video generation"), MediaType::Video);
        assert_eq!(media_type_from_text("plain image output"), MediaType::Image);
        assert_eq!(media_type_from_text("nothing relevant"), MediaType::Unknown);
    }

    #[test]
    fn confidence_scales_with_recovered_fields() {
        let none = confidence_for(&None, &None);
        let both = confidence_for(
            &timestamp::parse_any("25 Aug 2025 02:30:47"),
            &Some("x".repeat(60)),
        );
        assert_eq!(none, 0.0);
        assert_eq!(both, 1.0);
    }
}
