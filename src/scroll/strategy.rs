//! Scroll strategy cascade.
//!
//! Strategies are modeled as a tagged enum with a shared `attempt` operation
//! rather than a trait-object hierarchy: an ensemble of interchangeable
//! variants, not a class hierarchy.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::{js_scripts, BrowserDriver, Session};
use crate::errors::HarvestResult;

/// Identifies a scroll strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyTag {
    ContainerTop,
    ElementIntoView,
    EnhancedTriggers,
    IntersectionObserver,
    ManualElement,
    NetworkIdle,
}

impl StrategyTag {
    /// Rank order, tried top to bottom (lower is tried first on ties).
    pub const RANKED: [StrategyTag; 6] = [
        StrategyTag::ContainerTop,
        StrategyTag::ElementIntoView,
        StrategyTag::EnhancedTriggers,
        StrategyTag::IntersectionObserver,
        StrategyTag::ManualElement,
        StrategyTag::NetworkIdle,
    ];

    #[must_use]
    pub fn rank(self) -> usize {
        Self::RANKED.iter().position(|t| *t == self).unwrap_or(usize::MAX)
    }
}

/// Outcome of a single scroll attempt.
#[derive(Debug, Clone)]
pub struct ScrollResult {
    pub method_tag: StrategyTag,
    pub achieved_distance: u32,
    pub elapsed: Duration,
    pub containers_before: usize,
    pub containers_after: usize,
}

#[derive(Debug, serde::Deserialize)]
struct ScrollPosition {
    #[serde(rename = "scrollTop")]
    scroll_top: f64,
    #[serde(rename = "maxScroll")]
    max_scroll: f64,
}

async fn container_count(driver: &BrowserDriver, session: &Session) -> HarvestResult<usize> {
    let ids: Vec<String> = driver
        .evaluate(session, js_scripts::CONTAINER_IDS_SCRIPT)
        .await?;
    Ok(ids.len())
}

/// Execute a single strategy attempt against `target_distance` pixels.
pub async fn attempt(
    tag: StrategyTag,
    driver: &BrowserDriver,
    session: &Session,
    target_distance: u32,
) -> HarvestResult<ScrollResult> {
    let start = Instant::now();
    let containers_before = container_count(driver, session).await?;

    let achieved_distance = match tag {
        StrategyTag::ContainerTop => {
            let _: serde_json::Value = driver
                .evaluate(session, js_scripts::LARGEST_SCROLLABLE_SCRIPT)
                .await?;
            let script = js_scripts::SCROLL_TOP_MUTATE_SCRIPT
                .replace("arguments[0]", &target_distance.to_string());
            let delta: f64 = driver.evaluate(session, &script).await.unwrap_or(0.0);
            delta.max(0.0) as u32
        }
        StrategyTag::ElementIntoView => {
            let ids: Vec<String> = driver
                .evaluate(session, js_scripts::CONTAINER_IDS_SCRIPT)
                .await?;
            if let Some(last) = ids.last() {
                let before: ScrollPosition = driver
                    .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                    .await?;
                let script = js_scripts::SCROLL_INTO_VIEW_SCRIPT
                    .replace("arguments[0]", &format!("'{last}'"));
                let _: bool = driver.evaluate(session, &script).await.unwrap_or(false);
                let after: ScrollPosition = driver
                    .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                    .await?;
                (after.scroll_top - before.scroll_top).max(0.0) as u32
            } else {
                0
            }
        }
        StrategyTag::EnhancedTriggers => {
            let before: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            let script = js_scripts::ENHANCED_TRIGGERS_SCRIPT
                .replace("arguments[0]", &target_distance.to_string());
            let _: bool = driver.evaluate(session, &script).await.unwrap_or(false);
            let after: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            (after.scroll_top - before.scroll_top).max(0.0) as u32
        }
        StrategyTag::IntersectionObserver => {
            // Short-lived observer: scroll incrementally and let the
            // observer's own callback trigger further loads; approximated
            // here by a single incremental scroll plus a settle wait, since
            // the observer lifetime is bounded to this attempt only.
            let before: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            let script = js_scripts::SCROLL_TOP_MUTATE_SCRIPT
                .replace("arguments[0]", &target_distance.to_string());
            let _: f64 = driver.evaluate(session, &script).await.unwrap_or(0.0);
            tokio::time::sleep(Duration::from_millis(250)).await;
            let after: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            (after.scroll_top - before.scroll_top).max(0.0) as u32
        }
        StrategyTag::ManualElement => {
            let fraction = (target_distance as f64 / 4.0).max(1.0);
            let before: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            let script = js_scripts::MANUAL_ELEMENT_SCRIPT
                .replace("arguments[0]", &fraction.to_string());
            let _: u32 = driver.evaluate(session, &script).await.unwrap_or(0);
            let after: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            (after.scroll_top - before.scroll_top).max(0.0) as u32
        }
        StrategyTag::NetworkIdle => {
            let before: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            let _: bool = driver
                .evaluate(session, js_scripts::SCROLL_TO_BOTTOM_SCRIPT)
                .await
                .unwrap_or(false);
            tokio::time::sleep(Duration::from_millis(800)).await;
            let after: ScrollPosition = driver
                .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
                .await?;
            (after.scroll_top - before.scroll_top).max(0.0) as u32
        }
    };

    let containers_after = container_count(driver, session).await?;
    let elapsed = start.elapsed();

    debug!(?tag, achieved_distance, containers_before, containers_after, "scroll attempt");

    Ok(ScrollResult {
        method_tag: tag,
        achieved_distance,
        elapsed,
        containers_before,
        containers_after,
    })
}
