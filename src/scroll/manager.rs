//! Scroll Manager — induces the gallery to render previously unseen
//! containers and reports new-container deltas.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{js_scripts, BrowserDriver, Session};
use crate::errors::HarvestResult;

use super::metrics::StrategyMetricsTable;
use super::strategy::{self, ScrollResult, StrategyTag};

/// Transient, per-run scroll bookkeeping.
#[derive(Debug, Default)]
pub struct ScrollState {
    pub total_distance: u64,
    pub attempts: u32,
    pub consecutive_failures: u32,
    pub known_container_ids: HashSet<String>,
    pub strategy_metrics: StrategyMetricsTable,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollManagerConfig {
    pub min_scroll_distance: u32,
    pub max_scroll_attempts: u32,
    pub max_consecutive_scroll_failures: u32,
    pub dom_wait_timeout: Duration,
}

/// Dynamic success threshold: a scroll succeeds when `achieved_distance >=
/// max(100, min(min_scroll_distance * 0.3, achieved_distance * 0.8))`. The
/// threshold can never exceed `min_scroll_distance * 0.3`.
#[must_use]
pub fn is_scroll_successful(achieved_distance: u32, min_scroll_distance: u32) -> bool {
    let achieved = f64::from(achieved_distance);
    let cap = f64::from(min_scroll_distance) * 0.3;
    let threshold = (cap.min(achieved * 0.8)).max(100.0);
    achieved >= threshold
}

#[derive(Debug, serde::Deserialize)]
struct ScrollPosition {
    #[serde(rename = "scrollTop")]
    scroll_top: f64,
    #[serde(rename = "maxScroll")]
    max_scroll: f64,
}

pub struct ScrollManager {
    config: ScrollManagerConfig,
    state: ScrollState,
}

impl ScrollManager {
    #[must_use]
    pub fn new(config: ScrollManagerConfig) -> Self {
        Self {
            config,
            state: ScrollState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Capture the currently visible container IDs (`div[id$="__N"]`).
    pub async fn visible_container_ids(
        &self,
        driver: &BrowserDriver,
        session: &Session,
    ) -> HarvestResult<Vec<String>> {
        driver.evaluate(session, js_scripts::CONTAINER_IDS_SCRIPT).await
    }

    /// True if the end of the gallery has been detected: near-bottom scroll
    /// position with an unchanged container count, or an end-of-list
    /// sentinel element present.
    pub async fn end_of_gallery(
        &self,
        driver: &BrowserDriver,
        session: &Session,
        container_count_before: usize,
        container_count_after: usize,
    ) -> HarvestResult<bool> {
        let pos: ScrollPosition = driver
            .evaluate(session, js_scripts::SCROLL_POSITION_SCRIPT)
            .await?;
        let near_bottom = (pos.max_scroll - pos.scroll_top).abs() <= 100.0;
        if near_bottom && container_count_after == container_count_before {
            return Ok(true);
        }
        driver.evaluate(session, js_scripts::END_SENTINEL_SCRIPT).await
    }

    /// Perform one scroll attempt, selecting the best-performing strategy,
    /// updating its metrics, and returning the new containers that appeared
    /// in document order.
    pub async fn scroll_once(
        &mut self,
        driver: &BrowserDriver,
        session: &Session,
    ) -> HarvestResult<(ScrollResult, Vec<String>, bool)> {
        let before_ids: HashSet<String> = self
            .visible_container_ids(driver, session)
            .await?
            .into_iter()
            .collect();

        let hint = before_ids.difference(&self.state.known_container_ids).count();
        let tag = self.state.strategy_metrics.select_best(hint.max(1));

        let result = strategy::attempt(tag, driver, session, self.config.min_scroll_distance).await?;

        // Bounded wait for the gallery to finish materializing new content,
        // capped at dom_wait_timeout_ms.
        let settle = Duration::from_millis(1_000).min(self.config.dom_wait_timeout);
        tokio::time::sleep(settle).await;

        let after_ids: HashSet<String> = self
            .visible_container_ids(driver, session)
            .await?
            .into_iter()
            .collect();

        let mut new_ids: Vec<String> = after_ids.difference(&before_ids).cloned().collect();
        new_ids.sort_by_key(|id| {
            id.rsplit("__")
                .next()
                .and_then(|n| n.parse::<u64>().ok())
                .unwrap_or(u64::MAX)
        });

        let succeeded =
            is_scroll_successful(result.achieved_distance, self.config.min_scroll_distance);

        self.state.attempts += 1;
        self.state.total_distance += u64::from(result.achieved_distance);
        self.state.strategy_metrics.record(&result, succeeded);
        self.state.known_container_ids.extend(after_ids.iter().cloned());

        if succeeded {
            self.state.consecutive_failures = 0;
        } else {
            self.state.consecutive_failures += 1;
            warn!(
                achieved = result.achieved_distance,
                min_scroll_distance = self.config.min_scroll_distance,
                "scroll attempt below dynamic threshold"
            );
        }

        debug!(strategy = ?tag, new_containers = new_ids.len(), "scroll_once complete");

        Ok((result, new_ids, succeeded))
    }

    /// Scroll repeatedly until `predicate` returns true on the newly
    /// revealed container IDs, or a cap/end-of-gallery condition fires.
    /// Honors `cancel` between attempts.
    pub async fn advance_until<P>(
        &mut self,
        driver: &BrowserDriver,
        session: &Session,
        cancel: &tokio::sync::watch::Receiver<bool>,
        mut predicate: P,
    ) -> HarvestResult<AdvanceOutcome>
    where
        P: FnMut(&[String]) -> bool,
    {
        loop {
            if *cancel.borrow() {
                return Ok(AdvanceOutcome::Cancelled);
            }
            if self.state.attempts >= self.config.max_scroll_attempts {
                return Ok(AdvanceOutcome::AttemptsExhausted);
            }
            if self.state.consecutive_failures >= self.config.max_consecutive_scroll_failures {
                return Ok(AdvanceOutcome::ConsecutiveFailuresExceeded);
            }

            let before_count = self.state.known_container_ids.len();
            let (_, new_ids, _) = self.scroll_once(driver, session).await?;
            let after_count = self.visible_container_ids(driver, session).await?.len();

            if predicate(&new_ids) {
                return Ok(AdvanceOutcome::PredicateSatisfied);
            }

            if self
                .end_of_gallery(driver, session, before_count, after_count)
                .await?
            {
                return Ok(AdvanceOutcome::EndOfGallery);
            }
        }
    }
}

/// Why `advance_until` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    PredicateSatisfied,
    EndOfGallery,
    AttemptsExhausted,
    ConsecutiveFailuresExceeded,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_threshold_accepts_small_increments() {
        assert!(is_scroll_successful(140, 2500));
    }

    #[test]
    fn dynamic_threshold_rejects_zero_movement() {
        assert!(!is_scroll_successful(0, 2500));
    }

    #[test]
    fn dynamic_threshold_never_exceeds_point_three_of_min_distance() {
        // For a very large achieved distance, the threshold saturates at
        // min_scroll_distance * 0.3 and is never exceeded.
        for achieved in [1_000, 5_000, 50_000] {
            assert!(is_scroll_successful(achieved, 2500));
        }
    }
}
