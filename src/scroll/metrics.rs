//! Per-strategy empirical performance tracking for the Scroll Manager.

use std::collections::HashMap;
use std::time::Duration;

use super::strategy::{ScrollResult, StrategyTag};

/// Running performance statistics for one scroll strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyMetrics {
    pub attempts: u32,
    pub successes: u32,
    pub avg_time: Duration,
    pub avg_distance: f64,
}

impl StrategyMetrics {
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.successes) / f64::from(self.attempts)
        }
    }

    /// "content efficiency": new containers revealed per pixel scrolled,
    /// used by strategy selection alongside success rate.
    #[must_use]
    pub fn content_efficiency(&self, new_containers: usize) -> f64 {
        if self.avg_distance <= 0.0 {
            0.0
        } else {
            new_containers as f64 / self.avg_distance
        }
    }

    fn record(&mut self, result: &ScrollResult, succeeded: bool) {
        let n = f64::from(self.attempts);
        self.avg_time = Duration::from_secs_f64(
            (self.avg_time.as_secs_f64() * n + result.elapsed.as_secs_f64()) / (n + 1.0),
        );
        self.avg_distance =
            (self.avg_distance * n + f64::from(result.achieved_distance)) / (n + 1.0);
        self.attempts += 1;
        if succeeded {
            self.successes += 1;
        }
    }
}

/// Metrics for every strategy, keyed by tag; updated before control returns
/// to the caller, so selection always sees the latest attempt's outcome.
#[derive(Debug, Clone, Default)]
pub struct StrategyMetricsTable(HashMap<StrategyTag, StrategyMetrics>);

impl StrategyMetricsTable {
    #[must_use]
    pub fn get(&self, tag: StrategyTag) -> StrategyMetrics {
        self.0.get(&tag).copied().unwrap_or_default()
    }

    pub fn record(&mut self, result: &ScrollResult, succeeded: bool) {
        self.0.entry(result.method_tag).or_default().record(result, succeeded);
    }

    /// Pick the strategy with the highest `success_rate * content_efficiency`
    /// across all attempted strategies; rank order on tie or no history.
    #[must_use]
    pub fn select_best(&self, new_containers_hint: usize) -> StrategyTag {
        let mut best: Option<(StrategyTag, f64)> = None;
        for tag in StrategyTag::RANKED {
            let metrics = self.get(tag);
            if metrics.attempts == 0 {
                continue;
            }
            let score = metrics.success_rate() * metrics.content_efficiency(new_containers_hint);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((tag, score)),
            }
        }
        best.map(|(tag, _)| tag)
            .unwrap_or(StrategyTag::RANKED[0])
    }
}
