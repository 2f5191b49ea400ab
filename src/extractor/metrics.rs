//! Per-strategy performance tracking for the Metadata Extractor.
//!
//! Mirrors `scroll::metrics::StrategyMetricsTable`'s running-average shape,
//! adapted to the extractor's `{attempts, successes, avg_time,
//! avg_confidence}` fields and its extraction-type-aware selection rule.

use std::collections::HashMap;
use std::time::Duration;

use super::strategy::{ExtractionStrategy, ExtractionType};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionMetrics {
    pub attempts: u32,
    pub successes: u32,
    pub avg_time: Duration,
    pub avg_confidence: f32,
}

impl ExtractionMetrics {
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.successes) / f64::from(self.attempts)
        }
    }

    fn record(&mut self, elapsed: Duration, succeeded: bool, confidence: f32) {
        let n = f64::from(self.attempts);
        self.avg_time =
            Duration::from_secs_f64((self.avg_time.as_secs_f64() * n + elapsed.as_secs_f64()) / (n + 1.0));
        self.avg_confidence =
            (((self.avg_confidence as f64) * n + f64::from(confidence)) / (n + 1.0)) as f32;
        self.attempts += 1;
        if succeeded {
            self.successes += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionMetricsTable(HashMap<ExtractionStrategy, ExtractionMetrics>);

impl ExtractionMetricsTable {
    #[must_use]
    pub fn get(&self, strategy: ExtractionStrategy) -> ExtractionMetrics {
        self.0.get(&strategy).copied().unwrap_or_default()
    }

    pub fn record(
        &mut self,
        strategy: ExtractionStrategy,
        elapsed: Duration,
        succeeded: bool,
        confidence: f32,
    ) {
        self.0
            .entry(strategy)
            .or_default()
            .record(elapsed, succeeded, confidence);
    }

    /// Select the best strategy for `extraction_type`, favoring structural
    /// strategies for prompt-only queries and selector/pattern-based
    /// strategies for timestamp-only queries, falling back to the globally
    /// best-performing strategy, then to rank order with no history.
    #[must_use]
    pub fn select_best(&self, extraction_type: ExtractionType) -> ExtractionStrategy {
        let preferred: &[ExtractionStrategy] = match extraction_type {
            ExtractionType::Prompt => &[
                ExtractionStrategy::RelativePositioning,
                ExtractionStrategy::DomAnalysis,
                ExtractionStrategy::TextPattern,
            ],
            ExtractionType::CreationTime => &[
                ExtractionStrategy::DomAnalysis,
                ExtractionStrategy::FallbackPatterns,
                ExtractionStrategy::RelativePositioning,
            ],
            ExtractionType::All => &[],
        };

        for &strategy in preferred {
            let m = self.get(strategy);
            if m.attempts > 0 && m.success_rate() > 0.5 {
                return strategy;
            }
        }

        let mut best: Option<(ExtractionStrategy, f64)> = None;
        for strategy in ExtractionStrategy::RANKED {
            let m = self.get(strategy);
            if m.attempts == 0 {
                continue;
            }
            let score = m.success_rate() * f64::from(m.avg_confidence);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((strategy, score)),
            }
        }

        best.map(|(s, _)| s).unwrap_or(ExtractionStrategy::RANKED[0])
    }
}
