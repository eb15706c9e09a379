use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::classify::{classify, TradeOutcome};
use crate::core::metrics::round2;
use crate::models::SignalDetail;

const WIN_RATE_WEIGHT: f64 = 0.4;
const VOLUME_WEIGHT: f64 = 0.3;
const TP_DEPTH_WEIGHT: f64 = 0.3;
// tp-weighted average (1..4) times this lands on a 0..100 scale
const TP_DEPTH_SCALE: f64 = 25.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub tp1: usize,
    pub tp2: usize,
    pub tp3: usize,
    pub tp4: usize,
    pub sl: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: TradeOutcome) {
        self.total += 1;
        match outcome {
            TradeOutcome::Tp1 => self.tp1 += 1,
            TradeOutcome::Tp2 => self.tp2 += 1,
            TradeOutcome::Tp3 => self.tp3 += 1,
            TradeOutcome::Tp4 => self.tp4 += 1,
            TradeOutcome::Sl => self.sl += 1,
            TradeOutcome::Open => {}
        }
    }

    pub fn winners(&self) -> usize {
        self.tp1 + self.tp2 + self.tp3 + self.tp4
    }

    pub fn closed(&self) -> usize {
        self.winners() + self.sl
    }

    pub fn open(&self) -> usize {
        self.total - self.closed()
    }

    /// Winners over closed trades, in percent.
    pub fn win_rate(&self) -> f64 {
        let closed = self.closed();
        if closed > 0 {
            self.winners() as f64 / closed as f64 * 100.0
        } else {
            0.0
        }
    }

    fn tp_weighted(&self) -> usize {
        self.tp4 * 4 + self.tp3 * 3 + self.tp2 * 2 + self.tp1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    pub pair: String,
    pub total_signals: usize,
    pub closed_trades: usize,
    pub open_signals: usize,
    pub win_rate: f64,
    pub tp1_count: usize,
    pub tp2_count: usize,
    pub tp3_count: usize,
    pub tp4_count: usize,
    pub sl_count: usize,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total_signals: usize,
    pub closed_trades: usize,
    pub open_signals: usize,
    pub win_rate: f64,
    pub total_winners: usize,
    pub tp1_count: usize,
    pub tp2_count: usize,
    pub tp3_count: usize,
    pub tp4_count: usize,
    pub sl_count: usize,
    pub active_pairs: usize,
    pub pair_metrics: Vec<PairMetrics>,
}

pub struct PerformanceAnalyzer {
    /// Signal count at which a pair earns the full volume component.
    pub volume_saturation: usize,
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(20)
    }
}

impl PerformanceAnalyzer {
    pub fn new(volume_saturation: usize) -> Self {
        Self { volume_saturation }
    }

    pub fn analyze(&self, signals: &[SignalDetail]) -> PerformanceStats {
        let mut by_pair: HashMap<String, OutcomeCounts> = HashMap::new();

        for detail in signals {
            let pair = detail.signal.pair.trim();
            if pair.is_empty() {
                continue;
            }
            let outcome = classify(&detail.signal, &detail.updates);
            by_pair
                .entry(pair.to_uppercase())
                .or_default()
                .record(outcome);
        }

        let mut pair_metrics: Vec<PairMetrics> = by_pair
            .iter()
            .map(|(pair, counts)| self.pair_metrics(pair, counts))
            .collect();
        pair_metrics.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then(b.closed_trades.cmp(&a.closed_trades))
                .then(a.pair.cmp(&b.pair))
        });

        let mut totals = OutcomeCounts::default();
        for counts in by_pair.values() {
            totals.total += counts.total;
            totals.tp1 += counts.tp1;
            totals.tp2 += counts.tp2;
            totals.tp3 += counts.tp3;
            totals.tp4 += counts.tp4;
            totals.sl += counts.sl;
        }

        PerformanceStats {
            total_signals: totals.total,
            closed_trades: totals.closed(),
            open_signals: totals.open(),
            win_rate: round2(totals.win_rate()),
            total_winners: totals.winners(),
            tp1_count: totals.tp1,
            tp2_count: totals.tp2,
            tp3_count: totals.tp3,
            tp4_count: totals.tp4,
            sl_count: totals.sl,
            active_pairs: pair_metrics.len(),
            pair_metrics,
        }
    }

    /// Pairs with at least `min_closed` closed trades, best score first.
    pub fn top_performers(&self, stats: &PerformanceStats, min_closed: usize) -> Vec<PairMetrics> {
        let mut out: Vec<PairMetrics> = stats
            .pair_metrics
            .iter()
            .filter(|p| p.closed_trades >= min_closed)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.performance_score.total_cmp(&a.performance_score));
        out
    }

    fn pair_metrics(&self, pair: &str, counts: &OutcomeCounts) -> PairMetrics {
        PairMetrics {
            pair: pair.to_string(),
            total_signals: counts.total,
            closed_trades: counts.closed(),
            open_signals: counts.open(),
            win_rate: round2(counts.win_rate()),
            tp1_count: counts.tp1,
            tp2_count: counts.tp2,
            tp3_count: counts.tp3,
            tp4_count: counts.tp4,
            sl_count: counts.sl,
            performance_score: self.performance_score(counts),
        }
    }

    fn performance_score(&self, counts: &OutcomeCounts) -> f64 {
        let closed = counts.closed();
        let saturation = self.volume_saturation.max(1) as f64;
        let volume = (counts.total as f64 / saturation * 100.0).min(100.0);

        let (win_part, depth_part) = if closed > 0 {
            (
                counts.win_rate(),
                counts.tp_weighted() as f64 / closed as f64 * TP_DEPTH_SCALE,
            )
        } else {
            (0.0, 0.0)
        };

        round2(win_part * WIN_RATE_WEIGHT + volume * VOLUME_WEIGHT + depth_part * TP_DEPTH_WEIGHT)
    }
}
