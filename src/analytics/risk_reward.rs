use serde::{Deserialize, Serialize};

use crate::core::classify::{classify, TradeOutcome};
use crate::core::metrics::round2;
use crate::models::{LegId, Signal, SignalDetail};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardItem {
    pub tp_level: String,
    pub avg_reward_pct: f64,
    pub avg_risk_pct: f64,
    pub risk_reward_ratio: f64,
    pub total_hits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardReport {
    pub items: Vec<RiskRewardItem>,
    pub overall_avg_rr: f64,
}

/// Distance from entry to `stop1` in percent of entry (positive for a long).
pub fn risk_pct(signal: &Signal) -> Option<f64> {
    let entry = signal.entry()?;
    let stop = signal.price(LegId::Sl1)?;
    Some((entry - stop) / entry * 100.0)
}

/// Distance from entry to a target in percent of entry.
pub fn reward_pct(signal: &Signal, target: LegId) -> Option<f64> {
    if !target.is_target() {
        return None;
    }
    let entry = signal.entry()?;
    let price = signal.price(target)?;
    Some((price - entry) / entry * 100.0)
}

/// Reward-to-risk for one target: (tp - entry) / (entry - stop1).
pub fn ratio(signal: &Signal, target: LegId) -> Option<f64> {
    let risk = risk_pct(signal)?;
    if risk == 0.0 {
        return None;
    }
    Some(reward_pct(signal, target)? / risk)
}

/// Averages over closed signals that carry an entry and `stop1`. A signal
/// counts as a hit for a level when its final outcome reached that level.
pub fn risk_reward_report(signals: &[SignalDetail]) -> RiskRewardReport {
    let closed: Vec<(&Signal, TradeOutcome)> = signals
        .iter()
        .map(|d| (&d.signal, classify(&d.signal, &d.updates)))
        .filter(|(s, o)| o.is_closed() && risk_pct(s).is_some())
        .collect();

    let mut items = Vec::new();
    for target in LegId::TARGETS {
        let level = target.target_index().unwrap_or_default();
        let rows: Vec<&(&Signal, TradeOutcome)> = closed
            .iter()
            .filter(|(s, _)| reward_pct(s, target).is_some())
            .collect();
        if rows.is_empty() {
            continue;
        }

        let rewards: Vec<f64> = rows.iter().filter_map(|(s, _)| reward_pct(s, target)).collect();
        let risks: Vec<f64> = rows.iter().filter_map(|(s, _)| risk_pct(s)).collect();
        let ratios: Vec<f64> = rows.iter().filter_map(|(s, _)| ratio(s, target)).collect();
        let hits = rows
            .iter()
            .filter(|(_, o)| hits_level(*o, level))
            .count();

        items.push(RiskRewardItem {
            tp_level: target.label().to_string(),
            avg_reward_pct: round2(mean(&rewards)),
            avg_risk_pct: round2(mean(&risks)),
            risk_reward_ratio: round2(mean(&ratios)),
            total_hits: hits,
        });
    }

    let positive: Vec<f64> = items
        .iter()
        .map(|i| i.risk_reward_ratio)
        .filter(|r| *r > 0.0)
        .collect();

    RiskRewardReport {
        overall_avg_rr: round2(mean(&positive)),
        items,
    }
}

// tp1 only counts signals that stopped at tp1; deeper levels count
// everything that got at least that far.
fn hits_level(outcome: TradeOutcome, level: usize) -> bool {
    match outcome.target_level() {
        Some(reached) if level == 1 => reached == 1,
        Some(reached) => reached >= level,
        None => false,
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}
