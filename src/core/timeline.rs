use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::metrics::{format_duration, format_price, pct};
use crate::core::outcome::{resolve_outcome, Outcome};
use crate::models::{LegId, Signal, UpdateEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Called,
    #[serde(untagged)]
    Leg(LegId),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Called => write!(f, "called"),
            StepId::Leg(leg) => write!(f, "{}", leg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub leg_id: StepId,
    pub label: String,
    pub price: Option<f64>,
    pub hit: bool,
    pub reached_at: Option<DateTime<Utc>>,
    /// Seconds since the previous step that has a timestamp.
    pub duration_since_prev: Option<i64>,
    pub pct_move: Option<f64>,
}

impl Step {
    pub fn is_reached(&self) -> bool {
        self.reached_at.is_some()
    }

    pub fn duration_label(&self) -> Option<String> {
        self.duration_since_prev.and_then(format_duration)
    }

    pub fn price_label(&self) -> Option<String> {
        self.price.map(format_price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub steps: Vec<Step>,
}

impl Timeline {
    pub fn build(signal: &Signal, updates: &[UpdateEvent]) -> Self {
        Self {
            steps: build_timeline(signal, updates),
        }
    }

    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|s| s.leg_id == id)
    }

    /// Last leg step carrying a timestamp (never the call itself).
    pub fn last_reached(&self) -> Option<&Step> {
        self.steps
            .iter()
            .skip(1)
            .rev()
            .find(|s| s.is_reached())
    }

    /// Seconds from the call to the last reached leg.
    pub fn total_duration(&self) -> Option<i64> {
        let called = self.steps.first()?.reached_at?;
        let last = self.last_reached()?.reached_at?;
        Some((last - called).num_seconds())
    }
}

/// Ordered, duration-annotated view of a signal's legs.
///
/// Always starts with the call at `created_at`, then every priced target in
/// tp1..tp4 order whether hit or not, then a single stop step when `stop1`
/// or `stop2` is priced. Durations chain between steps that have a
/// timestamp and skip the ones that don't.
pub fn build_timeline(signal: &Signal, updates: &[UpdateEvent]) -> Vec<Step> {
    let outcome = resolve_outcome(signal, updates);
    build_from_outcome(signal, &outcome)
}

pub fn build_from_outcome(signal: &Signal, outcome: &Outcome) -> Vec<Step> {
    let entry = signal.entry();
    let created_at = signal.created_at();

    let mut steps = Vec::with_capacity(6);
    steps.push(Step {
        leg_id: StepId::Called,
        label: "Called".to_string(),
        price: entry,
        hit: true,
        reached_at: created_at,
        duration_since_prev: None,
        pct_move: None,
    });

    let mut legs = signal.priced_targets();
    if signal.has_stop_price() {
        legs.push(LegId::Sl);
    }

    let mut prev_reached = created_at;
    for leg in legs {
        let price = signal.price(leg);
        let resolved = outcome.leg(leg);

        let duration_since_prev = match (resolved.reached_at, prev_reached) {
            (Some(at), Some(prev)) => Some((at - prev).num_seconds()),
            _ => None,
        };
        if resolved.reached_at.is_some() {
            prev_reached = resolved.reached_at;
        }

        steps.push(Step {
            leg_id: StepId::Leg(leg),
            label: leg.label().to_string(),
            price,
            hit: resolved.hit,
            reached_at: resolved.reached_at,
            duration_since_prev,
            pct_move: pct(price, entry),
        });
    }

    steps
}
