use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{LegId, Signal, UpdateEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitSource {
    EventLog,
    StatusFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegOutcome {
    pub hit: bool,
    pub reached_at: Option<DateTime<Utc>>,
    /// Hit without a timestamp backing it: either inferred from a later
    /// target or taken from status. Useful for spotting ingestion gaps.
    pub inferred: bool,
}

impl LegOutcome {
    fn new(hit: bool, reached_at: Option<DateTime<Utc>>) -> Self {
        Self {
            hit,
            reached_at,
            inferred: hit && reached_at.is_none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub legs: BTreeMap<LegId, LegOutcome>,
    pub is_stopped: bool,
    pub source: HitSource,
}

impl Outcome {
    pub fn leg(&self, leg: LegId) -> LegOutcome {
        self.legs.get(&leg).copied().unwrap_or_default()
    }

    /// Highest target marked hit, if any.
    pub fn highest_target(&self) -> Option<LegId> {
        LegId::TARGETS
            .into_iter()
            .rev()
            .find(|&leg| self.leg(leg).hit)
    }

    /// Legs resolved as hit that carry no timestamp.
    pub fn ingestion_gaps(&self) -> Vec<LegId> {
        self.legs
            .iter()
            .filter(|(_, o)| o.inferred)
            .map(|(&leg, _)| leg)
            .collect()
    }
}

/// Reconcile a signal's status with its event log into one hit/timing view.
///
/// Targets come from the event log when it has any recognised entries, with
/// a later target implying every earlier one. With no usable events the
/// status table decides. The stop leg is decided by status alone; once it is
/// stopped, `sl` and then `sl1` events supply its timestamp. `sl2` is never
/// hit.
pub fn resolve_outcome(signal: &Signal, updates: &[UpdateEvent]) -> Outcome {
    let recognised: Vec<&UpdateEvent> = updates
        .iter()
        .filter(|u| u.update_type.is_some())
        .collect();

    let (hits, source) = if recognised.is_empty() {
        (signal.status.fallback_hits(), HitSource::StatusFallback)
    } else {
        (event_hits(&recognised), HitSource::EventLog)
    };

    let mut legs = BTreeMap::new();
    for (i, leg) in LegId::TARGETS.into_iter().enumerate() {
        let reached_at = if hits[i] {
            first_reached(&recognised, leg)
        } else {
            None
        };
        legs.insert(leg, LegOutcome::new(hits[i], reached_at));
    }

    let is_stopped = signal.status.is_stopped();
    let stop_reached = if is_stopped {
        first_reached(&recognised, LegId::Sl).or_else(|| first_reached(&recognised, LegId::Sl1))
    } else {
        None
    };
    legs.insert(LegId::Sl, LegOutcome::new(is_stopped, stop_reached));
    legs.insert(LegId::Sl2, LegOutcome::default());

    let outcome = Outcome {
        legs,
        is_stopped,
        source,
    };

    if source == HitSource::EventLog {
        for leg in outcome.ingestion_gaps() {
            debug!(
                "Signal {}: {} resolved as hit with no event of its own",
                signal.signal_id, leg
            );
        }
    }

    outcome
}

fn event_hits(updates: &[&UpdateEvent]) -> [bool; 4] {
    let highest = updates
        .iter()
        .filter_map(|u| u.update_type.and_then(|leg| leg.target_index()))
        .max()
        .unwrap_or(0);

    // tpN sits at index N-1
    std::array::from_fn(|i| i < highest)
}

/// Timestamp of the first event of exactly this leg type, in log order.
/// A malformed timestamp on that event yields `None`.
fn first_reached(updates: &[&UpdateEvent], leg: LegId) -> Option<DateTime<Utc>> {
    updates
        .iter()
        .find(|u| u.is(leg))
        .and_then(|u| u.reached_at())
}
