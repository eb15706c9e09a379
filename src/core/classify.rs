use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{LegId, Signal, Status, UpdateEvent};

/// Final result of a signal as the performance views count it: the highest
/// ranked event wins (tp4 > tp3 > tp2 > tp1 > sl).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Open,
    Sl,
    Tp1,
    Tp2,
    Tp3,
    Tp4,
}

impl TradeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeOutcome::Open => "open",
            TradeOutcome::Sl => "sl",
            TradeOutcome::Tp1 => "tp1",
            TradeOutcome::Tp2 => "tp2",
            TradeOutcome::Tp3 => "tp3",
            TradeOutcome::Tp4 => "tp4",
        }
    }

    fn from_leg(leg: LegId) -> TradeOutcome {
        match leg {
            LegId::Tp1 => TradeOutcome::Tp1,
            LegId::Tp2 => TradeOutcome::Tp2,
            LegId::Tp3 => TradeOutcome::Tp3,
            LegId::Tp4 => TradeOutcome::Tp4,
            LegId::Sl | LegId::Sl1 | LegId::Sl2 => TradeOutcome::Sl,
        }
    }

    fn from_status(status: Status) -> TradeOutcome {
        match status {
            Status::Tp1 => TradeOutcome::Tp1,
            Status::Tp2 => TradeOutcome::Tp2,
            Status::Tp3 => TradeOutcome::Tp3,
            Status::Tp4 | Status::ClosedWin => TradeOutcome::Tp4,
            Status::ClosedLoss | Status::Sl => TradeOutcome::Sl,
            Status::Open | Status::Unknown => TradeOutcome::Open,
        }
    }

    /// 1..=4 for targets.
    pub fn target_level(&self) -> Option<usize> {
        match self {
            TradeOutcome::Tp1 => Some(1),
            TradeOutcome::Tp2 => Some(2),
            TradeOutcome::Tp3 => Some(3),
            TradeOutcome::Tp4 => Some(4),
            _ => None,
        }
    }

    pub fn is_win(&self) -> bool {
        self.target_level().is_some()
    }

    pub fn is_closed(&self) -> bool {
        *self != TradeOutcome::Open
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn classify(signal: &Signal, updates: &[UpdateEvent]) -> TradeOutcome {
    updates
        .iter()
        .filter_map(|u| u.update_type)
        .map(TradeOutcome::from_leg)
        .max()
        .unwrap_or_else(|| TradeOutcome::from_status(signal.status))
}
