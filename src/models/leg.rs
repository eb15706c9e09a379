use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognised leg type '{0}'")]
    UnknownLeg(String),

    #[error("unrecognised signal status '{0}'")]
    UnknownStatus(String),
}

/// A price threshold that an update event can report as crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegId {
    Tp1,
    Tp2,
    Tp3,
    Tp4,
    Sl,
    Sl1,
    Sl2,
}

impl LegId {
    pub const TARGETS: [LegId; 4] = [LegId::Tp1, LegId::Tp2, LegId::Tp3, LegId::Tp4];

    pub fn as_str(&self) -> &'static str {
        match self {
            LegId::Tp1 => "tp1",
            LegId::Tp2 => "tp2",
            LegId::Tp3 => "tp3",
            LegId::Tp4 => "tp4",
            LegId::Sl => "sl",
            LegId::Sl1 => "sl1",
            LegId::Sl2 => "sl2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegId::Tp1 => "TP1",
            LegId::Tp2 => "TP2",
            LegId::Tp3 => "TP3",
            LegId::Tp4 => "TP4",
            LegId::Sl | LegId::Sl1 => "Stop Loss",
            LegId::Sl2 => "Stop Loss 2",
        }
    }

    /// 1-based target number, `None` for stop legs.
    pub fn target_index(&self) -> Option<usize> {
        match self {
            LegId::Tp1 => Some(1),
            LegId::Tp2 => Some(2),
            LegId::Tp3 => Some(3),
            LegId::Tp4 => Some(4),
            _ => None,
        }
    }

    pub fn target(n: usize) -> Option<LegId> {
        match n {
            1 => Some(LegId::Tp1),
            2 => Some(LegId::Tp2),
            3 => Some(LegId::Tp3),
            4 => Some(LegId::Tp4),
            _ => None,
        }
    }

    pub fn is_target(&self) -> bool {
        self.target_index().is_some()
    }

    /// Normalise a free-text update type the way the signal backend does:
    /// exact ids first, then "tpN"/"target N" containment from the highest
    /// target down, then anything mentioning "sl" or "stop".
    pub fn from_str_loose(s: &str) -> Option<LegId> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "tp1" => return Some(LegId::Tp1),
            "tp2" => return Some(LegId::Tp2),
            "tp3" => return Some(LegId::Tp3),
            "tp4" => return Some(LegId::Tp4),
            "sl" => return Some(LegId::Sl),
            "sl1" => return Some(LegId::Sl1),
            "sl2" => return Some(LegId::Sl2),
            _ => {}
        }

        for n in (1..=4).rev() {
            if lower.contains(&format!("tp{}", n)) || lower.contains(&format!("target {}", n)) {
                return LegId::target(n);
            }
        }

        if lower.contains("sl") || lower.contains("stop") {
            return Some(LegId::Sl);
        }

        None
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LegId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LegId::from_str_loose(s).ok_or_else(|| ParseError::UnknownLeg(s.to_string()))
    }
}

/// Lenient deserializer for update types: anything unrecognised (or null)
/// becomes `None` instead of failing the whole payload.
pub(crate) fn deserialize_leg<'de, D>(deserializer: D) -> Result<Option<LegId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(LegId::from_str_loose))
}

/// Coarse lifecycle summary of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    Tp1,
    Tp2,
    Tp3,
    Tp4,
    ClosedWin,
    ClosedLoss,
    Sl,
    /// Any value the backend sends that is not one of the above.
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Tp1 => "tp1",
            Status::Tp2 => "tp2",
            Status::Tp3 => "tp3",
            Status::Tp4 => "tp4",
            Status::ClosedWin => "closed_win",
            Status::ClosedLoss => "closed_loss",
            Status::Sl => "sl",
            Status::Unknown => "unknown",
        }
    }

    pub fn from_str_loose(s: &str) -> Status {
        match s.trim().to_lowercase().as_str() {
            "open" => Status::Open,
            "tp1" => Status::Tp1,
            "tp2" => Status::Tp2,
            "tp3" => Status::Tp3,
            "tp4" => Status::Tp4,
            "closed_win" => Status::ClosedWin,
            "closed_loss" => Status::ClosedLoss,
            "sl" => Status::Sl,
            _ => Status::Unknown,
        }
    }

    /// Status-only stop rule: the stop leg counts as hit exactly for these two.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Status::ClosedLoss | Status::Sl)
    }

    /// Target hit-vector used when no event log exists (tp1..tp4).
    pub fn fallback_hits(&self) -> [bool; 4] {
        match self {
            Status::ClosedWin | Status::Tp4 => [true, true, true, true],
            Status::Tp3 => [true, true, true, false],
            Status::Tp2 => [true, true, false, false],
            Status::Tp1 => [true, false, false, false],
            _ => [false; 4],
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Status::from_str_loose(s) {
            Status::Unknown => Err(ParseError::UnknownStatus(s.to_string())),
            status => Ok(status),
        }
    }
}

pub(crate) fn deserialize_status<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Status::from_str_loose).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_leg_parsing_follows_backend_normalisation() {
        assert_eq!(LegId::from_str_loose("TP2"), Some(LegId::Tp2));
        assert_eq!(LegId::from_str_loose("Target 3 reached"), Some(LegId::Tp3));
        assert_eq!(LegId::from_str_loose("sl1"), Some(LegId::Sl1));
        assert_eq!(LegId::from_str_loose("sl2"), Some(LegId::Sl2));
        assert_eq!(LegId::from_str_loose("Stop hit"), Some(LegId::Sl));
        assert_eq!(LegId::from_str_loose("tp4 / closed"), Some(LegId::Tp4));
        assert_eq!(LegId::from_str_loose("entry filled"), None);
    }

    #[test]
    fn strict_parse_reports_unknown() {
        assert_eq!("tp1".parse::<LegId>(), Ok(LegId::Tp1));
        assert_eq!(
            "bogus".parse::<LegId>(),
            Err(ParseError::UnknownLeg("bogus".to_string()))
        );
        assert!("moon".parse::<Status>().is_err());
        assert_eq!("CLOSED_WIN".parse::<Status>(), Ok(Status::ClosedWin));
    }

    #[test]
    fn fallback_table() {
        assert_eq!(Status::ClosedWin.fallback_hits(), [true; 4]);
        assert_eq!(Status::Tp4.fallback_hits(), [true; 4]);
        assert_eq!(Status::Tp3.fallback_hits(), [true, true, true, false]);
        assert_eq!(Status::Tp2.fallback_hits(), [true, true, false, false]);
        assert_eq!(Status::Tp1.fallback_hits(), [true, false, false, false]);
        assert_eq!(Status::ClosedLoss.fallback_hits(), [false; 4]);
        assert_eq!(Status::Unknown.fallback_hits(), [false; 4]);
    }

    #[test]
    fn unknown_status_deserializes() {
        let s: Status = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(s, Status::Unknown);
        let s: Status = serde_json::from_str("\"closed_loss\"").unwrap();
        assert!(s.is_stopped());
    }
}
