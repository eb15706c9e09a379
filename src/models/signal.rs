use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::leg::{deserialize_leg, deserialize_status, LegId, Status};
use super::timestamp::parse_opt;

/// A trading call as stored by the ingestion side. Only `status` ever
/// changes after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(alias = "id")]
    pub signal_id: String,
    #[serde(default)]
    pub pair: String,
    #[serde(default)]
    pub entry: Option<f64>,
    #[serde(default)]
    pub target1: Option<f64>,
    #[serde(default)]
    pub target2: Option<f64>,
    #[serde(default)]
    pub target3: Option<f64>,
    #[serde(default)]
    pub target4: Option<f64>,
    #[serde(default)]
    pub stop1: Option<f64>,
    #[serde(default)]
    pub stop2: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Status,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub message_link: Option<String>,
}

impl Signal {
    /// Entry price, if usable.
    pub fn entry(&self) -> Option<f64> {
        usable(self.entry)
    }

    /// Price for a leg. Zero, negative and non-finite prices count as absent.
    /// `sl` resolves to `stop1`, falling back to `stop2`.
    pub fn price(&self, leg: LegId) -> Option<f64> {
        match leg {
            LegId::Tp1 => usable(self.target1),
            LegId::Tp2 => usable(self.target2),
            LegId::Tp3 => usable(self.target3),
            LegId::Tp4 => usable(self.target4),
            LegId::Sl => usable(self.stop1).or_else(|| usable(self.stop2)),
            LegId::Sl1 => usable(self.stop1),
            LegId::Sl2 => usable(self.stop2),
        }
    }

    /// Target legs that have a usable price, in ascending order.
    pub fn priced_targets(&self) -> Vec<LegId> {
        LegId::TARGETS
            .into_iter()
            .filter(|&leg| self.price(leg).is_some())
            .collect()
    }

    pub fn has_stop_price(&self) -> bool {
        self.price(LegId::Sl).is_some()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_opt(self.created_at.as_deref())
    }
}

fn usable(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

/// One "leg reached" record from the monitoring side. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(default)]
    pub signal_id: Option<String>,
    /// `None` when the stored type could not be mapped to a leg.
    #[serde(default, deserialize_with = "deserialize_leg")]
    pub update_type: Option<LegId>,
    #[serde(default)]
    pub update_at: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl UpdateEvent {
    pub fn new(leg: LegId, update_at: &str) -> Self {
        Self {
            signal_id: None,
            update_type: Some(leg),
            update_at: Some(update_at.to_string()),
            price: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn reached_at(&self) -> Option<DateTime<Utc>> {
        parse_opt(self.update_at.as_deref())
    }

    pub fn is(&self, leg: LegId) -> bool {
        self.update_type == Some(leg)
    }
}

/// Payload of the update-log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLog {
    #[serde(default)]
    pub updates: Vec<UpdateEvent>,
}

/// Payload of the signal-detail endpoint: the signal with its update log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalDetail {
    #[serde(flatten)]
    pub signal: Signal,
    #[serde(default)]
    pub updates: Vec<UpdateEvent>,
}

impl SignalDetail {
    pub fn new(signal: Signal, updates: Vec<UpdateEvent>) -> Self {
        Self { signal, updates }
    }

    pub fn id(&self) -> &str {
        &self.signal.signal_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_payload_deserializes() {
        let json = r#"{
            "signal_id": "abc",
            "pair": "BTCUSDT",
            "entry": 100.0,
            "target1": 105.0,
            "target2": null,
            "stop1": 95.0,
            "status": "TP1",
            "created_at": "2025-03-01T08:00:00+00:00",
            "risk_level": "Low",
            "volume_rank_num": 12,
            "updates": [
                {"update_type": "tp1", "price": 105.0, "update_at": "2025-03-01T09:00:00+00:00"},
                {"update_type": "something else", "update_at": "2025-03-01T09:30:00+00:00"}
            ]
        }"#;

        let detail: SignalDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id(), "abc");
        assert_eq!(detail.signal.status, Status::Tp1);
        assert_eq!(detail.signal.price(LegId::Tp1), Some(105.0));
        assert_eq!(detail.signal.price(LegId::Tp2), None);
        assert_eq!(detail.updates.len(), 2);
        assert_eq!(detail.updates[0].update_type, Some(LegId::Tp1));
        assert_eq!(detail.updates[1].update_type, None);
    }

    #[test]
    fn update_log_payload_deserializes() {
        let json = r#"{
            "updates": [
                {"signal_id": "abc", "update_type": "Target 3 hit", "price": 115.0, "update_at": "2025-03-01 12:00:00+00:00"},
                {"signal_id": "abc", "update_type": "breakeven moved", "update_at": "2025-03-01T12:30:00Z"},
                {"signal_id": "abc", "update_type": "SL1", "update_at": "not a time"}
            ]
        }"#;

        let log: UpdateLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.updates.len(), 3);
        assert!(log.updates[0].is(LegId::Tp3));
        assert_eq!(log.updates[0].price, Some(115.0));
        assert!(log.updates[0].reached_at().is_some());
        assert_eq!(log.updates[1].update_type, None);
        assert!(log.updates[2].is(LegId::Sl1));
        assert_eq!(log.updates[2].reached_at(), None);

        let empty: UpdateLog = serde_json::from_str("{}").unwrap();
        assert!(empty.updates.is_empty());
    }

    #[test]
    fn null_status_defaults_to_open() {
        let s: Signal = serde_json::from_str(r#"{"id": "x", "status": null}"#).unwrap();
        assert_eq!(s.signal_id, "x");
        assert_eq!(s.status, Status::Open);
        assert_eq!(s.entry(), None);
    }

    #[test]
    fn unusable_prices_are_absent() {
        let s = Signal {
            entry: Some(0.0),
            target1: Some(f64::NAN),
            target2: Some(-3.0),
            stop1: None,
            stop2: Some(90.0),
            ..Default::default()
        };
        assert_eq!(s.entry(), None);
        assert_eq!(s.price(LegId::Tp1), None);
        assert_eq!(s.price(LegId::Tp2), None);
        assert_eq!(s.price(LegId::Sl), Some(90.0));
        assert!(s.priced_targets().is_empty());
    }
}
