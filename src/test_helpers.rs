use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::models::{LegId, Signal, SignalDetail, Status, UpdateEvent};

/// A long BTC call: entry 100, targets 105/110/115/120, stop 95,
/// called at 2025-03-01 08:00 UTC.
pub fn make_signal(status: Status) -> Signal {
    Signal {
        signal_id: "sig-1".to_string(),
        pair: "BTCUSDT".to_string(),
        entry: Some(100.0),
        target1: Some(105.0),
        target2: Some(110.0),
        target3: Some(115.0),
        target4: Some(120.0),
        stop1: Some(95.0),
        stop2: None,
        status,
        created_at: Some("2025-03-01T08:00:00+00:00".to_string()),
        risk_level: Some("Low".to_string()),
        message_link: None,
    }
}

pub fn make_detail(id: &str, pair: &str, status: Status, legs: &[LegId]) -> SignalDetail {
    let mut signal = make_signal(status);
    signal.signal_id = id.to_string();
    signal.pair = pair.to_string();

    let updates = legs
        .iter()
        .enumerate()
        .map(|(i, &leg)| update(leg, &format!("2025-03-01T{:02}:00:00Z", 9 + i)))
        .collect();

    SignalDetail::new(signal, updates)
}

pub fn update(leg: LegId, at: &str) -> UpdateEvent {
    UpdateEvent::new(leg, at)
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap()
        .with_timezone(&Utc)
}

/// A Config suitable for testing: no token, no request spacing, UTC display.
pub fn default_test_config() -> Config {
    Config {
        api_base_url: "http://127.0.0.1:0".to_string(),
        api_token: String::new(),
        signal_ids: Vec::new(),
        snapshot_path: None,
        poll_interval: 1,
        request_spacing_ms: 0,
        cache_ttl_secs: 60,
        display_tz: chrono_tz::UTC,
        volume_saturation: 20,
        min_closed_per_pair: 1,
        log_level: "error".to_string(),
    }
}
