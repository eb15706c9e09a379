use chrono::{DateTime, Utc};
use signal_outcome::config::Config;
use signal_outcome::models::{LegId, Signal, Status, UpdateEvent};

/// Entry 2000, targets 2100/2200/2300/2400, stop 1900, called 2025-03-01 08:00 UTC.
pub fn eth_signal(status: Status) -> Signal {
    Signal {
        signal_id: "eth-1".to_string(),
        pair: "ETHUSDT".to_string(),
        entry: Some(2000.0),
        target1: Some(2100.0),
        target2: Some(2200.0),
        target3: Some(2300.0),
        target4: Some(2400.0),
        stop1: Some(1900.0),
        stop2: None,
        status,
        created_at: Some("2025-03-01T08:00:00+00:00".to_string()),
        risk_level: None,
        message_link: None,
    }
}

pub fn ev(leg: LegId, at: &str) -> UpdateEvent {
    UpdateEvent::new(leg, at)
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn test_config(signal_ids: &[&str]) -> Config {
    Config {
        api_base_url: "http://127.0.0.1:0".to_string(),
        api_token: String::new(),
        signal_ids: signal_ids.iter().map(|s| s.to_string()).collect(),
        snapshot_path: None,
        poll_interval: 1,
        request_spacing_ms: 0,
        cache_ttl_secs: 0,
        display_tz: chrono_tz::UTC,
        volume_saturation: 20,
        min_closed_per_pair: 1,
        log_level: "error".to_string(),
    }
}

pub const SNAPSHOT: &str = r#"[
    {
        "signal_id": "eth-1",
        "pair": "ETHUSDT",
        "entry": 2000.0,
        "target1": 2100.0,
        "target2": 2200.0,
        "target3": 2300.0,
        "target4": 2400.0,
        "stop1": 1900.0,
        "status": "tp2",
        "created_at": "2025-03-01T08:00:00+00:00",
        "updates": [
            {"update_type": "tp1", "price": 2100.0, "update_at": "2025-03-01T09:00:00+00:00"},
            {"update_type": "Target 2 reached", "price": 2200.0, "update_at": "2025-03-01T11:30:00+00:00"}
        ]
    },
    {
        "signal_id": "doge-1",
        "pair": "DOGEUSDT",
        "entry": 0.00005,
        "target1": 0.000055,
        "target2": 0.00006,
        "stop1": 0.000045,
        "status": "closed_loss",
        "created_at": "2025-03-02 10:00:00",
        "updates": []
    },
    {
        "signal_id": "sol-1",
        "pair": "SOLUSDT",
        "entry": 150.0,
        "target1": 155.0,
        "target2": 160.0,
        "target3": null,
        "stop1": 140.0,
        "status": "closed_win",
        "created_at": "2025-03-03T00:00:00Z"
    }
]"#;
