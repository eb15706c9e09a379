use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Signals API
    pub api_base_url: String,
    pub api_token: String,
    pub signal_ids: Vec<String>,

    // Offline replay instead of the API
    pub snapshot_path: Option<String>,

    // Polling
    pub poll_interval: u64,
    pub request_spacing_ms: u64,
    pub cache_ttl_secs: u64,

    // Display
    pub display_tz: Tz,

    // Analytics
    pub volume_saturation: usize,
    pub min_closed_per_pair: usize,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let signal_ids = env("SIGNAL_IDS", "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let snapshot_path = Some(env("SNAPSHOT_PATH", "")).filter(|p| !p.is_empty());

        Config {
            api_base_url: env("SIGNALS_API_URL", "http://localhost:8000")
                .trim_end_matches('/')
                .to_string(),
            api_token: env("SIGNALS_API_TOKEN", ""),
            signal_ids,
            snapshot_path,
            poll_interval: env("POLL_INTERVAL_SECS", "5").parse().unwrap_or(5),
            request_spacing_ms: env("REQUEST_SPACING_MS", "100").parse().unwrap_or(100),
            cache_ttl_secs: env("CACHE_TTL_SECS", "2").parse().unwrap_or(2),
            display_tz: env("DISPLAY_TZ", "Asia/Jakarta").parse().unwrap_or(Tz::UTC),
            volume_saturation: env("VOLUME_SATURATION", "20").parse().unwrap_or(20),
            min_closed_per_pair: env("MIN_CLOSED_PER_PAIR", "5").parse().unwrap_or(5),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    pub fn poll_every(&self) -> Duration {
        Duration::from_secs(self.poll_interval.max(1))
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}
