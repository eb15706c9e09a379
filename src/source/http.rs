use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::Config;
use crate::models::SignalDetail;
use crate::source::SignalSource;

const DETAIL_PATH: &str = "/api/v1/signals/detail";

/// Fetches signal snapshots from the dashboard backend.
pub struct HttpSignalSource {
    client: Client,
    base_url: String,
    token: String,
    min_request_interval: Duration,
    last_request: Option<Instant>,
    cache: HashMap<String, (Instant, SignalDetail)>,
    cache_ttl: Duration,
}

impl HttpSignalSource {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: cfg.api_base_url.clone(),
            token: cfg.api_token.clone(),
            min_request_interval: Duration::from_millis(cfg.request_spacing_ms),
            last_request: None,
            cache: HashMap::new(),
            cache_ttl: Duration::from_secs(cfg.cache_ttl_secs),
        }
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_interval {
                tokio::time::sleep(self.min_request_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub async fn fetch_detail(&mut self, signal_id: &str) -> Result<SignalDetail> {
        if let Some((cached_at, detail)) = self.cache.get(signal_id) {
            if cached_at.elapsed() < self.cache_ttl {
                return Ok(detail.clone());
            }
        }

        self.rate_limit().await;

        let url = format!("{}{}/{}", self.base_url, DETAIL_PATH, signal_id);
        debug!("GET {}", url);

        let mut req = self.client.get(&url);
        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to fetch signal {}", signal_id))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Signals API error {} for {}: {}", status, signal_id, body);
        }

        let detail: SignalDetail = resp
            .json()
            .await
            .context("Failed to parse signal detail response")?;

        self.cache
            .insert(signal_id.to_string(), (Instant::now(), detail.clone()));

        Ok(detail)
    }
}

#[async_trait]
impl SignalSource for HttpSignalSource {
    async fn fetch_detail(&mut self, signal_id: &str) -> Result<SignalDetail> {
        self.fetch_detail(signal_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LegId, Status};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, token: &str) -> Config {
        let mut cfg = crate::test_helpers::default_test_config();
        cfg.api_base_url = server.uri();
        cfg.api_token = token.to_string();
        cfg
    }

    #[tokio::test]
    async fn fetches_and_parses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/signals/detail/abc"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "signal_id": "abc",
                "pair": "ETHUSDT",
                "entry": 2000.0,
                "target1": 2100.0,
                "stop1": 1900.0,
                "status": "tp1",
                "created_at": "2025-03-01T08:00:00+00:00",
                "updates": [
                    {"update_type": "tp1", "price": 2100.0, "update_at": "2025-03-01T10:00:00+00:00"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut source = HttpSignalSource::new(&config_for(&server, "secret"));
        let detail = source.fetch_detail("abc").await.unwrap();
        assert_eq!(detail.signal.pair, "ETHUSDT");
        assert_eq!(detail.signal.status, Status::Tp1);
        assert!(detail.updates[0].is(LegId::Tp1));

        // served from cache inside the TTL, so the mock sees one request
        let again = source.fetch_detail("abc").await.unwrap();
        assert_eq!(again, detail);
    }

    #[tokio::test]
    async fn non_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/signals/detail/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Signal not found"))
            .mount(&server)
            .await;

        let mut source = HttpSignalSource::new(&config_for(&server, ""));
        let err = source.fetch_detail("missing").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
