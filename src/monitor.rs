use anyhow::Result;
use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::SharedConfig;
use crate::core::classify::classify;
use crate::core::metrics::{format_pct, format_timestamp};
use crate::core::outcome::{resolve_outcome, HitSource};
use crate::core::timeline::{build_from_outcome, Step, StepId};
use crate::models::SignalDetail;
use crate::source::SignalSource;

/// A step that gained a timestamp since the previous poll.
#[derive(Debug, Clone, PartialEq)]
pub struct NewlyReached {
    pub signal_id: String,
    pub step: Step,
}

/// Polls a source for a set of signals and reports legs as they are reached.
///
/// Only the last timeline per signal is kept, to diff against; every
/// timeline is rebuilt from scratch on each poll.
pub struct SignalMonitor {
    config: SharedConfig,
    source: Box<dyn SignalSource>,
    last_seen: HashMap<String, Vec<Step>>,
}

impl SignalMonitor {
    pub async fn new(config: SharedConfig, source: Box<dyn SignalSource>) -> Self {
        let cfg = config.read().await;

        info!("{}", "=".repeat(60));
        info!("Signal monitor starting up");
        info!("Watching {} signal(s): {}", cfg.signal_ids.len(), cfg.signal_ids.join(", "));
        info!("Poll interval: {}s | Display TZ: {}", cfg.poll_interval, cfg.display_tz);
        info!("{}", "=".repeat(60));

        drop(cfg);

        Self {
            config,
            source,
            last_seen: HashMap::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("Monitor is now running. Press Ctrl+C to stop.");
        let every = self.config.read().await.poll_every();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down monitor");
                    return Ok(());
                }
                _ = async {
                    self.poll_once().await;
                    tokio::time::sleep(every).await;
                } => {}
            }
        }
    }

    /// One pass over every watched signal. Fetch failures are logged and
    /// skipped; the signal is retried on the next pass.
    pub async fn poll_once(&mut self) -> Vec<NewlyReached> {
        let cfg = self.config.read().await.clone();
        let mut reached = Vec::new();

        for id in &cfg.signal_ids {
            match self.source.fetch_detail(id).await {
                Ok(detail) => reached.extend(self.observe(&detail, cfg.display_tz)),
                Err(e) => warn!("Fetch {} failed: {:#}", id, e),
            }
        }

        reached
    }

    fn observe(&mut self, detail: &SignalDetail, tz: Tz) -> Vec<NewlyReached> {
        let signal = &detail.signal;
        let outcome = resolve_outcome(signal, &detail.updates);
        let steps = build_from_outcome(signal, &outcome);

        let first_poll = !self.last_seen.contains_key(detail.id());
        if first_poll {
            info!(
                "{} {} called at {} [{}] -> {}",
                signal.pair,
                detail.id(),
                steps[0]
                    .reached_at
                    .map(|t| format_timestamp(t, tz))
                    .unwrap_or_else(|| "-".to_string()),
                signal.status,
                classify(signal, &detail.updates)
            );
        }

        let previous = self.last_seen.get(detail.id());
        let fresh: Vec<Step> = steps
            .iter()
            .filter(|s| s.leg_id != StepId::Called && s.is_reached())
            .filter(|s| {
                let seen_before = previous
                    .and_then(|prev| prev.iter().find(|p| p.leg_id == s.leg_id))
                    .is_some_and(|p| p.is_reached());
                !seen_before
            })
            .cloned()
            .collect();

        for step in &fresh {
            info!(
                "{} {} reached at {} ({}){}",
                signal.pair,
                step.label,
                step.reached_at
                    .map(|t| format_timestamp(t, tz))
                    .unwrap_or_default(),
                step.price_label().unwrap_or_else(|| "-".to_string()),
                match (step.pct_move, step.duration_label()) {
                    (Some(p), Some(d)) => format!(" {} after {}", format_pct(p), d),
                    (Some(p), None) => format!(" {}", format_pct(p)),
                    (None, Some(d)) => format!(" after {}", d),
                    (None, None) => String::new(),
                }
            );
        }

        if outcome.source == HitSource::EventLog {
            let gaps = outcome.ingestion_gaps();
            if !gaps.is_empty() {
                let names: Vec<&str> = gaps.iter().map(|l| l.as_str()).collect();
                warn!(
                    "{} {}: hit without an event of its own: {}",
                    signal.pair,
                    detail.id(),
                    names.join(", ")
                );
            }
        } else {
            debug!("{} {}: no event log, using status {}", signal.pair, detail.id(), signal.status);
        }

        self.last_seen.insert(detail.id().to_string(), steps);

        fresh
            .into_iter()
            .map(|step| NewlyReached {
                signal_id: detail.id().to_string(),
                step,
            })
            .collect()
    }
}
