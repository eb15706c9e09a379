use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use signal_outcome::config::Config;
use signal_outcome::monitor::SignalMonitor;
use signal_outcome::source::{HttpSignalSource, SignalSource, SnapshotSource};

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let source: Box<dyn SignalSource> = match &cfg.snapshot_path {
        Some(path) => {
            let snapshot = SnapshotSource::load(path).await?;
            info!("Replaying {} signal(s) from {}", snapshot.len(), path);
            if cfg.signal_ids.is_empty() {
                cfg.signal_ids = snapshot.ids().to_vec();
            }
            Box::new(snapshot)
        }
        None => Box::new(HttpSignalSource::new(&cfg)),
    };

    if cfg.signal_ids.is_empty() {
        anyhow::bail!("No signals to watch: set SIGNAL_IDS or SNAPSHOT_PATH");
    }

    let mut monitor = SignalMonitor::new(cfg.shared(), source).await;
    monitor.run().await?;

    Ok(())
}
