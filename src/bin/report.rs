use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::io::Write;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use signal_outcome::analytics::{risk_reward_report, PerformanceAnalyzer};
use signal_outcome::config::Config;
use signal_outcome::core::{classify, format_pct, format_timestamp, Timeline};
use signal_outcome::models::SignalDetail;
use signal_outcome::source::SnapshotSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // Usage: outcome-report [snapshot.json] [report.txt]
    let args: Vec<String> = std::env::args().collect();

    let path = args
        .get(1)
        .cloned()
        .or_else(|| cfg.snapshot_path.clone())
        .context("Usage: outcome-report <snapshot.json> [report.txt] (or set SNAPSHOT_PATH)")?;

    let snapshot = SnapshotSource::load(&path).await?;
    info!("Loaded {} signal(s) from {}", snapshot.len(), path);

    let details = snapshot.all();

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), &details, &cfg)?;

    if let Some(out) = args.get(2) {
        let mut f = std::fs::File::create(out)
            .with_context(|| format!("Failed to create {}", out))?;
        write_report(&mut f, &details, &cfg)?;
        println!("\nReport saved to: {}", out);
    }

    Ok(())
}

fn write_report(f: &mut impl Write, details: &[SignalDetail], cfg: &Config) -> Result<()> {
    writeln!(f, "Signal Outcome Report")?;
    writeln!(f, "=====================")?;
    writeln!(f)?;

    for detail in details {
        write_timeline(f, detail, cfg.display_tz)?;
    }

    let analyzer = PerformanceAnalyzer::new(cfg.volume_saturation);
    let stats = analyzer.analyze(details);

    writeln!(f, "Performance:")?;
    writeln!(f, "  Signals:   {} ({} closed, {} open)", stats.total_signals, stats.closed_trades, stats.open_signals)?;
    writeln!(f, "  Win Rate:  {:.2}%", stats.win_rate)?;
    writeln!(
        f,
        "  Outcomes:  TP1 {} | TP2 {} | TP3 {} | TP4 {} | SL {}",
        stats.tp1_count, stats.tp2_count, stats.tp3_count, stats.tp4_count, stats.sl_count
    )?;
    writeln!(f, "  Pairs:     {}", stats.active_pairs)?;
    writeln!(f)?;

    writeln!(f, "Top Performers (>= {} closed):", cfg.min_closed_per_pair)?;
    for pair in analyzer.top_performers(&stats, cfg.min_closed_per_pair) {
        writeln!(
            f,
            "  {:<12} score {:>6.2} | WR {:>6.2}% | {} closed / {} total",
            pair.pair, pair.performance_score, pair.win_rate, pair.closed_trades, pair.total_signals
        )?;
    }
    writeln!(f)?;

    let rr = risk_reward_report(details);
    writeln!(f, "Risk:Reward:")?;
    for item in &rr.items {
        writeln!(
            f,
            "  {}: reward {:>6.2}% | risk {:>6.2}% | R:R {:.2} | hits {}",
            item.tp_level, item.avg_reward_pct, item.avg_risk_pct, item.risk_reward_ratio, item.total_hits
        )?;
    }
    writeln!(f, "  Overall avg R:R {:.2}", rr.overall_avg_rr)?;

    Ok(())
}

fn write_timeline(f: &mut impl Write, detail: &SignalDetail, tz: Tz) -> Result<()> {
    let signal = &detail.signal;
    let timeline = Timeline::build(signal, &detail.updates);

    writeln!(
        f,
        "{} {} [{}] -> {}",
        signal.pair,
        detail.id(),
        signal.status,
        classify(signal, &detail.updates)
    )?;

    for step in &timeline.steps {
        let marker = if step.is_reached() {
            "x"
        } else if step.hit {
            "~"
        } else {
            " "
        };
        writeln!(
            f,
            "  [{}] {:<10} {:>14} {:>9} {:>16} {:>8}",
            marker,
            step.label,
            step.price_label().unwrap_or_else(|| "-".to_string()),
            step.pct_move.map(format_pct).unwrap_or_default(),
            step.reached_at
                .map(|t| format_timestamp(t, tz))
                .unwrap_or_else(|| "pending".to_string()),
            step.duration_label().unwrap_or_default()
        )?;
    }

    if let Some(total) = timeline.total_duration().and_then(signal_outcome::format_duration) {
        writeln!(f, "  total {}", total)?;
    }
    writeln!(f)?;

    Ok(())
}
