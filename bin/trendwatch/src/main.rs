use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{BarEvent, Config, TrendAlert};
use detector::TrendMonitor;
use feed::BinanceKlineStream;
use notify::AlertNotifier;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        symbol = %cfg.symbol,
        interval = %cfg.interval,
        threshold = cfg.threshold,
        window = cfg.window_capacity(),
        "TrendWatch starting"
    );

    // ── Channels ──────────────────────────────────────────────────────────────
    // feed → monitor → notifier; bounded so a stalled Telegram send
    // backpressures instead of growing without bound
    let (bar_tx, bar_rx) = mpsc::channel::<BarEvent>(128);
    let (alert_tx, alert_rx) = mpsc::channel::<TrendAlert>(32);

    // ── Tasks ─────────────────────────────────────────────────────────────────
    let stream = BinanceKlineStream::new(cfg.symbol.clone(), cfg.interval.clone(), bar_tx);
    let monitor = TrendMonitor::new(
        cfg.symbol.clone(),
        cfg.interval.clone(),
        cfg.threshold,
        bar_rx,
        alert_tx,
    );
    let notifier = AlertNotifier::new(&cfg.telegram_token, &cfg.telegram_chat_ids, alert_rx);

    tokio::spawn(stream.run());
    tokio::spawn(monitor.run());
    tokio::spawn(notifier.run());

    // Keep main alive
    info!("All tasks started. Waiting for shutdown signal.");
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupted by shutdown signal. Exiting."),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal. Exiting."),
    }
}
