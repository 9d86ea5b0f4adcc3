use tokio::sync::mpsc;
use tracing::{info, warn};

use common::{BarEvent, TrendAlert};

use crate::classify;
use crate::window::BarWindow;

/// Consumes decoded bar events, maintains the close window, and emits a
/// `TrendAlert` for every closed bar that ends a qualifying run.
///
/// The monitor is the sole owner of the window: events are applied one at
/// a time, a push always completes before classification runs, and nothing
/// else can observe or mutate the window in between. Alerts fire on every
/// qualifying closed bar — a run that extends past the threshold alerts
/// again on each subsequent close.
pub struct TrendMonitor {
    symbol: String,
    interval: String,
    threshold: usize,
    window: BarWindow,
    bar_rx: mpsc::Receiver<BarEvent>,
    alert_tx: mpsc::Sender<TrendAlert>,
}

impl TrendMonitor {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        threshold: usize,
        bar_rx: mpsc::Receiver<BarEvent>,
        alert_tx: mpsc::Sender<TrendAlert>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            threshold,
            window: BarWindow::new(threshold + 1),
            bar_rx,
            alert_tx,
        }
    }

    /// Run until the bar channel closes. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(
            symbol = %self.symbol,
            interval = %self.interval,
            threshold = self.threshold,
            "Trend monitor running"
        );

        while let Some(event) = self.bar_rx.recv().await {
            if !event.is_final {
                continue; // bar still forming, wait for the close
            }

            self.window.push(event.close);
            info!(
                symbol = %self.symbol,
                close = event.close,
                filled = self.window.len(),
                capacity = self.window.capacity(),
                "Bar closed"
            );

            let result = classify(&self.window, self.threshold);
            let Some(trend) = result.trend else {
                continue;
            };

            info!(
                symbol = %self.symbol,
                trend = %trend,
                run = result.run_length,
                price = event.close,
                "Qualifying run detected"
            );

            let alert = TrendAlert {
                symbol: self.symbol.clone(),
                interval: self.interval.clone(),
                trend,
                run_length: result.run_length,
                latest_price: event.close,
            };
            if self.alert_tx.send(alert).await.is_err() {
                warn!("Alert channel closed — stopping trend monitor");
                return;
            }
        }

        info!("Bar channel closed — trend monitor stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::Trend;

    fn bar(close: f64, is_final: bool) -> BarEvent {
        BarEvent {
            symbol: "BTCUSDT".into(),
            close,
            is_final,
            timestamp: Utc::now(),
        }
    }

    async fn run_monitor(events: Vec<BarEvent>, threshold: usize) -> Vec<TrendAlert> {
        let (bar_tx, bar_rx) = mpsc::channel(events.len().max(1));
        let (alert_tx, mut alert_rx) = mpsc::channel(events.len().max(1));
        let monitor = TrendMonitor::new("BTCUSDT", "15m", threshold, bar_rx, alert_tx);

        for event in events {
            bar_tx.send(event).await.unwrap();
        }
        drop(bar_tx); // closes the channel so the monitor loop terminates

        monitor.run().await;

        let mut alerts = Vec::new();
        while let Some(alert) = alert_rx.recv().await {
            alerts.push(alert);
        }
        alerts
    }

    #[tokio::test]
    async fn fires_once_per_qualifying_bar() {
        let events = vec![bar(1.0, true), bar(2.0, true), bar(3.0, true), bar(4.0, true)];
        let alerts = run_monitor(events, 3).await;

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.trend, Trend::Up);
        assert_eq!(alert.run_length, 3);
        assert_eq!(alert.latest_price, 4.0);
        assert_eq!(alert.symbol, "BTCUSDT");
        assert_eq!(alert.interval, "15m");
    }

    #[tokio::test]
    async fn non_qualifying_bars_produce_no_alert() {
        let events = vec![bar(1.0, true), bar(2.0, true), bar(2.0, true), bar(3.0, true)];
        let alerts = run_monitor(events, 3).await;
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn forming_bars_never_reach_the_window() {
        // Forming updates interleaved with closes; only the 4 closes count
        let events = vec![
            bar(1.0, true),
            bar(9.0, false),
            bar(2.0, true),
            bar(0.5, false),
            bar(3.0, true),
            bar(4.0, true),
        ];
        let alerts = run_monitor(events, 3).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].trend, Trend::Up);
    }

    #[tokio::test]
    async fn extended_run_alerts_on_every_qualifying_close() {
        // 6 strictly increasing closes with threshold 3: the run qualifies
        // on the 4th, 5th and 6th close as the window slides
        let events = (1..=6).map(|i| bar(i as f64, true)).collect();
        let alerts = run_monitor(events, 3).await;
        assert_eq!(alerts.len(), 3);
        assert!(alerts.iter().all(|a| a.trend == Trend::Up && a.run_length == 3));
    }

    #[tokio::test]
    async fn down_run_alerts_with_down_direction() {
        let events = vec![bar(5.0, true), bar(4.0, true), bar(3.0, true), bar(2.0, true)];
        let alerts = run_monitor(events, 3).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].trend, Trend::Down);
        assert_eq!(alerts[0].latest_price, 2.0);
    }
}
