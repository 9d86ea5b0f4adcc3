use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tracing::{info, warn};
use url::Url;

use common::{BarEvent, Result};

/// Binance kline/candlestick WebSocket stream for a single symbol and
/// interval.
///
/// Connects to the public kline stream, decodes events into `BarEvent`,
/// and forwards them on an mpsc channel. Forwards forming bars too — the
/// consumer decides what to admit. Reconnects automatically with
/// exponential backoff; stops when the receiving side of the channel is
/// dropped.
pub struct BinanceKlineStream {
    symbol: String,
    interval: String,
    bar_tx: mpsc::Sender<BarEvent>,
}

impl BinanceKlineStream {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        bar_tx: mpsc::Sender<BarEvent>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            bar_tx,
        }
    }

    /// Run the stream loop, reconnecting on failure.
    /// Call this inside a `tokio::spawn`.
    pub async fn run(self) {
        let mut backoff = Duration::from_secs(1);
        const MAX_BACKOFF: Duration = Duration::from_secs(60);

        while !self.bar_tx.is_closed() {
            info!(
                symbol = %self.symbol,
                interval = %self.interval,
                "Connecting to Binance kline stream"
            );
            match self.connect_once().await {
                Ok(()) => {
                    info!(symbol = %self.symbol, "Kline stream closed cleanly");
                    // Clean close — reconnect after a short delay (e.g. 24h session end)
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    backoff = Duration::from_secs(1);
                }
                Err(e) => {
                    warn!(
                        symbol = %self.symbol,
                        error = %e,
                        backoff = ?backoff,
                        "Kline stream error, reconnecting"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }

        info!("Bar channel closed — feed stopping");
    }

    async fn connect_once(&self) -> Result<()> {
        let url_str = format!(
            "wss://stream.binance.com:9443/ws/{}@kline_{}",
            self.symbol.to_lowercase(),
            self.interval
        );
        let url = Url::parse(&url_str).map_err(|e| common::Error::WebSocket(e.to_string()))?;

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| common::Error::WebSocket(e.to_string()))?;

        let (_, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            let msg = msg.map_err(|e| common::Error::WebSocket(e.to_string()))?;

            if let tokio_tungstenite::tungstenite::Message::Text(text) = msg {
                match parse_kline_event(&self.symbol, &text) {
                    Ok(Some(event)) => {
                        if self.bar_tx.send(event).await.is_err() {
                            // Consumer gone — treat as a clean shutdown
                            return Ok(());
                        }
                    }
                    Ok(None) => {} // non-kline message, skip
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed kline event");
                    }
                }
            }
        }

        Ok(())
    }
}

// ─── Binance kline JSON decoding ─────────────────────────────────────────────

#[derive(Deserialize)]
struct KlineWrapper {
    k: KlineData,
}

#[derive(Deserialize)]
struct KlineData {
    /// Close price as a string decimal.
    #[serde(rename = "c")]
    close: String,
    /// True once the kline is closed (finalized).
    #[serde(rename = "x")]
    is_final: bool,
    /// Kline close time in epoch milliseconds.
    #[serde(rename = "T")]
    close_time_ms: i64,
}

fn parse_kline_event(symbol: &str, text: &str) -> Result<Option<BarEvent>> {
    // Kline messages have an "e" field set to "kline"
    let wrapper: serde_json::Value = serde_json::from_str(text)?;
    if wrapper.get("e").and_then(|v| v.as_str()) != Some("kline") {
        return Ok(None);
    }

    let kline: KlineWrapper = serde_json::from_value(wrapper)?;
    let k = kline.k;

    let close: f64 = k
        .close
        .parse()
        .map_err(|_| common::Error::Decode(format!("unparseable close price '{}'", k.close)))?;
    if !close.is_finite() {
        return Err(common::Error::Decode(format!(
            "non-finite close price '{}'",
            k.close
        )));
    }

    let timestamp: DateTime<Utc> = Utc
        .timestamp_millis_opt(k.close_time_ms)
        .single()
        .unwrap_or_else(Utc::now);

    Ok(Some(BarEvent {
        symbol: symbol.to_string(),
        close,
        is_final: k.is_final,
        timestamp,
    }))
}
