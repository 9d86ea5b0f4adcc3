use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{info, warn};

use common::{Trend, TrendAlert};

/// Telegram alert dispatcher.
///
/// Consumes `TrendAlert`s from the alert channel, formats a Markdown
/// message, and sends it to every configured chat. Delivery is
/// fire-and-forget: failures are logged as warnings and never retried
/// or reported back to the monitor.
pub struct AlertNotifier {
    bot: Bot,
    chat_ids: Vec<ChatId>,
    alert_rx: mpsc::Receiver<TrendAlert>,
}

impl AlertNotifier {
    pub fn new(token: &str, chat_ids: &[i64], alert_rx: mpsc::Receiver<TrendAlert>) -> Self {
        Self {
            bot: Bot::new(token),
            chat_ids: chat_ids.iter().map(|&id| ChatId(id)).collect(),
            alert_rx,
        }
    }

    /// Run until the alert channel closes. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!(chats = self.chat_ids.len(), "Alert notifier running");

        while let Some(alert) = self.alert_rx.recv().await {
            info!(
                symbol = %alert.symbol,
                trend = %alert.trend,
                run = alert.run_length,
                price = alert.latest_price,
                "Dispatching trend alert"
            );

            let text = format_alert(&alert);
            for &chat_id in &self.chat_ids {
                if let Err(e) = self
                    .bot
                    .send_message(chat_id, &text)
                    .parse_mode(ParseMode::Markdown)
                    .await
                {
                    warn!(chat_id = ?chat_id, error = %e, "Failed to send Telegram alert");
                }
            }
        }

        info!("Alert channel closed — notifier stopping");
    }
}

/// Markdown body sent to every configured chat.
pub fn format_alert(alert: &TrendAlert) -> String {
    let arrow = match alert.trend {
        Trend::Up => "📈",
        Trend::Down => "📉",
    };
    format!(
        "*{} kline alert - {}*\n\n🚨 {} consecutive closes {} {}\n*Latest:* `{:.2}`",
        alert.symbol, alert.interval, alert.run_length, alert.trend, arrow, alert.latest_price
    )
}
