/// All configuration loaded from environment variables at startup.
/// Missing or invalid required variables cause an immediate panic with a
/// clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instrument symbol, e.g. "BTCUSDT".
    pub symbol: String,
    /// Kline interval, e.g. "15m". Must be one of Binance's intervals.
    pub interval: String,
    /// Minimum consecutive-move count that qualifies a run for an alert.
    pub threshold: usize,

    // Telegram
    pub telegram_token: String,
    pub telegram_chat_ids: Vec<i64>,
}

/// Kline intervals accepted by the Binance stream API.
const SUPPORTED_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

pub fn is_supported_interval(interval: &str) -> bool {
    SUPPORTED_INTERVALS.contains(&interval)
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let symbol = optional_env("SYMBOL")
            .unwrap_or_else(|| "BTCUSDT".to_string())
            .to_uppercase();

        let interval = optional_env("INTERVAL").unwrap_or_else(|| "15m".to_string());
        if !is_supported_interval(&interval) {
            panic!(
                "INTERVAL must be a Binance kline interval ({}), got: '{interval}'",
                SUPPORTED_INTERVALS.join(", ")
            );
        }

        let threshold: usize = optional_env("TREND_THRESHOLD")
            .map(|v| {
                v.parse().unwrap_or_else(|_| {
                    panic!("TREND_THRESHOLD must be a positive integer, got: '{v}'")
                })
            })
            .unwrap_or(3);
        if threshold < 1 {
            panic!("TREND_THRESHOLD must be >= 1, got: {threshold}");
        }

        let telegram_chat_ids = parse_chat_ids(&required_env("TELEGRAM_CHAT_IDS"));

        Config {
            symbol,
            interval,
            threshold,
            telegram_token: required_env("TELEGRAM_TOKEN"),
            telegram_chat_ids,
        }
    }

    /// Window capacity needed to observe a threshold-length run.
    pub fn window_capacity(&self) -> usize {
        self.threshold + 1
    }
}

fn parse_chat_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(|s| {
            s.trim().parse::<i64>().unwrap_or_else(|_| {
                panic!("TELEGRAM_CHAT_IDS contains non-numeric ID: '{}'", s.trim())
            })
        })
        .collect()
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_intervals_are_supported() {
        for interval in ["1m", "15m", "1h", "1d", "1M"] {
            assert!(is_supported_interval(interval), "{interval} should be supported");
        }
    }

    #[test]
    fn unknown_intervals_are_rejected() {
        for interval in ["", "15", "15M", "2d", "1mo"] {
            assert!(!is_supported_interval(interval), "{interval} should be rejected");
        }
    }

    #[test]
    fn chat_ids_parse_from_comma_list() {
        assert_eq!(parse_chat_ids("123"), vec![123]);
        assert_eq!(parse_chat_ids("123, -456,789"), vec![123, -456, 789]);
    }

    #[test]
    #[should_panic(expected = "non-numeric ID")]
    fn chat_ids_reject_garbage() {
        parse_chat_ids("123,abc");
    }
}
