use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live bar update from the exchange stream.
/// Emitted on every kline update for the watched symbol/interval pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarEvent {
    pub symbol: String,
    /// Latest close price of the current bar.
    pub close: f64,
    /// True when the bar has closed (finalized). Only closed bars are
    /// admitted to the window; forming bars are dropped by the monitor.
    pub is_final: bool,
    pub timestamp: DateTime<Utc>,
}

/// Direction of a detected run of closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
        }
    }
}

/// Outcome of classifying the current window of closes.
/// Recomputed on every admitted bar, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendResult {
    /// `None` when no run of at least threshold length ends at the newest bar.
    pub trend: Option<Trend>,
    /// Number of consecutive strictly monotonic adjacent moves counted
    /// from the newest bar backward. Zero when `trend` is `None`.
    pub run_length: usize,
}

impl TrendResult {
    /// No qualifying run.
    pub const fn none() -> Self {
        Self {
            trend: None,
            run_length: 0,
        }
    }
}

/// Notification payload handed to the dispatcher when a qualifying run
/// is detected. Consumed once, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAlert {
    pub symbol: String,
    pub interval: String,
    pub trend: Trend,
    pub run_length: usize,
    pub latest_price: f64,
}
