use serde::{Deserialize, Serialize};

/// OHLCV candle. `timestamp` is the bucket start in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Candle resolution handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinute,
}

impl CandleInterval {
    /// Get the bucket size in milliseconds.
    pub fn millis(&self) -> i64 {
        match self {
            CandleInterval::OneMinute => 60_000,
            CandleInterval::FiveMinute => 300_000,
        }
    }

    /// Interval label used by chart APIs.
    pub fn label(&self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "1m",
            CandleInterval::FiveMinute => "5m",
        }
    }
}
