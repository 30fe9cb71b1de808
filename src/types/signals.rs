use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Coarse price trend over the recent candle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Bullish,
    Bearish,
    Range,
}

impl Trend {
    /// Quality adjustment applied by the evaluator.
    pub fn bias(&self) -> i32 {
        match self {
            Trend::Bullish => 10,
            Trend::Bearish => -10,
            Trend::Range => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "BULLISH",
            Trend::Bearish => "BEARISH",
            Trend::Range => "RANGE",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BULLISH" => Ok(Trend::Bullish),
            "BEARISH" => Ok(Trend::Bearish),
            "RANGE" => Ok(Trend::Range),
            other => Err(format!("unknown trend: {}", other)),
        }
    }
}

/// Direction of a generated trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }

    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "🟢 BUY",
            SignalDirection::Sell => "🔴 SELL",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(SignalDirection::Buy),
            "SELL" => Ok(SignalDirection::Sell),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Indicator values derived from one candle series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub previous_rsi: f64,
    pub macd_histogram: f64,
    pub previous_macd_histogram: f64,
    pub support_level: Option<f64>,
    pub resistance_level: Option<f64>,
    pub trend: Trend,
    /// Unix milliseconds of the next 5-minute entry window.
    pub next_entry_time: i64,
}

/// Parameters for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationConfig {
    /// Narrows the price-level tolerance band as it grows. Must be > 0.
    pub sensitivity: f64,
    /// Signals scoring below this quality (0-100) are discarded.
    pub minimum_quality: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            minimum_quality: 60.0,
        }
    }
}

/// Diagnostic fields attached to a signal for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMetadata {
    pub previous_rsi: f64,
    pub previous_macd_histogram: f64,
    /// ISO-8601 UTC timestamp.
    pub next_entry_time: String,
    pub last_close: f64,
    pub previous_close: f64,
}

/// A graded BUY/SELL signal for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSignal {
    pub pair: String,
    pub direction: SignalDirection,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub support_level: Option<f64>,
    pub resistance_level: Option<f64>,
    pub trend: Trend,
    /// Quality score from 0 to 100.
    pub quality: u8,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SignalMetadata>,
}

impl GeneratedSignal {
    /// Whether the signal is still actionable at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// A signal read back from persistent storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSignal {
    pub id: Uuid,
    #[serde(flatten)]
    pub signal: GeneratedSignal,
}

/// Latest known state of a catalog instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairOverview {
    pub pair: String,
    pub symbol: String,
    pub description: String,
    /// Trend of the most recent stored signal, or "UNKNOWN".
    pub trend: String,
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_bias() {
        assert_eq!(Trend::Bullish.bias(), 10);
        assert_eq!(Trend::Bearish.bias(), -10);
        assert_eq!(Trend::Range.bias(), 0);
    }

    #[test]
    fn test_trend_round_trip_str() {
        for trend in [Trend::Bullish, Trend::Bearish, Trend::Range] {
            assert_eq!(trend.as_str().parse::<Trend>(), Ok(trend));
        }
        assert!("SIDEWAYS".parse::<Trend>().is_err());
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&SignalDirection::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&SignalDirection::Sell).unwrap(), "\"SELL\"");
        assert!("HOLD".parse::<SignalDirection>().is_err());
    }

    #[test]
    fn test_default_evaluation_config() {
        let config = EvaluationConfig::default();
        assert_eq!(config.sensitivity, 1.0);
        assert_eq!(config.minimum_quality, 60.0);
    }
}
