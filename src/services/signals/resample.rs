//! Candle resampling into coarser fixed-width buckets.

use crate::types::{Candle, CandleInterval};
use std::collections::BTreeMap;

/// OHLC bucket for a time period.
#[derive(Debug, Clone)]
struct OhlcBucket {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl OhlcBucket {
    /// High and low are seeded by the first open.
    fn new(time: i64, first: &Candle) -> Self {
        Self {
            time,
            open: first.open,
            high: first.open,
            low: first.open,
            close: first.close,
            volume: 0.0,
        }
    }

    fn update(&mut self, candle: &Candle) {
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.close = candle.close;
        self.volume += candle.volume;
    }

    fn into_candle(self) -> Candle {
        Candle::new(self.time, self.open, self.high, self.low, self.close, self.volume)
    }
}

/// Aggregate candles into buckets of `bucket_ms`, keyed by bucket start.
///
/// Input may be unordered; output is sorted by bucket timestamp and holds
/// only buckets that received at least one candle.
pub fn resample(candles: &[Candle], bucket_ms: i64) -> Vec<Candle> {
    if candles.is_empty() || bucket_ms <= 0 {
        return Vec::new();
    }

    let mut sorted = candles.to_vec();
    // Stable: candles sharing a timestamp keep their input order.
    sorted.sort_by_key(|c| c.timestamp);

    let mut buckets: BTreeMap<i64, OhlcBucket> = BTreeMap::new();
    for candle in &sorted {
        let time = candle.timestamp.div_euclid(bucket_ms) * bucket_ms;
        buckets
            .entry(time)
            .or_insert_with(|| OhlcBucket::new(time, candle))
            .update(candle);
    }

    buckets.into_values().map(OhlcBucket::into_candle).collect()
}

/// Aggregate 1-minute candles into 5-minute candles.
pub fn resample_to_five_minute(candles: &[Candle]) -> Vec<Candle> {
    resample(candles, CandleInterval::FiveMinute.millis())
}
