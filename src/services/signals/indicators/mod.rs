//! Technical indicator implementations.

pub mod ema;
pub mod levels;
pub mod macd;
pub mod rsi;

pub use ema::Ema;
pub use levels::{detect_levels, trend_from_closes, PriceLevels};
pub use macd::Macd;
pub use rsi::Rsi;

use crate::types::{Candle, CandleInterval, IndicatorSnapshot};

/// Minimum candles required before indicators are computed.
pub const MIN_CANDLES: usize = 40;

/// Compute the indicator snapshot for a 5-minute candle series.
///
/// Returns `None` when the series is too short for RSI(14), MACD(12/26/9)
/// cross detection; callers skip the instrument in that case.
pub fn compute_indicators(candles: &[Candle]) -> Option<IndicatorSnapshot> {
    if candles.len() < MIN_CANDLES {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let rsi_series = Rsi::default().series(&closes);
    let histogram = Macd::default().histogram_series(&closes);

    let (previous_rsi, rsi) = last_two(&rsi_series)?;
    let (previous_macd_histogram, macd_histogram) = last_two(&histogram)?;

    let last = candles[candles.len() - 1];
    let previous = candles[candles.len() - 2];

    let (support_level, resistance_level, trend) = match detect_levels(candles) {
        Some(levels) => (levels.support, levels.resistance, levels.trend),
        None => (None, None, trend_from_closes(last.close, previous.close)),
    };

    Some(IndicatorSnapshot {
        rsi,
        previous_rsi,
        macd_histogram,
        previous_macd_histogram,
        support_level,
        resistance_level,
        trend,
        next_entry_time: last.timestamp + CandleInterval::FiveMinute.millis(),
    })
}

fn last_two(series: &[f64]) -> Option<(f64, f64)> {
    match series {
        [.., previous, last] => Some((*previous, *last)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trend;

    fn series(count: usize, step: f64) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let close = 1.10 + i as f64 * step;
                Candle::new(
                    1_699_999_800_000 + i as i64 * 300_000,
                    close,
                    close + 0.0005,
                    close - 0.0005,
                    close,
                    10.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_insufficient_candles() {
        assert!(compute_indicators(&series(39, 0.001)).is_none());
        assert!(compute_indicators(&[]).is_none());
    }

    #[test]
    fn test_minimum_candles_produce_snapshot() {
        assert!(compute_indicators(&series(40, 0.001)).is_some());
    }

    #[test]
    fn test_uptrend_snapshot() {
        let candles = series(60, 0.001);
        let snapshot = compute_indicators(&candles).unwrap();
        assert_eq!(snapshot.rsi, 100.0);
        assert_eq!(snapshot.previous_rsi, 100.0);
        assert_eq!(snapshot.trend, Trend::Bullish);
        assert_eq!(snapshot.support_level, None);
        assert_eq!(snapshot.resistance_level, None);
        assert_eq!(
            snapshot.next_entry_time,
            candles.last().unwrap().timestamp + 300_000
        );
    }

    #[test]
    fn test_flat_snapshot() {
        let snapshot = compute_indicators(&series(50, 0.0)).unwrap();
        assert_eq!(snapshot.trend, Trend::Range);
        assert!(snapshot.macd_histogram.abs() < 1e-12);
        assert!(snapshot.previous_macd_histogram.abs() < 1e-12);
        assert!(snapshot.support_level.is_some());
    }

    #[test]
    fn test_deterministic() {
        let candles = series(80, -0.0007);
        assert_eq!(compute_indicators(&candles), compute_indicators(&candles));
    }

    #[test]
    fn test_last_two() {
        assert_eq!(last_two(&[1.0, 2.0, 3.0]), Some((2.0, 3.0)));
        assert_eq!(last_two(&[1.0]), None);
        assert_eq!(last_two(&[]), None);
    }
}
