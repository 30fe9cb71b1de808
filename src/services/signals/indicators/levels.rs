//! Support/resistance pivots and coarse trend over a recent candle window.

use crate::types::{Candle, Trend};

/// Number of most recent candles inspected.
pub const LEVEL_WINDOW: usize = 60;

/// Minimum window size for a level/trend determination.
pub const MIN_LEVEL_WINDOW: usize = 10;

/// Price levels detected in the recent window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevels {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub trend: Trend,
}

/// Detect the most recent support/resistance pivots and the window trend.
///
/// Pivots are scanned backward from the second-to-last candle down to
/// index 2; the first local extremum found wins. Returns `None` when fewer
/// than [`MIN_LEVEL_WINDOW`] candles are available.
pub fn detect_levels(candles: &[Candle]) -> Option<PriceLevels> {
    let recent = &candles[candles.len().saturating_sub(LEVEL_WINDOW)..];
    if recent.len() < MIN_LEVEL_WINDOW {
        return None;
    }

    let lows: Vec<f64> = recent.iter().map(|c| c.low).collect();
    let highs: Vec<f64> = recent.iter().map(|c| c.high).collect();

    let max_high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_low = lows.iter().copied().fold(f64::INFINITY, f64::min);
    let tolerance = (max_high - min_low) * 0.01;

    // Zero lows are placeholder quotes, not pivots.
    let support = (2..lows.len() - 1)
        .rev()
        .filter(|&i| lows[i] != 0.0)
        .find(|&i| lows[i] <= lows[i - 1] && lows[i] <= lows[i + 1])
        .map(|i| lows[i]);

    let resistance = (2..highs.len() - 1)
        .rev()
        .find(|&i| highs[i] >= highs[i - 1] && highs[i] >= highs[i + 1])
        .map(|i| highs[i]);

    let change = recent[recent.len() - 1].close - recent[0].close;
    let trend = if change > tolerance {
        Trend::Bullish
    } else if change < -tolerance {
        Trend::Bearish
    } else {
        Trend::Range
    };

    Some(PriceLevels {
        support,
        resistance,
        trend,
    })
}

/// Two-candle trend used when the window is too short.
pub fn trend_from_closes(last_close: f64, previous_close: f64) -> Trend {
    if last_close > previous_close {
        Trend::Bullish
    } else if last_close < previous_close {
        Trend::Bearish
    } else {
        Trend::Range
    }
}
