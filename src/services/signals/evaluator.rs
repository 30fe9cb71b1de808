//! Rule-based confirmation scoring that turns indicators into a signal.

use crate::types::{
    Candle, CandleInterval, EvaluationConfig, GeneratedSignal, IndicatorSnapshot, SignalDirection,
    SignalMetadata,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const CONFIRMATION_WEIGHT: i32 = 30;
const MOMENTUM_MULTIPLIER: f64 = 40.0;
const MOMENTUM_CAP: f64 = 20.0;

/// Individual confirmation rules that fired for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confirmations {
    pub rsi_cross_up: bool,
    pub rsi_cross_down: bool,
    pub macd_cross_up: bool,
    pub macd_cross_down: bool,
    pub touches_support: bool,
    pub touches_resistance: bool,
}

impl Confirmations {
    /// Evaluate every rule against the last candle and snapshot.
    pub fn detect(last: &Candle, snapshot: &IndicatorSnapshot, tolerance: f64) -> Self {
        Self {
            rsi_cross_up: snapshot.previous_rsi < RSI_OVERSOLD && snapshot.rsi >= RSI_OVERSOLD,
            rsi_cross_down: snapshot.previous_rsi > RSI_OVERBOUGHT
                && snapshot.rsi <= RSI_OVERBOUGHT,
            macd_cross_up: snapshot.previous_macd_histogram < 0.0
                && snapshot.macd_histogram >= 0.0,
            macd_cross_down: snapshot.previous_macd_histogram > 0.0
                && snapshot.macd_histogram <= 0.0,
            touches_support: snapshot
                .support_level
                .is_some_and(|support| last.low <= support + tolerance),
            touches_resistance: snapshot
                .resistance_level
                .is_some_and(|resistance| last.high >= resistance - tolerance),
        }
    }

    pub fn bullish(&self) -> u8 {
        [self.rsi_cross_up, self.macd_cross_up, self.touches_support]
            .iter()
            .filter(|fired| **fired)
            .count() as u8
    }

    pub fn bearish(&self) -> u8 {
        [self.rsi_cross_down, self.macd_cross_down, self.touches_resistance]
            .iter()
            .filter(|fired| **fired)
            .count() as u8
    }

    /// BUY or SELL by majority; ties (including 0-0) have no direction.
    pub fn direction(&self) -> Option<SignalDirection> {
        let (bullish, bearish) = (self.bullish(), self.bearish());
        if bullish > bearish {
            Some(SignalDirection::Buy)
        } else if bearish > bullish {
            Some(SignalDirection::Sell)
        } else {
            None
        }
    }
}

/// Price-level proximity band; higher sensitivity narrows it.
pub fn level_tolerance(last_close: f64, sensitivity: f64) -> f64 {
    (last_close * 0.001).max(0.0005) / sensitivity
}

/// Quality score in [0, 100].
pub fn quality_score(confirmations: &Confirmations, snapshot: &IndicatorSnapshot) -> u8 {
    let base = confirmations.bullish().max(confirmations.bearish()) as i32 * CONFIRMATION_WEIGHT;
    let momentum = ((snapshot.macd_histogram - snapshot.previous_macd_histogram).abs()
        * MOMENTUM_MULTIPLIER)
        .min(MOMENTUM_CAP);
    let raw = (base as f64 + momentum + snapshot.trend.bias() as f64).round();

    raw.clamp(0.0, 100.0) as u8
}

/// Evaluate one instrument's candles and snapshot into a signal.
///
/// `None` means no signal: fewer than two candles, no clear direction, or
/// quality below `config.minimum_quality`.
pub fn evaluate(
    pair: &str,
    candles: &[Candle],
    snapshot: &IndicatorSnapshot,
    config: &EvaluationConfig,
) -> Option<GeneratedSignal> {
    let (previous, last) = match candles {
        [.., previous, last] => (previous, last),
        _ => return None,
    };

    let tolerance = level_tolerance(last.close, config.sensitivity);
    let confirmations = Confirmations::detect(last, snapshot, tolerance);

    let direction = confirmations.direction()?;
    let quality = quality_score(&confirmations, snapshot);

    if (quality as f64) < config.minimum_quality {
        return None;
    }

    let generated_at = DateTime::<Utc>::from_timestamp_millis(last.timestamp)?;
    let expires_at = generated_at + Duration::milliseconds(CandleInterval::FiveMinute.millis());
    let next_entry_time = DateTime::<Utc>::from_timestamp_millis(snapshot.next_entry_time)?
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    Some(GeneratedSignal {
        pair: pair.to_string(),
        direction,
        rsi: snapshot.rsi,
        macd_histogram: snapshot.macd_histogram,
        support_level: snapshot.support_level,
        resistance_level: snapshot.resistance_level,
        trend: snapshot.trend,
        quality,
        generated_at,
        expires_at,
        metadata: Some(SignalMetadata {
            previous_rsi: snapshot.previous_rsi,
            previous_macd_histogram: snapshot.previous_macd_histogram,
            next_entry_time,
            last_close: last.close,
            previous_close: previous.close,
        }),
    })
}
