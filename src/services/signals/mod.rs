//! Trading signals service module.
//!
//! 1-minute candles are resampled to 5-minute bars, reduced to an
//! indicator snapshot (RSI, MACD histogram, support/resistance, trend) and
//! scored by the confirmation rules into at most one signal per instrument.

pub mod evaluator;
pub mod generator;
pub mod indicators;
pub mod resample;

pub use evaluator::{evaluate, level_tolerance, quality_score, Confirmations};
pub use generator::{evaluate_candles, CandleSource, GeneratorOptions, SignalGenerator};
pub use indicators::{compute_indicators, MIN_CANDLES};
pub use resample::{resample, resample_to_five_minute};
