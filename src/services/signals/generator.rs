//! Signal generation across the instrument catalog.

use super::evaluator::evaluate;
use super::indicators::compute_indicators;
use super::resample::resample_to_five_minute;
use crate::error::Result;
use crate::types::{Candle, EvaluationConfig, GeneratedSignal, Instrument};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of raw 1-minute candles for an instrument symbol.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch candles covering the last `lookback_minutes`.
    async fn fetch_candles(&self, symbol: &str, lookback_minutes: u32) -> Result<Vec<Candle>>;
}

/// Tuning for a generation run.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorOptions {
    pub lookback_minutes: u32,
    /// Per-instrument fetch budget; a slower fetch skips the instrument.
    pub fetch_timeout: Duration,
    /// Maximum instruments fetched at once.
    pub concurrency: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            lookback_minutes: 240,
            fetch_timeout: Duration::from_secs(10),
            concurrency: 4,
        }
    }
}

/// Run the pure pipeline for one instrument's raw 1-minute candles.
pub fn evaluate_candles(
    pair: &str,
    one_minute: &[Candle],
    config: &EvaluationConfig,
) -> Option<GeneratedSignal> {
    if one_minute.is_empty() {
        debug!("No candles for {} - skipping", pair);
        return None;
    }

    let five_minute = resample_to_five_minute(one_minute);
    if five_minute.is_empty() {
        return None;
    }

    let Some(snapshot) = compute_indicators(&five_minute) else {
        debug!(
            "Insufficient data for {} ({} five-minute candles)",
            pair,
            five_minute.len()
        );
        return None;
    };

    let signal = evaluate(pair, &five_minute, &snapshot, config);
    if signal.is_none() {
        debug!("No qualifying signal for {}", pair);
    }
    signal
}

/// Generates signals for a list of instruments.
pub struct SignalGenerator {
    source: Arc<dyn CandleSource>,
    options: GeneratorOptions,
}

impl SignalGenerator {
    pub fn new(source: Arc<dyn CandleSource>, options: GeneratorOptions) -> Self {
        Self { source, options }
    }

    /// Generate at most one signal per instrument, in instrument order.
    ///
    /// A failed, empty or timed-out fetch only skips that instrument.
    pub async fn generate(
        &self,
        instruments: &[Instrument],
        config: &EvaluationConfig,
    ) -> Vec<GeneratedSignal> {
        stream::iter(instruments)
            .map(|instrument| self.generate_one(instrument, config))
            .buffered(self.options.concurrency.max(1))
            .filter_map(|signal| async move { signal })
            .collect::<Vec<_>>()
            .await
    }

    async fn generate_one(
        &self,
        instrument: &Instrument,
        config: &EvaluationConfig,
    ) -> Option<GeneratedSignal> {
        let candles = self.fetch(instrument).await;
        evaluate_candles(&instrument.pair, &candles, config)
    }

    async fn fetch(&self, instrument: &Instrument) -> Vec<Candle> {
        let fetch = self
            .source
            .fetch_candles(&instrument.symbol, self.options.lookback_minutes);

        match tokio::time::timeout(self.options.fetch_timeout, fetch).await {
            Ok(Ok(candles)) => candles,
            Ok(Err(e)) => {
                warn!("Candle fetch failed for {}: {}", instrument.symbol, e);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "Candle fetch for {} timed out after {:?}",
                    instrument.symbol, self.options.fetch_timeout
                );
                Vec::new()
            }
        }
    }
}
