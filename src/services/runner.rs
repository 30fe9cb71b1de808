//! Scheduled generate-and-store job.

use super::signals::SignalGenerator;
use super::sqlite_store::SqliteStore;
use crate::error::Result;
use crate::types::{GeneratedSignal, Instrument};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

/// Periodically generates signals for the catalog and persists them.
pub struct SignalRunner {
    generator: SignalGenerator,
    store: Arc<SqliteStore>,
    instruments: Vec<Instrument>,
    retention_days: i64,
}

impl SignalRunner {
    pub fn new(
        generator: SignalGenerator,
        store: Arc<SqliteStore>,
        instruments: Vec<Instrument>,
        retention_days: i64,
    ) -> Self {
        Self {
            generator,
            store,
            instruments,
            retention_days,
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Run one generation pass with the stored settings and save the results.
    pub async fn run_once(&self) -> Result<Vec<GeneratedSignal>> {
        let settings = self.store.get_settings()?;
        let config = settings.evaluation_config()?;

        let signals = self.generator.generate(&self.instruments, &config).await;
        let saved = self.store.save_signals(&signals, self.retention_days)?;

        info!(
            "Signal run complete: {} of {} instruments produced a signal (min quality {}, sensitivity {})",
            saved,
            self.instruments.len(),
            config.minimum_quality,
            config.sensitivity
        );
        Ok(signals)
    }

    /// Run every `period` until `shutdown` fires. The first run starts immediately.
    pub async fn start(&self, period: Duration, mut shutdown: broadcast::Receiver<()>) {
        info!("Signal runner started, interval {}s", period.as_secs());
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!("Signal run failed: {}", e);
                    }
                }
                _ = shutdown.recv() => {
                    info!("Signal runner received shutdown signal");
                    break;
                }
            }
        }
    }
}
