//! SQLite persistence for generated signals and generation settings.
//!
//! Signals are kept on a rolling window (purged on every save) so the
//! dashboard and broadcaster only ever see recent history.

use crate::error::{AppError, Result};
use crate::types::{
    GeneratedSignal, Instrument, PairOverview, SignalMetadata, SignalSettings, StoredSignal,
};
use chrono::{DateTime, Duration, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Upper bound for `recent_signals`.
pub const MAX_RECENT_SIGNALS: usize = 100;

const SIGNAL_COLUMNS: &str = "id, pair, direction, rsi, macd_histogram, support_level,
     resistance_level, trend, quality, generated_at, expires_at, metadata";

/// SQLite store for signals and settings.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("SQLite connection lock poisoned".to_string()))
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS signals (
                id TEXT PRIMARY KEY,
                pair TEXT NOT NULL,
                direction TEXT NOT NULL,
                rsi REAL NOT NULL,
                macd_histogram REAL NOT NULL,
                support_level REAL,
                resistance_level REAL,
                trend TEXT NOT NULL,
                quality INTEGER NOT NULL,
                generated_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                metadata TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_signals_generated_at ON signals(generated_at DESC)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_signals_pair ON signals(pair, generated_at DESC)",
            [],
        )?;

        // Single-row settings table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                minimum_quality REAL NOT NULL,
                indicator_sensitivity REAL NOT NULL
            )",
            [],
        )?;

        debug!("SQLite schema initialized");
        Ok(())
    }

    // ========== Signal Methods ==========

    /// Persist a batch of signals, purging rows older than `retention_days`
    /// in the same transaction. An empty batch touches nothing.
    pub fn save_signals(&self, signals: &[GeneratedSignal], retention_days: i64) -> Result<usize> {
        if signals.is_empty() {
            return Ok(0);
        }

        let cutoff = retention_cutoff(retention_days)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let purged = tx.execute(
            "DELETE FROM signals WHERE generated_at < ?1",
            params![cutoff],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO signals (id, pair, direction, rsi, macd_histogram, support_level,
                     resistance_level, trend, quality, generated_at, expires_at, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for signal in signals {
                let metadata = signal
                    .metadata
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;

                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    signal.pair,
                    signal.direction.as_str(),
                    signal.rsi,
                    signal.macd_histogram,
                    signal.support_level,
                    signal.resistance_level,
                    signal.trend.as_str(),
                    signal.quality,
                    signal.generated_at.timestamp_millis(),
                    signal.expires_at.timestamp_millis(),
                    metadata,
                ])?;
            }
        }

        tx.commit()?;

        if purged > 0 {
            info!("Purged {} signals older than {} days", purged, retention_days);
        }
        debug!("Saved {} signals", signals.len());
        Ok(signals.len())
    }

    /// Most recent signals, newest first. `limit` is capped at 100.
    pub fn recent_signals(&self, limit: usize) -> Result<Vec<StoredSignal>> {
        let conn = self.lock()?;
        let limit = limit.min(MAX_RECENT_SIGNALS);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM signals ORDER BY generated_at DESC LIMIT ?1",
            SIGNAL_COLUMNS
        ))?;

        let signals = stmt
            .query_map(params![limit as i64], signal_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(signals)
    }

    /// Signals that have not yet expired at `now`, newest first.
    pub fn active_signals(&self, now: DateTime<Utc>) -> Result<Vec<StoredSignal>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM signals WHERE expires_at > ?1 ORDER BY generated_at DESC",
            SIGNAL_COLUMNS
        ))?;

        let signals = stmt
            .query_map(params![now.timestamp_millis()], signal_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(signals)
    }

    /// Latest trend per catalog instrument, "UNKNOWN" when never signalled.
    pub fn pair_overview(&self, instruments: &[Instrument]) -> Result<Vec<PairOverview>> {
        let conn = self.lock()?;

        // SQLite returns the bare `trend` column from the row holding MAX().
        let mut stmt = conn.prepare(
            "SELECT pair, trend, MAX(generated_at) FROM signals GROUP BY pair",
        )?;

        let latest = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let overview = instruments
            .iter()
            .map(|instrument| {
                let state = latest.iter().find(|(pair, _, _)| *pair == instrument.pair);
                PairOverview {
                    pair: instrument.pair.clone(),
                    symbol: instrument.symbol.clone(),
                    description: instrument.description.clone(),
                    trend: state
                        .map(|(_, trend, _)| trend.clone())
                        .unwrap_or_else(|| "UNKNOWN".to_string()),
                    last_updated: state
                        .and_then(|(_, _, ts)| DateTime::<Utc>::from_timestamp_millis(*ts)),
                }
            })
            .collect();

        Ok(overview)
    }

    /// Delete signals generated more than `days` ago.
    pub fn purge_old_signals(&self, days: i64) -> Result<usize> {
        let cutoff = retention_cutoff(days)?;
        let conn = self.lock()?;
        let count = conn.execute(
            "DELETE FROM signals WHERE generated_at < ?1",
            params![cutoff],
        )?;

        if count > 0 {
            info!("Cleaned up {} old signals", count);
        }

        Ok(count)
    }

    /// Total stored signals.
    pub fn signal_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM signals", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Settings Methods ==========

    /// Current settings, creating the default row on first access.
    pub fn get_settings(&self) -> Result<SignalSettings> {
        let conn = self.lock()?;

        let existing = conn.query_row(
            "SELECT minimum_quality, indicator_sensitivity FROM settings WHERE id = 1",
            [],
            |row| {
                Ok(SignalSettings {
                    minimum_quality: row.get(0)?,
                    indicator_sensitivity: row.get(1)?,
                })
            },
        );

        match existing {
            Ok(settings) => Ok(settings),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                let defaults = SignalSettings::default();
                conn.execute(
                    "INSERT INTO settings (id, minimum_quality, indicator_sensitivity)
                     VALUES (1, ?1, ?2)",
                    params![defaults.minimum_quality, defaults.indicator_sensitivity],
                )?;
                info!("Created default signal settings");
                Ok(defaults)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate and store new settings.
    pub fn update_settings(&self, settings: &SignalSettings) -> Result<SignalSettings> {
        settings.validate()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO settings (id, minimum_quality, indicator_sensitivity)
             VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                minimum_quality = excluded.minimum_quality,
                indicator_sensitivity = excluded.indicator_sensitivity",
            params![settings.minimum_quality, settings.indicator_sensitivity],
        )?;

        info!(
            "Updated signal settings: minimum_quality={}, sensitivity={}",
            settings.minimum_quality, settings.indicator_sensitivity
        );
        Ok(*settings)
    }
}

/// Epoch millis `days` ago. Negative or out-of-range windows are rejected.
fn retention_cutoff(days: i64) -> Result<i64> {
    if days < 0 {
        return Err(AppError::Validation(format!(
            "retention days must not be negative, got {}",
            days
        )));
    }

    Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .map(|cutoff| cutoff.timestamp_millis())
        .ok_or_else(|| AppError::Validation(format!("retention of {} days is out of range", days)))
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

fn timestamp_from_row(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(index)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| conversion_error(index, format!("invalid timestamp {}", millis)))
}

fn signal_from_row(row: &Row<'_>) -> rusqlite::Result<StoredSignal> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| conversion_error(0, e.to_string()))?;

    let direction = row
        .get::<_, String>(2)?
        .parse()
        .map_err(|e: String| conversion_error(2, e))?;
    let trend = row
        .get::<_, String>(7)?
        .parse()
        .map_err(|e: String| conversion_error(7, e))?;

    // Unparseable metadata is dropped rather than failing the whole read.
    let metadata = row
        .get::<_, Option<String>>(11)?
        .and_then(|json| match serde_json::from_str::<SignalMetadata>(&json) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Discarding unreadable signal metadata: {}", e);
                None
            }
        });

    Ok(StoredSignal {
        id,
        signal: GeneratedSignal {
            pair: row.get(1)?,
            direction,
            rsi: row.get(3)?,
            macd_histogram: row.get(4)?,
            support_level: row.get(5)?,
            resistance_level: row.get(6)?,
            trend,
            quality: row.get(8)?,
            generated_at: timestamp_from_row(row, 9)?,
            expires_at: timestamp_from_row(row, 10)?,
            metadata,
        },
    })
}
