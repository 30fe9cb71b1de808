//! FX Signals - 5-minute forex signal generation from 1-minute candles

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
