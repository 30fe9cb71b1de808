pub mod broadcast;
pub mod runner;
pub mod signals;
pub mod sqlite_store;

pub use broadcast::{format_digest, format_signal};
pub use runner::SignalRunner;
pub use signals::{CandleSource, GeneratorOptions, SignalGenerator};
pub use sqlite_store::SqliteStore;
