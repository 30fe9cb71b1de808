use serde::{Deserialize, Serialize};

/// A tradable FX instrument and its chart-source symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Pair identifier used in signals (e.g. "EURUSD").
    pub pair: String,
    /// Symbol understood by the candle source (e.g. "EURUSD=X").
    pub symbol: String,
    pub description: String,
}

impl Instrument {
    pub fn new(pair: &str, symbol: &str, description: &str) -> Self {
        Self {
            pair: pair.to_string(),
            symbol: symbol.to_string(),
            description: description.to_string(),
        }
    }

    /// The default instrument catalog, in evaluation order.
    pub fn catalog() -> Vec<Instrument> {
        FOREX_PAIRS
            .iter()
            .map(|(pair, symbol, description)| Instrument::new(pair, symbol, description))
            .collect()
    }

    /// Look up a catalog instrument by pair identifier (case-insensitive).
    pub fn find(pair: &str) -> Option<Instrument> {
        FOREX_PAIRS
            .iter()
            .find(|(p, _, _)| p.eq_ignore_ascii_case(pair))
            .map(|(pair, symbol, description)| Instrument::new(pair, symbol, description))
    }
}

/// (pair, symbol, description)
pub const FOREX_PAIRS: &[(&str, &str, &str)] = &[
    ("EURUSD", "EURUSD=X", "Euro / US Dollar"),
    ("GBPUSD", "GBPUSD=X", "British Pound / US Dollar"),
    ("USDJPY", "USDJPY=X", "US Dollar / Japanese Yen"),
    ("USDCHF", "USDCHF=X", "US Dollar / Swiss Franc"),
    ("AUDUSD", "AUDUSD=X", "Australian Dollar / US Dollar"),
    ("USDCAD", "CAD=X", "US Dollar / Canadian Dollar"),
    ("NZDUSD", "NZDUSD=X", "New Zealand Dollar / US Dollar"),
    ("EURJPY", "EURJPY=X", "Euro / Japanese Yen"),
    ("EURGBP", "EURGBP=X", "Euro / British Pound"),
    ("GBPJPY", "GBPJPY=X", "British Pound / Japanese Yen"),
];
