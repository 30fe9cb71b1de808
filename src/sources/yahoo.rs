//! Yahoo Finance chart client for 1-minute FX candles.
//!
//! Uses the unofficial Yahoo Finance chart API (no key required).

use crate::error::{AppError, Result};
use crate::services::signals::CandleSource;
use crate::types::{Candle, CandleInterval};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Normalize symbol for Yahoo Finance API.
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Chart range wide enough to cover `lookback_minutes`.
fn range_for_lookback(lookback_minutes: u32) -> &'static str {
    match lookback_minutes {
        0..=60 => "1h",
        61..=720 => "12h",
        _ => "1d",
    }
}

/// Missing quote fields read as 0.
fn value_at(series: &[Option<f64>], i: usize) -> f64 {
    series.get(i).copied().flatten().unwrap_or(0.0)
}

/// Convert a chart payload into candles no older than `cutoff_ms`.
fn parse_chart(data: YahooChartResponse, cutoff_ms: i64) -> Result<Vec<Candle>> {
    // Check for API error
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut candles = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };

        // Skip invalid data points (non-finite or non-positive)
        if !close.is_finite() || close <= 0.0 {
            continue;
        }

        let time = timestamp * 1000; // Convert to milliseconds
        if time < cutoff_ms {
            continue;
        }

        candles.push(Candle {
            timestamp: time,
            open: value_at(&opens, i),
            high: value_at(&highs, i),
            low: value_at(&lows, i),
            close,
            volume: value_at(&volumes, i),
        });
    }

    Ok(candles)
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch 1-minute candles covering the last `lookback_minutes`.
    ///
    /// Points with a missing, non-finite or non-positive close are dropped,
    /// as are points older than the lookback window.
    pub async fn fetch_one_minute_candles(
        &self,
        symbol: &str,
        lookback_minutes: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/{}?interval={}&range={}",
            self.base_url,
            normalize_yahoo_symbol(symbol),
            CandleInterval::OneMinute.label(),
            range_for_lookback(lookback_minutes)
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API returned {} for {}",
                response.status(),
                symbol
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        let cutoff = chrono::Utc::now().timestamp_millis() - i64::from(lookback_minutes) * 60_000;

        let candles = parse_chart(data, cutoff)?;
        debug!("Fetched {} candles for {}", candles.len(), symbol);
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for YahooFinanceClient {
    async fn fetch_candles(&self, symbol: &str, lookback_minutes: u32) -> Result<Vec<Candle>> {
        self.fetch_one_minute_candles(symbol, lookback_minutes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, cutoff_ms: i64) -> Result<Vec<Candle>> {
        let data: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart(data, cutoff_ms)
    }

    #[test]
    fn test_normalize_yahoo_symbol() {
        assert_eq!(normalize_yahoo_symbol("eurusd=x"), "EURUSD=X");
        assert_eq!(normalize_yahoo_symbol(" CAD=X "), "CAD=X");
    }

    #[test]
    fn test_range_for_lookback() {
        assert_eq!(range_for_lookback(30), "1h");
        assert_eq!(range_for_lookback(60), "1h");
        assert_eq!(range_for_lookback(240), "12h");
        assert_eq!(range_for_lookback(720), "12h");
        assert_eq!(range_for_lookback(1440), "1d");
    }

    #[test]
    fn test_parse_chart_candles() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000060, 1700000120],
                    "indicators": {
                        "quote": [{
                            "open": [1.0850, null, 1.0852],
                            "high": [1.0855, 1.0856, 1.0857],
                            "low": [1.0845, 1.0846, 1.0847],
                            "close": [1.0851, 1.0853, 1.0854],
                            "volume": [0, 0, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let candles = parse(json, 0).unwrap();
        assert_eq!(candles.len(), 3);
        assert_eq!(candles[0].timestamp, 1_700_000_000_000);
        assert_eq!(candles[0].close, 1.0851);
        assert_eq!(candles[1].open, 0.0);
        assert_eq!(candles[2].volume, 0.0);
    }

    #[test]
    fn test_parse_chart_drops_missing_closes_and_old_points() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000060, 1700000120],
                    "indicators": {
                        "quote": [{
                            "close": [1.0851, null, 1.0854]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let candles = parse(json, 0).unwrap();
        assert_eq!(candles.len(), 2);

        let recent = parse(json, 1_700_000_100_000).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].timestamp, 1_700_000_120_000);
    }

    #[test]
    fn test_parse_chart_drops_non_positive_closes() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000060, 1700000120],
                    "indicators": {
                        "quote": [{
                            "close": [0.0, -1.0851, 1.0854]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let candles = parse(json, 0).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 1.0854);
    }

    #[test]
    fn test_parse_chart_error_payload() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let err = parse(json, 0).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let json = r#"{
            "chart": {
                "result": [{"indicators": {"quote": [{}]}}],
                "error": null
            }
        }"#;
        assert!(parse(json, 0).unwrap().is_empty());

        let empty = r#"{"chart": {"result": [], "error": null}}"#;
        assert!(parse(empty, 0).unwrap().is_empty());
    }

    #[test]
    fn test_client_creation() {
        let client = YahooFinanceClient::new("http://localhost:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
