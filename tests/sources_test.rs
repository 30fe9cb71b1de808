//! Yahoo candle source tests against a mock chart endpoint.

use chrono::Utc;
use fxsignals::services::signals::{CandleSource, GeneratorOptions, SignalGenerator};
use fxsignals::sources::YahooFinanceClient;
use fxsignals::types::{EvaluationConfig, Instrument};
use fxsignals::AppError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chart_body(count: i64) -> serde_json::Value {
    let now = Utc::now().timestamp();
    let start = now - count * 60;
    let timestamps: Vec<i64> = (0..count).map(|i| start + i * 60).collect();
    let closes: Vec<Option<f64>> = (0..count)
        .map(|i| if i == 1 { None } else { Some(1.10 + i as f64 * 0.0001) })
        .collect();

    json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": closes,
                        "high": closes,
                        "low": closes,
                        "close": closes,
                        "volume": vec![0; count as usize]
                    }]
                }
            }],
            "error": null
        }
    })
}

async fn client_for(server: &MockServer) -> YahooFinanceClient {
    YahooFinanceClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_one_minute_candles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/EURUSD=X$"))
        .and(query_param("interval", "1m"))
        .and(query_param("range", "1h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(30)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let candles = client.fetch_candles("eurusd=x", 60).await.unwrap();

    // One point has no close.
    assert_eq!(candles.len(), 29);
    assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert!(candles.iter().all(|c| c.timestamp % 1_000 == 0 && c.close > 1.0));
}

#[tokio::test]
async fn test_lookback_cutoff_drops_old_points() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(120)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let candles = client.fetch_one_minute_candles("GBPUSD=X", 30).await.unwrap();

    let cutoff = Utc::now().timestamp_millis() - 30 * 60_000;
    assert!(!candles.is_empty());
    assert!(candles.len() <= 31);
    assert!(candles.iter().all(|c| c.timestamp >= cutoff - 60_000));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.fetch_candles("XXXYYY=X", 60).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalApi(_)));
}

#[tokio::test]
async fn test_chart_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.fetch_candles("EURUSD=X", 60).await.unwrap_err();
    assert!(err.to_string().contains("No data found"));
}

#[tokio::test]
async fn test_generator_skips_unreachable_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = Arc::new(client_for(&server).await);
    let generator = SignalGenerator::new(source, GeneratorOptions::default());

    let signals = generator
        .generate(&Instrument::catalog(), &EvaluationConfig::default())
        .await;
    assert!(signals.is_empty());
}
