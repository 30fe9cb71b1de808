use fxsignals::config::Config;
use fxsignals::services::{SignalGenerator, SignalRunner, SqliteStore};
use fxsignals::sources::YahooFinanceClient;
use fxsignals::types::Instrument;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxsignals=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting FX signal generator (database {})", config.database_path);

    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    // Also rejects an unusable SIGNAL_RETENTION_DAYS before the first run.
    store.purge_old_signals(config.signal_retention_days)?;
    let source = Arc::new(YahooFinanceClient::new(
        &config.yahoo_chart_url,
        config.fetch_timeout(),
    )?);
    let generator = SignalGenerator::new(source, config.generator_options());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let once = args.first().map(String::as_str) == Some("once");

    // `once EURUSD GBPUSD` restricts a single run to the named pairs.
    let instruments = match args.get(1..) {
        Some(pairs) if once && !pairs.is_empty() => pairs
            .iter()
            .map(|pair| {
                Instrument::find(pair).ok_or_else(|| anyhow::anyhow!("unknown pair: {}", pair))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        _ => Instrument::catalog(),
    };

    let runner = SignalRunner::new(
        generator,
        store,
        instruments,
        config.signal_retention_days,
    );

    if once {
        let signals = runner.run_once().await?;
        println!("{}", serde_json::to_string_pretty(&signals)?);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            let _ = shutdown_tx.send(());
        }
    });

    runner.start(config.generation_interval(), shutdown_rx).await;
    info!("FX signal generator stopped");
    Ok(())
}
