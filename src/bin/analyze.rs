//! Confluence analyzer
//!
//! Runs one strategy over JSON candle files and prints the analyst message
//! content (the report as JSON) to stdout. Configuration comes from the
//! environment; see `confluence::config`.

use confluence::config::{get_environment, EngineConfig};
use confluence::indicators::SourceRegistry;
use confluence::logging;
use confluence::metrics::Metrics;
use confluence::models::StrategyConfig;
use confluence::report::ReportAssembler;
use confluence::services::{JsonDirSeriesProvider, SeriesProvider};
use confluence::signals::FusionEngine;
use confluence::strategies::{AnalysisRequest, StrategyRunner};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = EngineConfig::from_env()?;
    info!(environment = %get_environment(), "Starting Confluence analyzer");

    if config.tickers.is_empty() {
        return Err("TICKERS must list at least one ticker".into());
    }

    let strategy = load_strategy(&config.strategy)?;
    info!(
        strategy = %strategy.name,
        labels = strategy.labels.len(),
        tickers = ?config.tickers,
        intervals = ?config.intervals,
        concurrency = config.concurrency,
        "Running strategy '{}'",
        strategy.name
    );

    let metrics = Arc::new(Metrics::new()?);
    let runner = StrategyRunner::new(strategy, SourceRegistry::with_defaults())?
        .with_fusion(FusionEngine::new(config.neutral_threshold)?)
        .with_assembler(ReportAssembler::new(config.agent_name.clone()))
        .with_metrics(metrics.clone())
        .with_concurrency(config.concurrency);

    let provider: Arc<dyn SeriesProvider> =
        Arc::new(JsonDirSeriesProvider::new(config.data_dir.clone()));
    let request = AnalysisRequest::new(config.tickers.clone(), config.intervals.clone())
        .with_show_reasoning(config.show_reasoning);

    let mut stderr = std::io::stderr();
    let output = runner
        .invoke_concurrent(&request, provider, &mut stderr)
        .await?;

    println!("{}", output.message.content);

    debug!(metrics = %metrics.export()?, "Evaluation metrics");
    Ok(())
}

/// A preset name, or a path to a JSON strategy definition.
fn load_strategy(name: &str) -> Result<StrategyConfig, Box<dyn std::error::Error>> {
    if name.ends_with(".json") {
        let raw = std::fs::read_to_string(name)
            .map_err(|e| format!("Failed to read strategy file {}: {}", name, e))?;
        return Ok(StrategyConfig::from_json_str(&raw)?);
    }
    Ok(StrategyConfig::preset(name)?)
}
