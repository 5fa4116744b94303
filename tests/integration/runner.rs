//! Integration tests for the strategy runner

use chrono::Utc;
use confluence::indicators::{SignalSource, SourceError, SourceRegistry};
use confluence::metrics::Metrics;
use confluence::models::indicators::Candle;
use confluence::models::{
    ConfigurationError, Interval, SignalCategory, SignalDirection, SignalTriple, StrategyConfig,
};
use confluence::services::{InMemorySeriesProvider, ProviderError, SeriesProvider};
use confluence::strategies::{AnalysisRequest, RunnerError, StrategyRunner};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn trending_candles(count: usize, step: f64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let price = 100.0 + i as f64 * step;
            Candle::new(price, price + 0.5, price - 0.5, price, 1000.0, Utc::now())
        })
        .collect()
}

fn malformed_candles() -> Vec<Candle> {
    let mut candles = trending_candles(60, 1.0);
    candles[10].high = candles[10].low - 1.0;
    candles
}

fn request(tickers: &[&str], intervals: &[Interval]) -> AnalysisRequest {
    AnalysisRequest::new(
        tickers.iter().map(|t| t.to_string()).collect(),
        intervals.to_vec(),
    )
}

/// Fails every lookup for one ticker.
struct FlakyProvider {
    inner: InMemorySeriesProvider,
    failing_ticker: &'static str,
}

impl SeriesProvider for FlakyProvider {
    fn get_series(&self, ticker: &str, interval: Interval) -> Result<Vec<Candle>, ProviderError> {
        if ticker == self.failing_ticker {
            return Err(ProviderError::Unavailable {
                ticker: ticker.to_string(),
                interval,
                reason: "upstream timeout".to_string(),
            });
        }
        self.inner.get_series(ticker, interval)
    }
}

struct CountingSource {
    category: SignalCategory,
    calls: AtomicUsize,
}

impl SignalSource for CountingSource {
    fn category(&self) -> SignalCategory {
        self.category
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    fn compute(&self, _candles: &[Candle]) -> Result<SignalTriple, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SignalTriple::new(SignalDirection::Bullish, 0.5))
    }
}

#[test]
fn test_report_has_every_requested_pair() {
    let provider = InMemorySeriesProvider::new()
        .with_series("AAA", Interval::OneDay, trending_candles(120, 1.0))
        .with_series("AAA", Interval::OneHour, trending_candles(120, -0.5));
    let runner = StrategyRunner::new(StrategyConfig::ema(), SourceRegistry::with_defaults()).unwrap();

    let report = runner
        .run(&request(&["AAA", "BBB"], &[Interval::OneDay, Interval::OneHour]), &provider)
        .unwrap();

    assert_eq!(report.tickers().collect::<Vec<_>>(), vec!["AAA", "BBB"]);
    assert_eq!(report.len(), 4);
    assert_eq!(report.degraded_count(), 0);

    let aaa = report.get("AAA", "1d").unwrap();
    assert_eq!(aaa.signal, SignalDirection::Bullish);
    assert!(aaa.confidence > 0);
    assert_eq!(aaa.strategy_signals.len(), 5);
    assert_eq!(aaa.strategy_signals["ema_crossovers"], aaa.strategy_signals["multi_timeframe"]);
    assert!(aaa.parameters.contains_key("ema_periods"));

    // No data still yields a full neutral record
    let bbb = report.get("BBB", "1d").unwrap();
    assert_eq!(bbb.signal, SignalDirection::Neutral);
    assert_eq!(bbb.confidence, 0);
    assert_eq!(bbb.strategy_signals.len(), 5);
    assert!(bbb
        .strategy_signals
        .values()
        .all(|detail| detail.signal == SignalDirection::Neutral && detail.confidence == 0));
    assert!(!bbb.is_degraded());
}

#[test]
fn test_report_follows_request_and_label_order() {
    let provider = InMemorySeriesProvider::new()
        .with_series("ZZZ", Interval::OneDay, trending_candles(120, 1.0));
    let runner = StrategyRunner::new(StrategyConfig::rsi(), SourceRegistry::with_defaults()).unwrap();

    let report = runner
        .run(&request(&["ZZZ", "AAA"], &[Interval::OneDay, Interval::OneHour]), &provider)
        .unwrap();
    assert_eq!(report.tickers().collect::<Vec<_>>(), vec!["ZZZ", "AAA"]);
    assert_eq!(
        report.ticker("ZZZ").unwrap().keys().collect::<Vec<_>>(),
        vec!["1d", "1h"]
    );

    let labels: Vec<&String> = report.get("ZZZ", "1d").unwrap().strategy_signals.keys().collect();
    let declared: Vec<&String> = runner.strategy().labels.keys().collect();
    assert_eq!(labels, declared);
    assert_eq!(labels[0], "rsi_overbought_oversold");
    assert_eq!(labels[4], "momentum");

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.find("\"ZZZ\"").unwrap() < json.find("\"AAA\"").unwrap());
}

#[test]
fn test_ticker_without_intervals_is_reported() {
    let runner = StrategyRunner::new(StrategyConfig::rsi(), SourceRegistry::with_defaults()).unwrap();
    let report = runner
        .run(&request(&["AAA"], &[]), &InMemorySeriesProvider::new())
        .unwrap();
    assert!(report.ticker("AAA").unwrap().is_empty());
    assert_eq!(report.len(), 0);
}

#[test]
fn test_faulty_pairs_are_isolated() {
    let inner = InMemorySeriesProvider::new()
        .with_series("AAA", Interval::OneDay, trending_candles(120, 1.0))
        .with_series("BAD", Interval::OneDay, malformed_candles());
    let provider = FlakyProvider {
        inner,
        failing_ticker: "DOWN",
    };
    let runner = StrategyRunner::new(StrategyConfig::ema(), SourceRegistry::with_defaults()).unwrap();

    let report = runner
        .run(&request(&["AAA", "BAD", "DOWN"], &[Interval::OneDay]), &provider)
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.degraded_count(), 2);
    assert!(!report.get("AAA", "1d").unwrap().is_degraded());

    let bad = report.get("BAD", "1d").unwrap();
    assert_eq!(bad.signal, SignalDirection::Neutral);
    assert_eq!(bad.confidence, 0);
    assert!(bad.degraded.as_deref().unwrap().contains("malformed series"));

    let down = report.get("DOWN", "1d").unwrap();
    assert!(down.degraded.as_deref().unwrap().contains("upstream timeout"));
    assert!(down.parameters.contains_key("ema_periods"));
}

#[test]
fn test_sources_run_once_per_pair() {
    let sources: Vec<Arc<CountingSource>> = SignalCategory::all()
        .into_iter()
        .map(|category| {
            Arc::new(CountingSource {
                category,
                calls: AtomicUsize::new(0),
            })
        })
        .collect();
    let mut registry = SourceRegistry::new();
    for source in &sources {
        registry.register(source.clone());
    }

    let runner = StrategyRunner::new(StrategyConfig::rsi(), registry).unwrap();
    let report = runner
        .run(
            &request(&["AAA", "BBB"], &[Interval::OneDay, Interval::FourHours]),
            &InMemorySeriesProvider::new(),
        )
        .unwrap();

    assert_eq!(report.len(), 4);
    for source in &sources {
        assert_eq!(source.calls.load(Ordering::SeqCst), 4, "{}", source.category);
    }
    let record = report.get("AAA", "4h").unwrap();
    assert_eq!(record.signal, SignalDirection::Bullish);
    assert_eq!(record.confidence, 50);
}

#[test]
fn test_misconfigured_strategy_aborts() {
    let zero = StrategyConfig::new("Zero")
        .with_label("a", SignalCategory::Trend, 0.0)
        .with_label("b", SignalCategory::Momentum, 0.0);
    let err = StrategyRunner::new(zero, SourceRegistry::with_defaults()).err().unwrap();
    assert!(matches!(
        err,
        RunnerError::Configuration {
            source: ConfigurationError::NoUsableWeight,
            ..
        }
    ));

    let partial_registry = SourceRegistry::with_defaults();
    let mut registry = SourceRegistry::new();
    for category in [SignalCategory::Trend, SignalCategory::Momentum] {
        registry.register(partial_registry.get(category).unwrap().clone());
    }
    let err = StrategyRunner::new(StrategyConfig::ema(), registry).err().unwrap();
    assert!(matches!(
        err,
        RunnerError::Configuration {
            source: ConfigurationError::MissingSource { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("EMAStrategy"));

    let shadowing = StrategyConfig::rsi().with_parameter("signal", serde_json::json!("bogus"));
    let err = StrategyRunner::new(shadowing, SourceRegistry::with_defaults()).err().unwrap();
    assert!(matches!(
        err,
        RunnerError::Configuration {
            source: ConfigurationError::ReservedParameter { .. },
            ..
        }
    ));
}

#[test]
fn test_metrics_track_evaluations() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let provider = InMemorySeriesProvider::new()
        .with_series("BAD", Interval::OneDay, malformed_candles());
    let runner = StrategyRunner::new(StrategyConfig::rsi(), SourceRegistry::with_defaults())
        .unwrap()
        .with_metrics(metrics.clone());

    runner
        .run(&request(&["AAA", "BAD"], &[Interval::OneDay]), &provider)
        .unwrap();

    assert_eq!(
        metrics
            .pair_evaluations_total
            .with_label_values(&["RSIStrategy"])
            .get(),
        2
    );
    assert_eq!(
        metrics
            .pair_evaluations_degraded_total
            .with_label_values(&["RSIStrategy"])
            .get(),
        1
    );
    assert_eq!(metrics.pair_evaluations_active.get(), 0);
    assert_eq!(metrics.pair_evaluation_duration_seconds.get_sample_count(), 2);

    let exported = metrics.export().unwrap();
    assert!(exported.contains("pair_evaluations_total"));
    assert!(exported.contains("strategy=\"RSIStrategy\""));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_run_matches_sequential() {
    let mut inner = InMemorySeriesProvider::new();
    let tickers = ["AAA", "BBB", "CCC", "DDD", "BAD", "DOWN"];
    for (i, ticker) in tickers.iter().enumerate() {
        let step = if i % 2 == 0 { 0.7 } else { -0.4 };
        inner.insert(ticker, Interval::OneDay, trending_candles(90, step));
        inner.insert(ticker, Interval::OneHour, trending_candles(40 + i * 10, -step));
    }
    inner.insert("BAD", Interval::OneDay, malformed_candles());
    let provider = Arc::new(FlakyProvider {
        inner,
        failing_ticker: "DOWN",
    });

    let runner = StrategyRunner::new(StrategyConfig::ema(), SourceRegistry::with_defaults())
        .unwrap()
        .with_concurrency(3);
    let req = request(&tickers, &[Interval::OneDay, Interval::OneHour, Interval::OneWeek]);

    let sequential = runner.run(&req, provider.as_ref()).unwrap();
    let concurrent = runner.run_concurrent(&req, provider.clone()).await.unwrap();

    assert_eq!(sequential, concurrent);
    assert_eq!(
        serde_json::to_string(&sequential).unwrap(),
        serde_json::to_string(&concurrent).unwrap()
    );
    assert_eq!(concurrent.len(), 18);
    assert_eq!(concurrent.degraded_count(), 4);
}

#[test]
fn test_concurrent_run_with_block_on() {
    let provider: Arc<dyn SeriesProvider> = Arc::new(
        InMemorySeriesProvider::new().with_series("AAA", Interval::OneDay, trending_candles(120, 1.0)),
    );
    let runner = StrategyRunner::new(StrategyConfig::rsi(), SourceRegistry::with_defaults())
        .unwrap()
        .with_concurrency(1);
    let req = request(&["AAA"], &[Interval::OneDay]);

    let report = tokio_test::block_on(runner.run_concurrent(&req, provider.clone())).unwrap();
    assert_eq!(report, runner.run(&req, provider.as_ref()).unwrap());
    assert_eq!(report.get("AAA", "1d").unwrap().signal, SignalDirection::Bullish);
}

#[test]
fn test_invoke_packages_message_and_reasoning() {
    let provider = InMemorySeriesProvider::new()
        .with_series("AAA", Interval::OneDay, trending_candles(120, 1.0));
    let runner = StrategyRunner::new(StrategyConfig::ema(), SourceRegistry::with_defaults()).unwrap();

    let mut quiet = Vec::new();
    let output = runner
        .invoke(&request(&["AAA"], &[Interval::OneDay]), &provider, &mut quiet)
        .unwrap();
    assert!(quiet.is_empty());
    assert_eq!(output.strategy, "EMAStrategy");
    assert_eq!(output.message.name, "technical_analyst_agent");
    let content: serde_json::Value = serde_json::from_str(&output.message.content).unwrap();
    assert_eq!(content, output.report.to_json_value().unwrap());

    let mut sink = Vec::new();
    runner
        .invoke(
            &request(&["AAA"], &[Interval::OneDay]).with_show_reasoning(true),
            &provider,
            &mut sink,
        )
        .unwrap();
    let text = String::from_utf8(sink).unwrap();
    assert!(text.lines().next().unwrap().contains(" EMA Analyst "));
    assert!(text.contains("\"strategy_signals\""));
}
