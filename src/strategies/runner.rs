//! Generic strategy runner: one code path, strategy variants as data.
//!
//! Each ticker/interval pair is evaluated independently. A failing series
//! lookup or signal source degrades only its own pair to a neutral,
//! zero-confidence record tagged with the failure; configuration errors abort
//! the whole invocation.

use crate::indicators::registry::SourceRegistry;
use crate::metrics::Metrics;
use crate::models::interval::Interval;
use crate::models::strategy::{ConfigurationError, StrategyConfig, WeightingProfile};
use crate::report::{AnalysisRecord, AnalysisReport, ReportAssembler, StrategyOutput};
use crate::services::market_data::SeriesProvider;
use crate::signals::engine::{PairError, SignalEngine};
use crate::signals::fusion::FusionEngine;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, info_span, warn};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("strategy '{strategy}' is misconfigured: {source}")]
    Configuration {
        strategy: String,
        #[source]
        source: ConfigurationError,
    },
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to write reasoning: {0}")]
    Diagnostics(#[from] std::io::Error),
    #[error("evaluation task for {ticker} {interval} did not complete: {reason}")]
    Task {
        ticker: String,
        interval: Interval,
        reason: String,
    },
}

/// Tickers and intervals to analyse in one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub tickers: Vec<String>,
    pub intervals: Vec<Interval>,
    pub show_reasoning: bool,
}

impl AnalysisRequest {
    pub fn new(tickers: Vec<String>, intervals: Vec<Interval>) -> Self {
        Self {
            tickers,
            intervals,
            show_reasoning: false,
        }
    }

    pub fn with_show_reasoning(mut self, show_reasoning: bool) -> Self {
        self.show_reasoning = show_reasoning;
        self
    }

    /// Every `(ticker, interval)` pair in request order.
    pub fn pairs(&self) -> Vec<(String, Interval)> {
        self.tickers
            .iter()
            .flat_map(|ticker| {
                self.intervals
                    .iter()
                    .map(move |interval| (ticker.clone(), *interval))
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct StrategyRunner {
    strategy: Arc<StrategyConfig>,
    profile: Arc<WeightingProfile>,
    registry: Arc<SourceRegistry>,
    fusion: FusionEngine,
    assembler: ReportAssembler,
    metrics: Option<Arc<Metrics>>,
    concurrency: usize,
}

impl StrategyRunner {
    /// Validate the strategy against the registry and build a runner.
    pub fn new(strategy: StrategyConfig, registry: SourceRegistry) -> Result<Self, RunnerError> {
        let configuration_error = |source: ConfigurationError| RunnerError::Configuration {
            strategy: strategy.name.clone(),
            source,
        };

        strategy.validate().map_err(configuration_error)?;
        let profile = strategy.profile().map_err(configuration_error)?;
        for (label, spec) in &strategy.labels {
            if !registry.contains(spec.category) {
                return Err(configuration_error(ConfigurationError::MissingSource {
                    strategy: strategy.name.clone(),
                    label: label.clone(),
                    category: spec.category,
                }));
            }
        }

        Ok(Self {
            profile: Arc::new(profile),
            strategy: Arc::new(strategy),
            registry: Arc::new(registry),
            fusion: FusionEngine::default(),
            assembler: ReportAssembler::default(),
            metrics: None,
            concurrency: 1,
        })
    }

    pub fn with_fusion(mut self, fusion: FusionEngine) -> Self {
        self.fusion = fusion;
        self
    }

    pub fn with_assembler(mut self, assembler: ReportAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Pairs evaluated in parallel by [`StrategyRunner::run_concurrent`]; at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn profile(&self) -> &WeightingProfile {
        &self.profile
    }

    /// Evaluate one pair. Lookup and source faults become a degraded record.
    pub fn evaluate_pair(
        &self,
        ticker: &str,
        interval: Interval,
        provider: &dyn SeriesProvider,
    ) -> Result<AnalysisRecord, RunnerError> {
        let span = info_span!(
            "evaluate_pair",
            strategy = %self.strategy.name,
            ticker = %ticker,
            interval = %interval
        );
        let _guard = span.enter();

        let start = Instant::now();
        if let Some(metrics) = &self.metrics {
            metrics.pair_evaluations_active.inc();
        }

        let record = self.evaluate_pair_inner(ticker, interval, provider);

        if let Some(metrics) = &self.metrics {
            metrics.pair_evaluations_active.dec();
            metrics
                .pair_evaluation_duration_seconds
                .observe(start.elapsed().as_secs_f64());
            if let Ok(record) = &record {
                metrics
                    .pair_evaluations_total
                    .with_label_values(&[self.strategy.name.as_str()])
                    .inc();
                if record.is_degraded() {
                    metrics
                        .pair_evaluations_degraded_total
                        .with_label_values(&[self.strategy.name.as_str()])
                        .inc();
                }
            }
        }

        record
    }

    fn evaluate_pair_inner(
        &self,
        ticker: &str,
        interval: Interval,
        provider: &dyn SeriesProvider,
    ) -> Result<AnalysisRecord, RunnerError> {
        let parameters = &self.strategy.parameters;

        let candles = match provider.get_series(ticker, interval) {
            Ok(candles) => candles,
            Err(e) => {
                warn!(error = %e, "StrategyRunner: series lookup failed, degrading pair");
                return Ok(AnalysisRecord::degraded(
                    format!("series lookup failed: {}", e),
                    parameters,
                ));
            }
        };

        if candles.is_empty() {
            debug!("StrategyRunner: empty series, sources will report neutral");
        }

        match SignalEngine::evaluate(
            &candles,
            &self.strategy,
            &self.profile,
            &self.registry,
            &self.fusion,
        ) {
            Ok(evaluation) => {
                let ordered = self
                    .strategy
                    .labels
                    .keys()
                    .filter_map(|label| evaluation.signals.get_key_value(label));
                let record = AnalysisRecord::new(&evaluation.consensus, ordered, parameters);
                debug!(
                    candles = candles.len(),
                    direction = %record.signal,
                    confidence = record.confidence,
                    "StrategyRunner: pair evaluated"
                );
                Ok(record)
            }
            Err(PairError::Source {
                category,
                source_name,
                error,
            }) => {
                warn!(
                    category = %category,
                    source = source_name,
                    error = %error,
                    "StrategyRunner: signal source failed, degrading pair"
                );
                Ok(AnalysisRecord::degraded(
                    format!("{} source '{}' failed: {}", category, source_name, error),
                    parameters,
                ))
            }
            Err(PairError::Configuration(source)) => Err(RunnerError::Configuration {
                strategy: self.strategy.name.clone(),
                source,
            }),
        }
    }

    /// Evaluate every requested pair in order on the calling thread.
    pub fn run(
        &self,
        request: &AnalysisRequest,
        provider: &dyn SeriesProvider,
    ) -> Result<AnalysisReport, RunnerError> {
        let mut report = self.empty_report(request);
        for (ticker, interval) in request.pairs() {
            let record = self.evaluate_pair(&ticker, interval, provider)?;
            report.insert(&ticker, interval.as_str(), record);
        }
        self.log_summary(&report);
        Ok(report)
    }

    /// Evaluate pairs on blocking tasks, at most `concurrency` at a time.
    /// Produces the same report as [`StrategyRunner::run`].
    pub async fn run_concurrent(
        &self,
        request: &AnalysisRequest,
        provider: Arc<dyn SeriesProvider>,
    ) -> Result<AnalysisReport, RunnerError> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::new();

        for (ticker, interval) in request.pairs() {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| RunnerError::Task {
                    ticker: ticker.clone(),
                    interval,
                    reason: e.to_string(),
                })?;
            let runner = self.clone();
            let provider = provider.clone();
            let task_ticker = ticker.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                runner.evaluate_pair(&task_ticker, interval, provider.as_ref())
            });
            handles.push((ticker, interval, handle));
        }

        let mut report = self.empty_report(request);
        for (ticker, interval, handle) in handles {
            let record = handle.await.map_err(|e| RunnerError::Task {
                ticker: ticker.clone(),
                interval,
                reason: e.to_string(),
            })??;
            report.insert(&ticker, interval.as_str(), record);
        }
        self.log_summary(&report);
        Ok(report)
    }

    /// Single entry point for an orchestration layer: run, package, and
    /// optionally dump the reasoning to `sink`.
    pub fn invoke<W: Write>(
        &self,
        request: &AnalysisRequest,
        provider: &dyn SeriesProvider,
        sink: &mut W,
    ) -> Result<StrategyOutput, RunnerError> {
        let report = self.run(request, provider)?;
        self.finish(request, report, sink)
    }

    pub async fn invoke_concurrent<W: Write>(
        &self,
        request: &AnalysisRequest,
        provider: Arc<dyn SeriesProvider>,
        sink: &mut W,
    ) -> Result<StrategyOutput, RunnerError> {
        let report = self.run_concurrent(request, provider).await?;
        self.finish(request, report, sink)
    }

    fn finish<W: Write>(
        &self,
        request: &AnalysisRequest,
        report: AnalysisReport,
        sink: &mut W,
    ) -> Result<StrategyOutput, RunnerError> {
        if request.show_reasoning {
            self.assembler
                .show_reasoning(&report, &self.reasoning_title(), sink)?;
        }
        Ok(self.assembler.assemble(&self.strategy.name, report)?)
    }

    fn reasoning_title(&self) -> String {
        let name = self.strategy.name.as_str();
        let base = name.strip_suffix("Strategy").unwrap_or(name);
        format!("{} Analyst", base)
    }

    fn empty_report(&self, request: &AnalysisRequest) -> AnalysisReport {
        let mut report = AnalysisReport::new();
        for ticker in &request.tickers {
            report.ensure_ticker(ticker);
        }
        report
    }

    fn log_summary(&self, report: &AnalysisReport) {
        info!(
            strategy = %self.strategy.name,
            pairs = report.len(),
            degraded = report.degraded_count(),
            "StrategyRunner: evaluated {} pairs for '{}'",
            report.len(),
            self.strategy.name
        );
    }
}
