//! Prometheus metrics for strategy evaluation.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub pair_evaluations_total: IntCounterVec,
    pub pair_evaluations_degraded_total: IntCounterVec,
    pub pair_evaluations_active: IntGauge,
    pub pair_evaluation_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let pair_evaluations_total = IntCounterVec::new(
            Opts::new(
                "pair_evaluations_total",
                "Ticker/interval pairs evaluated, by strategy",
            ),
            &["strategy"],
        )?;
        let pair_evaluations_degraded_total = IntCounterVec::new(
            Opts::new(
                "pair_evaluations_degraded_total",
                "Ticker/interval pairs reported as degraded, by strategy",
            ),
            &["strategy"],
        )?;
        let pair_evaluations_active = IntGauge::new(
            "pair_evaluations_active",
            "Ticker/interval pairs currently being evaluated",
        )?;
        let pair_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pair_evaluation_duration_seconds",
                "Time spent evaluating one ticker/interval pair",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;

        registry.register(Box::new(pair_evaluations_total.clone()))?;
        registry.register(Box::new(pair_evaluations_degraded_total.clone()))?;
        registry.register(Box::new(pair_evaluations_active.clone()))?;
        registry.register(Box::new(pair_evaluation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            pair_evaluations_total,
            pair_evaluations_degraded_total,
            pair_evaluations_active,
            pair_evaluation_duration_seconds,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
