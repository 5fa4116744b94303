//! Unit tests for environment configuration

use confluence::config::EngineConfig;
use confluence::logging::is_production;
use confluence::models::Interval;
use confluence::report::DEFAULT_AGENT_NAME;
use std::collections::HashMap;
use std::path::PathBuf;

fn config_from(pairs: &[(&str, &str)]) -> Result<EngineConfig, confluence::config::ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EngineConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.strategy, "EMAStrategy");
    assert!(config.tickers.is_empty());
    assert_eq!(config.intervals, vec![Interval::OneDay]);
    assert_eq!(config.data_dir, PathBuf::from("data"));
    assert_eq!(config.neutral_threshold, 0.0);
    assert!(config.concurrency >= 1);
    assert!(!config.show_reasoning);
    assert_eq!(config.agent_name, DEFAULT_AGENT_NAME);
}

#[test]
fn test_full_configuration() {
    let config = config_from(&[
        ("STRATEGY", "RSIStrategy"),
        ("TICKERS", " AAPL, MSFT ,,NVDA "),
        ("INTERVALS", "1h,1d"),
        ("DATA_DIR", "/tmp/candles"),
        ("NEUTRAL_THRESHOLD", "0.05"),
        ("WORKER_CONCURRENCY", "3"),
        ("SHOW_REASONING", "Yes"),
        ("AGENT_NAME", "rsi_agent"),
    ])
    .unwrap();

    assert_eq!(config.strategy, "RSIStrategy");
    assert_eq!(config.tickers, vec!["AAPL", "MSFT", "NVDA"]);
    assert_eq!(config.intervals, vec![Interval::OneHour, Interval::OneDay]);
    assert_eq!(config.data_dir, PathBuf::from("/tmp/candles"));
    assert_eq!(config.neutral_threshold, 0.05);
    assert_eq!(config.concurrency, 3);
    assert!(config.show_reasoning);
    assert_eq!(config.agent_name, "rsi_agent");
}

#[test]
fn test_invalid_values_name_the_key() {
    let cases = [
        ("INTERVALS", "1d,2d"),
        ("NEUTRAL_THRESHOLD", "1.0"),
        ("NEUTRAL_THRESHOLD", "abc"),
        ("WORKER_CONCURRENCY", "0"),
        ("SHOW_REASONING", "maybe"),
        ("STRATEGY", "  "),
    ];
    for (key, value) in cases {
        let err = config_from(&[(key, value)]).unwrap_err();
        assert_eq!(err.key, key);
    }
}

#[test]
fn test_blank_agent_name_keeps_default() {
    let config = config_from(&[("AGENT_NAME", "  ")]).unwrap();
    assert_eq!(config.agent_name, DEFAULT_AGENT_NAME);
}

#[test]
fn test_production_detection() {
    assert!(is_production("production"));
    assert!(is_production("prod"));
    assert!(!is_production("sandbox"));
}
