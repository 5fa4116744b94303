//! Unit tests for strategy definitions and weighting profiles

use confluence::models::{
    ConfigurationError, SignalCategory, StrategyConfig, WeightingProfile, RESERVED_PARAMETER_NAMES,
};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

#[test]
fn test_profile_rejects_all_zero_weights() {
    let result = WeightingProfile::from_pairs([("a", 0.0), ("b", 0.0)]);
    assert_eq!(result, Err(ConfigurationError::NoUsableWeight));
}

#[test]
fn test_profile_rejects_negative_and_non_finite_weights() {
    assert!(matches!(
        WeightingProfile::from_pairs([("a", 1.0), ("b", -0.1)]),
        Err(ConfigurationError::InvalidWeight { ref label, .. }) if label == "b"
    ));
    assert!(matches!(
        WeightingProfile::from_pairs([("a", f64::NAN)]),
        Err(ConfigurationError::InvalidWeight { .. })
    ));
    assert_eq!(
        WeightingProfile::new(BTreeMap::new()),
        Err(ConfigurationError::EmptyProfile)
    );
}

#[test]
fn test_profile_allows_some_zero_weights() {
    let profile = WeightingProfile::from_pairs([("a", 0.0), ("b", 2.0)]).unwrap();
    assert_eq!(profile.len(), 2);
    assert_eq!(profile.weight("a"), Some(0.0));
    assert_eq!(profile.weight("missing"), None);
    assert_eq!(profile.labels().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_ema_preset() {
    let ema = StrategyConfig::ema();
    assert_eq!(ema.name, "EMAStrategy");
    let profile = ema.profile().unwrap();
    assert_eq!(profile.weight("ema_crossovers"), Some(0.45));
    assert_eq!(profile.weight("ema_slope"), Some(0.30));
    assert_eq!(profile.weight("price_to_ema"), Some(0.15));
    assert_eq!(profile.weight("multi_timeframe"), Some(0.05));
    assert_eq!(profile.weight("ema_volatility"), Some(0.05));
    assert_eq!(ema.categories(), SignalCategory::all().into_iter().collect::<BTreeSet<_>>());
    assert_eq!(
        ema.parameters["ema_periods"],
        json!({"short": [3, 5, 8], "medium": [13, 21, 34], "long": [55, 89, 144]})
    );
}

#[test]
fn test_rsi_preset() {
    let rsi = StrategyConfig::rsi();
    let profile = rsi.profile().unwrap();
    assert_eq!(profile.len(), 5);
    assert_eq!(profile.weight("momentum"), Some(0.80));
    assert_eq!(rsi.labels["momentum"].category, SignalCategory::Momentum);
    assert_eq!(rsi.labels["rsi_trend_strength"].category, SignalCategory::Momentum);
    assert!(rsi.parameters.is_empty());
}

#[test]
fn test_preset_lookup() {
    assert_eq!(StrategyConfig::preset("EMAStrategy").unwrap().name, "EMAStrategy");
    assert_eq!(StrategyConfig::preset("ema").unwrap().name, "EMAStrategy");
    assert_eq!(StrategyConfig::preset(" rsistrategy ").unwrap().name, "RSIStrategy");
    assert_eq!(
        StrategyConfig::preset("macd"),
        Err(ConfigurationError::UnknownPreset("macd".to_string()))
    );
}

#[test]
fn test_from_parts_requires_matching_labels() {
    let profile = WeightingProfile::from_pairs([("trend", 0.6), ("swing", 0.4)]).unwrap();
    let mut mapping = BTreeMap::new();
    mapping.insert("trend".to_string(), SignalCategory::Trend);

    assert!(matches!(
        StrategyConfig::from_parts("Custom", &profile, &mapping),
        Err(ConfigurationError::UnmappedLabel { ref label, .. }) if label == "swing"
    ));

    mapping.insert("swing".to_string(), SignalCategory::MeanReversion);
    let config = StrategyConfig::from_parts("Custom", &profile, &mapping).unwrap();
    assert_eq!(config.profile().unwrap(), profile);

    mapping.insert("extra".to_string(), SignalCategory::Volatility);
    assert_eq!(
        StrategyConfig::from_parts("Custom", &profile, &mapping),
        Err(ConfigurationError::UnknownLabel("extra".to_string()))
    );
}

#[test]
fn test_from_json_str() {
    let config = StrategyConfig::from_json_str(
        r#"{
            "name": "Swing",
            "labels": {
                "trend": {"category": "trend", "weight": 0.7},
                "reversion": {"category": "mean_reversion", "weight": 0.3}
            },
            "parameters": {"lookback": 20}
        }"#,
    )
    .unwrap();
    assert_eq!(config.name, "Swing");
    assert_eq!(
        config.labels.keys().collect::<Vec<_>>(),
        vec!["trend", "reversion"]
    );
    assert_eq!(config.labels["reversion"].category, SignalCategory::MeanReversion);
    assert_eq!(config.parameters["lookback"], json!(20));
}

#[test]
fn test_from_json_str_rejects_bad_definitions() {
    assert!(matches!(
        StrategyConfig::from_json_str("not json"),
        Err(ConfigurationError::Parse(_))
    ));
    assert!(matches!(
        StrategyConfig::from_json_str(
            r#"{"name": "X", "labels": {"a": {"category": "sentiment", "weight": 1.0}}}"#
        ),
        Err(ConfigurationError::Parse(_))
    ));
    assert_eq!(
        StrategyConfig::from_json_str(
            r#"{"name": "X", "labels": {"a": {"category": "trend", "weight": 0.0}}}"#
        ),
        Err(ConfigurationError::NoUsableWeight)
    );
}

#[test]
fn test_parameters_may_not_shadow_record_fields() {
    let result = StrategyConfig::from_json_str(
        r#"{
            "name": "Shadow",
            "labels": {"a": {"category": "trend", "weight": 1.0}},
            "parameters": {"confidence": 7, "signal": "bogus"}
        }"#,
    );
    assert!(matches!(
        result,
        Err(ConfigurationError::ReservedParameter { ref strategy, ref name })
            if strategy == "Shadow" && name == "confidence"
    ));

    for name in RESERVED_PARAMETER_NAMES {
        let config = StrategyConfig::ema().with_parameter(name, json!(1));
        assert!(
            matches!(config.validate(), Err(ConfigurationError::ReservedParameter { .. })),
            "{}",
            name
        );
    }
    assert!(StrategyConfig::ema().validate().is_ok());
}
