//! Configuration file loading and validation

use nmf_detection::{
    classifier::{Direction, LabelRule},
    config::{Config, EXAMPLE_CONFIG},
    features::Feature,
    pipeline::Pipeline,
    Error,
};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.smoothing.filter = "median".to_string();
    config.smoothing.window = 7;
    config.transcript.dwell_ms = 250;
    config.stream_join.max_staleness_ms = Some(120);
    config.dataset.precision = 2;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.transcript.dwell(), Duration::from_millis(250));
    assert_eq!(loaded.stream_join.max_staleness(), Some(Duration::from_millis(120)));
    assert!(Pipeline::new(&loaded).is_ok());
}

#[test]
fn test_example_config_loads() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.classifier.rules.len(), 15);
}

#[test]
fn test_partial_file_uses_defaults() {
    let yaml = "transcript:\n  dwell_ms: 800\n";
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.transcript.dwell_ms, 800);
    assert_eq!(config.transcript.capacity, 50);
    assert_eq!(config.smoothing, Config::default().smoothing);
    assert_eq!(config.classifier, Config::default().classifier);
}

#[test]
fn test_custom_rule_table() {
    let yaml = r#"
classifier:
  delimiter: " + "
  neutral_text: "-"
  rules:
    - id: open
      description: open mouth
      feature: mouthOpen
      direction: high
      enter: 0.2
      exit: 0.15
    - id: wide
      description: wide mouth
      feature: smileMetric
      direction: high
      enter: 0.7
      exit: 0.6
  composites:
    - id: grin
      description: big grin
      all_of: [open, wide]
"#;
    let config = Config::from_yaml(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(
        config.classifier.rules[0],
        LabelRule::new("open", "open mouth", Feature::MouthOpen, Direction::High, 0.2, 0.15)
    );

    let mut classifier = config.classifier.build().unwrap();
    assert_eq!(classifier.classify(None).text, "");
    let mut values = [0.0; nmf_detection::features::FEATURE_COUNT];
    values[2] = 0.3;
    values[7] = 0.8;
    let out = classifier.classify(Some(&nmf_detection::features::FeatureVector::from_array(values)));
    assert_eq!(out.text, "open mouth + wide mouth + big grin");
}

#[test]
fn test_one_sided_exclusion_rejected() {
    let yaml = r#"
classifier:
  rules:
    - id: left
      description: tilt left
      feature: headRoll
      direction: low
      enter: -10.0
      exit: -7.0
      exclusive_with: right
    - id: right
      description: tilt right
      feature: headRoll
      direction: high
      enter: 10.0
      exit: 7.0
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    assert!(Pipeline::new(&config).is_err());
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "smoothing: [this is not a map").unwrap();
    assert!(matches!(Config::from_file(&path), Err(Error::ConfigError(_))));

    std::fs::write(&path, "classifier:\n  rules:\n    - id: x\n      feature: noseWiggle\n").unwrap();
    assert!(matches!(Config::from_file(&path), Err(Error::ConfigError(_))));
}

#[test]
fn test_invalid_values_rejected() {
    let cases: Vec<(&str, fn(&mut Config))> = vec![
        ("window", |c: &mut Config| c.smoothing.window = 0),
        ("filter", |c: &mut Config| c.smoothing.filter = "kalman".to_string()),
        ("median even", |c: &mut Config| {
            c.smoothing.filter = "median".to_string();
            c.smoothing.window = 4;
        }),
        ("alpha", |c: &mut Config| {
            c.smoothing.filter = "exponential".to_string();
            c.smoothing.exponential_alpha = 0.0;
        }),
        ("clear", |c: &mut Config| c.smoothing.clear_after_missed_frames = Some(0)),
        ("rules", |c: &mut Config| c.classifier.rules.clear()),
        ("thresholds", |c: &mut Config| c.classifier.rules[0].exit = c.classifier.rules[0].enter),
        ("capacity", |c: &mut Config| c.transcript.capacity = 0),
        ("precision low", |c: &mut Config| c.dataset.precision = 1),
        ("precision high", |c: &mut Config| c.dataset.precision = 5),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(Error::ConfigError(_))),
            "{name} should be rejected"
        );
        assert!(Pipeline::new(&config).is_err(), "{name}");
    }
}
