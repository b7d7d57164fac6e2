//! Configuration management for the detection pipeline

use crate::{
    classifier::{default_composites, default_rules, CompositeRule, HysteresisClassifier, LabelRule},
    constants::{
        DEFAULT_DATASET_PRECISION, DEFAULT_DWELL_MS, DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_LABEL_DELIMITER,
        DEFAULT_SMOOTHING_WINDOW, DEFAULT_TRANSCRIPT_CAPACITY, MAX_DATASET_PRECISION, MIN_DATASET_PRECISION,
        NEUTRAL_TEXT,
    },
    filters::create_filter,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Temporal smoothing
    pub smoothing: SmoothingConfig,

    /// Label rule table and display text
    pub classifier: ClassifierConfig,

    /// Transcript debounce and capacity
    pub transcript: TranscriptConfig,

    /// Face/pose stream join
    pub stream_join: StreamJoinConfig,

    /// Dataset export
    pub dataset: DatasetConfig,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter name: `moving_average`, `median`, `exponential` or `none`
    pub filter: String,

    /// Window size for windowed filters
    pub window: usize,

    /// Alpha for the exponential filter
    pub exponential_alpha: f64,

    /// Consecutive absent frames after which history is cleared; never when
    /// unset
    pub clear_after_missed_frames: Option<usize>,
}

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Separator between active label descriptions
    pub delimiter: String,

    /// Text shown when no label is active
    pub neutral_text: String,

    /// Primitive labels in display priority order
    pub rules: Vec<LabelRule>,

    /// Labels derived from primitive ones
    pub composites: Vec<CompositeRule>,
}

/// Transcript configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Minimum milliseconds between recorded changes
    pub dwell_ms: u64,

    /// Maximum entries kept
    pub capacity: usize,
}

/// Stream join configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamJoinConfig {
    /// Age in milliseconds after which the other stream's last value is
    /// ignored; reused indefinitely when unset
    pub max_staleness_ms: Option<u64>,
}

/// Dataset export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Decimal places for numeric fields (2-4)
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            classifier: ClassifierConfig::default(),
            transcript: TranscriptConfig::default(),
            stream_join: StreamJoinConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "moving_average".to_string(),
            window: DEFAULT_SMOOTHING_WINDOW,
            exponential_alpha: DEFAULT_EXPONENTIAL_ALPHA,
            clear_after_missed_frames: None,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_LABEL_DELIMITER.to_string(),
            neutral_text: NEUTRAL_TEXT.to_string(),
            rules: default_rules(),
            composites: default_composites(),
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            capacity: DEFAULT_TRANSCRIPT_CAPACITY,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_DATASET_PRECISION,
        }
    }
}

impl SmoothingConfig {
    /// Filter specifier understood by [`create_filter`]
    #[must_use]
    pub fn filter_spec(&self) -> String {
        match self.filter.to_lowercase().as_str() {
            "exponential" => format!("exponential:{}", self.exponential_alpha),
            "none" | "nofilter" => "none".to_string(),
            name => format!("{name}:{}", self.window),
        }
    }
}

impl ClassifierConfig {
    /// Build the classifier described by this table
    ///
    /// # Errors
    ///
    /// Returns an error if the rule table is inconsistent.
    pub fn build(&self) -> Result<HysteresisClassifier> {
        Ok(HysteresisClassifier::new(self.rules.clone(), self.composites.clone())?
            .with_text(&self.delimiter, &self.neutral_text))
    }
}

impl TranscriptConfig {
    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

impl StreamJoinConfig {
    #[must_use]
    pub fn max_staleness(&self) -> Option<Duration> {
        self.max_staleness_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        // Validate smoothing parameters
        if self.smoothing.window == 0 {
            return Err(Error::ConfigError("Smoothing window must be greater than 0".to_string()));
        }
        if self.smoothing.clear_after_missed_frames == Some(0) {
            return Err(Error::ConfigError(
                "clear_after_missed_frames must be greater than 0 when set".to_string(),
            ));
        }
        create_filter(&self.smoothing.filter_spec()).map_err(|e| Error::ConfigError(e.to_string()))?;

        // Validate rule table
        if self.classifier.rules.is_empty() {
            return Err(Error::ConfigError("At least one label rule is required".to_string()));
        }
        self.classifier.build().map_err(|e| Error::ConfigError(e.to_string()))?;

        // Validate transcript settings
        if self.transcript.capacity == 0 {
            return Err(Error::ConfigError("Transcript capacity must be greater than 0".to_string()));
        }

        // Validate dataset settings
        if !(MIN_DATASET_PRECISION..=MAX_DATASET_PRECISION).contains(&self.dataset.precision) {
            return Err(Error::ConfigError(format!(
                "Dataset precision must be between {MIN_DATASET_PRECISION} and {MAX_DATASET_PRECISION}"
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Non-manual feature detection configuration

# Temporal smoothing
smoothing:
  filter: "moving_average"
  window: 5
  exponential_alpha: 0.5
  # Clear history after this many frames without a face (unset = never)
  clear_after_missed_frames: null

# Label rules, in display priority order.
# direction "high" activates above enter, "low" below enter.
# exit must be strictly less extreme than enter.
classifier:
  delimiter: ", "
  neutral_text: "neutral"
  rules:
    - { id: eyes-closed, description: "eyes closed", feature: eyeOpenness, direction: low, enter: 0.04, exit: 0.06 }
    - { id: brows-raised, description: "eyebrows raised", feature: browRaise, direction: high, enter: 0.12, exit: 0.10 }
    - { id: brow-furrow, description: "brow furrow", feature: browAsymmetry, direction: high, enter: 0.04, exit: 0.03 }
    - { id: mouth-open, description: "mouth open", feature: mouthOpen, direction: high, enter: 0.08, exit: 0.06 }
    - { id: smile, description: "smile", feature: smileMetric, direction: high, enter: 0.62, exit: 0.58 }
    - { id: head-tilt-left, description: "head tilt left", feature: headRoll, direction: low, enter: -10.0, exit: -7.0, exclusive_with: head-tilt-right }
    - { id: head-tilt-right, description: "head tilt right", feature: headRoll, direction: high, enter: 10.0, exit: 7.0, exclusive_with: head-tilt-left }
    - { id: head-down, description: "head nod down", feature: headNod, direction: high, enter: 0.80, exit: 0.75, exclusive_with: head-up }
    - { id: head-up, description: "head nod up", feature: headNod, direction: low, enter: 0.55, exit: 0.60, exclusive_with: head-down }
    - { id: head-turn-left, description: "head turn left", feature: headYaw, direction: low, enter: -0.12, exit: -0.08, exclusive_with: head-turn-right }
    - { id: head-turn-right, description: "head turn right", feature: headYaw, direction: high, enter: 0.12, exit: 0.08, exclusive_with: head-turn-left }
    - { id: gaze-left, description: "gaze left", feature: gazeMetric, direction: low, enter: -0.03, exit: -0.02, exclusive_with: gaze-right }
    - { id: gaze-right, description: "gaze right", feature: gazeMetric, direction: high, enter: 0.03, exit: 0.02, exclusive_with: gaze-left }
    - { id: lean-left, description: "leaning left", feature: torsoSway, direction: low, enter: -0.15, exit: -0.10, exclusive_with: lean-right }
    - { id: lean-right, description: "leaning right", feature: torsoSway, direction: high, enter: 0.15, exit: 0.10, exclusive_with: lean-left }
  composites:
    - { id: surprise, description: "surprise", all_of: [brows-raised, mouth-open] }

# Transcript debounce
transcript:
  dwell_ms: 500
  capacity: 50

# Face/pose stream join (unset = reuse the other stream's last value forever)
stream_join:
  max_staleness_ms: null

# Dataset export
dataset:
  precision: 4
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("transcript:\n  dwell_ms: 250\n").unwrap();
        assert_eq!(config.transcript.dwell_ms, 250);
        assert_eq!(config.transcript.capacity, DEFAULT_TRANSCRIPT_CAPACITY);
        assert_eq!(config.classifier.rules.len(), default_rules().len());
    }

    #[test]
    fn test_filter_spec() {
        let mut smoothing = SmoothingConfig::default();
        assert_eq!(smoothing.filter_spec(), "moving_average:5");
        smoothing.filter = "exponential".to_string();
        smoothing.exponential_alpha = 0.25;
        assert_eq!(smoothing.filter_spec(), "exponential:0.25");
        smoothing.filter = "none".to_string();
        assert_eq!(smoothing.filter_spec(), "none");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.smoothing.window = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.filter = "median".to_string();
        config.smoothing.window = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcript.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dataset.precision = 6;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.rules[0].exit = config.classifier.rules[0].enter;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.rules.clear();
        config.classifier.composites.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_feature_fails_to_parse() {
        let yaml = "classifier:\n  rules:\n    - { id: x, description: x, feature: noSuchFeature, direction: high, enter: 1.0, exit: 0.5 }\n";
        assert!(Config::from_yaml(yaml).is_err());
    }
}
