//! Constants used throughout the pipeline

/// Landmarks in a basic-tier face mesh
pub const NUM_FACE_LANDMARKS: usize = 468;

/// Landmarks in a refined-tier face mesh (basic mesh plus 10 iris points)
pub const NUM_FACE_LANDMARKS_REFINED: usize = 478;

/// Landmarks in a body pose set
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Additive floor on every denominator distance
pub const DISTANCE_EPSILON: f64 = 1e-6;

/// Default moving average window for feature smoothing
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Default filter parameters
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;
pub const DEFAULT_MEDIAN_WINDOW: usize = 5;

/// Minimum time a new label set must hold before it is transcribed
pub const DEFAULT_DWELL_MS: u64 = 500;

/// Maximum number of transcript entries kept
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 50;

/// Display text when no label is active
pub const NEUTRAL_TEXT: &str = "neutral";

/// Delimiter between active label descriptions
pub const DEFAULT_LABEL_DELIMITER: &str = ", ";

/// Decimal places for dataset rows
pub const DEFAULT_DATASET_PRECISION: usize = 4;
pub const MIN_DATASET_PRECISION: usize = 2;
pub const MAX_DATASET_PRECISION: usize = 4;
