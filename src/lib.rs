//! Non-manual feature detection from facial and body landmark streams.
//!
//! This library turns per-frame landmark sets from an external detector into
//! human-readable labels for non-manual signing features such as raised
//! eyebrows, an open mouth, head tilts and nods, gaze direction and torso
//! lean.
//!
//! The processing pipeline consists of:
//! 1. Geometric feature extraction, normalized by inter-ocular distance
//! 2. Temporal smoothing over a short rolling window
//! 3. Hysteresis classification against a configurable rule table
//! 4. A debounced transcript of label-set changes
//!
//! # Examples
//!
//! ## Driving the pipeline
//!
//! ```no_run
//! use nmf_detection::{config::Config, landmarks::Landmark, pipeline::Pipeline};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = Pipeline::new(&Config::default())?;
//!
//! // Landmarks from the face and pose detectors, delivered independently
//! let face: Vec<Landmark> = vec![Landmark::new(0.5, 0.5); 468];
//! let pose: Vec<Landmark> = vec![Landmark::new(0.5, 0.5); 33];
//!
//! pipeline.on_pose(Some(pose), Duration::from_millis(0));
//! let output = pipeline.on_face(Some(face), Duration::from_millis(16));
//! println!("{}", output.classification.text);
//!
//! for entry in pipeline.transcript().newest_first() {
//!     println!("{:>6}ms  {}", entry.timestamp.as_millis(), entry.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Saving a labeled sample
//!
//! ```no_run
//! use nmf_detection::{config::Config, dataset::DatasetWriter, pipeline::Pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(&Config::default())?;
//! let mut corpus = DatasetWriter::append_to_path("corpus.csv")?;
//! match pipeline.snapshot("eyebrows raised") {
//!     Ok(snapshot) => corpus.write(&snapshot)?,
//!     Err(nmf_detection::Error::NothingToSave) => println!("no face seen yet"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

/// Hysteresis label classification
pub mod classifier;

/// Configuration management
pub mod config;

/// Constants used throughout the pipeline
pub mod constants;

/// CSV serialization of labeled feature snapshots
pub mod dataset;

/// Error types and result handling
pub mod error;

/// Feature extraction from landmark sets
pub mod features;

/// Signal filtering algorithms for smoothing feature vectors
pub mod filters;

/// Planar geometry helpers
pub mod geometry;

/// Landmark types and index tables
pub mod landmarks;

/// Stream join and per-frame processing
pub mod pipeline;

/// Recorded landmark streams for replay
pub mod recording;

/// Temporal smoothing
pub mod smoother;

/// Debounced label transcript
pub mod transcript;

pub use error::{Error, Result};
