//! Signal filtering algorithms for smoothing feature vectors.
//!
//! Every filter works field by field on a [`FeatureVector`] and keeps its own
//! history. The temporal smoother owns one filter as a trait object so the
//! smoothing strategy is a configuration choice.

/// Moving average filter, the default smoothing strategy
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

/// Exponential filter for responsive smoothing
pub mod exponential;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_MEDIAN_WINDOW, DEFAULT_SMOOTHING_WINDOW},
    features::FeatureVector,
    Error, Result,
};

/// Trait for all feature filters
pub trait FeatureFilter: Send + Sync {
    /// Feed one sample and return the filtered vector
    fn apply(&mut self, sample: &FeatureVector) -> FeatureVector;

    /// Current filtered vector, `None` before the first sample
    fn current(&self) -> Option<FeatureVector>;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes samples through unchanged
#[derive(Default)]
pub struct NoFilter {
    last: Option<FeatureVector>,
}

impl FeatureFilter for NoFilter {
    fn apply(&mut self, sample: &FeatureVector) -> FeatureVector {
        self.last = Some(*sample);
        *sample
    }

    fn current(&self) -> Option<FeatureVector> {
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a filter from a specifier such as `moving_average:5`.
///
/// Accepted names are `none`, `moving_average`, `median` and `exponential`,
/// each optionally followed by `:` and its parameter (window size or alpha).
///
/// # Errors
///
/// Returns [`Error::FilterError`] for an unknown name, an unparsable
/// parameter, or a parameter outside the filter's valid range.
pub fn create_filter(spec: &str) -> Result<Box<dyn FeatureFilter>> {
    let lowered = spec.trim().to_lowercase();
    let (name, param) = match lowered.split_once(':') {
        Some((name, param)) => (name, Some(param)),
        None => (lowered.as_str(), None),
    };

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter::default())),
        "moving_average" | "movingaverage" => {
            let window = parse_window(param, DEFAULT_SMOOTHING_WINDOW)?;
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
        }
        "median" => {
            let window = parse_window(param, DEFAULT_MEDIAN_WINDOW)?;
            if window % 2 == 0 {
                return Err(Error::FilterError(format!("Median window must be odd, got {window}")));
            }
            Ok(Box::new(median::MedianFilter::new(window)))
        }
        "exponential" => {
            let alpha = match param {
                Some(p) => p
                    .parse::<f64>()
                    .map_err(|_| Error::FilterError(format!("Invalid exponential alpha: {p}")))?,
                None => DEFAULT_EXPONENTIAL_ALPHA,
            };
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {spec}"))),
    }
}

fn parse_window(param: Option<&str>, default: usize) -> Result<usize> {
    let window = match param {
        Some(p) => p
            .parse::<usize>()
            .map_err(|_| Error::FilterError(format!("Invalid window size: {p}")))?,
        None => default,
    };
    if window == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    Ok(window)
}
