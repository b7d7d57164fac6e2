//! Temporal smoothing of feature vectors across frames.

use crate::{
    config::SmoothingConfig,
    features::FeatureVector,
    filters::{create_filter, moving_average::MovingAverageFilter, FeatureFilter},
    Result,
};

/// Rolling smoother with a detection-dropout policy.
///
/// An absent frame leaves history untouched so single-frame dropouts do not
/// reset the average. With `clear_after_missed` set, that many consecutive
/// absent frames clear the history instead.
pub struct TemporalSmoother {
    filter: Box<dyn FeatureFilter>,
    clear_after_missed: Option<usize>,
    missed: usize,
}

impl TemporalSmoother {
    /// Moving average smoother over `window` frames that never clears on
    /// dropouts
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self::with_filter(Box::new(MovingAverageFilter::new(window)), None)
    }

    /// Smoother around an arbitrary filter
    #[must_use]
    pub fn with_filter(filter: Box<dyn FeatureFilter>, clear_after_missed: Option<usize>) -> Self {
        Self {
            filter,
            clear_after_missed,
            missed: 0,
        }
    }

    /// Build from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured filter specifier is invalid.
    pub fn from_config(config: &SmoothingConfig) -> Result<Self> {
        let filter = create_filter(&config.filter_spec())?;
        log::debug!("Smoothing with {}", filter.name());
        Ok(Self::with_filter(filter, config.clear_after_missed_frames))
    }

    /// Feed one frame's features and return the smoothed vector.
    ///
    /// Returns `None` only when no history exists.
    pub fn push(&mut self, vector: Option<&FeatureVector>) -> Option<FeatureVector> {
        match vector {
            Some(v) => {
                self.missed = 0;
                Some(self.filter.apply(v))
            }
            None => {
                self.missed = self.missed.saturating_add(1);
                if let Some(limit) = self.clear_after_missed {
                    if self.missed >= limit && self.filter.current().is_some() {
                        log::debug!("Clearing smoothing history after {} missed frames", self.missed);
                        self.filter.reset();
                    }
                }
                self.filter.current()
            }
        }
    }

    /// Current smoothed vector without feeding a frame
    #[must_use]
    pub fn current(&self) -> Option<FeatureVector> {
        self.filter.current()
    }

    /// Consecutive absent frames seen since the last present one
    #[must_use]
    pub fn missed_frames(&self) -> usize {
        self.missed
    }

    /// Drop all history
    pub fn reset(&mut self) {
        self.filter.reset();
        self.missed = 0;
    }
}
