use super::FeatureFilter;
use crate::features::FeatureVector;

/// Exponential smoothing filter
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<FeatureVector>,
}

impl ExponentialFilter {
    /// # Panics
    ///
    /// Panics if `alpha` is outside `(0, 1]`.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }
}

impl FeatureFilter for ExponentialFilter {
    fn apply(&mut self, sample: &FeatureVector) -> FeatureVector {
        let filtered = match self.last {
            Some(last) => {
                let prev = last.to_array();
                let mut next = sample.to_array();
                for (value, old) in next.iter_mut().zip(prev) {
                    *value = self.alpha * *value + (1.0 - self.alpha) * old;
                }
                FeatureVector::from_array(next)
            }
            None => *sample,
        };

        self.last = Some(filtered);
        filtered
    }

    fn current(&self) -> Option<FeatureVector> {
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}
