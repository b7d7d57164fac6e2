use super::FeatureFilter;
use crate::features::FeatureVector;
use std::collections::VecDeque;

/// Moving average filter over the last `window_size` samples
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<FeatureVector>,
}

impl MovingAverageFilter {
    /// # Panics
    ///
    /// Panics if `window_size` is 0.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Number of samples currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no sample is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl FeatureFilter for MovingAverageFilter {
    fn apply(&mut self, sample: &FeatureVector) -> FeatureVector {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(*sample);

        // Buffer holds at least the sample just pushed.
        FeatureVector::mean(&self.buffer).unwrap_or(*sample)
    }

    fn current(&self) -> Option<FeatureVector> {
        FeatureVector::mean(&self.buffer)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;

    fn uniform(value: f64) -> FeatureVector {
        FeatureVector::from_array([value; FEATURE_COUNT])
    }

    #[test]
    fn test_moving_average() {
        let mut filter = MovingAverageFilter::new(3);

        assert_eq!(filter.apply(&uniform(10.0)), uniform(10.0));
        assert_eq!(filter.apply(&uniform(20.0)), uniform(15.0));
        assert_eq!(filter.apply(&uniform(30.0)), uniform(20.0));

        // Window is full, oldest value should be dropped
        assert_eq!(filter.apply(&uniform(40.0)), uniform(30.0));
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn test_fields_are_independent() {
        let mut filter = MovingAverageFilter::new(2);
        let mut a = FeatureVector::default();
        a.mouth_open = 0.2;
        let mut b = FeatureVector::default();
        b.head_roll = 10.0;

        filter.apply(&a);
        let out = filter.apply(&b);
        assert!((out.mouth_open - 0.1).abs() < 1e-12);
        assert!((out.head_roll - 5.0).abs() < 1e-12);
        assert_eq!(out.brow_raise, 0.0);
    }

    #[test]
    fn test_current_and_reset() {
        let mut filter = MovingAverageFilter::new(5);
        assert!(filter.current().is_none());
        filter.apply(&uniform(1.0));
        assert_eq!(filter.current(), Some(uniform(1.0)));
        filter.reset();
        assert!(filter.is_empty());
        assert!(filter.current().is_none());
    }
}
