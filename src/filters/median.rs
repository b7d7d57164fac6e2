use super::FeatureFilter;
use crate::features::{FeatureVector, FEATURE_COUNT};
use std::collections::VecDeque;

/// Median filter
pub struct MedianFilter {
    window_size: usize,
    buffer: VecDeque<FeatureVector>,
}

impl MedianFilter {
    /// # Panics
    ///
    /// Panics if `window_size` is 0 or even.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        assert!(window_size % 2 == 1, "Median filter window size must be odd");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn calculate_median(values: &mut [f64]) -> f64 {
        values.sort_by(f64::total_cmp);

        let len = values.len();
        if len == 0 {
            0.0
        } else if len % 2 == 0 {
            (values[len / 2 - 1] + values[len / 2]) / 2.0
        } else {
            values[len / 2]
        }
    }

    fn median_vector(&self) -> Option<FeatureVector> {
        if self.buffer.is_empty() {
            return None;
        }
        let mut columns: [Vec<f64>; FEATURE_COUNT] = std::array::from_fn(|_| Vec::with_capacity(self.buffer.len()));
        for sample in &self.buffer {
            for (column, value) in columns.iter_mut().zip(sample.to_array()) {
                column.push(value);
            }
        }
        Some(FeatureVector::from_array(columns.map(|mut c| Self::calculate_median(&mut c))))
    }
}

impl FeatureFilter for MedianFilter {
    fn apply(&mut self, sample: &FeatureVector) -> FeatureVector {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(*sample);

        self.median_vector().unwrap_or(*sample)
    }

    fn current(&self) -> Option<FeatureVector> {
        self.median_vector()
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MedianFilter"
    }
}
