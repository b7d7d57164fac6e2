//! Planar geometry helpers for landmark measurements.
//!
//! All measurements operate on the x/y projection of a landmark. Depth is
//! carried by [`Landmark`] but ignored here.

use crate::{constants::DISTANCE_EPSILON, landmarks::Landmark};

/// Euclidean distance between two landmarks on the image plane
#[must_use]
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Midpoint of two landmarks on the image plane
#[must_use]
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    Landmark::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Angle in degrees of the line `a -> b` relative to the image horizontal.
///
/// Image y grows downward, so a positive angle means `b` sits lower than `a`.
#[must_use]
pub fn angle_degrees(a: &Landmark, b: &Landmark) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Divide by a distance with the epsilon floor applied.
///
/// `denominator` is expected to be a non-negative distance.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / (denominator + DISTANCE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(3.0, 4.0);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-12);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_ignores_depth() {
        let a = Landmark::with_depth(0.1, 0.1, -0.5);
        let b = Landmark::with_depth(0.1, 0.1, 0.5);
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(&Landmark::new(0.2, 0.4), &Landmark::new(0.4, 0.8));
        assert!((m.x - 0.3).abs() < 1e-12);
        assert!((m.y - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_angle_degrees() {
        let origin = Landmark::new(0.0, 0.0);
        assert!(angle_degrees(&origin, &Landmark::new(1.0, 0.0)).abs() < 1e-12);
        assert!((angle_degrees(&origin, &Landmark::new(1.0, 1.0)) - 45.0).abs() < 1e-9);
        assert!((angle_degrees(&origin, &Landmark::new(1.0, -1.0)) + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        let r = ratio(0.5, 0.0);
        assert!(r.is_finite());
        assert!((ratio(1.0, 2.0) - 0.5).abs() < 1e-6);
    }
}
