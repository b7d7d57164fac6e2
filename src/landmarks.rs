//! Landmark types and anatomical index tables.
//!
//! Face sets follow the 468-point face mesh layout, optionally refined with
//! ten iris points (478 total). Pose sets follow the 33-point body layout.
//! Indices are given in image terms: "left" is the image-left side, which is
//! the subject's right side on an unmirrored camera.

use crate::{
    constants::{NUM_FACE_LANDMARKS, NUM_FACE_LANDMARKS_REFINED, NUM_POSE_LANDMARKS},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Face mesh anchor indices
pub mod face {
    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;
    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;
    pub const RIGHT_EYE_OUTER: usize = 263;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;

    pub const LEFT_BROW: usize = 105;
    pub const RIGHT_BROW: usize = 334;

    pub const UPPER_LIP_INNER: usize = 13;
    pub const LOWER_LIP_INNER: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;

    pub const NOSE_TIP: usize = 1;
    pub const CHIN: usize = 152;
    pub const LEFT_EAR: usize = 234;
    pub const RIGHT_EAR: usize = 454;

    /// Iris centres, present on the refined tier only
    pub const LEFT_IRIS: usize = 468;
    pub const RIGHT_IRIS: usize = 473;
}

/// Body pose anchor indices
pub mod pose {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
}

/// A single landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 at the image left edge
    pub x: f64,
    /// Vertical position, 0 at the image top edge
    pub y: f64,
    /// Relative depth, 0 when the detector provides none
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    /// Create a landmark without depth
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Create a landmark with depth
    #[must_use]
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Scale all coordinates about the origin
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::with_depth(self.x * factor, self.y * factor, self.z * factor)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Detail level of a face set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceTier {
    /// Face mesh only
    Basic,
    /// Face mesh with iris points
    Refined,
}

/// A validated face landmark set
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
    tier: FaceTier,
}

impl FaceLandmarks {
    /// Detail level of this set
    #[must_use]
    pub fn tier(&self) -> FaceTier {
        self.tier
    }

    /// Whether iris centres are available
    #[must_use]
    pub fn has_iris(&self) -> bool {
        self.tier == FaceTier::Refined
    }

    /// All points in index order
    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Iris centre for one eye, or `fallback` on the basic tier
    #[must_use]
    pub fn iris_or(&self, iris: usize, fallback: usize) -> &Landmark {
        if self.has_iris() {
            &self[iris]
        } else {
            &self[fallback]
        }
    }

    /// Uniformly scaled copy about the image origin
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.scaled(factor)).collect(),
            tier: self.tier,
        }
    }
}

impl TryFrom<Vec<Landmark>> for FaceLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        let tier = match points.len() {
            NUM_FACE_LANDMARKS => FaceTier::Basic,
            NUM_FACE_LANDMARKS_REFINED => FaceTier::Refined,
            n => {
                return Err(Error::InvalidInput(format!(
                    "Expected {NUM_FACE_LANDMARKS} or {NUM_FACE_LANDMARKS_REFINED} face landmarks, got {n}"
                )))
            }
        };
        check_finite(&points)?;
        Ok(Self { points, tier })
    }
}

impl Index<usize> for FaceLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        debug_assert!(
            index < self.points.len(),
            "face landmark {index} outside a {:?} set",
            self.tier
        );
        &self.points[index]
    }
}

/// A validated body pose landmark set
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarks {
    points: Vec<Landmark>,
}

impl PoseLandmarks {
    /// All points in index order
    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Uniformly scaled copy about the image origin
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.scaled(factor)).collect(),
        }
    }
}

impl TryFrom<Vec<Landmark>> for PoseLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        if points.len() != NUM_POSE_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected {NUM_POSE_LANDMARKS} pose landmarks, got {}",
                points.len()
            )));
        }
        check_finite(&points)?;
        Ok(Self { points })
    }
}

impl Index<usize> for PoseLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        debug_assert!(index < self.points.len(), "pose landmark {index} out of range");
        &self.points[index]
    }
}

fn check_finite(points: &[Landmark]) -> Result<()> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(Error::InvalidInput(format!("Non-finite coordinate at landmark {i}"))),
        None => Ok(()),
    }
}
