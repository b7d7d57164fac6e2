//! Geometric feature extraction from landmark sets.
//!
//! Every distance-based feature is divided by the inter-ocular distance
//! (outer eye corner to outer eye corner) so that thresholds do not depend on
//! how far the subject sits from the camera.

use crate::{
    geometry::{angle_degrees, distance, midpoint, ratio},
    landmarks::{face, pose, FaceLandmarks, PoseLandmarks},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of scalar features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 11;

/// Feature identifiers, in dataset column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Mean eyelid gap
    EyeOpenness,
    /// Mean brow height above the eye centre
    BrowRaise,
    /// Inner lip gap
    MouthOpen,
    /// Eye line angle in degrees
    HeadRoll,
    /// Chin below nose tip
    HeadNod,
    /// Nose tip offset from the ear midpoint
    HeadYaw,
    /// Difference between left and right brow heights
    BrowAsymmetry,
    /// Mouth corner-to-corner width
    SmileMetric,
    /// Iris offset from the eye centre
    GazeMetric,
    /// Hip midpoint below shoulder midpoint
    TorsoLean,
    /// Sideways tilt of the torso axis
    TorsoSway,
}

impl Feature {
    /// All features in column order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::EyeOpenness,
        Feature::BrowRaise,
        Feature::MouthOpen,
        Feature::HeadRoll,
        Feature::HeadNod,
        Feature::HeadYaw,
        Feature::BrowAsymmetry,
        Feature::SmileMetric,
        Feature::GazeMetric,
        Feature::TorsoLean,
        Feature::TorsoSway,
    ];

    /// Column name of the feature
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Feature::EyeOpenness => "eyeOpenness",
            Feature::BrowRaise => "browRaise",
            Feature::MouthOpen => "mouthOpen",
            Feature::HeadRoll => "headRoll",
            Feature::HeadNod => "headNod",
            Feature::HeadYaw => "headYaw",
            Feature::BrowAsymmetry => "browAsymmetry",
            Feature::SmileMetric => "smileMetric",
            Feature::GazeMetric => "gazeMetric",
            Feature::TorsoLean => "torsoLean",
            Feature::TorsoSway => "torsoSway",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named scalar features computed from one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub eye_openness: f64,
    pub brow_raise: f64,
    pub mouth_open: f64,
    pub head_roll: f64,
    pub head_nod: f64,
    pub head_yaw: f64,
    pub brow_asymmetry: f64,
    pub smile_metric: f64,
    pub gaze_metric: f64,
    pub torso_lean: f64,
    pub torso_sway: f64,
}

impl FeatureVector {
    /// Value of one feature
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::EyeOpenness => self.eye_openness,
            Feature::BrowRaise => self.brow_raise,
            Feature::MouthOpen => self.mouth_open,
            Feature::HeadRoll => self.head_roll,
            Feature::HeadNod => self.head_nod,
            Feature::HeadYaw => self.head_yaw,
            Feature::BrowAsymmetry => self.brow_asymmetry,
            Feature::SmileMetric => self.smile_metric,
            Feature::GazeMetric => self.gaze_metric,
            Feature::TorsoLean => self.torso_lean,
            Feature::TorsoSway => self.torso_sway,
        }
    }

    /// Values in column order
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Build from values in column order
    #[must_use]
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [eye_openness, brow_raise, mouth_open, head_roll, head_nod, head_yaw, brow_asymmetry, smile_metric, gaze_metric, torso_lean, torso_sway] =
            values;
        Self {
            eye_openness,
            brow_raise,
            mouth_open,
            head_roll,
            head_nod,
            head_yaw,
            brow_asymmetry,
            smile_metric,
            gaze_metric,
            torso_lean,
            torso_sway,
        }
    }

    /// Field-wise arithmetic mean; `None` for an empty input
    pub fn mean<'a, I>(vectors: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut sum = [0.0; FEATURE_COUNT];
        let mut count = 0usize;
        for v in vectors {
            for (acc, value) in sum.iter_mut().zip(v.to_array()) {
                *acc += value;
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)] // window sizes are small
        let n = count as f64;
        Some(Self::from_array(sum.map(|s| s / n)))
    }

    /// Whether every value is finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Compute the feature vector for one frame.
///
/// Returns `None` when no face is available; a pose set alone carries no
/// face-anchored scale reference. Torso features are 0 without a pose set.
#[must_use]
pub fn extract(face: Option<&FaceLandmarks>, pose: Option<&PoseLandmarks>) -> Option<FeatureVector> {
    let lm = face?;

    let left_outer = &lm[face::LEFT_EYE_OUTER];
    let right_outer = &lm[face::RIGHT_EYE_OUTER];
    let iod = distance(left_outer, right_outer);

    let left_lid_gap = distance(&lm[face::LEFT_EYE_TOP], &lm[face::LEFT_EYE_BOTTOM]);
    let right_lid_gap = distance(&lm[face::RIGHT_EYE_TOP], &lm[face::RIGHT_EYE_BOTTOM]);

    // Image y grows downward: brow above the eye gives a positive gap.
    let left_eye_centre = midpoint(&lm[face::LEFT_EYE_TOP], &lm[face::LEFT_EYE_BOTTOM]);
    let right_eye_centre = midpoint(&lm[face::RIGHT_EYE_TOP], &lm[face::RIGHT_EYE_BOTTOM]);
    let left_brow = left_eye_centre.y - lm[face::LEFT_BROW].y;
    let right_brow = right_eye_centre.y - lm[face::RIGHT_BROW].y;

    let lip_gap = distance(&lm[face::UPPER_LIP_INNER], &lm[face::LOWER_LIP_INNER]);
    let mouth_width = distance(&lm[face::MOUTH_LEFT], &lm[face::MOUTH_RIGHT]);

    let nose = &lm[face::NOSE_TIP];
    let ear_mid = midpoint(&lm[face::LEFT_EAR], &lm[face::RIGHT_EAR]);

    let left_gaze = lm.iris_or(face::LEFT_IRIS, face::LEFT_EYE_OUTER).x
        - midpoint(left_outer, &lm[face::LEFT_EYE_INNER]).x;
    let right_gaze = lm.iris_or(face::RIGHT_IRIS, face::RIGHT_EYE_OUTER).x
        - midpoint(right_outer, &lm[face::RIGHT_EYE_INNER]).x;

    let (torso_lean, torso_sway) = pose.map_or((0.0, 0.0), |p| torso_metrics(p, iod));

    let features = FeatureVector {
        eye_openness: ratio((left_lid_gap + right_lid_gap) / 2.0, iod),
        brow_raise: ratio((left_brow + right_brow) / 2.0, iod),
        mouth_open: ratio(lip_gap, iod),
        head_roll: angle_degrees(left_outer, right_outer),
        head_nod: ratio(lm[face::CHIN].y - nose.y, iod),
        head_yaw: ratio(nose.x - ear_mid.x, iod),
        brow_asymmetry: ratio((left_brow - right_brow).abs(), iod),
        smile_metric: ratio(mouth_width, iod),
        gaze_metric: ratio((left_gaze + right_gaze) / 2.0, iod),
        torso_lean,
        torso_sway,
    };
    debug_assert!(features.is_finite(), "non-finite features from validated landmarks");
    Some(features)
}

/// `(lean, sway)` for a pose set
fn torso_metrics(p: &PoseLandmarks, iod: f64) -> (f64, f64) {
    let shoulders = midpoint(&p[pose::LEFT_SHOULDER], &p[pose::RIGHT_SHOULDER]);
    let hips = midpoint(&p[pose::LEFT_HIP], &p[pose::RIGHT_HIP]);
    let vertical = hips.y - shoulders.y;
    let lean = ratio(vertical, iod);
    let sway = ratio(shoulders.x - hips.x, vertical.abs());
    (lean, sway)
}
