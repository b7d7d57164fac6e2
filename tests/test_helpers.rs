//! Synthetic landmark sets shared by the integration tests

#![allow(dead_code)]

use nmf_detection::{
    constants::{NUM_FACE_LANDMARKS, NUM_FACE_LANDMARKS_REFINED, NUM_POSE_LANDMARKS},
    landmarks::{face, pose, Landmark},
};
use std::time::Duration;

/// Session time in milliseconds
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Builder for a frontal face with an inter-ocular distance of 0.2
#[derive(Clone)]
pub struct FaceBuilder {
    points: Vec<Landmark>,
}

impl FaceBuilder {
    /// Neutral expression: eyes open, brows resting, mouth closed
    pub fn neutral() -> Self {
        Self::with_count(NUM_FACE_LANDMARKS)
    }

    /// Neutral expression with iris points centred in each eye
    pub fn refined() -> Self {
        let mut builder = Self::with_count(NUM_FACE_LANDMARKS_REFINED);
        builder.points[face::LEFT_IRIS] = Landmark::new(0.43, 0.40);
        builder.points[face::RIGHT_IRIS] = Landmark::new(0.57, 0.40);
        builder
    }

    fn with_count(count: usize) -> Self {
        let mut p = vec![Landmark::new(0.5, 0.5); count];
        p[face::LEFT_EYE_OUTER] = Landmark::new(0.40, 0.40);
        p[face::RIGHT_EYE_OUTER] = Landmark::new(0.60, 0.40);
        p[face::LEFT_EYE_INNER] = Landmark::new(0.46, 0.40);
        p[face::RIGHT_EYE_INNER] = Landmark::new(0.54, 0.40);
        p[face::LEFT_EYE_TOP] = Landmark::new(0.43, 0.39);
        p[face::LEFT_EYE_BOTTOM] = Landmark::new(0.43, 0.41);
        p[face::RIGHT_EYE_TOP] = Landmark::new(0.57, 0.39);
        p[face::RIGHT_EYE_BOTTOM] = Landmark::new(0.57, 0.41);
        p[face::LEFT_BROW] = Landmark::new(0.43, 0.382);
        p[face::RIGHT_BROW] = Landmark::new(0.57, 0.382);
        p[face::UPPER_LIP_INNER] = Landmark::new(0.50, 0.545);
        p[face::LOWER_LIP_INNER] = Landmark::new(0.50, 0.550);
        p[face::MOUTH_LEFT] = Landmark::new(0.445, 0.55);
        p[face::MOUTH_RIGHT] = Landmark::new(0.555, 0.55);
        p[face::NOSE_TIP] = Landmark::new(0.50, 0.48);
        p[face::CHIN] = Landmark::new(0.50, 0.62);
        p[face::LEFT_EAR] = Landmark::new(0.33, 0.45);
        p[face::RIGHT_EAR] = Landmark::new(0.67, 0.45);
        Self { points: p }
    }

    /// Brow-to-eye-centre gap as a ratio of inter-ocular distance
    pub fn brow_raise(mut self, ratio: f64) -> Self {
        let gap = ratio * 0.2;
        self.points[face::LEFT_BROW].y = 0.40 - gap;
        self.points[face::RIGHT_BROW].y = 0.40 - gap;
        self
    }

    /// Inner lip gap as a ratio of inter-ocular distance
    pub fn mouth_open(mut self, ratio: f64) -> Self {
        self.points[face::LOWER_LIP_INNER].y = self.points[face::UPPER_LIP_INNER].y + ratio * 0.2;
        self
    }

    /// Eyelid gap as a ratio of inter-ocular distance
    pub fn eye_openness(mut self, ratio: f64) -> Self {
        let half = ratio * 0.2 / 2.0;
        for (top, bottom) in [
            (face::LEFT_EYE_TOP, face::LEFT_EYE_BOTTOM),
            (face::RIGHT_EYE_TOP, face::RIGHT_EYE_BOTTOM),
        ] {
            self.points[top].y = 0.40 - half;
            self.points[bottom].y = 0.40 + half;
        }
        self
    }

    /// Rotate the whole face in the image plane about its centre
    pub fn roll(mut self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (cx, cy) = (0.5, 0.45);
        for p in &mut self.points {
            let (dx, dy) = (p.x - cx, p.y - cy);
            p.x = cx + dx * cos - dy * sin;
            p.y = cy + dx * sin + dy * cos;
        }
        self
    }

    pub fn build(self) -> Vec<Landmark> {
        self.points
    }
}

/// Upright torso below the face
pub fn upright_pose() -> Vec<Landmark> {
    leaning_pose(0.0)
}

/// Torso whose shoulders are shifted sideways by `shift` relative to the hips
pub fn leaning_pose(shift: f64) -> Vec<Landmark> {
    let mut p = vec![Landmark::new(0.5, 0.9); NUM_POSE_LANDMARKS];
    p[pose::LEFT_SHOULDER] = Landmark::new(0.35 + shift, 0.70);
    p[pose::RIGHT_SHOULDER] = Landmark::new(0.65 + shift, 0.70);
    p[pose::LEFT_HIP] = Landmark::new(0.40, 1.10);
    p[pose::RIGHT_HIP] = Landmark::new(0.60, 1.10);
    p
}
