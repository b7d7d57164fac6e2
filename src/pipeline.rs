//! End-to-end frame processing with a latest-known join of the face and
//! pose streams.
//!
//! The two streams arrive through independent callbacks at their own
//! cadence. Each update stores its own value and recomputes immediately with
//! whatever the other stream last delivered; nothing waits for both streams
//! to agree on a frame.

use crate::{
    classifier::{Classification, HysteresisClassifier},
    config::Config,
    dataset::LabeledSnapshot,
    features::{extract, FeatureVector},
    landmarks::{FaceLandmarks, Landmark, PoseLandmarks},
    smoother::TemporalSmoother,
    transcript::TranscriptRecorder,
    Error, Result,
};
use serde::Serialize;
use std::time::Duration;

/// A stream value with the session time it arrived
#[derive(Debug, Clone)]
struct Stamped<T> {
    value: Option<T>,
    at: Duration,
}

/// Outputs of one recompute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    /// Smoothed features, `None` until a face has been seen
    pub features: Option<FeatureVector>,
    /// Labels for this frame; empty text when no face was available
    pub classification: Classification,
    /// Whether this frame appended a transcript entry
    pub transcript_appended: bool,
}

/// Which stream triggered a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Face,
    Pose,
}

/// Single-owner pipeline state: stream join, smoother, classifier and
/// transcript
pub struct Pipeline {
    face: Option<Stamped<FaceLandmarks>>,
    pose: Option<Stamped<PoseLandmarks>>,
    max_staleness: Option<Duration>,
    smoother: TemporalSmoother,
    classifier: HysteresisClassifier,
    transcript: TranscriptRecorder,
    display_text: String,
}

impl Pipeline {
    /// Create a pipeline from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Initializing pipeline: {} label rules, {} composites, smoothing {}",
            config.classifier.rules.len(),
            config.classifier.composites.len(),
            config.smoothing.filter_spec()
        );
        Ok(Self {
            face: None,
            pose: None,
            max_staleness: config.stream_join.max_staleness(),
            smoother: TemporalSmoother::from_config(&config.smoothing)?,
            classifier: config.classifier.build()?,
            transcript: TranscriptRecorder::new(config.transcript.dwell(), config.transcript.capacity),
            display_text: String::new(),
        })
    }

    /// Face stream callback. `None` means no face was detected.
    pub fn on_face(&mut self, points: Option<Vec<Landmark>>, now: Duration) -> FrameOutput {
        let value = points.and_then(|p| validated(p, "face"));
        self.face = Some(Stamped { value, at: now });
        self.recompute(Stream::Face, now)
    }

    /// Pose stream callback. `None` means no body was detected.
    pub fn on_pose(&mut self, points: Option<Vec<Landmark>>, now: Duration) -> FrameOutput {
        let value = points.and_then(|p| validated(p, "pose"));
        self.pose = Some(Stamped { value, at: now });
        self.recompute(Stream::Pose, now)
    }

    fn recompute(&mut self, trigger: Stream, now: Duration) -> FrameOutput {
        let face = self.fresh(self.face.as_ref(), trigger == Stream::Face, now);
        let pose = self.fresh(self.pose.as_ref(), trigger == Stream::Pose, now);

        let raw = extract(face, pose);
        // Only the face stream counts dropouts towards clearing history
        let features = match (&raw, trigger) {
            (None, Stream::Pose) => self.smoother.current(),
            _ => self.smoother.push(raw.as_ref()),
        };

        let classification = if raw.is_some() {
            self.classifier.classify(features.as_ref())
        } else {
            Classification::absent()
        };

        let transcript_appended = self.transcript.record(&classification.text, now).is_some();
        self.display_text.clone_from(&classification.text);

        FrameOutput {
            features,
            classification,
            transcript_appended,
        }
    }

    /// Latest value of a stream, dropped when it is too old to join with
    /// the stream that just fired
    fn fresh<'a, T>(&self, slot: Option<&'a Stamped<T>>, is_trigger: bool, now: Duration) -> Option<&'a T> {
        let stamped = slot?;
        if !is_trigger {
            if let Some(limit) = self.max_staleness {
                if now.saturating_sub(stamped.at) > limit {
                    log::trace!("Ignoring stream value {}ms old", now.saturating_sub(stamped.at).as_millis());
                    return None;
                }
            }
        }
        stamped.value.as_ref()
    }

    /// Latest smoothed features
    #[must_use]
    pub fn smoothed(&self) -> Option<FeatureVector> {
        self.smoother.current()
    }

    /// Display text of the last recompute; empty when it had no face
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Transcript of label-set changes
    #[must_use]
    pub fn transcript(&self) -> &TranscriptRecorder {
        &self.transcript
    }

    /// Hysteresis state
    #[must_use]
    pub fn classifier(&self) -> &HysteresisClassifier {
        &self.classifier
    }

    /// Latest smoothed features tagged with `label` for the dataset sink
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToSave`] before any face has been smoothed.
    pub fn snapshot(&self, label: &str) -> Result<LabeledSnapshot> {
        let features = self.smoother.current().ok_or(Error::NothingToSave)?;
        Ok(LabeledSnapshot {
            label: label.to_string(),
            features,
        })
    }

    /// Forget stream values, smoothing history, label states and transcript
    pub fn reset(&mut self) {
        log::info!("Resetting pipeline state");
        self.face = None;
        self.pose = None;
        self.smoother.reset();
        self.classifier.reset();
        self.transcript.clear();
        self.display_text.clear();
    }
}

fn validated<T>(points: Vec<Landmark>, stream: &str) -> Option<T>
where
    T: TryFrom<Vec<Landmark>, Error = Error>,
{
    match T::try_from(points) {
        Ok(set) => Some(set),
        Err(e) => {
            log::warn!("Treating malformed {stream} landmarks as absent: {e}");
            None
        }
    }
}
