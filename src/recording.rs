//! Recorded landmark streams for offline replay.
//!
//! A recording is JSON lines, one stream update per line:
//!
//! ```text
//! {"t_ms": 33, "stream": "face", "landmarks": [{"x": 0.41, "y": 0.38}, ...]}
//! {"t_ms": 40, "stream": "pose", "landmarks": null}
//! ```
//!
//! `landmarks: null` (or a missing field) is an absent detection.

use crate::{
    landmarks::Landmark,
    pipeline::{FrameOutput, Pipeline},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::time::Duration;

/// Source stream of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Face,
    Pose,
}

/// One recorded stream update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Milliseconds since the start of the recording
    pub t_ms: u64,
    pub stream: StreamKind,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl RecordedEvent {
    /// Session time of the event
    #[must_use]
    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    /// Deliver the event to the matching pipeline callback
    pub fn apply(self, pipeline: &mut Pipeline) -> FrameOutput {
        let now = self.timestamp();
        match self.stream {
            StreamKind::Face => pipeline.on_face(self.landmarks, now),
            StreamKind::Pose => pipeline.on_pose(self.landmarks, now),
        }
    }
}

/// Parse every event of a recording, skipping blank lines
///
/// # Errors
///
/// Returns [`Error::RecordingError`] naming the first malformed line, or an
/// I/O error from the reader.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<RecordedEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line)
            .map_err(|e| Error::RecordingError(format!("line {}: {e}", index + 1)))?;
        events.push(event);
    }
    log::debug!("Read {} recorded events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_read_events() {
        let input = "{\"t_ms\": 0, \"stream\": \"face\", \"landmarks\": null}\n\n{\"t_ms\": 5, \"stream\": \"pose\"}\n";
        let events = read_events(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].stream, StreamKind::Face);
        assert_eq!(events[1].timestamp(), Duration::from_millis(5));
        assert!(events[1].landmarks.is_none());
    }

    #[test]
    fn test_malformed_line_reports_number() {
        let input = "{\"t_ms\": 0, \"stream\": \"face\"}\n{\"t_ms\": \"soon\"}\n";
        let err = read_events(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_unknown_stream_rejected() {
        let input = "{\"t_ms\": 0, \"stream\": \"hands\"}\n";
        assert!(read_events(input.as_bytes()).is_err());
    }

    #[test]
    fn test_apply_routes_by_stream() {
        let mut pipeline = Pipeline::new(&Config::default()).unwrap();
        let event = RecordedEvent {
            t_ms: 10,
            stream: StreamKind::Pose,
            landmarks: None,
        };
        let out = event.apply(&mut pipeline);
        assert!(out.classification.is_absent());
    }
}
