//! Debounced history of label-set changes.

use crate::constants::{DEFAULT_DWELL_MS, DEFAULT_TRANSCRIPT_CAPACITY};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// One recorded label-set change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Session time of the change
    pub timestamp: Duration,
    /// Display text of the new label set
    pub text: String,
}

/// Bounded transcript gated on distinct text and minimum dwell time.
///
/// A new entry needs text different from the last recorded one and more than
/// `dwell` elapsed since the last recorded change. The first entry is always
/// accepted.
#[derive(Debug, Clone)]
pub struct TranscriptRecorder {
    entries: VecDeque<TranscriptEntry>,
    capacity: usize,
    dwell: Duration,
    last_text: Option<String>,
    last_change: Option<Duration>,
}

impl Default for TranscriptRecorder {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DWELL_MS), DEFAULT_TRANSCRIPT_CAPACITY)
    }
}

impl TranscriptRecorder {
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(dwell: Duration, capacity: usize) -> Self {
        assert!(capacity > 0, "Transcript capacity must be greater than 0");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            dwell,
            last_text: None,
            last_change: None,
        }
    }

    /// Offer the current display text; returns the entry if one was appended.
    ///
    /// Empty text marks a frame without detection and is never recorded.
    pub fn record(&mut self, text: &str, now: Duration) -> Option<&TranscriptEntry> {
        if text.is_empty() || self.last_text.as_deref() == Some(text) {
            return None;
        }
        if let Some(last) = self.last_change {
            if now.saturating_sub(last) <= self.dwell {
                return None;
            }
        }

        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TranscriptEntry {
            timestamp: now,
            text: text.to_string(),
        });
        self.last_text = Some(text.to_string());
        self.last_change = Some(now);
        log::debug!("Transcript @{}ms: {text}", now.as_millis());

        self.entries.back()
    }

    /// Entries from oldest to newest
    pub fn oldest_first(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    /// Entries from newest to oldest
    pub fn newest_first(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().rev()
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and the debounce state
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_text = None;
        self.last_change = None;
    }
}
