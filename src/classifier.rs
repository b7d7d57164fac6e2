//! Hysteresis classification of smoothed features into discrete labels.
//!
//! Each label owns one boolean flag and two thresholds. A label switches on
//! when its value crosses `enter` and only switches off again once the value
//! comes back past `exit`, which lies strictly inside `enter`. Values in the
//! dead zone between the two never change the flag.

use crate::{
    constants::{DEFAULT_LABEL_DELIMITER, NEUTRAL_TEXT},
    features::{Feature, FeatureVector},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side of the thresholds activates a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Active above `enter`, released below `exit`
    High,
    /// Active below `enter`, released above `exit`
    Low,
}

/// How the feature value is derived before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    /// Raw feature value
    #[default]
    Value,
    /// Absolute feature value
    Abs,
}

/// One thresholded label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    /// Stable identifier, e.g. `mouth-open`
    pub id: String,
    /// Text shown when the label is active
    pub description: String,
    /// Feature the rule reads
    pub feature: Feature,
    /// Triggering side
    pub direction: Direction,
    /// Activation threshold
    pub enter: f64,
    /// Release threshold
    pub exit: f64,
    /// Value derivation
    #[serde(default)]
    pub combine: Combine,
    /// Label cleared when this one activates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_with: Option<String>,
}

impl LabelRule {
    /// Rule with raw value comparison and no exclusive partner
    #[must_use]
    pub fn new(id: &str, description: &str, feature: Feature, direction: Direction, enter: f64, exit: f64) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            feature,
            direction,
            enter,
            exit,
            combine: Combine::Value,
            exclusive_with: None,
        }
    }

    /// Set the mutually exclusive partner label
    #[must_use]
    pub fn exclusive_with(mut self, other: &str) -> Self {
        self.exclusive_with = Some(other.to_string());
        self
    }

    /// Compare on the absolute value
    #[must_use]
    pub fn absolute(mut self) -> Self {
        self.combine = Combine::Abs;
        self
    }

    fn value(&self, vector: &FeatureVector) -> f64 {
        let raw = vector.get(self.feature);
        match self.combine {
            Combine::Value => raw,
            Combine::Abs => raw.abs(),
        }
    }

    /// Next flag state given the current one
    fn step(&self, active: bool, value: f64) -> bool {
        match (self.direction, active) {
            (Direction::High, false) => value > self.enter,
            (Direction::High, true) => value >= self.exit,
            (Direction::Low, false) => value < self.enter,
            (Direction::Low, true) => value <= self.exit,
        }
    }

    /// Whether some value would activate both rules at once
    fn enter_overlaps(&self, other: &Self) -> bool {
        if self.feature != other.feature || self.combine != other.combine {
            return false;
        }
        match (self.direction, other.direction) {
            (Direction::High, Direction::Low) => self.enter < other.enter,
            (Direction::Low, Direction::High) => other.enter < self.enter,
            _ => true,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.enter.is_finite() || !self.exit.is_finite() {
            return Err(Error::ClassifierError(format!("Rule '{}' has non-finite thresholds", self.id)));
        }
        let ordered = match self.direction {
            Direction::High => self.exit < self.enter,
            Direction::Low => self.exit > self.enter,
        };
        if !ordered {
            return Err(Error::ClassifierError(format!(
                "Rule '{}': exit {} must be strictly less extreme than enter {}",
                self.id, self.exit, self.enter
            )));
        }
        Ok(())
    }
}

/// Label derived from other labels, active when all of them are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub id: String,
    pub description: String,
    pub all_of: Vec<String>,
}

impl CompositeRule {
    #[must_use]
    pub fn new(id: &str, description: &str, all_of: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            all_of: all_of.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Default label table, in display priority order
#[must_use]
pub fn default_rules() -> Vec<LabelRule> {
    use Direction::{High, Low};
    use Feature::*;

    vec![
        LabelRule::new("eyes-closed", "eyes closed", EyeOpenness, Low, 0.04, 0.06),
        LabelRule::new("brows-raised", "eyebrows raised", BrowRaise, High, 0.12, 0.10),
        LabelRule::new("brow-furrow", "brow furrow", BrowAsymmetry, High, 0.04, 0.03),
        LabelRule::new("mouth-open", "mouth open", MouthOpen, High, 0.08, 0.06),
        LabelRule::new("smile", "smile", SmileMetric, High, 0.62, 0.58),
        LabelRule::new("head-tilt-left", "head tilt left", HeadRoll, Low, -10.0, -7.0).exclusive_with("head-tilt-right"),
        LabelRule::new("head-tilt-right", "head tilt right", HeadRoll, High, 10.0, 7.0).exclusive_with("head-tilt-left"),
        LabelRule::new("head-down", "head nod down", HeadNod, High, 0.80, 0.75).exclusive_with("head-up"),
        LabelRule::new("head-up", "head nod up", HeadNod, Low, 0.55, 0.60).exclusive_with("head-down"),
        LabelRule::new("head-turn-left", "head turn left", HeadYaw, Low, -0.12, -0.08).exclusive_with("head-turn-right"),
        LabelRule::new("head-turn-right", "head turn right", HeadYaw, High, 0.12, 0.08).exclusive_with("head-turn-left"),
        LabelRule::new("gaze-left", "gaze left", GazeMetric, Low, -0.03, -0.02).exclusive_with("gaze-right"),
        LabelRule::new("gaze-right", "gaze right", GazeMetric, High, 0.03, 0.02).exclusive_with("gaze-left"),
        LabelRule::new("lean-left", "leaning left", TorsoSway, Low, -0.15, -0.10).exclusive_with("lean-right"),
        LabelRule::new("lean-right", "leaning right", TorsoSway, High, 0.15, 0.10).exclusive_with("lean-left"),
    ]
}

/// Default composite labels
#[must_use]
pub fn default_composites() -> Vec<CompositeRule> {
    vec![CompositeRule::new("surprise", "surprise", &["brows-raised", "mouth-open"])]
}

/// Result of classifying one frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    /// Active label ids in priority order, composites last
    pub labels: Vec<String>,
    /// Joined descriptions, `neutral` when nothing is active, empty when the
    /// frame had no features
    pub text: String,
}

impl Classification {
    /// Output for a frame without features
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// Whether this frame carried no features
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.text.is_empty()
    }
}

/// Per-label hysteresis state machine
#[derive(Debug, Clone)]
pub struct HysteresisClassifier {
    rules: Vec<LabelRule>,
    partners: Vec<Option<usize>>,
    composites: Vec<(CompositeRule, Vec<usize>)>,
    active: Vec<bool>,
    delimiter: String,
    neutral_text: String,
}

impl HysteresisClassifier {
    /// Build a classifier from a rule table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassifierError`] on duplicate ids, misordered or
    /// non-finite thresholds, or references to unknown labels.
    pub fn new(rules: Vec<LabelRule>, composites: Vec<CompositeRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(Error::ClassifierError(format!("Duplicate label id '{}'", rule.id)));
            }
        }

        let position = |id: &str| rules.iter().position(|r| r.id == id);

        let mut partners = Vec::with_capacity(rules.len());
        for rule in &rules {
            let partner = match &rule.exclusive_with {
                Some(other) if other == &rule.id => {
                    return Err(Error::ClassifierError(format!("Rule '{}' excludes itself", rule.id)))
                }
                Some(other) => Some(position(other).ok_or_else(|| {
                    Error::ClassifierError(format!("Rule '{}' excludes unknown label '{other}'", rule.id))
                })?),
                None => None,
            };
            partners.push(partner);
        }
        for (i, partner) in partners.iter().enumerate() {
            if let Some(p) = *partner {
                if partners[p] != Some(i) {
                    return Err(Error::ClassifierError(format!(
                        "Rule '{}' excludes '{}' but not the other way round",
                        rules[i].id, rules[p].id
                    )));
                }
                if i < p && rules[i].enter_overlaps(&rules[p]) {
                    return Err(Error::ClassifierError(format!(
                        "Exclusive rules '{}' and '{}' can both enter on the same value",
                        rules[i].id, rules[p].id
                    )));
                }
            }
        }

        let mut resolved = Vec::with_capacity(composites.len());
        for composite in composites {
            if composite.all_of.is_empty() {
                return Err(Error::ClassifierError(format!("Composite '{}' has no members", composite.id)));
            }
            if seen.contains(composite.id.as_str()) {
                return Err(Error::ClassifierError(format!("Duplicate label id '{}'", composite.id)));
            }
            let members = composite
                .all_of
                .iter()
                .map(|m| {
                    position(m).ok_or_else(|| {
                        Error::ClassifierError(format!("Composite '{}' references unknown label '{m}'", composite.id))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            resolved.push((composite, members));
        }

        let active = vec![false; rules.len()];
        Ok(Self {
            rules,
            partners,
            composites: resolved,
            active,
            delimiter: DEFAULT_LABEL_DELIMITER.to_string(),
            neutral_text: NEUTRAL_TEXT.to_string(),
        })
    }

    /// Classifier with the default rule table
    ///
    /// # Panics
    ///
    /// Panics if [`default_rules`] and [`default_composites`] stop forming a
    /// valid table; `test_default_table_is_valid` guards this.
    #[must_use]
    pub fn with_defaults() -> Self {
        match Self::new(default_rules(), default_composites()) {
            Ok(classifier) => classifier,
            Err(e) => unreachable!("default rule table is invalid: {e}"),
        }
    }

    /// Override the display delimiter and neutral text
    #[must_use]
    pub fn with_text(mut self, delimiter: &str, neutral_text: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self.neutral_text = neutral_text.to_string();
        self
    }

    /// Update label states from one smoothed vector.
    ///
    /// An absent vector leaves every flag untouched and returns an empty
    /// classification.
    pub fn classify(&mut self, vector: Option<&FeatureVector>) -> Classification {
        let Some(vector) = vector else {
            return Classification::absent();
        };

        for (i, rule) in self.rules.iter().enumerate() {
            let was = self.active[i];
            let now = rule.step(was, rule.value(vector));
            if now == was {
                continue;
            }
            self.active[i] = now;
            log::debug!("Label '{}' {}", rule.id, if now { "on" } else { "off" });
            if now {
                if let Some(p) = self.partners[i] {
                    if self.active[p] {
                        self.active[p] = false;
                        log::debug!("Label '{}' off (exclusive with '{}')", self.rules[p].id, rule.id);
                    }
                }
            }
        }

        self.current()
    }

    /// Classification for the current flags without updating them
    #[must_use]
    pub fn current(&self) -> Classification {
        let mut labels = Vec::new();
        let mut descriptions = Vec::new();

        for (rule, _) in self.rules.iter().zip(&self.active).filter(|(_, on)| **on) {
            labels.push(rule.id.clone());
            descriptions.push(rule.description.as_str());
        }
        for (composite, members) in &self.composites {
            if members.iter().all(|&m| self.active[m]) {
                labels.push(composite.id.clone());
                descriptions.push(composite.description.as_str());
            }
        }

        let text = if descriptions.is_empty() {
            self.neutral_text.clone()
        } else {
            descriptions.join(&self.delimiter)
        };
        Classification { labels, text }
    }

    /// Whether a primitive or composite label is active
    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        if let Some(i) = self.rules.iter().position(|r| r.id == id) {
            return self.active[i];
        }
        self.composites
            .iter()
            .find(|(c, _)| c.id == id)
            .is_some_and(|(_, members)| members.iter().all(|&m| self.active[m]))
    }

    /// Ids of active primitive labels
    pub fn active_labels(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .zip(&self.active)
            .filter(|(_, on)| **on)
            .map(|(r, _)| r.id.as_str())
    }

    /// Rule table in priority order
    #[must_use]
    pub fn rules(&self) -> &[LabelRule] {
        &self.rules
    }

    /// Switch every label off
    pub fn reset(&mut self) {
        self.active.iter_mut().for_each(|a| *a = false);
    }
}
