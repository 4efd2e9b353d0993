//! Map cell state: a display tag plus probability-weighted observations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Height-major cell array (`rows[y][x]`).  `None` marks a cell that has
/// never been written, e.g. a local cell whose reprojection fell outside the
/// global map.
pub type CellGrid = Vec<Vec<Option<MapObject>>>;

// ────────────────────────────────────────────────────────────────────────────
// Observation
// ────────────────────────────────────────────────────────────────────────────

/// A single probability estimate that some physical property (a wall, a
/// LiDAR return, a painted line) exists at a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// What kind of evidence this is, e.g. `"lidar"` or `"line"`.
    pub kind: String,
    probability: f64,
    #[serde(default)]
    updated: bool,
}

impl Observation {
    /// Create a fresh observation.  `probability` is clamped to `[0, 1]`.
    pub fn new(kind: impl Into<String>, probability: f64) -> Self {
        Self {
            kind: kind.into(),
            probability: probability.clamp(0.0, 1.0),
            updated: false,
        }
    }

    /// Current probability in `[0, 1]`.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Shift the probability by `delta`, clamp it to `[0, 1]` and mark the
    /// observation as updated.  Returns the new probability.
    pub fn update(&mut self, delta: f64) -> f64 {
        self.probability = (self.probability + delta).clamp(0.0, 1.0);
        self.updated = true;
        self.probability
    }

    /// True if the observation changed since [`take_updated`][Self::take_updated]
    /// was last called.
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    /// Report whether the observation changed since the last check and clear
    /// the flag.
    pub fn take_updated(&mut self) -> bool {
        std::mem::take(&mut self.updated)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MapObject
// ────────────────────────────────────────────────────────────────────────────

/// The contents of one map cell.
///
/// A `MapObject` is plain data: cloning it deep-copies the observation list,
/// so two grid positions never share state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapObject {
    state: String,
    #[serde(default)]
    observations: Vec<Observation>,
}

impl MapObject {
    /// A cell with the given state tag and no observations.
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            observations: Vec::new(),
        }
    }

    /// A cell with an empty state tag carrying `observations`.
    pub fn with_observations(observations: Vec<Observation>) -> Self {
        Self {
            state: String::new(),
            observations,
        }
    }

    /// The display/state tag.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn observations_mut(&mut self) -> &mut [Observation] {
        &mut self.observations
    }

    pub fn add_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Overwrite this cell's state and observations with copies of `other`'s.
    ///
    /// Existing observations are discarded, not merged.
    pub fn replace(&mut self, other: &MapObject) {
        self.clone_from(other);
    }
}

impl fmt::Display for MapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Observation ─────────────────────────────────────────────────────────

    #[test]
    fn observation_new_clamps() {
        assert_eq!(Observation::new("lidar", 1.7).probability(), 1.0);
        assert_eq!(Observation::new("lidar", -0.2).probability(), 0.0);
    }

    #[test]
    fn observation_update_applies_delta_and_marks() {
        let mut o = Observation::new("lidar", 0.5);
        assert!(!o.is_updated());
        let p = o.update(0.25);
        assert!((p - 0.75).abs() < 1e-12);
        assert!(o.is_updated());
        assert!((o.update(1.0) - 1.0).abs() < 1e-12, "update must clamp at 1");
    }

    #[test]
    fn take_updated_clears_flag() {
        let mut o = Observation::new("line", 0.1);
        o.update(0.1);
        assert!(o.take_updated());
        assert!(!o.take_updated());
    }

    // ── MapObject ───────────────────────────────────────────────────────────

    #[test]
    fn clone_is_deep() {
        let mut a = MapObject::new("1");
        a.add_observation(Observation::new("lidar", 0.4));
        let mut b = a.clone();
        b.observations_mut()[0].update(0.5);
        assert!((a.observations()[0].probability() - 0.4).abs() < 1e-12);
        assert!((b.observations()[0].probability() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn replace_overwrites_instead_of_appending() {
        let mut target = MapObject::new("0");
        target.add_observation(Observation::new("stale", 0.9));

        let mut source = MapObject::new("1");
        source.add_observation(Observation::new("lidar", 0.3));

        target.replace(&source);
        assert_eq!(target.state(), "1");
        assert_eq!(target.observations().len(), 1);
        assert_eq!(target.observations()[0].kind, "lidar");
    }

    #[test]
    fn with_observations_has_empty_state() {
        let cell = MapObject::with_observations(vec![Observation::new("sonar", 0.2)]);
        assert_eq!(cell.state(), "");
        assert_eq!(cell.observations().len(), 1);
    }

    #[test]
    fn display_prints_state() {
        assert_eq!(MapObject::new("#").to_string(), "#");
    }
}
