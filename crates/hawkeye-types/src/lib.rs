//! `hawkeye-types` – value types shared by the HawkEye mapping engine and its
//! callers.
//!
//! - [`point`] – [`CartCoord`], [`PolarCoord`] and the [`MapPoint`] trait.
//! - [`cell`] – [`MapObject`] cell state and its [`Observation`]s.
//! - [`Pose`], [`FrameId`], [`MapEvent`] and the crate-wide [`MapError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod cell;
pub mod point;

pub use cell::{CellGrid, MapObject, Observation};
pub use point::{CartCoord, MapPoint, PolarCoord};

/// Position plus heading of a frame relative to its base frame's origin.
///
/// `orientation` is in radians, positive clockwise from the base frame's Y
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: CartCoord,
    pub orientation: f64,
}

impl Pose {
    pub fn new(position: CartCoord, orientation: f64) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Build a pose from integer coordinates and a heading in degrees.
    pub fn from_degrees(x: i32, y: i32, degrees: f64) -> Self {
        Self::new(CartCoord::new(x, y), degrees.to_radians())
    }

    /// Replace both position and orientation.
    pub fn update(&mut self, position: CartCoord, orientation: f64) {
        self.position = position;
        self.orientation = orientation;
    }

    /// The same heading with the position shifted by `offset`.
    pub fn offset_by(self, offset: CartCoord) -> Self {
        Self::new(self.position + offset, self.orientation)
    }
}

/// A pose used as a point is its position.  `theta()` and `range()` are the
/// bearing and distance of that position from the origin, not the heading;
/// read the heading from [`Pose::orientation`].
impl MapPoint for Pose {
    fn x(&self) -> i32 {
        self.position.x
    }

    fn y(&self) -> i32 {
        self.position.y
    }

    fn theta(&self) -> f64 {
        self.position.theta()
    }

    fn range(&self) -> f64 {
        self.position.range()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{}|{})",
            self.position.x, self.position.y, self.orientation
        )
    }
}

/// Identity of one grid instance.
///
/// The local grid is rebuilt on every pose update, so a renderer can compare
/// ids to notice that the grid it holds is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub Uuid);

impl FrameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A status report emitted by the mapping engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "hawkeye-mapping::engine"
    pub source: String,
    pub payload: MapEventPayload,
}

impl MapEvent {
    /// Stamp `payload` with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: MapEventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEventPayload {
    /// The local frame was re-anchored; `pose` is grid-absolute.
    LocationUpdated { pose: Pose, local_frame: FrameId },
    /// Local cells were committed into the global map.
    Synchronized { cells_written: usize },
    /// The local frame's cells were replaced by a smoother's output.
    Smoothed { local_frame: FrameId },
    Status(String),
}

/// Errors raised by the mapping engine.
///
/// Out-of-bounds coordinates are never an error: rasterization skips them.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapError {
    #[error(
        "Invalid grid dimensions: expected {expected_width}x{expected_height}, got {width}x{height}"
    )]
    InvalidDimensions {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Frame {actual} is not the base frame {expected} this frame was projected from")]
    UnrelatedFrame { expected: FrameId, actual: FrameId },

    #[error("Frame {0} has no base frame to copy into")]
    NoBaseFrame(FrameId),
}
