//! [`HawkEye`] – the mapping engine.
//!
//! Owns a fixed-size **global** map and a smaller **local** map that is a
//! live reprojection of the global map around the robot's pose.  Sensor code
//! casts robot-relative geometry into the local map; pose updates commit the
//! local map into the global one and rebuild the local view at the new pose.
//!
//! ## Coordinates
//!
//! Callers never see raw grid indices:
//!
//! * Poses are relative to `global_origin`, so `(0, 0)` is the middle of a
//!   200×200 map whose origin is `(100, 100)`.
//! * Cast coordinates are relative to the robot, which sits at `local_origin`
//!   inside the local map.  `(0, 1)` is one cell ahead of the robot.
//!
//! ## Synchronization
//!
//! [`HawkEye::update_location`] always flushes the current local map into
//! the global map **before** replacing it, so edits are never lost across a
//! pose change.  [`HawkEye::save_to_global`] flushes without moving.
//!
//! # Example
//!
//! ```rust
//! use hawkeye_mapping::engine::{HawkEye, MapConfig};
//! use hawkeye_types::{CartCoord, MapObject, Pose};
//!
//! let config = MapConfig {
//!     global_width: 200,
//!     global_height: 200,
//!     global_origin: CartCoord::new(100, 100),
//!     local_width: 10,
//!     local_height: 10,
//!     local_origin: CartCoord::new(5, 5),
//!     initial_pose: Pose::default(),
//! };
//! let mut hawkeye = HawkEye::new(&config, &MapObject::new("0")).unwrap();
//!
//! hawkeye.cast_point(CartCoord::new(0, 0), &MapObject::new("1"));
//! hawkeye.save_to_global().unwrap();
//! assert_eq!(hawkeye.global_map().get(100, 100).map(|c| c.state()), Some("1"));
//!
//! hawkeye.update_location(Pose::from_degrees(50, 0, 0.0)).unwrap();
//! hawkeye.cast_point(CartCoord::new(0, 0), &MapObject::new("2"));
//! hawkeye.save_to_global().unwrap();
//! assert_eq!(hawkeye.global_map().get(150, 100).map(|c| c.state()), Some("2"));
//! assert_eq!(hawkeye.global_map().get(100, 100).map(|c| c.state()), Some("1"));
//! ```

use hawkeye_types::{
    CartCoord, MapError, MapEvent, MapEventPayload, MapObject, MapPoint, Pose,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::frame::Frame;
use crate::report::{MapReporter, TracingReporter};
use crate::smoothing::Smoother;
use crate::transform::TransformCalculator;

const SOURCE: &str = "hawkeye-mapping::engine";

// ────────────────────────────────────────────────────────────────────────────
// MapConfig
// ────────────────────────────────────────────────────────────────────────────

/// Construction parameters for a [`HawkEye`] engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub global_width: usize,
    pub global_height: usize,
    /// Grid index of the caller's `(0, 0)` in the global map.
    pub global_origin: CartCoord,
    pub local_width: usize,
    pub local_height: usize,
    /// Grid index of the robot inside the local map.
    pub local_origin: CartCoord,
    /// Starting pose, relative to `global_origin`.
    pub initial_pose: Pose,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            global_width: 200,
            global_height: 200,
            global_origin: CartCoord::new(100, 100),
            local_width: 40,
            local_height: 40,
            local_origin: CartCoord::new(20, 20),
            initial_pose: Pose::default(),
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::InvalidDimensions {
            expected_width: width.max(1),
            expected_height: height.max(1),
            width,
            height,
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// HawkEye
// ────────────────────────────────────────────────────────────────────────────

/// The mapping engine: a global map, a pose-dependent local map, and the
/// offsets that translate caller coordinates into grid indices.
pub struct HawkEye {
    global: Frame,
    local: Frame,
    /// Grid-absolute pose of the robot in the global map.
    pose: Pose,
    global_offset: CartCoord,
    local_offset: CartCoord,
    reporter: Box<dyn MapReporter>,
}

impl HawkEye {
    /// Build an engine that reports through [`TracingReporter`].
    ///
    /// Both maps are prefilled with copies of `base_cell`.  Fails with
    /// [`MapError::InvalidDimensions`] if either map has a zero dimension.
    pub fn new(config: &MapConfig, base_cell: &MapObject) -> Result<Self, MapError> {
        Self::with_reporter(config, base_cell, Box::new(TracingReporter))
    }

    /// Build an engine that reports through `reporter`.
    pub fn with_reporter(
        config: &MapConfig,
        base_cell: &MapObject,
        reporter: Box<dyn MapReporter>,
    ) -> Result<Self, MapError> {
        check_dimensions(config.global_width, config.global_height)?;
        check_dimensions(config.local_width, config.local_height)?;

        let global = Frame::filled(config.global_width, config.global_height, base_cell);
        let pose = config.initial_pose.offset_by(config.global_origin);
        let local = Self::project_local(
            &global,
            config.local_width,
            config.local_height,
            config.local_origin,
            pose,
        );

        info!(
            global_width = config.global_width,
            global_height = config.global_height,
            local_width = config.local_width,
            local_height = config.local_height,
            pose = %pose,
            "HawkEye initialised"
        );

        Ok(Self {
            global,
            local,
            pose,
            global_offset: config.global_origin,
            local_offset: config.local_origin,
            reporter,
        })
    }

    /// Move the robot to `pose` (relative to the global origin).
    ///
    /// Pending local edits are committed to the global map first, then a new
    /// local map is projected at the new pose.  The local map's
    /// [`FrameId`][hawkeye_types::FrameId] changes on every call.
    pub fn update_location(&mut self, pose: Pose) -> Result<(), MapError> {
        let pose = pose.offset_by(self.global_offset);
        let cells_written = self.local.copy_to_base_frame(&mut self.global)?;

        self.local = Self::project_local(
            &self.global,
            self.local.width(),
            self.local.height(),
            self.local_offset,
            pose,
        );
        self.pose = pose;

        info!(pose = %pose, cells_written, local_frame = %self.local.id(), "location updated");
        self.reporter.report(MapEvent::new(
            SOURCE,
            MapEventPayload::LocationUpdated {
                pose,
                local_frame: self.local.id(),
            },
        ));
        Ok(())
    }

    /// Commit the local map into the global map without moving.  Returns the
    /// number of global cells written.
    pub fn save_to_global(&mut self) -> Result<usize, MapError> {
        let cells_written = self.local.copy_to_base_frame(&mut self.global)?;
        info!(cells_written, "local map synchronized to global");
        self.reporter.report(MapEvent::new(
            SOURCE,
            MapEventPayload::Synchronized { cells_written },
        ));
        Ok(cells_written)
    }

    // ── Casting (robot-relative) ────────────────────────────────────────────

    pub fn cast_point(&mut self, point: impl MapPoint, cell: &MapObject) {
        let p = self.to_local(point);
        debug!(point = %p, state = cell.state(), "cast point");
        self.local.cast_point(p, cell);
    }

    pub fn cast_line(
        &mut self,
        start: impl MapPoint,
        start_cell: &MapObject,
        end: impl MapPoint,
        end_cell: &MapObject,
        line_cell: &MapObject,
    ) {
        let (start, end) = (self.to_local(start), self.to_local(end));
        debug!(start = %start, end = %end, state = line_cell.state(), "cast line");
        self.local.cast_line(start, start_cell, end, end_cell, line_cell);
    }

    pub fn cast_rect(
        &mut self,
        top_left: impl MapPoint,
        bottom_right: impl MapPoint,
        cell: &MapObject,
        fill: bool,
    ) {
        let (tl, br) = (self.to_local(top_left), self.to_local(bottom_right));
        debug!(top_left = %tl, bottom_right = %br, fill, state = cell.state(), "cast rect");
        self.local.cast_rec(tl, br, cell, fill);
    }

    pub fn cast_circle(
        &mut self,
        center: impl MapPoint,
        radius: i32,
        degrees: i32,
        cell: &MapObject,
        fill: bool,
    ) {
        let c = self.to_local(center);
        debug!(center = %c, radius, degrees, fill, state = cell.state(), "cast circle");
        self.local.cast_circle(c, radius, degrees, cell, fill);
    }

    /// Replace the local map's cells with `smoother`'s output.
    ///
    /// The smoother must return a grid of the same dimensions; otherwise
    /// [`MapError::InvalidDimensions`] is returned and the local map is left
    /// unchanged.
    pub fn smooth(&mut self, smoother: &dyn Smoother) -> Result<(), MapError> {
        let (expected_width, expected_height) = (self.local.width(), self.local.height());
        let cells = smoother.smooth(self.local.cells().clone());

        let height = cells.len();
        let width = cells
            .iter()
            .map(Vec::len)
            .find(|&w| w != expected_width)
            .unwrap_or(expected_width);
        if width != expected_width || height != expected_height {
            return Err(MapError::InvalidDimensions {
                expected_width,
                expected_height,
                width,
                height,
            });
        }

        self.local.replace_cells(cells)?;
        info!(local_frame = %self.local.id(), "local map smoothed");
        self.reporter.report(MapEvent::new(
            SOURCE,
            MapEventPayload::Smoothed {
                local_frame: self.local.id(),
            },
        ));
        Ok(())
    }

    /// Forward a free-form status message to the reporter.
    pub fn report_status(&self, message: impl Into<String>) {
        self.reporter
            .report(MapEvent::new(SOURCE, MapEventPayload::Status(message.into())));
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn local_map_width(&self) -> usize {
        self.local.width()
    }

    pub fn local_map_height(&self) -> usize {
        self.local.height()
    }

    pub fn global_map_width(&self) -> usize {
        self.global.width()
    }

    pub fn global_map_height(&self) -> usize {
        self.global.height()
    }

    /// The current local map.  Replaced on every pose update, so re-fetch
    /// rather than hold on to it.
    pub fn local_map(&self) -> &Frame {
        &self.local
    }

    pub fn global_map(&self) -> &Frame {
        &self.global
    }

    /// The robot's pose relative to the global origin.
    pub fn pose(&self) -> Pose {
        Pose::new(self.pose.position - self.global_offset, self.pose.orientation)
    }

    /// The robot's pose in global grid indices.
    pub fn absolute_pose(&self) -> Pose {
        self.pose
    }

    pub fn global_offset(&self) -> CartCoord {
        self.global_offset
    }

    pub fn local_offset(&self) -> CartCoord {
        self.local_offset
    }

    // ── Internal ────────────────────────────────────────────────────────────

    fn to_local(&self, point: impl MapPoint) -> CartCoord {
        Frame::calc_offset(self.local_offset, point)
    }

    /// Project a local map whose `local_origin` cell sits on `pose`.
    fn project_local(
        global: &Frame,
        width: usize,
        height: usize,
        local_origin: CartCoord,
        pose: Pose,
    ) -> Frame {
        let rotation = TransformCalculator::new(pose.orientation, CartCoord::origin());
        let translation = pose.position - rotation.rotate_local_to_base(local_origin);
        Frame::from_base(width, height, global, pose.orientation, translation)
    }
}

impl fmt::Display for HawkEye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GLOBAL MAP: {}x{}", self.global.width(), self.global.height())?;
        writeln!(f, "LOCAL MAP: {}x{}", self.local.width(), self.local.height())?;
        writeln!(f, "LOCAL POSE: {}", self.pose)?;
        write!(f, "{}", self.global)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
