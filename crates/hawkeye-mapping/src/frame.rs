//! Grid frames and shape rasterization.
//!
//! A [`Frame`] is a fixed-size, height-major grid of [`MapObject`] cells whose
//! coordinates are always non-negative: `(x, y)` with `0 ≤ x < width` and
//! `0 ≤ y < height`.  Callers that think in centred coordinates shift their
//! points with [`Frame::calc_offset`] first.
//!
//! A frame may be *projected* from a base frame through a rotation and a
//! translation ([`Frame::from_base`]).  It keeps only the base frame's
//! [`FrameId`] as a non-owning handle and writes back through
//! [`Frame::copy_to_base_frame`].
//!
//! Every `cast_*` operation bounds-checks each cell it touches and silently
//! skips coordinates that fall outside the grid, so partially off-grid shapes
//! are drawn clipped rather than rejected.  Lines and filled rectangles are
//! clipped to the grid before they are walked, so the work they do is bounded
//! by the grid size whatever the shape's coordinates are.
//!
//! # Example
//!
//! ```rust
//! use hawkeye_mapping::frame::Frame;
//! use hawkeye_types::{CartCoord, MapObject};
//!
//! let mut frame = Frame::filled(8, 8, &MapObject::new("."));
//! let wall = MapObject::new("#");
//!
//! frame.cast_line(CartCoord::new(0, 0), &wall, CartCoord::new(7, 0), &wall, &wall);
//! assert_eq!(frame.get(4, 0).map(|c| c.state()), Some("#"));
//!
//! // Off-grid points are ignored rather than rejected.
//! frame.cast_point(CartCoord::new(-1, 20), &wall);
//! ```

use hawkeye_types::{CartCoord, CellGrid, FrameId, MapError, MapObject, MapPoint, PolarCoord};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

use crate::render::{AsciiRenderer, MapRenderer};
use crate::transform::TransformCalculator;

// ────────────────────────────────────────────────────────────────────────────
// Frame
// ────────────────────────────────────────────────────────────────────────────

/// A 2-D grid of map cells with an optional placement inside a base frame.
#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    width: usize,
    height: usize,
    /// `cells[y][x]`
    cells: CellGrid,
    /// Rotation from the base frame, positive clockwise from its Y axis.
    theta: f64,
    /// Position of this frame's origin in base-frame coordinates.
    translation: CartCoord,
    base_id: Option<FrameId>,
}

impl Frame {
    /// Create a frame whose cells are all unset.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            id: FrameId::new(),
            width,
            height,
            cells: vec![vec![None; width]; height],
            theta: 0.0,
            translation: CartCoord::origin(),
            base_id: None,
        }
    }

    /// Create a frame with every cell set to a copy of `base_cell`.
    pub fn filled(width: usize, height: usize, base_cell: &MapObject) -> Self {
        let mut frame = Self::new(width, height);
        frame.cells = vec![vec![Some(base_cell.clone()); width]; height];
        frame
    }

    /// Project a new frame out of `base`.
    ///
    /// For every local coordinate the base coordinate is computed as
    /// `rotate(theta)` then `+ translation`; where that lands inside `base` the
    /// base cell is copied in, elsewhere the local cell stays unset.
    pub fn from_base(
        width: usize,
        height: usize,
        base: &Frame,
        theta: f64,
        translation: CartCoord,
    ) -> Self {
        let transform = TransformCalculator::new(theta, translation);
        let mut frame = Self::new(width, height);
        frame.theta = theta;
        frame.translation = translation;
        frame.base_id = Some(base.id);

        for (y, row) in frame.cells.iter_mut().enumerate() {
            for (x, slot) in row.iter_mut().enumerate() {
                let b = transform.transform_local_to_base(CartCoord::new(x as i32, y as i32));
                if let Some(cell) = base.get(b.x, b.y) {
                    *slot = Some(cell.clone());
                }
            }
        }
        frame
    }

    /// Write every set cell of this frame into `base` at its transformed
    /// coordinate, overwriting what was there.
    ///
    /// Cells that land outside `base`, and cells that were never set, are
    /// skipped.  Returns the number of cells written.
    ///
    /// Fails with [`MapError::NoBaseFrame`] for a root frame and with
    /// [`MapError::UnrelatedFrame`] when `base` is not the frame this one was
    /// projected from.
    pub fn copy_to_base_frame(&self, base: &mut Frame) -> Result<usize, MapError> {
        let expected = self.base_id.ok_or(MapError::NoBaseFrame(self.id))?;
        if expected != base.id {
            return Err(MapError::UnrelatedFrame {
                expected,
                actual: base.id,
            });
        }

        let transform = self.transform();
        let mut written = 0;
        for (y, row) in self.cells.iter().enumerate() {
            for (x, slot) in row.iter().enumerate() {
                let Some(cell) = slot else { continue };
                let b = transform.transform_local_to_base(CartCoord::new(x as i32, y as i32));
                if base.write(b.x.into(), b.y.into(), cell) {
                    written += 1;
                }
            }
        }
        debug!(
            frame = %self.id,
            base = %base.id,
            translation = %transform.translation(),
            written,
            "copied frame into base frame"
        );
        Ok(written)
    }

    // ── Shape casting ───────────────────────────────────────────────────────

    /// Copy `cell` into the grid at `point`.
    pub fn cast_point(&mut self, point: impl MapPoint, cell: &MapObject) {
        self.write(point.x().into(), point.y().into(), cell);
    }

    /// Draw a line from `start` to `end`.
    ///
    /// The segment is walked in `ceil(length)` equal steps along its polar
    /// form, each step rounded to the nearest cell and filled with
    /// `line_cell`.  The two endpoints are then written with `start_cell` and
    /// `end_cell`, so they are always set, including for a zero-length line
    /// (where `end_cell` wins).
    ///
    /// Only the steps that can land on the grid are visited.
    pub fn cast_line(
        &mut self,
        start: impl MapPoint,
        start_cell: &MapObject,
        end: impl MapPoint,
        end_cell: &MapObject,
        line_cell: &MapObject,
    ) {
        let (start, end) = (start.to_cart(), end.to_cart());
        // Deltas in f64: `end - start` would saturate across the i32 range.
        let dx = f64::from(end.x) - f64::from(start.x);
        let dy = f64::from(end.y) - f64::from(start.y);
        let range = dx.hypot(dy);
        let steps = range.ceil();

        if steps > 0.0
            && let Some((lo, hi)) = self.line_window(start, dx, dy)
        {
            let (sin_t, cos_t) = dy.atan2(dx).sin_cos();
            let first = (lo * steps).floor() as i64;
            let last = (hi * steps).ceil() as i64;
            for n in first..=last {
                let along = range * n as f64 / steps;
                let x = (along * cos_t).round() as i64 + i64::from(start.x);
                let y = (along * sin_t).round() as i64 + i64::from(start.y);
                self.write(x, y, line_cell);
            }
        }

        self.write(start.x.into(), start.y.into(), start_cell);
        self.write(end.x.into(), end.y.into(), end_cell);
    }

    /// Draw an axis-aligned rectangle spanning `top_left` to `bottom_right`.
    ///
    /// With `fill`, the `|Δx| × |Δy|` cells starting at `top_left` and
    /// stepping toward `bottom_right` are set (the far row and column are
    /// not).  Without `fill`, the four edges are drawn as lines, corners
    /// included.
    pub fn cast_rec(
        &mut self,
        top_left: impl MapPoint,
        bottom_right: impl MapPoint,
        cell: &MapObject,
        fill: bool,
    ) {
        let (tl, br) = (top_left.to_cart(), bottom_right.to_cart());

        if fill {
            let xs = fill_span(tl.x, br.x, self.width);
            let ys = fill_span(tl.y, br.y, self.height);
            for y in ys {
                for x in xs.clone() {
                    self.write(x, y, cell);
                }
            }
        } else {
            let top_right = CartCoord::new(br.x, tl.y);
            let bottom_left = CartCoord::new(tl.x, br.y);
            self.cast_line(tl, cell, top_right, cell, cell);
            self.cast_line(tl, cell, bottom_left, cell, cell);
            self.cast_line(br, cell, bottom_left, cell, cell);
            self.cast_line(br, cell, top_right, cell, cell);
        }
    }

    /// Draw a circular arc of `degrees` around `center`, one point per degree.
    ///
    /// | radius | degrees | sweep |
    /// |---|---|---|
    /// | + | + | counter-clockwise from +X |
    /// | + | − | clockwise from +X |
    /// | − | + | clockwise from −X |
    /// | − | − | counter-clockwise from −X |
    ///
    /// With `fill`, a radial line from `center` to every arc point is drawn
    /// instead of the arc point alone.  Sweeps longer than one turn stop after
    /// 360°.
    pub fn cast_circle(
        &mut self,
        center: impl MapPoint,
        radius: i32,
        degrees: i32,
        cell: &MapObject,
        fill: bool,
    ) {
        let center = center.to_cart();
        for point in arc_points(center, radius, degrees) {
            if fill {
                self.cast_line(center, cell, point, cell, cell);
            } else {
                self.write(point.x.into(), point.y.into(), cell);
            }
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn id(&self) -> FrameId {
        self.id
    }

    /// The frame this one was projected from, if any.
    pub fn base_id(&self) -> Option<FrameId> {
        self.base_id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rotation from the base frame, positive clockwise from its Y axis.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Translation of this frame's origin in base-frame coordinates.
    pub fn translation(&self) -> CartCoord {
        self.translation
    }

    /// The local-to-base transform for this frame.
    pub fn transform(&self) -> TransformCalculator {
        TransformCalculator::new(self.theta, self.translation)
    }

    /// The cell at `(x, y)`, or `None` when out of bounds or never set.
    pub fn get(&self, x: i32, y: i32) -> Option<&MapObject> {
        let (col, row) = self.index(x.into(), y.into())?;
        self.cells[row][col].as_ref()
    }

    /// The raw height-major cell array.
    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    /// Swap in a new cell array and adopt its dimensions.
    ///
    /// Fails with [`MapError::InvalidDimensions`] if the rows are not all the
    /// same length; the frame is left untouched in that case.
    pub fn replace_cells(&mut self, cells: CellGrid) -> Result<(), MapError> {
        let height = cells.len();
        let width = cells.first().map_or(0, Vec::len);
        if let Some(row) = cells.iter().find(|row| row.len() != width) {
            return Err(MapError::InvalidDimensions {
                expected_width: width,
                expected_height: height,
                width: row.len(),
                height,
            });
        }
        self.cells = cells;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// True when `(x, y)` lies inside `[0, width) × [0, height)`.
    pub fn check_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x.into(), y.into()).is_some()
    }

    pub fn contains(&self, point: impl MapPoint) -> bool {
        self.check_bounds(point.x(), point.y())
    }

    /// Shift `point`, measured from `offset`, into this frame's coordinates.
    ///
    /// For a 200×200 frame addressed as −100..100 on both axes, pass
    /// `(100, 100)` as the offset.
    pub fn calc_offset(offset: impl MapPoint, point: impl MapPoint) -> CartCoord {
        offset.to_cart() + point.to_cart()
    }

    // ── Internal ────────────────────────────────────────────────────────────

    /// `(column, row)` of `(x, y)`, or `None` when it is off the grid.
    fn index(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let col = usize::try_from(x).ok().filter(|&c| c < self.width)?;
        let row = usize::try_from(y).ok().filter(|&r| r < self.height)?;
        Some((col, row))
    }

    /// The part of `t ∈ [0, 1]` for which `start + t·(dx, dy)` is within one
    /// cell of the grid, or `None` when the segment misses it entirely.
    fn line_window(&self, start: CartCoord, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let (x_lo, x_hi) = axis_window(start.x, dx, self.width)?;
        let (y_lo, y_hi) = axis_window(start.y, dy, self.height)?;
        let lo = x_lo.max(y_lo).max(0.0);
        let hi = x_hi.min(y_hi).min(1.0);
        (lo <= hi).then_some((lo, hi))
    }

    /// Bounds-checked deep-copy write.  Returns `false` when `(x, y)` is off
    /// the grid.
    fn write(&mut self, x: i64, y: i64, cell: &MapObject) -> bool {
        let Some((col, row)) = self.index(x, y) else {
            return false;
        };
        let slot = &mut self.cells[row][col];
        match slot {
            Some(existing) => existing.replace(cell),
            None => *slot = Some(cell.clone()),
        }
        true
    }
}

impl fmt::Display for Frame {
    /// Text dump with row `height - 1` first, so +Y points up.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AsciiRenderer::default().render(&self.cells))
    }
}

/// The points visited by [`Frame::cast_circle`], in sweep order.
///
/// A negative `radius` flips the sign of `degrees` before stepping; positive
/// sweeps walk `0..=degrees`, the rest walk down from 360.  The sweep is cut
/// at one full turn, since further degrees only revisit the same points.
pub fn arc_points(
    center: CartCoord,
    radius: i32,
    degrees: i32,
) -> impl Iterator<Item = CartCoord> {
    let arc = if radius < 0 {
        -i64::from(degrees)
    } else {
        i64::from(degrees)
    };
    let sweep = arc.unsigned_abs().min(360) as i32;
    (0..=sweep).map(move |k| {
        let angle = if arc > 0 { k } else { 360 - k };
        center + PolarCoord::from_degrees(angle, radius).to_cart()
    })
}

/// Parameter range of `start + t·delta` inside `[-1, size]`, unbounded when
/// the axis does not move.
fn axis_window(start: i32, delta: f64, size: usize) -> Option<(f64, f64)> {
    let (low, high) = (-1.0, size as f64);
    let start = f64::from(start);
    if delta == 0.0 {
        return (low..=high)
            .contains(&start)
            .then_some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let (a, b) = ((low - start) / delta, (high - start) / delta);
    Some((a.min(b), a.max(b)))
}

/// On-grid cells of a filled rectangle's side: from `from` toward `to`,
/// excluding `to` itself.
fn fill_span(from: i32, to: i32, size: usize) -> RangeInclusive<i64> {
    let (from, to) = (i64::from(from), i64::from(to));
    let (low, high) = if to >= from {
        (from, to - 1)
    } else {
        (to + 1, from)
    };
    let last = i64::try_from(size).unwrap_or(i64::MAX) - 1;
    low.max(0)..=high.min(last)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
