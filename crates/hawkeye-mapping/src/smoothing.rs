//! Pluggable smoothing passes over a local map.
//!
//! A [`Smoother`] receives the local frame's cells by value and returns the
//! replacement grid.  The engine rejects output whose dimensions differ from
//! the local frame, so a smoother can filter, blur or decay but never resize.
//!
//! Any `Fn(CellGrid) -> CellGrid` closure is a smoother:
//!
//! ```rust
//! use hawkeye_mapping::smoothing::Smoother;
//! use hawkeye_types::{CellGrid, MapObject};
//!
//! let clear = |cells: CellGrid| -> CellGrid {
//!     cells
//!         .into_iter()
//!         .map(|row| row.into_iter().map(|_| Some(MapObject::new("0"))).collect())
//!         .collect()
//! };
//! let out = clear.smooth(vec![vec![None, Some(MapObject::new("1"))]]);
//! assert_eq!(out[0][1].as_ref().map(|c| c.state()), Some("0"));
//! ```

use hawkeye_types::CellGrid;

/// A whole-grid transformation applied by `HawkEye::smooth`.
pub trait Smoother {
    fn smooth(&self, cells: CellGrid) -> CellGrid;
}

impl<F> Smoother for F
where
    F: Fn(CellGrid) -> CellGrid,
{
    fn smooth(&self, cells: CellGrid) -> CellGrid {
        self(cells)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ObservationDecay
// ────────────────────────────────────────────────────────────────────────────

/// Multiplies the probability of every observation in every cell by
/// `factor`, modelling evidence that fades when it is not refreshed.
///
/// ```text
/// p(t + 1) = p(t) × factor
/// ```
///
/// Decayed observations are marked updated.  State tags and unset cells are
/// left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationDecay {
    factor: f64,
}

impl ObservationDecay {
    /// `factor` is clamped to `[0, 1]`.
    pub fn new(factor: f64) -> Self {
        Self {
            factor: factor.clamp(0.0, 1.0),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Smoother for ObservationDecay {
    fn smooth(&self, mut cells: CellGrid) -> CellGrid {
        for cell in cells.iter_mut().flatten().flatten() {
            for obs in cell.observations_mut() {
                let p = obs.probability();
                obs.update(p * self.factor - p);
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hawkeye_types::{MapObject, Observation};

    fn observed(p: f64) -> Option<MapObject> {
        let mut cell = MapObject::new("1");
        cell.add_observation(Observation::new("lidar", p));
        Some(cell)
    }

    #[test]
    fn decay_scales_probabilities() {
        let out = ObservationDecay::new(0.5).smooth(vec![vec![observed(0.8), None]]);
        let cell = out[0][0].as_ref().unwrap();
        assert!((cell.observations()[0].probability() - 0.4).abs() < 1e-12);
        assert!(cell.observations()[0].is_updated());
        assert!(out[0][1].is_none(), "unset cells stay unset");
    }

    #[test]
    fn decay_keeps_state_and_shape() {
        let input = vec![vec![observed(0.3); 3]; 2];
        let out = ObservationDecay::new(0.9).smooth(input);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.len() == 3));
        assert_eq!(out[1][2].as_ref().map(MapObject::state), Some("1"));
    }

    #[test]
    fn decay_factor_is_clamped() {
        assert_eq!(ObservationDecay::new(1.5).factor(), 1.0);
        assert_eq!(ObservationDecay::new(-0.1).factor(), 0.0);
    }

    #[test]
    fn closures_are_smoothers() {
        let transpose = |cells: CellGrid| -> CellGrid {
            let (h, w) = (cells.len(), cells.first().map_or(0, Vec::len));
            (0..w)
                .map(|x| (0..h).map(|y| cells[y][x].clone()).collect())
                .collect()
        };
        let out = transpose.smooth(vec![vec![None; 3]]);
        assert_eq!((out.len(), out[0].len()), (3, 1));
    }
}
