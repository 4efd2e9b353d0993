//! 2-D frame transform calculator.
//!
//! Relates a *local* frame to the *base* frame it sits in.  The local frame is
//! rotated by `theta` (radians, positive clockwise from the base frame's Y
//! axis) and its origin is translated to `translation` in base coordinates.
//! All results are integer grid coordinates; each axis is rounded to the
//! nearest integer after the trigonometry.
//!
//! # Example
//!
//! ```rust
//! use hawkeye_mapping::transform::TransformCalculator;
//! use hawkeye_types::CartCoord;
//!
//! // Local frame origin sits at (10, 5) in the base frame, no rotation.
//! let tf = TransformCalculator::new(0.0, CartCoord::new(10, 5));
//!
//! let base = tf.transform_local_to_base(CartCoord::new(1, 2));
//! assert_eq!(base, CartCoord::new(11, 7));
//! assert_eq!(tf.transform_base_to_local(base), CartCoord::new(1, 2));
//! ```

use hawkeye_types::{CartCoord, MapPoint};
use std::fmt;

/// Precomputed rotation + translation between a local and a base frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformCalculator {
    sin_t: f64,
    cos_t: f64,
    translation: CartCoord,
}

impl TransformCalculator {
    /// Create a calculator for a local frame rotated by `theta` and
    /// translated by `translation` relative to its base frame.
    pub fn new(theta: f64, translation: CartCoord) -> Self {
        Self {
            sin_t: theta.sin(),
            cos_t: theta.cos(),
            translation,
        }
    }

    /// The identity transform (no rotation, no translation).
    pub fn identity() -> Self {
        Self::new(0.0, CartCoord::origin())
    }

    pub fn translation(&self) -> CartCoord {
        self.translation
    }

    /// Rotate a local point into base-frame orientation.
    pub fn rotate_local_to_base(&self, p: impl MapPoint) -> CartCoord {
        let (x, y) = (f64::from(p.x()), f64::from(p.y()));
        CartCoord::new(
            (self.cos_t * x + self.sin_t * y).round() as i32,
            (-self.sin_t * x + self.cos_t * y).round() as i32,
        )
    }

    /// Inverse of [`rotate_local_to_base`][Self::rotate_local_to_base]
    /// (the transposed rotation).
    pub fn rotate_base_to_local(&self, p: impl MapPoint) -> CartCoord {
        let (x, y) = (f64::from(p.x()), f64::from(p.y()));
        CartCoord::new(
            (self.cos_t * x - self.sin_t * y).round() as i32,
            (self.sin_t * x + self.cos_t * y).round() as i32,
        )
    }

    pub fn translate_local_to_base(&self, p: impl MapPoint) -> CartCoord {
        p.to_cart() + self.translation
    }

    pub fn translate_base_to_local(&self, p: impl MapPoint) -> CartCoord {
        p.to_cart() - self.translation
    }

    /// Rotate, then translate: local coordinates to base coordinates.
    pub fn transform_local_to_base(&self, p: impl MapPoint) -> CartCoord {
        self.translate_local_to_base(self.rotate_local_to_base(p))
    }

    /// Undo the translation, then undo the rotation: base coordinates to
    /// local coordinates.
    ///
    /// Because both directions round, a round trip may land one unit away
    /// from the starting point on either axis.
    pub fn transform_base_to_local(&self, p: impl MapPoint) -> CartCoord {
        self.rotate_base_to_local(self.translate_base_to_local(p))
    }
}

impl fmt::Display for TransformCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "transformation matrix:")?;
        writeln!(f, "[{} {}|{}]", self.cos_t, self.sin_t, self.translation.x)?;
        // `0.0 - sin` keeps an unrotated matrix from printing `-0`.
        writeln!(f, "[{} {}|{}]", 0.0 - self.sin_t, self.cos_t, self.translation.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
