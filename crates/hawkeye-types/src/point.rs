//! Integer map coordinates in Cartesian and polar form.
//!
//! Every point type answers both representations through [`MapPoint`]; the
//! polar view of a [`CartCoord`] and the Cartesian view of a [`PolarCoord`]
//! are always derived, never stored separately.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Sub};

/// Read access to a map point in either coordinate system.
pub trait MapPoint {
    /// X value in Cartesian coordinates.
    fn x(&self) -> i32;

    /// Y value in Cartesian coordinates.
    fn y(&self) -> i32;

    /// Angle to the point in radians, counter-clockwise from +X.
    fn theta(&self) -> f64;

    /// Distance from the origin to the point.
    fn range(&self) -> f64;

    /// Angle to the point rounded to the nearest whole degree.
    fn theta_degrees(&self) -> i32 {
        (self.theta() * 180.0 / PI).round() as i32
    }

    /// The Cartesian form of this point.
    fn to_cart(&self) -> CartCoord {
        CartCoord::new(self.x(), self.y())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CartCoord
// ────────────────────────────────────────────────────────────────────────────

/// An integer Cartesian coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CartCoord {
    pub x: i32,
    pub y: i32,
}

impl CartCoord {
    /// Create a new coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl MapPoint for CartCoord {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn theta(&self) -> f64 {
        f64::from(self.y).atan2(f64::from(self.x))
    }

    fn range(&self) -> f64 {
        f64::from(self.x).hypot(f64::from(self.y))
    }
}

/// Saturating: a sum past `i32::MAX` stays at `i32::MAX`, which no grid
/// contains, so far-away points stay off the map instead of wrapping onto it.
impl Add for CartCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

/// Saturating, like [`Add`].
impl Sub for CartCoord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl From<PolarCoord> for CartCoord {
    fn from(p: PolarCoord) -> Self {
        p.to_cart()
    }
}

impl fmt::Display for CartCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PolarCoord
// ────────────────────────────────────────────────────────────────────────────

/// A polar coordinate: an angle in radians and a range.
///
/// The Cartesian projection truncates toward zero, so `(θ=0.3, r=2.9)` maps
/// to `(2, 0)`.  A negative range projects through the origin onto the
/// opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarCoord {
    pub theta: f64,
    pub range: f64,
}

impl PolarCoord {
    /// Create a polar coordinate from an angle in radians.
    pub fn new(theta: f64, range: f64) -> Self {
        Self { theta, range }
    }

    /// Create a polar coordinate from an angle in whole degrees.
    pub fn from_degrees(degrees: i32, range: i32) -> Self {
        Self::new(f64::from(degrees) * PI / 180.0, f64::from(range))
    }
}

impl MapPoint for PolarCoord {
    fn x(&self) -> i32 {
        (self.theta.cos() * self.range) as i32
    }

    fn y(&self) -> i32 {
        (self.theta.sin() * self.range) as i32
    }

    fn theta(&self) -> f64 {
        self.theta
    }

    fn range(&self) -> f64 {
        self.range
    }
}

impl From<CartCoord> for PolarCoord {
    fn from(c: CartCoord) -> Self {
        Self::new(c.theta(), c.range())
    }
}

impl fmt::Display for PolarCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.theta, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_polar_views_agree() {
        let c = CartCoord::new(3, 4);
        assert!((c.range() - 5.0).abs() < 1e-9);
        assert!((c.theta() - (4.0f64).atan2(3.0)).abs() < 1e-9);
        assert_eq!(c.theta_degrees(), 53);
    }

    #[test]
    fn polar_from_cart_projects_back() {
        let c = CartCoord::new(-7, 2);
        let p = PolarCoord::from(c);
        // Truncation may lose at most one unit per axis.
        assert!((p.x() - c.x).abs() <= 1, "x={}", p.x());
        assert!((p.y() - c.y).abs() <= 1, "y={}", p.y());
    }

    #[test]
    fn polar_from_degrees_on_axes() {
        assert_eq!(PolarCoord::from_degrees(0, 5).to_cart(), CartCoord::new(5, 0));
        assert_eq!(PolarCoord::from_degrees(90, 5).to_cart(), CartCoord::new(0, 5));
        assert_eq!(PolarCoord::from_degrees(180, 5).to_cart(), CartCoord::new(-5, 0));
        assert_eq!(PolarCoord::from_degrees(270, -5).to_cart(), CartCoord::new(0, 5));
    }

    #[test]
    fn polar_projection_truncates_toward_zero() {
        let p = PolarCoord::new(0.0, 2.9);
        assert_eq!(p.x(), 2);
        let q = PolarCoord::new(0.0, -2.9);
        assert_eq!(q.x(), -2);
    }

    #[test]
    fn theta_degrees_rounds() {
        assert_eq!(PolarCoord::new(PI / 2.0, 1.0).theta_degrees(), 90);
        assert_eq!(CartCoord::new(-1, 0).theta_degrees(), 180);
        assert_eq!(CartCoord::new(0, -1).theta_degrees(), -90);
    }

    #[test]
    fn cart_arithmetic() {
        let a = CartCoord::new(100, 100);
        let b = CartCoord::new(-3, 7);
        assert_eq!(a + b, CartCoord::new(97, 107));
        assert_eq!((a + b) - a, b);
    }

    #[test]
    fn cart_arithmetic_saturates_at_the_extremes() {
        let far = CartCoord::new(i32::MAX, i32::MIN);
        assert_eq!(far + CartCoord::new(20, 20), CartCoord::new(i32::MAX, i32::MIN + 20));
        assert_eq!(far - CartCoord::new(-1, 1), CartCoord::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn display_formats() {
        assert_eq!(CartCoord::new(1, -2).to_string(), "(1,-2)");
        assert_eq!(PolarCoord::new(0.5, 2.0).to_string(), "(0.5,2)");
    }
}
