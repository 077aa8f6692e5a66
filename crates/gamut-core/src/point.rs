//! 2D point type used for curve control points.

use serde::{Deserialize, Serialize};

/// A point in curve space.
///
/// `x` is a scene-referred (radiometric) value, `y` a display-referred one.
///
/// # Example
///
/// ```rust
/// use gamut_core::Point2;
///
/// let a = Point2::new(0.0, 0.0);
/// let b = Point2::new(2.0, 4.0);
/// assert_eq!(a.midpoint(b), Point2::new(1.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal (input) coordinate
    pub x: f32,
    /// Vertical (output) coordinate
    pub y: f32,
}

impl Point2 {
    /// Creates a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a point with both coordinates equal, e.g. a grey point.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: 0.5 * (self.x + other.x),
            y: 0.5 * (self.y + other.y),
        }
    }

    /// True if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
