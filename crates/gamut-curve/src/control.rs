//! Control points and curve construction.
//!
//! The builder anchors a straight line of the configured slope at mid-grey
//! (`y = slope * x + b`) and hangs the three segments off it:
//!
//! - **Toe** `(P0, P1, P2)`: P0 is the origin; P1 and P2 sit on the line at
//!   [`TOE_CONTROL_Y`] and [`TOE_END_Y`].
//! - **Mid** `(P2, P3, P4)`: P3 is the midpoint of P2 and mid-grey, so the
//!   segment is the straight line itself.
//! - **Shoulder** `(P4, P5, P6)`: P4 is mid-grey, P5 is where the line meets
//!   the max display value, P6 is `(max radiometric, max display)`.
//!
//! Control points are immutable; a parameter change builds a new set.

use gamut_core::Point2;
use tracing::debug;

use crate::config::{CurveConfig, TOE_CONTROL_Y, TOE_END_Y};
use crate::{CurveError, CurveResult, QuadBezier};

/// Curve segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Shadows, P0..P2.
    Toe,
    /// Straight section, P2..P4.
    Mid,
    /// Highlights, P4..P6.
    Shoulder,
}

impl Segment {
    /// Segments in curve order.
    pub const ALL: [Segment; 3] = [Segment::Toe, Segment::Mid, Segment::Shoulder];

    /// Position in curve order.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Segment::Toe => 0,
            Segment::Mid => 1,
            Segment::Shoulder => 2,
        }
    }

    /// Lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Segment::Toe => "toe",
            Segment::Mid => "mid",
            Segment::Shoulder => "shoulder",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven control points P0..P6 of a tone curve.
///
/// Invariant: x is non-decreasing from P0 to P6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoints {
    points: [Point2; 7],
}

impl ControlPoints {
    /// Builds control points from a config. Shortcut for [`CurveBuilder`].
    pub fn build(config: &CurveConfig) -> CurveResult<Self> {
        CurveBuilder::new(config).build()
    }

    /// Wraps explicit points after checking the x ordering.
    pub fn from_points(points: [Point2; 7]) -> CurveResult<Self> {
        for (i, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(CurveError::NonFinite(if p.x.is_finite() { p.y } else { p.x }));
            }
            if i > 0 && p.x < points[i - 1].x {
                return Err(CurveError::NonMonotonic {
                    index: i,
                    x: p.x,
                    prev: i - 1,
                    prev_x: points[i - 1].x,
                });
            }
        }
        Ok(Self { points })
    }

    /// All points.
    #[inline]
    pub fn points(&self) -> &[Point2; 7] {
        &self.points
    }

    /// Point `P{index}`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Point2> {
        self.points.get(index).copied()
    }

    /// Bezier of one segment.
    #[inline]
    pub fn segment(&self, segment: Segment) -> QuadBezier {
        let i = segment.index() * 2;
        QuadBezier::new(self.points[i], self.points[i + 1], self.points[i + 2])
    }

    /// All three segments in order.
    pub fn segments(&self) -> [QuadBezier; 3] {
        Segment::ALL.map(|s| self.segment(s))
    }

    /// P0.
    #[inline]
    pub fn origin(&self) -> Point2 {
        self.points[0]
    }

    /// P4.
    #[inline]
    pub fn mid_grey(&self) -> Point2 {
        self.points[4]
    }

    /// P6.
    #[inline]
    pub fn end(&self) -> Point2 {
        self.points[6]
    }

    /// x-domain `[P0.x, P6.x]`.
    #[inline]
    pub fn domain(&self) -> (f32, f32) {
        (self.points[0].x, self.points[6].x)
    }

    /// y-range `[P0.y, P6.y]`.
    #[inline]
    pub fn range(&self) -> (f32, f32) {
        (self.points[0].y, self.points[6].y)
    }
}

/// Builds [`ControlPoints`] from a [`CurveConfig`].
#[derive(Debug, Clone, Copy)]
pub struct CurveBuilder<'a> {
    config: &'a CurveConfig,
}

impl<'a> CurveBuilder<'a> {
    /// Creates a builder over a config.
    pub fn new(config: &'a CurveConfig) -> Self {
        Self { config }
    }

    /// Validates the config and constructs the seven points.
    pub fn build(&self) -> CurveResult<ControlPoints> {
        let c = self.config;
        c.validate()?;

        let slope = c.slope;
        let grey = c.mid_grey;
        let intercept = grey.y - slope * grey.x;
        let x_on_line = |y: f32| (y - intercept) / slope;

        let p0 = c.origin();
        let p6 = Point2::new(c.max_radiometric_value(), c.max_display_value);

        let toe_y = TOE_CONTROL_Y.max(p0.y);
        let p1 = Point2::new(x_on_line(toe_y).max(p0.x), toe_y);
        let p2 = Point2::new(x_on_line(TOE_END_Y), TOE_END_Y);
        if p2.x <= p0.x {
            return Err(CurveError::InvalidConfig(format!(
                "toe end x {} falls below origin x {} (slope {slope} too shallow for this origin)",
                p2.x, p0.x
            )));
        }

        let p3 = p2.midpoint(grey);
        let p4 = grey;
        let p5 = Point2::new(x_on_line(c.max_display_value).min(p6.x), c.max_display_value);

        let points = ControlPoints::from_points([p0, p1, p2, p3, p4, p5, p6])?;
        debug!(
            slope,
            origin_x = p0.x,
            end_x = p6.x,
            toe_end_x = p2.x,
            shoulder_x = p5.x,
            "built tone curve control points"
        );
        Ok(points)
    }
}
