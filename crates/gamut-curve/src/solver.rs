//! Whole-curve solves: x -> t -> y and y -> t -> x.
//!
//! The segment holding a query is found by comparing it against the
//! segment endpoints (P0/P2, P2/P4, P4/P6). Queries outside the curve are
//! clamped to the nearest endpoint, `t = 0` on the toe or `t = 1` on the
//! shoulder, and logged at `warn` level. NaN and infinite queries fail.

use tracing::{trace, warn};

use crate::bezier::eval_quadratic;
use crate::{ControlPoints, CurveError, CurveResult, QuadBezier, Segment};
use gamut_core::Point2;

/// Location on the curve: a segment and its local Bezier parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePosition {
    /// Segment holding the point.
    pub segment: Segment,
    /// Local parameter in [0, 1].
    pub t: f32,
}

impl CurvePosition {
    /// Evaluates the position on `points`.
    #[inline]
    pub fn eval(&self, points: &ControlPoints) -> Point2 {
        points.segment(self.segment).eval(self.t)
    }
}

/// y of a quadratic Bezier at `t`.
#[inline]
pub fn eval_y_from_t(t: f32, p0: Point2, p1: Point2, p2: Point2) -> f32 {
    eval_quadratic(t, p0.y, p1.y, p2.y)
}

/// x of a quadratic Bezier at `t`.
#[inline]
pub fn eval_x_from_t(t: f32, p0: Point2, p1: Point2, p2: Point2) -> f32 {
    eval_quadratic(t, p0.x, p1.x, p2.x)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }

    fn contains(self, seg: &QuadBezier, v: f32) -> bool {
        match self {
            Axis::X => seg.contains_x(v),
            Axis::Y => seg.contains_y(v),
        }
    }

    fn solve(self, seg: &QuadBezier, v: f32) -> Option<f32> {
        match self {
            Axis::X => seg.solve_t_for_x(v),
            Axis::Y => seg.solve_t_for_y(v),
        }
    }

    fn bounds(self, points: &ControlPoints) -> (f32, f32) {
        match self {
            Axis::X => points.domain(),
            Axis::Y => points.range(),
        }
    }
}

fn locate(points: &ControlPoints, value: f32, axis: Axis) -> CurveResult<CurvePosition> {
    if !value.is_finite() {
        return Err(CurveError::NonFinite(value));
    }

    let (lo, hi) = axis.bounds(points);
    if value < lo {
        warn!(axis = axis.name(), value, lo, "curve query below domain, clamping to origin");
        return Ok(CurvePosition { segment: Segment::Toe, t: 0.0 });
    }
    if value > hi {
        warn!(axis = axis.name(), value, hi, "curve query above domain, clamping to end");
        return Ok(CurvePosition { segment: Segment::Shoulder, t: 1.0 });
    }

    for segment in Segment::ALL {
        let seg = points.segment(segment);
        if !axis.contains(&seg, value) {
            continue;
        }
        // Flat spans (shared y on toe/shoulder) can match more than one
        // segment; fall through to the next one if this one has no root.
        if let Some(t) = axis.solve(&seg, value) {
            trace!(axis = axis.name(), value, %segment, t, "solved curve parameter");
            return Ok(CurvePosition { segment, t });
        }
    }

    Err(CurveError::NoRoot {
        axis: axis.name(),
        value,
        segment: Segment::ALL
            .into_iter()
            .find(|s| axis.contains(&points.segment(*s), value))
            .unwrap_or(Segment::Shoulder)
            .name(),
    })
}

/// Finds the segment and parameter t where the curve reaches `x`.
pub fn solve_t_for_x(points: &ControlPoints, x: f32) -> CurveResult<CurvePosition> {
    locate(points, x, Axis::X)
}

/// Finds the segment and parameter t where the curve reaches `y`.
pub fn solve_t_for_y(points: &ControlPoints, y: f32) -> CurveResult<CurvePosition> {
    locate(points, y, Axis::Y)
}

/// Display value for a scene value, solved exactly.
///
/// # Example
///
/// ```rust
/// use gamut_curve::{solver, ControlPoints, CurveConfig};
///
/// let cp = ControlPoints::build(&CurveConfig::default()).unwrap();
/// let y = solver::solve_y_for_x(&cp, 0.18).unwrap();
/// assert!((y - 0.18).abs() < 1e-5);
/// ```
pub fn solve_y_for_x(points: &ControlPoints, x: f32) -> CurveResult<f32> {
    let pos = solve_t_for_x(points, x)?;
    Ok(points.segment(pos.segment).eval_y(pos.t))
}

/// Scene value for a display value, solved exactly.
pub fn solve_x_for_y(points: &ControlPoints, y: f32) -> CurveResult<f32> {
    let pos = solve_t_for_y(points, y)?;
    Ok(points.segment(pos.segment).eval_x(pos.t))
}

/// Solves a batch of x samples into parallel t and y arrays.
pub fn solve_batch(points: &ControlPoints, xs: &[f32]) -> CurveResult<(Vec<f32>, Vec<f32>)> {
    let mut ts = Vec::with_capacity(xs.len());
    let mut ys = Vec::with_capacity(xs.len());
    for &x in xs {
        let pos = solve_t_for_x(points, x)?;
        ts.push(pos.t);
        ys.push(points.segment(pos.segment).eval_y(pos.t));
    }
    Ok((ts, ys))
}
