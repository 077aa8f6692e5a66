//! Quadratic Bezier evaluation and closed-form inversion.
//!
//! A segment `B(t) = (1-t)^2 P0 + 2(1-t)t P1 + t^2 P2` is inverted per axis
//! by solving
//!
//! ```text
//! A t^2 + B t + C = 0
//! A = P0 - 2 P1 + P2
//! B = 2 (P1 - P0)
//! C = P0 - target
//! ```
//!
//! with the cancellation-free form `q = -(B + sign(B) sqrt(B^2 - 4AC)) / 2`,
//! roots `q / A` and `C / q`. The second root stays exact when the segment
//! degenerates to a straight line (`A = 0`), which is the case for the mid
//! section of the tone curve.

use gamut_core::Point2;

/// Slack accepted around [0, 1] before a root is rejected.
const T_EPS: f64 = 1e-5;

/// Quadratic Bezier evaluation of one coordinate.
#[inline]
pub fn eval_quadratic(t: f32, p0: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * p1 + t * t * p2
}

/// Real roots of `a t^2 + b t + c = 0`.
///
/// A slightly negative discriminant (rounding noise on a double root) is
/// treated as zero.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let scale = (b * b).max((4.0 * a * c).abs()).max(f64::MIN_POSITIVE);
        if disc < -1e-9 * scale {
            return [None, None];
        }
        disc = 0.0;
    }

    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        // b == 0 and a*c == 0
        return if a != 0.0 || c == 0.0 {
            [Some(0.0), None]
        } else {
            [None, None]
        };
    }

    let r1 = (a != 0.0).then(|| q / a);
    [r1, Some(c / q)]
}

/// Solves one axis of a segment for `target`, returning t in [0, 1].
fn solve_axis(p0: f32, p1: f32, p2: f32, target: f32) -> Option<f32> {
    let (p0, p1, p2, target) = (p0 as f64, p1 as f64, p2 as f64, target as f64);
    let a = p0 - 2.0 * p1 + p2;
    let b = 2.0 * (p1 - p0);
    let c = p0 - target;

    let mut best: Option<f64> = None;
    for root in solve_quadratic(a, b, c).into_iter().flatten() {
        if (-T_EPS..=1.0 + T_EPS).contains(&root) {
            best = Some(best.map_or(root, |r: f64| r.min(root)));
        }
    }
    best.map(|t| t.clamp(0.0, 1.0) as f32)
}

/// One quadratic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBezier {
    /// Start point
    pub p0: Point2,
    /// Control point
    pub p1: Point2,
    /// End point
    pub p2: Point2,
}

impl QuadBezier {
    /// Creates a segment.
    #[inline]
    pub const fn new(p0: Point2, p1: Point2, p2: Point2) -> Self {
        Self { p0, p1, p2 }
    }

    /// x(t).
    #[inline]
    pub fn eval_x(&self, t: f32) -> f32 {
        eval_quadratic(t, self.p0.x, self.p1.x, self.p2.x)
    }

    /// y(t).
    #[inline]
    pub fn eval_y(&self, t: f32) -> f32 {
        eval_quadratic(t, self.p0.y, self.p1.y, self.p2.y)
    }

    /// B(t).
    #[inline]
    pub fn eval(&self, t: f32) -> Point2 {
        Point2::new(self.eval_x(t), self.eval_y(t))
    }

    /// True if `x` lies within the segment's x span.
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        self.p0.x <= x && x <= self.p2.x
    }

    /// True if `y` lies within the segment's y span.
    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        self.p0.y <= y && y <= self.p2.y
    }

    /// Parameter t at which x(t) = `x`.
    #[inline]
    pub fn solve_t_for_x(&self, x: f32) -> Option<f32> {
        solve_axis(self.p0.x, self.p1.x, self.p2.x, x)
    }

    /// Parameter t at which y(t) = `y`.
    #[inline]
    pub fn solve_t_for_y(&self, y: f32) -> Option<f32> {
        solve_axis(self.p0.y, self.p1.y, self.p2.y, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curved() -> QuadBezier {
        QuadBezier::new(Point2::new(0.18, 0.18), Point2::new(0.55, 1.0), Point2::new(11.52, 1.0))
    }

    #[test]
    fn test_endpoints() {
        let s = curved();
        assert_eq!(s.eval(0.0), s.p0);
        assert_eq!(s.eval(1.0), s.p2);
    }

    #[test]
    fn test_quadratic_roots() {
        // (t - 0.25)(t - 0.75) = t^2 - t + 0.1875
        let mut roots: Vec<f64> = solve_quadratic(1.0, -1.0, 0.1875).into_iter().flatten().collect();
        roots.sort_by(f64::total_cmp);
        assert!((roots[0] - 0.25).abs() < 1e-12);
        assert!((roots[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_linear_case() {
        // 2t - 1 = 0
        let roots: Vec<f64> = solve_quadratic(0.0, 2.0, -1.0).into_iter().flatten().collect();
        assert_eq!(roots, vec![0.5]);
    }

    #[test]
    fn test_quadratic_no_real_roots() {
        assert_eq!(solve_quadratic(1.0, 0.0, 1.0), [None, None]);
        assert_eq!(solve_quadratic(0.0, 0.0, 1.0), [None, None]);
    }

    #[test]
    fn test_inverse_x() {
        let s = curved();
        for i in 0..=50 {
            let t0 = i as f32 / 50.0;
            let t = s.solve_t_for_x(s.eval_x(t0)).unwrap();
            assert!((t - t0).abs() < 1e-3, "t0={t0} t={t}");
        }
    }

    #[test]
    fn test_inverse_y_double_root() {
        // y reaches its flat maximum at t = 1
        let s = curved();
        let t = s.solve_t_for_y(1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_straight_segment() {
        let s = QuadBezier::new(Point2::new(0.0, 0.0), Point2::new(0.5, 1.0), Point2::new(1.0, 2.0));
        assert!((s.solve_t_for_x(0.25).unwrap() - 0.25).abs() < 1e-6);
        assert!((s.solve_t_for_y(1.5).unwrap() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_span() {
        let s = curved();
        assert!(s.solve_t_for_x(20.0).is_none());
        assert!(!s.contains_x(0.1));
        assert!(s.contains_y(0.5));
    }
}
