//! Pre-evaluated curve samples.
//!
//! A [`SampleTable`] holds three parallel arrays `x`, `t`, `y` of equal
//! length. `x` is sorted ascending and spans exactly `[P0.x, P6.x]`; `t` is
//! the segment-local Bezier parameter solved for each `x`; `y` is the curve
//! evaluated at that parameter.
//!
//! Lookups first bracket the query by segment using the control points and
//! then binary search only that segment's samples, widened by one sample on
//! each side so queries that fall between two segments still find both
//! neighbours.
//!
//! # Spacing
//!
//! | Mode | `x_i` |
//! |------|-------|
//! | `Linear` | `x0 + (x1 - x0) * s` |
//! | `Quadratic` | `x0 + (x1 - x0) * s^2` |
//! | `Log2` | `x0 * (x1 / x0)^s` |
//!
//! with `s = i / (n - 1)`. Log2 spacing gives every stop of exposure the same
//! number of samples, which keeps the toe as well resolved as the shoulder.

use std::ops::Range;
use std::str::FromStr;

use gamut_core::{inverse_lerp, lerp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ControlPoints, CurveError, CurveResult, Segment, solver};

/// Default number of samples per table.
pub const DEFAULT_TABLE_SIZE: usize = 1024;

/// Distribution of sample abscissas across the curve domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSpacing {
    /// Uniform in linear x.
    Linear,
    /// Denser toward the origin.
    Quadratic,
    /// Uniform in stops.
    #[default]
    Log2,
}

impl SampleSpacing {
    /// Abscissa of sample `i` of `n` over `[x0, x1]`.
    fn abscissa(self, i: usize, n: usize, x0: f32, x1: f32) -> f32 {
        let s = (i as f64) / ((n - 1) as f64);
        let (a, b) = (x0 as f64, x1 as f64);
        let x = match self {
            SampleSpacing::Linear => a + (b - a) * s,
            SampleSpacing::Quadratic => a + (b - a) * s * s,
            SampleSpacing::Log2 => a * (b / a).powf(s),
        };
        x as f32
    }
}

impl FromStr for SampleSpacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            "log2" | "log" => Ok(Self::Log2),
            other => Err(format!("unknown sample spacing '{other}'")),
        }
    }
}

/// How a lookup resolves a query between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Closest sample.
    Nearest,
    /// Linear blend of the two bracketing samples, weighted in linear x.
    #[default]
    Bilinear,
}

impl FromStr for LookupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            other => Err(format!("unknown lookup mode '{other}'")),
        }
    }
}

/// Sampled tone curve with fast approximate lookups.
///
/// # Example
///
/// ```rust
/// use gamut_curve::{ControlPoints, CurveConfig, LookupMode, SampleSpacing, SampleTable};
///
/// let points = ControlPoints::build(&CurveConfig::default()).unwrap();
/// let table = SampleTable::build(&points, 256, SampleSpacing::Linear).unwrap();
/// assert_eq!(table.len(), 256);
///
/// let top = table.lookup_y_for_x(1000.0, LookupMode::Nearest);
/// assert_eq!(top, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SampleTable {
    points: ControlPoints,
    spacing: SampleSpacing,
    x: Vec<f32>,
    t: Vec<f32>,
    y: Vec<f32>,
    /// Sample index ranges per segment, in curve order.
    ranges: [Range<usize>; 3],
}

impl SampleTable {
    /// Samples `points` at `size` abscissas.
    ///
    /// The first and last abscissa are exactly `P0.x` and `P6.x`.
    pub fn build(points: &ControlPoints, size: usize, spacing: SampleSpacing) -> CurveResult<Self> {
        if size < 2 {
            return Err(CurveError::InvalidConfig(format!(
                "sample table needs at least 2 samples, got {size}"
            )));
        }
        let (x0, x1) = points.domain();
        if spacing == SampleSpacing::Log2 && x0 <= 0.0 {
            return Err(CurveError::InvalidConfig(format!(
                "log2 sample spacing needs a positive origin, got x={x0}"
            )));
        }

        let mut x = Vec::with_capacity(size);
        let mut prev = x0;
        for i in 0..size {
            let xi = match i {
                0 => x0,
                _ if i == size - 1 => x1,
                _ => spacing.abscissa(i, size, x0, x1).clamp(prev, x1),
            };
            x.push(xi);
            prev = xi;
        }

        let (t, y) = solver::solve_batch(points, &x)?;
        let table = Self::assemble(*points, spacing, x, t, y);
        debug!(
            size,
            ?spacing,
            x_min = x0,
            x_max = x1,
            toe = table.ranges[0].len(),
            mid = table.ranges[1].len(),
            shoulder = table.ranges[2].len(),
            "built curve sample table"
        );
        Ok(table)
    }

    /// Wraps precomputed arrays sampled with `spacing`.
    ///
    /// Fails with [`CurveError::TableMismatch`] if the arrays differ in
    /// length, hold fewer than two samples, or `x` is not sorted ascending.
    pub fn from_parts(
        points: ControlPoints,
        spacing: SampleSpacing,
        x: Vec<f32>,
        t: Vec<f32>,
        y: Vec<f32>,
    ) -> CurveResult<Self> {
        if x.len() != t.len() || x.len() != y.len() {
            return Err(CurveError::TableMismatch(format!(
                "x/t/y lengths differ: {}/{}/{}",
                x.len(),
                t.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(CurveError::TableMismatch(format!("{} samples, need at least 2", x.len())));
        }
        if let Some(i) = x.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(CurveError::TableMismatch(format!(
                "x not ascending at sample {}: {} after {}",
                i + 1,
                x[i + 1],
                x[i]
            )));
        }
        Ok(Self::assemble(points, spacing, x, t, y))
    }

    fn assemble(points: ControlPoints, spacing: SampleSpacing, x: Vec<f32>, t: Vec<f32>, y: Vec<f32>) -> Self {
        let toe_end = x.partition_point(|&v| v <= points.segment(Segment::Toe).p2.x);
        let mid_end = x.partition_point(|&v| v <= points.segment(Segment::Mid).p2.x);
        Self {
            points,
            spacing,
            ranges: [0..toe_end, toe_end..mid_end, mid_end..x.len()],
            x,
            t,
            y,
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false; a table holds at least two samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Control points the table was sampled from.
    #[inline]
    pub fn points(&self) -> &ControlPoints {
        &self.points
    }

    /// Abscissa distribution used at build time.
    #[inline]
    pub fn spacing(&self) -> SampleSpacing {
        self.spacing
    }

    /// Sample abscissas.
    #[inline]
    pub fn x_values(&self) -> &[f32] {
        &self.x
    }

    /// Segment-local Bezier parameters.
    #[inline]
    pub fn t_values(&self) -> &[f32] {
        &self.t
    }

    /// Curve values.
    #[inline]
    pub fn y_values(&self) -> &[f32] {
        &self.y
    }

    /// `(x, t, y)` of sample `i`.
    pub fn sample(&self, i: usize) -> Option<(f32, f32, f32)> {
        Some((*self.x.get(i)?, self.t[i], self.y[i]))
    }

    /// Sample indices belonging to `segment`.
    pub fn segment_range(&self, segment: Segment) -> Range<usize> {
        self.ranges[segment.index()].clone()
    }

    /// `[x_first, x_last]`.
    #[inline]
    pub fn domain(&self) -> (f32, f32) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn segment_for_x(&self, x: f32) -> Segment {
        if x <= self.points.segment(Segment::Toe).p2.x {
            Segment::Toe
        } else if x <= self.points.segment(Segment::Mid).p2.x {
            Segment::Mid
        } else {
            Segment::Shoulder
        }
    }

    /// Index of the first sample with `x >= value`, searched inside the
    /// bracketing segment, clamped to `[1, len - 1]`.
    fn upper_index(&self, value: f32) -> usize {
        let n = self.x.len();
        let seg = self.segment_for_x(value);
        let r = &self.ranges[seg.index()];
        let start = r.start.saturating_sub(1);
        let end = (r.end + 1).min(n);
        let hi = start + self.x[start..end].partition_point(|&v| v < value);
        hi.clamp(1, n - 1)
    }

    /// Approximate curve value at `x`.
    ///
    /// Queries below the first sample (including NaN) return the first y;
    /// queries above the last sample return the last y.
    pub fn lookup_y_for_x(&self, x: f32, mode: LookupMode) -> f32 {
        let n = self.x.len();
        if x.is_nan() || x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let hi = self.upper_index(x);
        let lo = hi - 1;
        match mode {
            LookupMode::Nearest => {
                if x - self.x[lo] <= self.x[hi] - x {
                    self.y[lo]
                } else {
                    self.y[hi]
                }
            }
            LookupMode::Bilinear => {
                let w = inverse_lerp(self.x[lo], self.x[hi], x);
                lerp(self.y[lo], self.y[hi], w)
            }
        }
    }

    /// Approximate inverse: scene value reaching display value `y`.
    ///
    /// Flat runs of `y` resolve to their first sample.
    pub fn lookup_x_for_y(&self, y: f32, mode: LookupMode) -> f32 {
        let n = self.y.len();
        if y.is_nan() || y <= self.y[0] {
            return self.x[0];
        }
        if y > self.y[n - 1] {
            return self.x[n - 1];
        }

        let hi = self.y.partition_point(|&v| v < y).clamp(1, n - 1);
        let lo = hi - 1;
        match mode {
            LookupMode::Nearest => {
                if y - self.y[lo] <= self.y[hi] - y {
                    self.x[lo]
                } else {
                    self.x[hi]
                }
            }
            LookupMode::Bilinear => {
                let w = inverse_lerp(self.y[lo], self.y[hi], y);
                lerp(self.x[lo], self.x[hi], w)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurveConfig;
    use approx::assert_abs_diff_eq;

    fn table(spacing: SampleSpacing) -> SampleTable {
        let cp = ControlPoints::build(&CurveConfig::default()).unwrap();
        SampleTable::build(&cp, DEFAULT_TABLE_SIZE, spacing).unwrap()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_endpoints_exact() {
        for spacing in [SampleSpacing::Linear, SampleSpacing::Quadratic, SampleSpacing::Log2] {
            let t = table(spacing);
            let (x0, x1) = t.points().domain();
            assert_eq!(t.domain(), (x0, x1));
            assert_abs_diff_eq!(t.y_values()[0], t.points().origin().y, epsilon = 1e-6);
            assert_abs_diff_eq!(t.y_values()[t.len() - 1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_monotonic_across_slopes() {
        for i in 0..=10 {
            let slope = 1.02 + (6.5 - 1.02) * i as f32 / 10.0;
            let cp = ControlPoints::build(&CurveConfig::default().with_slope(slope)).unwrap();
            for spacing in [SampleSpacing::Linear, SampleSpacing::Quadratic, SampleSpacing::Log2] {
                let t = SampleTable::build(&cp, DEFAULT_TABLE_SIZE, spacing).unwrap();
                for w in t.x_values().windows(2) {
                    assert!(w[1] >= w[0]);
                }
                for (k, w) in t.y_values().windows(2).enumerate() {
                    assert!(w[1] >= w[0] - 1e-6, "slope={slope} {spacing:?} k={k}: {} -> {}", w[0], w[1]);
                }
            }
        }
    }

    #[test]
    fn test_t_in_unit_range() {
        let t = table(SampleSpacing::Log2);
        assert!(t.t_values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_segment_ranges_cover_table() {
        let t = table(SampleSpacing::Log2);
        let toe = t.segment_range(Segment::Toe);
        let mid = t.segment_range(Segment::Mid);
        let shoulder = t.segment_range(Segment::Shoulder);
        assert_eq!(toe.start, 0);
        assert_eq!(toe.end, mid.start);
        assert_eq!(mid.end, shoulder.start);
        assert_eq!(shoulder.end, t.len());
        assert!(!toe.is_empty() && !mid.is_empty() && !shoulder.is_empty());
    }

    #[test]
    fn test_too_small() {
        let cp = ControlPoints::build(&CurveConfig::default()).unwrap();
        assert!(SampleTable::build(&cp, 1, SampleSpacing::Linear).is_err());
    }

    #[test]
    fn test_from_parts_mismatch() {
        let cp = ControlPoints::build(&CurveConfig::default()).unwrap();
        let linear = SampleSpacing::Linear;
        let err = SampleTable::from_parts(cp, linear, vec![0.1, 0.2], vec![0.0], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(err, CurveError::TableMismatch(_)));
        let err =
            SampleTable::from_parts(cp, linear, vec![0.2, 0.1], vec![0.0, 1.0], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(err, CurveError::TableMismatch(_)));
    }

    #[test]
    fn test_from_parts_keeps_spacing() {
        let built = table(SampleSpacing::Quadratic);
        let parts = SampleTable::from_parts(
            *built.points(),
            SampleSpacing::Quadratic,
            built.x_values().to_vec(),
            built.t_values().to_vec(),
            built.y_values().to_vec(),
        )
        .unwrap();
        assert_eq!(parts.spacing(), SampleSpacing::Quadratic);
        assert_eq!(parts.segment_range(Segment::Mid), built.segment_range(Segment::Mid));
        for x in [0.01_f32, 0.18, 2.0] {
            assert_eq!(
                parts.lookup_y_for_x(x, LookupMode::Bilinear),
                built.lookup_y_for_x(x, LookupMode::Bilinear)
            );
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[test]
    fn test_mid_grey_lookup() {
        let t = table(SampleSpacing::Log2);
        assert_abs_diff_eq!(t.lookup_y_for_x(0.18, LookupMode::Bilinear), 0.18, epsilon = 1e-4);
        assert_abs_diff_eq!(t.lookup_y_for_x(0.18, LookupMode::Nearest), 0.18, epsilon = 2e-3);
    }

    #[test]
    fn test_lookup_matches_exact_solve() {
        let t = table(SampleSpacing::Log2);
        let cp = *t.points();
        for &x in &[0.005_f32, 0.03, 0.1, 0.25, 0.9, 4.0, 10.0] {
            let exact = solver::solve_y_for_x(&cp, x).unwrap();
            let approx = t.lookup_y_for_x(x, LookupMode::Bilinear);
            assert_abs_diff_eq!(approx, exact, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_lookup_hits_samples() {
        let t = table(SampleSpacing::Linear);
        for i in [1, 100, 500, 1000] {
            let (x, _, y) = t.sample(i).unwrap();
            assert_abs_diff_eq!(t.lookup_y_for_x(x, LookupMode::Nearest), y, epsilon = 1e-6);
            assert_abs_diff_eq!(t.lookup_y_for_x(x, LookupMode::Bilinear), y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_lookup_clamps() {
        let t = table(SampleSpacing::Log2);
        assert_eq!(t.lookup_y_for_x(-1.0, LookupMode::Bilinear), t.y_values()[0]);
        assert_eq!(t.lookup_y_for_x(f32::NAN, LookupMode::Bilinear), t.y_values()[0]);
        assert_eq!(t.lookup_y_for_x(1e6, LookupMode::Nearest), t.y_values()[t.len() - 1]);
    }

    #[test]
    fn test_inverse_lookup() {
        let t = table(SampleSpacing::Log2);
        assert_abs_diff_eq!(t.lookup_x_for_y(0.18, LookupMode::Bilinear), 0.18, epsilon = 1e-3);
        let x = t.lookup_x_for_y(0.5, LookupMode::Bilinear);
        assert_abs_diff_eq!(t.lookup_y_for_x(x, LookupMode::Bilinear), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("log2".parse::<SampleSpacing>().unwrap(), SampleSpacing::Log2);
        assert_eq!("Nearest".parse::<LookupMode>().unwrap(), LookupMode::Nearest);
        assert!("cubic".parse::<LookupMode>().is_err());
    }
}
