//! Parametric evaluation of pattern edges.

use crate::math::{perp, Point2, Real, Vector2};
use core::f64::consts::PI;

// 5-point Gauss-Legendre quadrature on [-1, 1].
const GAUSS_NODES: [Real; 5] = [
    0.0,
    -0.538_469_310_105_683_1,
    0.538_469_310_105_683_1,
    -0.906_179_845_938_664,
    0.906_179_845_938_664,
];
const GAUSS_WEIGHTS: [Real; 5] = [
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_47,
    0.478_628_670_499_366_47,
    0.236_926_885_056_189_08,
    0.236_926_885_056_189_08,
];
const GAUSS_SUBINTERVALS: usize = 16;

/// Converts a point expressed relative to the segment `[start, end]` into absolute coordinates.
///
/// The first relative coordinate runs along `end - start`, the second along its
/// counter-clockwise perpendicular, both scaled by the segment length.
#[inline]
pub fn rel_to_abs(start: &Point2<Real>, end: &Point2<Real>, rel: [Real; 2]) -> Point2<Real> {
    let dir = end - start;
    start + dir * rel[0] + perp(&dir) * rel[1]
}

/// Inverse of [`rel_to_abs`].
#[inline]
pub fn abs_to_rel(start: &Point2<Real>, end: &Point2<Real>, pt: &Point2<Real>) -> [Real; 2] {
    let dir = end - start;
    let sq_len = dir.norm_squared();
    let v = pt - start;
    [v.dot(&dir) / sq_len, v.dot(&perp(&dir)) / sq_len]
}

/// The explicit geometry of a pattern edge.
///
/// Edges store their curvature relative to their endpoints; this is the absolute
/// representation used to sample, measure and split them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CurveGeometry {
    /// A straight segment.
    Line([Point2<Real>; 2]),
    /// A quadratic Bézier curve.
    Quadratic([Point2<Real>; 3]),
    /// A cubic Bézier curve.
    Cubic([Point2<Real>; 4]),
    /// A circular arc.
    Arc {
        /// Center of the supporting circle.
        center: Point2<Real>,
        /// Radius of the supporting circle.
        radius: Real,
        /// Angle of the first point of the arc.
        start_angle: Real,
        /// Signed angle swept from the first to the last point. Positive when counter-clockwise.
        sweep: Real,
    },
}

/// Computes the arc going from `start` to `end` with the given SVG-like flags.
///
/// `right` means the arc bulges toward the right-hand side of `start → end`. A radius
/// smaller than half the chord is enlarged to that half-chord, giving a half circle.
pub fn arc_from_flags(
    start: &Point2<Real>,
    end: &Point2<Real>,
    radius: Real,
    large_arc: bool,
    right: bool,
) -> CurveGeometry {
    let chord = end - start;
    let half_chord = chord.norm() * 0.5;
    let radius = radius.abs().max(half_chord);
    let offset = (radius * radius - half_chord * half_chord).max(0.0).sqrt();
    let mid = na::center(start, end);
    let left = perp(&chord).normalize();
    let bulge = if right { -left } else { left };
    let center = if large_arc {
        mid + bulge * offset
    } else {
        mid - bulge * offset
    };

    let angle = |p: &Point2<Real>| (p.y - center.y).atan2(p.x - center.x);
    let start_angle = angle(start);
    let ccw = (angle(end) - start_angle).rem_euclid(2.0 * PI);
    let bulges = |sweep: Real| {
        let mid_angle = start_angle + sweep * 0.5;
        let mid_pt = center + Vector2::new(mid_angle.cos(), mid_angle.sin()) * radius;
        (mid_pt - mid).dot(&bulge)
    };
    let cw = ccw - 2.0 * PI;
    let sweep = if bulges(ccw) >= bulges(cw) { ccw } else { cw };

    CurveGeometry::Arc {
        center,
        radius,
        start_angle,
        sweep,
    }
}

fn lerp(a: &Point2<Real>, b: &Point2<Real>, t: Real) -> Point2<Real> {
    a + (b - a) * t
}

impl CurveGeometry {
    /// The point at the curve parameter `t ∈ [0, 1]`.
    pub fn point_at(&self, t: Real) -> Point2<Real> {
        match self {
            CurveGeometry::Line([a, b]) => lerp(a, b, t),
            CurveGeometry::Quadratic([p0, p1, p2]) => {
                let s = 1.0 - t;
                Point2::from(p0.coords * (s * s) + p1.coords * (2.0 * s * t) + p2.coords * (t * t))
            }
            CurveGeometry::Cubic([p0, p1, p2, p3]) => {
                let s = 1.0 - t;
                Point2::from(
                    p0.coords * (s * s * s)
                        + p1.coords * (3.0 * s * s * t)
                        + p2.coords * (3.0 * s * t * t)
                        + p3.coords * (t * t * t),
                )
            }
            CurveGeometry::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let angle = start_angle + sweep * t;
                center + Vector2::new(angle.cos(), angle.sin()) * *radius
            }
        }
    }

    /// The derivative of the curve with respect to its parameter.
    pub fn derivative_at(&self, t: Real) -> Vector2<Real> {
        match self {
            CurveGeometry::Line([a, b]) => b - a,
            CurveGeometry::Quadratic([p0, p1, p2]) => {
                (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t)
            }
            CurveGeometry::Cubic([p0, p1, p2, p3]) => {
                let s = 1.0 - t;
                (p1 - p0) * (3.0 * s * s) + (p2 - p1) * (6.0 * s * t) + (p3 - p2) * (3.0 * t * t)
            }
            CurveGeometry::Arc {
                radius,
                start_angle,
                sweep,
                ..
            } => {
                let angle = start_angle + sweep * t;
                Vector2::new(-angle.sin(), angle.cos()) * (radius * sweep)
            }
        }
    }

    /// The length of the curve between the parameters `t0` and `t1`.
    pub fn length_between(&self, t0: Real, t1: Real) -> Real {
        match self {
            CurveGeometry::Line([a, b]) => (b - a).norm() * (t1 - t0),
            CurveGeometry::Arc { radius, sweep, .. } => radius * sweep.abs() * (t1 - t0),
            _ => {
                let h = (t1 - t0) / GAUSS_SUBINTERVALS as Real;
                let mut length = 0.0;

                for k in 0..GAUSS_SUBINTERVALS {
                    let mid = t0 + h * (k as Real + 0.5);
                    for (node, weight) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS.iter()) {
                        length += weight * self.derivative_at(mid + node * h * 0.5).norm();
                    }
                }

                length * h * 0.5
            }
        }
    }

    /// The total length of the curve.
    pub fn length(&self) -> Real {
        self.length_between(0.0, 1.0)
    }

    /// The curve parameter at which the arc length from the start equals `s`.
    ///
    /// `s` is clamped to `[0, length]`.
    pub fn param_at_length(&self, s: Real) -> Real {
        let total = self.length();

        if total <= Real::EPSILON {
            return 0.0;
        }

        let s = s.clamp(0.0, total);

        match self {
            CurveGeometry::Line(_) | CurveGeometry::Arc { .. } => s / total,
            _ => {
                // Newton iterations, safeguarded by bisection.
                let (mut lo, mut hi) = (0.0, 1.0);
                let mut t = s / total;

                for _ in 0..32 {
                    let f = self.length_between(0.0, t) - s;

                    if f.abs() <= total * 1.0e-12 {
                        break;
                    }

                    if f > 0.0 {
                        hi = t;
                    } else {
                        lo = t;
                    }

                    let speed = self.derivative_at(t).norm();
                    let newton = t - f / speed;
                    t = if speed > Real::EPSILON && newton > lo && newton < hi {
                        newton
                    } else {
                        (lo + hi) * 0.5
                    };
                }

                t
            }
        }
    }

    /// The point located at the arc length `s` from the start of the curve.
    pub fn point_at_length(&self, s: Real) -> Point2<Real> {
        self.point_at(self.param_at_length(s))
    }

    /// The part of this curve between the parameters `t0` and `t1`, reparameterized on `[0, 1]`.
    pub fn sub_curve(&self, t0: Real, t1: Real) -> CurveGeometry {
        match self {
            CurveGeometry::Line(_) => CurveGeometry::Line([self.point_at(t0), self.point_at(t1)]),
            CurveGeometry::Quadratic(pts) => {
                // Blossoming: the control points of the restriction to [t0, t1].
                let blossom = |u: Real, v: Real| {
                    let a = lerp(&pts[0], &pts[1], u);
                    let b = lerp(&pts[1], &pts[2], u);
                    lerp(&a, &b, v)
                };
                CurveGeometry::Quadratic([blossom(t0, t0), blossom(t0, t1), blossom(t1, t1)])
            }
            CurveGeometry::Cubic(pts) => {
                let blossom = |u: Real, v: Real, w: Real| {
                    let a = [
                        lerp(&pts[0], &pts[1], u),
                        lerp(&pts[1], &pts[2], u),
                        lerp(&pts[2], &pts[3], u),
                    ];
                    let b = [lerp(&a[0], &a[1], v), lerp(&a[1], &a[2], v)];
                    lerp(&b[0], &b[1], w)
                };
                CurveGeometry::Cubic([
                    blossom(t0, t0, t0),
                    blossom(t0, t0, t1),
                    blossom(t0, t1, t1),
                    blossom(t1, t1, t1),
                ])
            }
            CurveGeometry::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => CurveGeometry::Arc {
                center: *center,
                radius: *radius,
                start_angle: start_angle + sweep * t0,
                sweep: sweep * (t1 - t0),
            },
        }
    }

    /// `n` points evenly spaced by arc length, both endpoints included.
    pub fn sample_by_length(&self, n: usize) -> Vec<Point2<Real>> {
        let total = self.length();
        let last = n.saturating_sub(1).max(1) as Real;

        (0..n)
            .map(|k| self.point_at_length(total * k as Real / last))
            .collect()
    }

    /// `n + 1` points evenly spaced in parameter space, both endpoints included.
    pub fn linearize(&self, n: usize) -> Vec<Point2<Real>> {
        let n = n.max(1);
        (0..=n).map(|k| self.point_at(k as Real / n as Real)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_coordinates_round_trip() {
        let (a, b) = (Point2::new(1.0, 1.0), Point2::new(3.0, 1.0));
        let p = rel_to_abs(&a, &b, [0.5, 0.25]);
        assert_relative_eq!(p, Point2::new(2.0, 1.5));
        let rel = abs_to_rel(&a, &b, &p);
        assert_relative_eq!(rel[0], 0.5);
        assert_relative_eq!(rel[1], 0.25);
    }

    #[test]
    fn half_circle_length() {
        let (a, b) = (Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0));
        let left = arc_from_flags(&a, &b, 1.0, false, false);
        let right = arc_from_flags(&a, &b, 1.0, false, true);
        assert_relative_eq!(left.length(), PI, epsilon = 1.0e-12);
        // Walking along +x, the left side is +y.
        assert_relative_eq!(left.point_at(0.5), Point2::new(0.0, 1.0), epsilon = 1.0e-12);
        assert_relative_eq!(right.point_at(0.5), Point2::new(0.0, -1.0), epsilon = 1.0e-12);
    }

    #[test]
    fn large_arc_goes_around() {
        let (a, b) = (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let small = arc_from_flags(&a, &b, 1.0, false, false);
        let large = arc_from_flags(&a, &b, 1.0, true, false);
        assert_relative_eq!(small.length() + large.length(), 2.0 * PI, epsilon = 1.0e-12);
        assert!(large.point_at(0.5).y > 1.0);
        assert!(small.point_at(0.5).y > 0.0);
    }

    #[test]
    fn quadratic_arc_length_parameterization() {
        let curve = CurveGeometry::Quadratic([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        ]);
        let total = curve.length();
        let t = curve.param_at_length(total * 0.3);
        assert_relative_eq!(curve.length_between(0.0, t), total * 0.3, epsilon = 1.0e-9);

        let (l, r) = (curve.sub_curve(0.0, t), curve.sub_curve(t, 1.0));
        assert_relative_eq!(l.length() + r.length(), total, epsilon = 1.0e-9);
        assert_relative_eq!(l.point_at(1.0), r.point_at(0.0), epsilon = 1.0e-12);
    }
}
