//! Definition of the pattern edge.

use super::curve::{abs_to_rel, arc_from_flags, rel_to_abs, CurveGeometry};
use super::PatternError;
use crate::math::{Point2, Real, Vector2};
use core::sync::atomic::{AtomicU64, Ordering};
use na::{Rotation2, Unit};

static NEXT_EDGE_ID: AtomicU64 = AtomicU64::new(0);

/// A process-wide unique identifier of an edge.
///
/// Interfaces reference edges by identifier rather than by index so that they
/// survive the edge substitutions performed when darts or cuts are inserted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Allocates a fresh identifier.
    pub fn fresh() -> Self {
        EdgeId(NEXT_EDGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The curvature of an edge, expressed relative to its endpoints.
///
/// Bézier control points use coordinates relative to the edge: the first one runs along
/// `end - start`, the second along its counter-clockwise perpendicular. Moving, rotating or
/// uniformly scaling the endpoints therefore carries the curve along.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curvature {
    /// A quadratic Bézier curve with one relative control point.
    Quadratic {
        /// The relative control point.
        control: [Real; 2],
    },
    /// A cubic Bézier curve with two relative control points.
    Cubic {
        /// The relative control points.
        controls: [[Real; 2]; 2],
    },
    /// A circular arc.
    Circle {
        /// The circle radius.
        radius: Real,
        /// Whether this is the longer of the two arcs joining the endpoints.
        large_arc: bool,
        /// Whether the arc bulges toward the right-hand side of the edge.
        right: bool,
    },
}

impl Curvature {
    // Curvature of the same curve walked from `end` to `start`.
    fn reversed(&self) -> Self {
        let flip = |p: [Real; 2]| [1.0 - p[0], -p[1]];

        match *self {
            Curvature::Quadratic { control } => Curvature::Quadratic {
                control: flip(control),
            },
            Curvature::Cubic { controls } => Curvature::Cubic {
                controls: [flip(controls[1]), flip(controls[0])],
            },
            Curvature::Circle {
                radius,
                large_arc,
                right,
            } => Curvature::Circle {
                radius,
                large_arc,
                right: !right,
            },
        }
    }

    // Curvature after a reflection of the edge endpoints.
    fn reflected(&self) -> Self {
        let flip = |p: [Real; 2]| [p[0], -p[1]];

        match *self {
            Curvature::Quadratic { control } => Curvature::Quadratic {
                control: flip(control),
            },
            Curvature::Cubic { controls } => Curvature::Cubic {
                controls: controls.map(flip),
            },
            Curvature::Circle {
                radius,
                large_arc,
                right,
            } => Curvature::Circle {
                radius,
                large_arc,
                right: !right,
            },
        }
    }
}

/// A directed boundary segment of a panel, straight or curved.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    id: EdgeId,
    /// The first point of the edge.
    pub start: Point2<Real>,
    /// The last point of the edge.
    pub end: Point2<Real>,
    /// The curvature of the edge. `None` for straight edges.
    pub curvature: Option<Curvature>,
    /// A label propagated to the compiled mesh vertices of this edge.
    pub label: Option<String>,
}

impl Edge {
    /// Creates a straight edge.
    pub fn new(start: Point2<Real>, end: Point2<Real>) -> Self {
        Edge {
            id: EdgeId::fresh(),
            start,
            end,
            curvature: None,
            label: None,
        }
    }

    /// Creates a curved edge.
    pub fn curved(start: Point2<Real>, end: Point2<Real>, curvature: Curvature) -> Self {
        Edge {
            curvature: Some(curvature),
            ..Edge::new(start, end)
        }
    }

    /// Creates a quadratic Bézier edge from an absolute control point.
    pub fn quadratic(start: Point2<Real>, end: Point2<Real>, control: Point2<Real>) -> Self {
        let control = abs_to_rel(&start, &end, &control);
        Self::curved(start, end, Curvature::Quadratic { control })
    }

    /// Creates a cubic Bézier edge from absolute control points.
    pub fn cubic(start: Point2<Real>, end: Point2<Real>, controls: [Point2<Real>; 2]) -> Self {
        let controls = controls.map(|c| abs_to_rel(&start, &end, &c));
        Self::curved(start, end, Curvature::Cubic { controls })
    }

    /// Creates a circular arc edge.
    pub fn circle_arc(
        start: Point2<Real>,
        end: Point2<Real>,
        radius: Real,
        large_arc: bool,
        right: bool,
    ) -> Self {
        Self::curved(
            start,
            end,
            Curvature::Circle {
                radius,
                large_arc,
                right,
            },
        )
    }

    /// Sets the label of this edge.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The unique identifier of this edge.
    #[inline]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// A copy of this edge with a fresh identifier.
    pub fn duplicate(&self) -> Self {
        Edge {
            id: EdgeId::fresh(),
            ..self.clone()
        }
    }

    /// Is this edge a straight segment?
    pub fn is_straight(&self) -> bool {
        self.curvature.is_none()
    }

    /// The absolute geometry of this edge.
    pub fn as_curve(&self) -> CurveGeometry {
        let (s, e) = (&self.start, &self.end);

        match self.curvature {
            None => CurveGeometry::Line([*s, *e]),
            Some(Curvature::Quadratic { control }) => {
                CurveGeometry::Quadratic([*s, rel_to_abs(s, e, control), *e])
            }
            Some(Curvature::Cubic { controls }) => CurveGeometry::Cubic([
                *s,
                rel_to_abs(s, e, controls[0]),
                rel_to_abs(s, e, controls[1]),
                *e,
            ]),
            Some(Curvature::Circle {
                radius,
                large_arc,
                right,
            }) => arc_from_flags(s, e, radius, large_arc, right),
        }
    }

    /// The length of this edge.
    pub fn length(&self) -> Real {
        self.as_curve().length()
    }

    /// The straight vector from the start to the end of this edge.
    pub fn shortcut(&self) -> Vector2<Real> {
        self.end - self.start
    }

    /// The point halfway along this edge, by arc length.
    pub fn midpoint(&self) -> Point2<Real> {
        let curve = self.as_curve();
        curve.point_at_length(curve.length() * 0.5)
    }

    /// A polyline approximation of this edge with `n_segments` segments.
    ///
    /// Straight edges are always approximated by their two endpoints.
    pub fn linearize(&self, n_segments: usize) -> Vec<Point2<Real>> {
        if self.is_straight() {
            vec![self.start, self.end]
        } else {
            let mut pts = self.as_curve().linearize(n_segments);
            // Exact endpoints keep the chained polylines closed.
            pts[0] = self.start;
            let last = pts.len() - 1;
            pts[last] = self.end;
            pts
        }
    }

    /// Reverses the direction of this edge in place, keeping its shape and identifier.
    pub fn reverse(&mut self) {
        core::mem::swap(&mut self.start, &mut self.end);
        self.curvature = self.curvature.map(|c| c.reversed());
    }

    /// This edge walked in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut result = self.clone();
        result.reverse();
        result
    }

    /// Translates this edge.
    pub fn translate_by(&mut self, shift: &Vector2<Real>) {
        self.start += *shift;
        self.end += *shift;
    }

    /// Rotates this edge by `angle` radians around `pivot`.
    pub fn rotate_by(&mut self, angle: Real, pivot: &Point2<Real>) {
        let rot = Rotation2::new(angle);
        self.start = pivot + rot * (self.start - pivot);
        self.end = pivot + rot * (self.end - pivot);
    }

    /// Scales this edge uniformly by `factor` around `pivot`.
    pub fn scale_about(&mut self, factor: Real, pivot: &Point2<Real>) {
        self.start = pivot + (self.start - pivot) * factor;
        self.end = pivot + (self.end - pivot) * factor;
    }

    /// Reflects this edge across the line through `origin` along `axis`.
    ///
    /// The edge direction is kept, so a reflected loop changes its winding.
    pub fn reflect(&mut self, origin: &Point2<Real>, axis: &Unit<Vector2<Real>>) {
        let reflect = |p: &Point2<Real>| {
            let v = p - origin;
            origin + axis.into_inner() * (2.0 * v.dot(axis)) - v
        };
        self.start = reflect(&self.start);
        self.end = reflect(&self.end);
        self.curvature = self.curvature.map(|c| c.reflected());
    }

    /// Builds an edge with the same curvature type as `self` matching `curve`.
    fn from_curve(&self, curve: &CurveGeometry) -> Edge {
        let mut result = match curve {
            CurveGeometry::Line([a, b]) => Edge::new(*a, *b),
            CurveGeometry::Quadratic([a, c, b]) => Edge::quadratic(*a, *b, *c),
            CurveGeometry::Cubic([a, c0, c1, b]) => Edge::cubic(*a, *b, [*c0, *c1]),
            CurveGeometry::Arc {
                radius,
                sweep,
                ..
            } => Edge::circle_arc(
                curve.point_at(0.0),
                curve.point_at(1.0),
                *radius,
                sweep.abs() > core::f64::consts::PI,
                *sweep > 0.0,
            ),
        };
        result.label = self.label.clone();
        result
    }

    /// Splits this edge at the given increasing curve parameters.
    ///
    /// The resulting edges are chained exactly: the end of one is bitwise equal to the start of
    /// the next, and the first and last endpoints are those of `self`.
    pub fn subdivide_param(&self, params: &[Real]) -> Vec<Edge> {
        let curve = self.as_curve();
        let mut bounds = Vec::with_capacity(params.len() + 2);
        bounds.push(0.0);
        bounds.extend(params.iter().copied().filter(|t| *t > 0.0 && *t < 1.0));
        bounds.push(1.0);

        let mut result: Vec<Edge> = bounds
            .windows(2)
            .map(|w| self.from_curve(&curve.sub_curve(w[0], w[1])))
            .collect();

        for i in 1..result.len() {
            let junction = result[i - 1].end;
            result[i].start = junction;
        }

        if let Some(first) = result.first_mut() {
            first.start = self.start;
        }
        if let Some(last) = result.last_mut() {
            last.end = self.end;
        }

        result
    }

    /// Splits this edge into pieces whose lengths are proportional to `fractions`.
    ///
    /// # Errors
    ///
    /// Fails if a fraction is negative or if they all sum to zero.
    pub fn subdivide_len(&self, fractions: &[Real]) -> Result<Vec<Edge>, PatternError> {
        let total: Real = fractions.iter().sum();

        if fractions.iter().any(|f| *f < 0.0 || !f.is_finite()) || total <= 0.0 {
            return Err(PatternError::InvalidFractions);
        }

        let curve = self.as_curve();
        let length = curve.length();
        let mut cumulated = 0.0;
        let mut params = Vec::with_capacity(fractions.len());

        for f in &fractions[..fractions.len() - 1] {
            cumulated += f / total;
            params.push(curve.param_at_length(cumulated * length));
        }

        Ok(self.subdivide_param(&params))
    }

    /// Splits this edge in two at the curve parameter `t`.
    pub fn split_at(&self, t: Real) -> (Edge, Edge) {
        let mut pieces = self.subdivide_param(&[t]).into_iter();
        match (pieces.next(), pieces.next()) {
            (Some(a), Some(b)) => (a, b),
            // `t` was at an extremity: split into a point and the whole edge.
            _ => {
                let mut point = self.duplicate();
                point.curvature = None;
                if t <= 0.0 {
                    point.end = self.start;
                    (point, self.duplicate())
                } else {
                    point.start = self.end;
                    (self.duplicate(), point)
                }
            }
        }
    }

    /// `n` points evenly spaced by arc length along this edge, both endpoints included.
    pub fn sample(&self, n: usize) -> Vec<Point2<Real>> {
        let mut pts = self.as_curve().sample_by_length(n);
        if let Some(first) = pts.first_mut() {
            *first = self.start;
        }
        if n > 1 {
            if let Some(last) = pts.last_mut() {
                *last = self.end;
            }
        }
        pts
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reversal_preserves_shape() {
        let edge = Edge::quadratic(
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.5, 1.0),
        );
        let reversed = edge.reversed();
        assert_eq!(reversed.id(), edge.id());
        assert_relative_eq!(
            edge.as_curve().point_at(0.25),
            reversed.as_curve().point_at(0.75),
            epsilon = 1.0e-12
        );

        let arc = Edge::circle_arc(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, false, true);
        assert_relative_eq!(arc.midpoint(), arc.reversed().midpoint(), epsilon = 1.0e-12);
    }

    #[test]
    fn subdivision_is_chained_and_keeps_length() {
        let edge = Edge::cubic(
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            [Point2::new(1.0, 1.0), Point2::new(2.0, -1.0)],
        )
        .with_label("hem");
        let pieces = edge.subdivide_len(&[1.0, 2.0, 1.0]).unwrap();

        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].start, edge.start);
        assert_eq!(pieces[2].end, edge.end);
        assert_eq!(pieces[0].end, pieces[1].start);
        assert_eq!(pieces[1].end, pieces[2].start);
        assert!(pieces.iter().all(|p| p.label.as_deref() == Some("hem")));

        let total: Real = pieces.iter().map(|p| p.length()).sum();
        assert_relative_eq!(total, edge.length(), epsilon = 1.0e-9);
        assert_relative_eq!(pieces[1].length(), edge.length() * 0.5, epsilon = 1.0e-9);
    }

    #[test]
    fn arc_subdivision_keeps_the_circle() {
        let arc = Edge::circle_arc(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0), 1.0, false, false);
        let pieces = arc.subdivide_len(&[1.0, 1.0]).unwrap();
        assert_relative_eq!(pieces[0].end, Point2::new(0.0, 1.0), epsilon = 1.0e-12);
        for piece in &pieces {
            assert_relative_eq!(piece.length(), core::f64::consts::FRAC_PI_2, epsilon = 1.0e-12);
            assert_relative_eq!(piece.midpoint().coords.norm(), 1.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn reflection_mirrors_curvature() {
        let mut edge = Edge::quadratic(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(-1.0, 1.0),
        );
        edge.reflect(&Point2::origin(), &Vector2::y_axis());
        assert_eq!(edge.end, Point2::new(0.0, 2.0));
        assert_relative_eq!(edge.as_curve().point_at(0.5), Point2::new(0.5, 1.0), epsilon = 1.0e-12);
    }
}
