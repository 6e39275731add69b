//! Frequently used edge sequences.
//!
//! Cut shapes are returned in a canonical frame: they start at the origin, end at
//! `(width, 0)`, and extend toward `+y`. Once cut into a counter-clockwise panel edge
//! with [`cut_into_edge`](super::cut_into_edge), `+y` points toward the inside of the panel.

use super::{Edge, EdgeSequence};
use crate::math::{Point2, Real};

/// A chain of straight edges through `verts`, optionally closed.
pub fn from_verts(verts: &[Point2<Real>], close: bool) -> EdgeSequence {
    EdgeSequence::from_verts(verts, close)
}

/// A closed rectangle with its bottom-left corner at the origin.
///
/// Edges are, in order: bottom, right, top, left.
pub fn rectangle(width: Real, height: Real) -> EdgeSequence {
    from_verts(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ],
        true,
    )
}

/// The two sides of a V-shaped dart.
pub fn dart_shape(width: Real, depth: Real) -> EdgeSequence {
    from_verts(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(width * 0.5, depth),
            Point2::new(width, 0.0),
        ],
        false,
    )
}

/// A rectangular notch.
pub fn notch_shape(width: Real, depth: Real) -> EdgeSequence {
    from_verts(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(0.0, depth),
            Point2::new(width, depth),
            Point2::new(width, 0.0),
        ],
        false,
    )
}

/// A single circular arc of the given chord width and sagitta `depth`.
pub fn arc_shape(width: Real, depth: Real) -> EdgeSequence {
    let half = width * 0.5;
    let depth = depth.abs().max(Real::EPSILON);
    let radius = (half * half + depth * depth) / (2.0 * depth);
    // Bulging to the left of +x means toward +y.
    EdgeSequence::new(vec![Edge::circle_arc(
        Point2::origin(),
        Point2::new(width, 0.0),
        radius,
        depth > half,
        false,
    )])
}

/// A straight side from `start` to `end`, split at the relative positions `start_cut` and
/// `1 - end_cut`.
///
/// Zero cuts produce no piece, so the result has one to three edges. Generators use the
/// end pieces as attachment points, e.g. for a pocket opening on a side seam.
pub fn side_with_cut(
    start: Point2<Real>,
    end: Point2<Real>,
    start_cut: Real,
    end_cut: Real,
) -> EdgeSequence {
    let side = Edge::new(start, end);
    let params = [start_cut, 1.0 - end_cut];
    EdgeSequence::new(side.subdivide_param(&params))
}

/// A single quadratic curve of the given chord width, reaching `depth` at its middle.
pub fn curve_shape(width: Real, depth: Real) -> EdgeSequence {
    EdgeSequence::new(vec![Edge::quadratic(
        Point2::origin(),
        Point2::new(width, 0.0),
        Point2::new(width * 0.5, depth * 2.0),
    )])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shapes_span_their_width() {
        for shape in [
            dart_shape(2.0, 1.0),
            notch_shape(2.0, 1.0),
            arc_shape(2.0, 1.0),
            curve_shape(2.0, 1.0),
        ] {
            assert_relative_eq!(shape.shortcut().x, 2.0, epsilon = 1.0e-12);
            assert_relative_eq!(shape.shortcut().y, 0.0, epsilon = 1.0e-12);
            assert!(shape.bbox().maxs.y > 0.99);
        }
    }

    #[test]
    fn side_cuts() {
        let side = side_with_cut(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0), 0.2, 0.3);
        assert_eq!(side.len(), 3);
        assert_relative_eq!(side[0].end, Point2::new(0.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(side[1].end, Point2::new(0.0, 7.0), epsilon = 1.0e-12);

        let side = side_with_cut(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0), 0.0, 0.5);
        assert_eq!(side.len(), 2);
    }
}
