use crate::math::Real;
use na::Point2;

/// Tests if the given point is inside an arbitrary closed polygon with arbitrary orientation,
/// using a counting winding strategy.
///
/// The polygon is assumed to be closed, i.e., first and last point of the polygon are implicitly
/// assumed to be connected by an edge. Concave panels (necklines, armholes, darts) are handled.
pub fn point_in_poly2d(pt: &Point2<Real>, poly: &[Point2<Real>]) -> bool {
    if poly.is_empty() {
        return false;
    }

    let mut winding = 0i32;

    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let seg_dir = b - a;
        let dpt = pt - a;
        let perp = dpt.perp(&seg_dir);
        winding += match (dpt.y >= 0.0, b.y > pt.y) {
            (true, true) if perp < 0.0 => 1,
            (false, false) if perp > 0.0 => 1,
            _ => 0,
        };
    }

    winding % 2 == 1
}

/// Distance between a point and the segment `[a, b]`.
pub fn point_segment_distance2d(pt: &Point2<Real>, a: &Point2<Real>, b: &Point2<Real>) -> Real {
    let ab = b - a;
    let sq_len = ab.norm_squared();

    if sq_len <= Real::EPSILON {
        return na::distance(pt, a);
    }

    let t = ((pt - a).dot(&ab) / sq_len).clamp(0.0, 1.0);
    na::distance(pt, &(a + ab * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_in_poly2d_self_intersecting() {
        let poly = [
            [-1.0, -1.0],
            [0.0, -1.0],
            [0.0, 1.0],
            [-2.0, 1.0],
            [-2.0, -2.0],
            [1.0, -2.0],
            [1.0, 2.0],
            [-1.0, 2.0],
        ]
        .map(Point2::from);
        assert!(!point_in_poly2d(&[-0.5, -0.5].into(), &poly));
        assert!(point_in_poly2d(&[0.5, -0.5].into(), &poly));
    }

    #[test]
    fn point_segment_distances() {
        let ccw = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]].map(Point2::from);

        assert_relative_eq!(
            point_segment_distance2d(&Point2::new(0.5, 2.0), &ccw[2], &ccw[3]),
            1.0
        );
        assert_relative_eq!(
            point_segment_distance2d(&Point2::new(3.0, 0.0), &ccw[0], &ccw[1]),
            2.0
        );
    }
}
