use crate::math::Real;
use na::Point2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Orientation {
    Ccw,
    Cw,
    Collinear,
}

fn orientation(a: &Point2<Real>, b: &Point2<Real>, c: &Point2<Real>, eps: Real) -> Orientation {
    let det = (b - a).perp(&(c - a));

    if det > eps {
        Orientation::Ccw
    } else if det < -eps {
        Orientation::Cw
    } else {
        Orientation::Collinear
    }
}

// Assumes `a`, `b`, `p` are collinear.
fn on_segment(a: &Point2<Real>, b: &Point2<Real>, p: &Point2<Real>, eps: Real) -> bool {
    p.x <= a.x.max(b.x) + eps
        && p.x >= a.x.min(b.x) - eps
        && p.y <= a.y.max(b.y) + eps
        && p.y >= a.y.min(b.y) - eps
}

/// Tests whether the segments `[a, b]` and `[c, d]` intersect, touching included.
pub fn segments_intersect2d(
    a: &Point2<Real>,
    b: &Point2<Real>,
    c: &Point2<Real>,
    d: &Point2<Real>,
    epsilon: Real,
) -> bool {
    let o1 = orientation(a, b, c, epsilon);
    let o2 = orientation(a, b, d, epsilon);
    let o3 = orientation(c, d, a, epsilon);
    let o4 = orientation(c, d, b, epsilon);

    if o1 != o2 && o3 != o4 && o1 != Orientation::Collinear && o2 != Orientation::Collinear {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(a, b, c, epsilon))
        || (o2 == Orientation::Collinear && on_segment(a, b, d, epsilon))
        || (o3 == Orientation::Collinear && on_segment(c, d, a, epsilon))
        || (o4 == Orientation::Collinear && on_segment(c, d, b, epsilon))
}

/// Tests whether a closed polyline crosses or touches itself.
///
/// Consecutive segments share a vertex and are not reported as intersecting, unless they fold
/// back onto each other.
pub fn polyline_self_intersects2d(poly: &[Point2<Real>], epsilon: Real) -> bool {
    let n = poly.len();

    if n < 3 {
        return false;
    }

    for i in 0..n {
        let (a, b) = (poly[i], poly[(i + 1) % n]);

        for j in i + 1..n {
            let (c, d) = (poly[j], poly[(j + 1) % n]);
            let adjacent_next = j == i + 1;
            let adjacent_prev = i == 0 && j == n - 1;

            if adjacent_next || adjacent_prev {
                // Adjacent segments only intersect if they overlap.
                let (shared, other_ab, other_cd) = if adjacent_next {
                    (b, a, d)
                } else {
                    (a, b, c)
                };
                let u = other_ab - shared;
                let v = other_cd - shared;
                if u.perp(&v).abs() <= epsilon && u.dot(&v) > 0.0 {
                    return true;
                }
                continue;
            }

            if segments_intersect2d(&a, &b, &c, &d, epsilon) {
                return true;
            }
        }
    }

    false
}
