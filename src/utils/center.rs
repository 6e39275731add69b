use crate::math::Real;
use na::Point;

/// Computes the geometric center (centroid) of a set of points.
///
/// All points are weighted equally. Returns `None` if `pts` is empty.
///
/// # Example
///
/// ```
/// use boxmesh::utils::center;
/// use boxmesh::na::Point2;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// assert_eq!(center(&square), Some(Point2::new(1.0, 1.0)));
/// ```
#[inline]
pub fn center<const D: usize>(pts: &[Point<Real, D>]) -> Option<Point<Real, D>> {
    let (first, rest) = pts.split_first()?;
    let denom = 1.0 / (pts.len() as Real);
    let mut res = *first * denom;

    for pt in rest {
        res += pt.coords * denom;
    }

    Some(res)
}
