use crate::math::{Point2, Real};
use crate::utils::point_in_poly2d;
use spade::{ConstrainedDelaunayTriangulation, Point2 as Pt2, Triangulation};

/// The result of a constrained Delaunay triangulation of a panel.
///
/// The first points are the boundary points, in the order given to
/// [`triangulate_delaunay`], followed by the interior points that were kept.
#[derive(Clone, Debug, Default)]
pub struct DelaunayTriangulation {
    /// The triangulation vertices.
    pub points: Vec<Point2<Real>>,
    /// The triangles, indexing `points`.
    pub triangles: Vec<[u32; 3]>,
}

/// Error emitted when the triangulation of a closed boundary is not a valid
/// triangle mesh of its interior.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum TriangulationError {
    /// A boundary point has coordinates the triangulator cannot handle (NaN, infinite).
    #[error("the boundary point {0} is not a valid input point.")]
    InvalidPoint(u32),
    /// Two boundary points are at the same location.
    #[error("the boundary points {0} and {1} coincide.")]
    DuplicatePoint(u32, u32),
    /// The boundary crosses itself.
    #[error("the boundary segment ({0}, {1}) crosses another boundary segment.")]
    CrossingBoundary(u32, u32),
    /// A triangle with (almost) zero area was generated.
    #[error("the triangle {0:?} has a zero area.")]
    ZeroAreaTriangle([u32; 3]),
    /// The triangulation does not cover the interior of the boundary.
    #[error("the boundary encloses no triangle.")]
    Empty,
}

// Keeps coordinates inside the range spade accepts.
fn sanitize_spade_coord(coord: Real) -> Real {
    let abs = coord.abs();

    if abs <= spade::MIN_ALLOWED_VALUE {
        0.0
    } else if abs > spade::MAX_ALLOWED_VALUE {
        spade::MAX_ALLOWED_VALUE * coord.signum()
    } else {
        coord
    }
}

fn spade_point(pt: &Point2<Real>) -> Pt2<Real> {
    Pt2::new(sanitize_spade_coord(pt.x), sanitize_spade_coord(pt.y))
}

/// Computes the constrained Delaunay triangulation of the interior of a closed boundary.
///
/// `boundary` is a closed polygon (its last point is implicitly connected to the first one)
/// whose segments are all kept as triangulation edges. `interior` points are Steiner points
/// inserted to improve the triangles quality; interior points coinciding with an
/// already-inserted point are dropped.
///
/// Only triangles whose center lies inside the boundary are returned.
pub fn triangulate_delaunay(
    boundary: &[Point2<Real>],
    interior: &[Point2<Real>],
) -> Result<DelaunayTriangulation, TriangulationError> {
    let mut cdt = ConstrainedDelaunayTriangulation::<Pt2<_>>::new();
    let mut handle_to_pt_id = vec![];
    let mut handles = Vec::with_capacity(boundary.len());
    let mut points = Vec::with_capacity(boundary.len() + interior.len());

    for (i, pt) in boundary.iter().enumerate() {
        let handle = cdt
            .insert(spade_point(pt))
            .map_err(|_| TriangulationError::InvalidPoint(i as u32))?;

        if handle.index() < handle_to_pt_id.len() {
            return Err(TriangulationError::DuplicatePoint(
                handle_to_pt_id[handle.index()],
                i as u32,
            ));
        }

        handle_to_pt_id.push(i as u32);
        handles.push(handle);
        points.push(*pt);
    }

    for ia in 0..handles.len() {
        let ib = (ia + 1) % handles.len();

        if !cdt.can_add_constraint(handles[ia], handles[ib]) {
            return Err(TriangulationError::CrossingBoundary(ia as u32, ib as u32));
        }

        let _ = cdt.add_constraint(handles[ia], handles[ib]);
    }

    for pt in interior {
        let Ok(handle) = cdt.insert(spade_point(pt)) else {
            continue;
        };

        if handle.index() == handle_to_pt_id.len() {
            handle_to_pt_id.push(points.len() as u32);
            points.push(*pt);
        }
    }

    // Eliminate unwanted triangles.
    let mut triangles = vec![];

    for face in cdt.inner_faces() {
        let tri_idx = face.vertices().map(|v| handle_to_pt_id[v.fix().index()]);
        let [a, b, c] = tri_idx.map(|i| points[i as usize]);
        let tri_center = Point2::from((a.coords + b.coords + c.coords) / 3.0);

        if point_in_poly2d(&tri_center, boundary) {
            // Keep the triangle, its center is inside the panel.
            let scale = (b - a).norm_squared().max((c - a).norm_squared());
            if (b - a).perp(&(c - a)).abs() <= scale * 1.0e-10 {
                return Err(TriangulationError::ZeroAreaTriangle(tri_idx));
            }

            triangles.push(tri_idx);
        }
    }

    if triangles.is_empty() {
        return Err(TriangulationError::Empty);
    }

    Ok(DelaunayTriangulation { points, triangles })
}
