//! Axis Aligned Bounding Box.

use crate::math::Real;
use na::{Point, SVector};

/// An Axis-Aligned Bounding Box (AABB) in `D` dimensions.
///
/// Panels use the 2D version to measure their flat shape and the 3D version
/// to measure their placement around the body.
///
/// # Example
///
/// ```rust
/// use boxmesh::bounding_volume::Aabb3;
/// use boxmesh::na::Point3;
///
/// let aabb = Aabb3::from_points([Point3::new(-1.0, 0.0, 2.0), Point3::new(1.0, 4.0, 0.0)]);
/// assert_eq!(aabb.center(), Point3::new(0.0, 2.0, 1.0));
/// assert_eq!(aabb.extents().y, 4.0);
/// ```
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb<const D: usize> {
    /// The point with the smallest coordinates on each axis.
    pub mins: Point<Real, D>,
    /// The point with the largest coordinates on each axis.
    pub maxs: Point<Real, D>,
}

/// A 2D axis-aligned bounding box.
pub type Aabb2 = Aabb<2>;
/// A 3D axis-aligned bounding box.
pub type Aabb3 = Aabb<3>;

impl<const D: usize> Aabb<D> {
    /// Creates a new AABB from its two extremal corners.
    #[inline]
    pub fn new(mins: Point<Real, D>, maxs: Point<Real, D>) -> Self {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// Merging any point or valid AABB into it yields that point or AABB.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            SVector::<Real, D>::repeat(Real::MAX).into(),
            SVector::<Real, D>::repeat(-Real::MAX).into(),
        )
    }

    /// Creates the smallest AABB enclosing all the given points.
    ///
    /// Returns an invalid AABB if `pts` is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real, D>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Whether `mins <= maxs` along every axis.
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| self.mins[i] <= self.maxs[i])
    }

    /// Returns the center point of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real, D> {
        na::center(&self.mins, &self.maxs)
    }

    /// The full dimensions of this AABB along each axis.
    #[inline]
    pub fn extents(&self) -> SVector<Real, D> {
        self.maxs - self.mins
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real, D>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The smallest AABB containing both `self` and `other`.
    pub fn merged(&self, other: &Self) -> Self {
        Self::new(
            self.mins.coords.inf(&other.mins.coords).into(),
            self.maxs.coords.sup(&other.maxs.coords).into(),
        )
    }
}
