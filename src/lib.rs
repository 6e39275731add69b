/*!
boxmesh
========

**boxmesh** builds 2D sewing patterns (panels, edges, interfaces and stitches)
and compiles them into a single 3D triangle mesh ready for cloth simulation.

The two halves of the crate are:
- [`pattern`]: the geometric data model used by garment generators. Panels
  are closed loops of straight or curved edges placed in 3D, grouped into a
  tree of [`pattern::Component`]s that know how their interfaces are stitched.
- [`box_mesh`]: the compiler that triangulates every panel and collapses the
  stitched vertices into one consistent mesh, along with the auxiliary data
  (rest lengths, labels, segmentation) a simulator needs.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::type_complexity)]

#[macro_use]
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod box_mesh;
pub mod pattern;
pub mod transformation;
pub mod utils;

pub use crate::box_mesh::{compile, BoxMeshError, BoxMeshParams, CompiledMesh};
pub use crate::pattern::{Component, Edge, EdgeSequence, Interface, Panel, PatternSpec, Stitch};

mod real {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;
}

/// Aliases for the mathematical types used by patterns and meshes.
///
/// Panels live in 2D, their placement and the compiled mesh live in 3D.
pub mod math {
    pub use super::real::*;
    pub use na::{Point2, Point3, Rotation3, Unit, Vector2, Vector3};

    /// Tolerance under which two pattern vertices are considered coincident.
    pub const VERTEX_TOLERANCE: Real = 1.0e-4;

    /// Lifts a 2D panel point into the `z = 0` plane of its local 3D frame.
    #[inline]
    pub fn lift(pt: &Point2<Real>) -> Point3<Real> {
        Point3::new(pt.x, pt.y, 0.0)
    }

    /// The counter-clockwise perpendicular of a 2D vector.
    #[inline]
    pub fn perp(v: &Vector2<Real>) -> Vector2<Real> {
        Vector2::new(-v.y, v.x)
    }
}
