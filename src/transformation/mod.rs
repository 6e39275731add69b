//! Triangulation of flat panels.

pub use self::triangulate_delaunay::{
    triangulate_delaunay, DelaunayTriangulation, TriangulationError,
};

mod triangulate_delaunay;
