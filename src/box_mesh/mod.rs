//! Compilation of a flattened pattern into a single triangle mesh.
//!
//! The compiler runs in five steps, each one producing the input of the next:
//!
//! 1. [`LoadedPattern::load`] validates the panels and resolves the stitches. Both edges of a
//!    stitch get the same number of boundary vertices.
//! 2. [`LoadedPattern::triangulate`] samples the boundary of every panel, fills its interior
//!    with a regular grid of vertices, and computes a constrained Delaunay triangulation
//!    oriented along the panel normal.
//! 3. [`MeshedPattern::collapse_stitches`] merges the vertices paired by each stitch into seam
//!    vertices shared by all the panels they belong to.
//! 4. [`CollapsedPattern::validate`] rejects stitches that merge vertices they should keep
//!    apart.
//! 5. [`CollapsedPattern::finalize`] numbers the remaining vertices, remaps the faces, and
//!    computes the rest lengths, labels and segmentation of the final [`CompiledMesh`].
//!
//! [`compile`] runs all of them.
//!
//! ```
//! use boxmesh::box_mesh::{compile, BoxMeshParams};
//! use boxmesh::pattern::{factory, EdgeRef, Panel, PatternSpec, StitchSpec};
//! use boxmesh::math::Vector3;
//!
//! let mut pattern = PatternSpec::default();
//! let left = Panel::new("left", factory::rectangle(1.0, 1.0)).unwrap();
//! let mut right = Panel::new("right", factory::rectangle(1.0, 1.0)).unwrap();
//! right.translation = Vector3::new(1.0, 0.0, 0.0);
//! pattern.panels.insert("left".to_string(), left.to_spec());
//! pattern.panels.insert("right".to_string(), right.to_spec());
//! // The right side of `left` is sewn to the left side of `right`.
//! pattern.stitches.push(StitchSpec::new(EdgeRef::new("left", 1), EdgeRef::new("right", 3)));
//!
//! let mesh = compile(&pattern, &BoxMeshParams::default()).unwrap();
//! assert_eq!(mesh.num_vertices(), 6);
//! assert!(mesh.is_manifold());
//! ```

pub use self::collapse::{CollapsedPattern, LocalVertex};
pub use self::error::{
    BoxMeshError, DegenerateTrianglesError, MultiStitchingError, StitchingError,
};
pub use self::load::{LoadedPanel, LoadedPattern, LoadedStitch, StitchSide};
pub use self::mesh::{CompiledMesh, SegmentTag, SegmentTags};
pub use self::params::BoxMeshParams;
pub use self::triangulate::{MeshedPanel, MeshedPattern};

use crate::pattern::{PatternDocument, PatternSpec};

mod collapse;
mod error;
mod finalize;
mod load;
mod mesh;
mod params;
mod triangulate;
mod validate;
#[cfg(feature = "wavefront")]
mod wavefront;

/// Compiles a pattern into a single triangle mesh.
///
/// # Errors
///
/// Fails if the pattern is malformed, if a panel cannot be triangulated, or if the stitches
/// merge vertices that should stay apart.
pub fn compile(pattern: &PatternSpec, params: &BoxMeshParams) -> Result<CompiledMesh, BoxMeshError> {
    LoadedPattern::load(pattern, params)?
        .triangulate()?
        .collapse_stitches()
        .finalize()
}

/// Parses a JSON exchange document and compiles its pattern.
pub fn compile_json(json: &str, params: &BoxMeshParams) -> Result<CompiledMesh, BoxMeshError> {
    let document = PatternDocument::from_json(json)?;
    compile(&document.pattern, params)
}
