use crate::math::Real;
use crate::pattern::{NormError, PatternLoadingError};
use crate::transformation::TriangulationError;

/// Errors raised while compiling a pattern into a mesh.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum BoxMeshError {
    /// The mesh resolution is not a positive number.
    #[error("the mesh resolution must be positive, got {0}.")]
    InvalidResolution(Real),
    /// An edge would be sampled with too many vertices at the mesh resolution.
    #[error("edge {edge} of panel `{panel}` (length {length}) needs too many vertices at this mesh resolution.")]
    TooManyEdgeVertices {
        /// The panel name.
        panel: String,
        /// The edge index in its panel.
        edge: usize,
        /// The edge length.
        length: Real,
    },
    /// The pattern document is malformed.
    #[error(transparent)]
    PatternLoading(#[from] PatternLoadingError),
    /// An edge is part of several stitches.
    #[error(transparent)]
    MultiStitching(#[from] MultiStitchingError),
    /// A panel could not be triangulated.
    #[error(transparent)]
    DegenerateTriangles(#[from] DegenerateTrianglesError),
    /// A panel has no well-defined normal.
    #[error(transparent)]
    Norm(#[from] NormError),
    /// Collapsing the stitched vertices produced an invalid mesh.
    #[error(transparent)]
    Stitching(#[from] StitchingError),
}

/// An edge referenced by two stitches.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("edge {edge} of panel `{panel}` is part of both stitch {first} and stitch {second}.")]
pub struct MultiStitchingError {
    /// The panel name.
    pub panel: String,
    /// The edge index in its panel.
    pub edge: usize,
    /// The first stitch using the edge.
    pub first: usize,
    /// The second stitch using the edge.
    pub second: usize,
}

/// The triangulation of a panel failed.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("failed to triangulate panel `{panel}`: {source}")]
pub struct DegenerateTrianglesError {
    /// The panel name.
    pub panel: String,
    /// What went wrong.
    pub source: TriangulationError,
}

/// Stitches that merge vertices they should keep apart.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum StitchingError {
    /// Both ends of a stitched edge were merged into one vertex.
    #[error("stitch {stitch} collapses edge {edge} of panel `{panel}` into a single vertex.")]
    EdgeCollapsed {
        /// The stitch index.
        stitch: usize,
        /// The panel name.
        panel: String,
        /// The edge index in its panel.
        edge: usize,
    },
    /// Two vertices of the same panel were merged without a dart joining them.
    #[error("stitch {stitch} merges distinct vertices of panel `{panel}` into vertex {vertex}.")]
    SelfCollapse {
        /// The stitch index.
        stitch: usize,
        /// The panel name.
        panel: String,
        /// The merged vertex, in the compiled mesh.
        vertex: u32,
    },
}
