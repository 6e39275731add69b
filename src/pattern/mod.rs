//! Sewing-pattern data model: edges, panels, interfaces, stitches and components.
//!
//! Garment generators build a tree of [`Component`]s whose leaves are [`Panel`]s. Panels
//! expose parts of their boundary as named [`Interface`]s, and components record which
//! interfaces are sewn together with [`Stitch`]es. [`PatternPart::assembly`] flattens the
//! tree into a [`PatternSpec`], the document consumed by the mesh compiler.

pub use self::component::{Component, PanelLookup, PatternNode, PatternPart};
pub use self::curve::{abs_to_rel, rel_to_abs, CurveGeometry};
pub use self::edge::{Curvature, Edge, EdgeId};
pub use self::edge_sequence::{EdgeSequence, CURVE_LINEARIZATION_SEGMENTS};
pub use self::interface::{Interface, InterfaceEdge};
pub use self::operators::{cut_corner, cut_into_edge, CornerCut, EdgeCut};
pub use self::panel::{DartInsertion, NormError, Panel};
pub use self::registry::{ShapeBuilder, ShapeRegistry};
pub use self::spec::{
    CurvatureSpec, EdgeRef, EdgeSpec, PanelSpec, PatternDocument, PatternLoadingError,
    PatternProperties, PatternSpec, StitchSpec,
};
pub use self::stitch::{match_interfaces, Stitch};

use crate::math::Real;

mod component;
mod curve;
mod edge;
mod edge_sequence;
pub mod factory;
mod interface;
mod operators;
mod panel;
mod registry;
mod spec;
mod stitch;

/// Errors raised while cutting a shape into a panel boundary.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum CutError {
    /// The start and end of the cut shape coincide, so it cannot be aligned with an edge.
    #[error("the cut shape is degenerate: its endpoints coincide.")]
    DegenerateShape,
    /// The cut shape does not fit in the edge it is inserted into.
    #[error("the cut shape is {shape_width} wide but the edge is only {edge_length} long.")]
    ShapeTooWide {
        /// Distance between the endpoints of the shape.
        shape_width: Real,
        /// Length of the edge receiving the shape.
        edge_length: Real,
    },
    /// No placement of the shape matches the corner.
    #[error("the corner fit did not converge (residual {residual}).")]
    CornerFitFailed {
        /// The remaining distance between the fitted and requested shortcut.
        residual: Real,
    },
    /// The two edges given to a corner cut do not share a vertex.
    #[error("the edges of a corner cut must be consecutive.")]
    NotConsecutive,
    /// A dart shape must have as many edges on each of its sides.
    #[error("a dart shape must have an even number of edges, got {0}.")]
    OddDartShape(usize),
}

/// Errors raised while authoring a pattern.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum PatternError {
    /// Subdivision fractions must be non-negative and not all zero.
    #[error("subdivision fractions must be non-negative and sum to a positive value.")]
    InvalidFractions,
    /// No edge at this position of the sequence.
    #[error("the edge index {0} is out of bounds.")]
    EdgeIndexOutOfBounds(usize),
    /// An edge sequence given to a panel is not a closed loop.
    #[error("the edges of panel `{panel}` do not form a closed loop (gap after edge {edge}).")]
    OpenLoop {
        /// The panel name.
        panel: String,
        /// The edge after which the gap occurs.
        edge: usize,
    },
    /// The referenced panel is not part of this component.
    #[error("no panel named `{0}`.")]
    UnknownPanel(String),
    /// The referenced edge is not part of its panel.
    #[error("the edge {edge:?} is not part of panel `{panel}`.")]
    UnknownEdge {
        /// The panel name.
        panel: String,
        /// The missing edge.
        edge: EdgeId,
    },
    /// No interface with this name.
    #[error("no interface named `{0}`.")]
    UnknownInterface(String),
    /// No builder registered for this shape.
    #[error("no shape builder registered under the name `{0}`.")]
    UnknownShape(String),
    /// Interfaces to be stitched need at least one edge.
    #[error("cannot stitch an empty interface.")]
    EmptyInterface,
    /// The two sides of a stitch have a different number of edges.
    #[error("stitched interfaces have {left} and {right} edges.")]
    InterfaceMismatch {
        /// Number of edges of the first interface.
        left: usize,
        /// Number of edges of the second interface.
        right: usize,
    },
    /// Two panels of an assembly share a name.
    #[error("cannot assemble the pattern: the panel name `{0}` is used more than once.")]
    Assembly(String),
    /// A shape could not be cut into a panel.
    #[error(transparent)]
    Cut(#[from] CutError),
    /// A panel has no well-defined normal.
    #[error(transparent)]
    Norm(#[from] NormError),
}
