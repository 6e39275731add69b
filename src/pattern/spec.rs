//! The pattern exchange document.
//!
//! This is the JSON format shared by pattern generators and the mesh compiler:
//!
//! ```json
//! {
//!   "pattern": {
//!     "panels": {
//!       "front": {
//!         "translation": [0.0, 10.0, 15.0],
//!         "rotation": [0.0, 0.0, 0.0],
//!         "vertices": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
//!         "edges": [
//!           {"endpoints": [0, 1], "label": "hem"},
//!           {"endpoints": [1, 2], "curvature": {"type": "quadratic", "params": [[0.5, 0.2]]}},
//!           {"endpoints": [2, 0]}
//!         ]
//!       }
//!     },
//!     "stitches": [[{"panel": "front", "edge": 1}, {"panel": "back", "edge": 2}, "right_wrong"]]
//!   },
//!   "properties": {"units_in_meter": 100}
//! }
//! ```

use super::Curvature;
use crate::math::Real;
use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors detected while loading an exchange document.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum PatternLoadingError {
    /// The document is not valid JSON, or does not follow the exchange format.
    #[error("invalid pattern document: {0}")]
    Format(String),
    /// A panel needs at least two edges to be closed.
    #[error("panel `{panel}` has {num_edges} edges, at least 2 are needed.")]
    TooFewEdges {
        /// The panel name.
        panel: String,
        /// Its number of edges.
        num_edges: usize,
    },
    /// An edge endpoint is not a vertex of its panel.
    #[error("edge {edge} of panel `{panel}` references the vertex {vertex} but the panel has {num_vertices} vertices.")]
    VertexOutOfBounds {
        /// The panel name.
        panel: String,
        /// The edge index.
        edge: usize,
        /// The missing vertex index.
        vertex: usize,
        /// The number of vertices of the panel.
        num_vertices: usize,
    },
    /// An edge is (almost) a single point.
    #[error("edge {edge} of panel `{panel}` has a zero length.")]
    DegenerateEdge {
        /// The panel name.
        panel: String,
        /// The edge index.
        edge: usize,
    },
    /// The edges of a panel do not form a closed loop.
    #[error("the edges of panel `{panel}` do not form a closed loop (gap after edge {edge}).")]
    OpenLoop {
        /// The panel name.
        panel: String,
        /// The edge after which the gap occurs.
        edge: usize,
    },
    /// A stitch references a panel that is not part of the pattern.
    #[error("stitch {stitch} references the unknown panel `{panel}`.")]
    UnknownPanel {
        /// The stitch index.
        stitch: usize,
        /// The missing panel name.
        panel: String,
    },
    /// A stitch references an edge that is not part of its panel.
    #[error("stitch {stitch} references the edge {edge} of panel `{panel}`, which has {num_edges} edges.")]
    UnknownEdge {
        /// The stitch index.
        stitch: usize,
        /// The panel name.
        panel: String,
        /// The missing edge index.
        edge: usize,
        /// The number of edges of the panel.
        num_edges: usize,
    },
}

/// A complete exchange document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternDocument {
    /// The pattern.
    pub pattern: PatternSpec,
    /// Document-level settings.
    #[serde(default)]
    pub properties: PatternProperties,
}

impl PatternDocument {
    /// Wraps a pattern with the default properties.
    pub fn new(pattern: PatternSpec) -> Self {
        PatternDocument {
            pattern,
            properties: PatternProperties::default(),
        }
    }

    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self, PatternLoadingError> {
        serde_json::from_str(json).map_err(|e| PatternLoadingError::Format(e.to_string()))
    }

    /// Serializes this document to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PatternLoadingError> {
        serde_json::to_string_pretty(self).map_err(|e| PatternLoadingError::Format(e.to_string()))
    }
}

/// Document-level settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternProperties {
    /// How many pattern units make a meter. Patterns are usually authored in centimeters.
    #[serde(default = "default_units_in_meter")]
    pub units_in_meter: Real,
}

fn default_units_in_meter() -> Real {
    100.0
}

impl Default for PatternProperties {
    fn default() -> Self {
        PatternProperties {
            units_in_meter: default_units_in_meter(),
        }
    }
}

/// A flattened pattern: panels by name, and the pairs of stitched edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// The panels, in insertion order.
    pub panels: IndexMap<String, PanelSpec>,
    /// The stitched edge pairs.
    #[serde(default)]
    pub stitches: Vec<StitchSpec>,
}

/// A panel of the exchange document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// The position of the panel frame origin.
    #[serde(default)]
    pub translation: [Real; 3],
    /// The orientation of the panel frame, as XYZ Euler angles in degrees.
    #[serde(default)]
    pub rotation: [Real; 3],
    /// The 2D vertices.
    pub vertices: Vec<[Real; 2]>,
    /// The boundary edges, in loop order.
    pub edges: Vec<EdgeSpec>,
}

/// An edge of the exchange document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// The indices of the start and end vertices.
    pub endpoints: [usize; 2],
    /// The curvature of the edge, if it is not straight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curvature: Option<CurvatureSpec>,
    /// The edge label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The curvature of an edge in the exchange document. Control points are relative to the
/// edge, see [`Curvature`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum CurvatureSpec {
    /// `{"type": "quadratic", "params": [[x, y]]}`
    Quadratic([[Real; 2]; 1]),
    /// `{"type": "cubic", "params": [[x0, y0], [x1, y1]]}`
    Cubic([[Real; 2]; 2]),
    /// `{"type": "circle", "params": [radius, large_arc, right]}`
    Circle((Real, bool, bool)),
}

impl From<Curvature> for CurvatureSpec {
    fn from(curvature: Curvature) -> Self {
        match curvature {
            Curvature::Quadratic { control } => CurvatureSpec::Quadratic([control]),
            Curvature::Cubic { controls } => CurvatureSpec::Cubic(controls),
            Curvature::Circle {
                radius,
                large_arc,
                right,
            } => CurvatureSpec::Circle((radius, large_arc, right)),
        }
    }
}

impl From<CurvatureSpec> for Curvature {
    fn from(spec: CurvatureSpec) -> Self {
        match spec {
            CurvatureSpec::Quadratic([control]) => Curvature::Quadratic { control },
            CurvatureSpec::Cubic(controls) => Curvature::Cubic { controls },
            CurvatureSpec::Circle((radius, large_arc, right)) => Curvature::Circle {
                radius,
                large_arc,
                right,
            },
        }
    }
}

/// A reference to the edge of a panel, by index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    /// The panel name.
    pub panel: String,
    /// The index of the edge in the panel boundary.
    pub edge: usize,
}

impl EdgeRef {
    /// A reference to the `edge`-th edge of `panel`.
    pub fn new(panel: impl Into<String>, edge: usize) -> Self {
        EdgeRef {
            panel: panel.into(),
            edge,
        }
    }
}

/// Two edges sewn together.
///
/// Serialized as a sequence: the two edge references, then optional string tags. The tag
/// `"right_wrong"` sets [`StitchSpec::right_wrong`], any other tag is the label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StitchSpec {
    /// The stitched edges.
    pub sides: [EdgeRef; 2],
    /// Are both edges walked in the same direction?
    pub right_wrong: bool,
    /// A label propagated to the compiled mesh.
    pub label: Option<String>,
}

const RIGHT_WRONG_TAG: &str = "right_wrong";

impl StitchSpec {
    /// A right-to-right stitch between two edges.
    pub fn new(a: EdgeRef, b: EdgeRef) -> Self {
        StitchSpec {
            sides: [a, b],
            right_wrong: false,
            label: None,
        }
    }

    /// Is the second edge walked backwards when pairing vertices?
    pub fn swap(&self) -> bool {
        !self.right_wrong
    }
}

impl Serialize for StitchSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + self.right_wrong as usize + self.label.is_some() as usize;
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.sides[0])?;
        seq.serialize_element(&self.sides[1])?;
        if self.right_wrong {
            seq.serialize_element(RIGHT_WRONG_TAG)?;
        }
        if let Some(label) = &self.label {
            seq.serialize_element(label)?;
        }
        seq.end()
    }
}

struct StitchSpecVisitor;

impl<'de> Visitor<'de> for StitchSpecVisitor {
    type Value = StitchSpec;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("a sequence of two edge references followed by string tags")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StitchSpec, A::Error> {
        let a: EdgeRef = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let b: EdgeRef = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let mut result = StitchSpec::new(a, b);

        while let Some(tag) = seq.next_element::<String>()? {
            if tag == RIGHT_WRONG_TAG {
                result.right_wrong = true;
            } else {
                result.label = Some(tag);
            }
        }

        Ok(result)
    }
}

impl<'de> Deserialize<'de> for StitchSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(StitchSpecVisitor)
    }
}
