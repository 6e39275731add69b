use super::{BoxMeshError, BoxMeshParams, MultiStitchingError};
use crate::math::{Real, Unit, Vector3};
use crate::pattern::{Panel, PatternLoadingError, PatternSpec};

/// A panel ready to be triangulated.
#[derive(Clone, Debug)]
pub struct LoadedPanel {
    /// The panel geometry and placement.
    pub panel: Panel,
    /// The world-space normal of the panel.
    pub norm: Unit<Vector3<Real>>,
    /// The number of vertices sampled along each edge, endpoints included.
    pub edge_vertex_counts: Vec<usize>,
    /// The stitch each edge belongs to, if any.
    pub edge_stitches: Vec<Option<usize>>,
}

/// One side of a loaded stitch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StitchSide {
    /// The panel index.
    pub panel: usize,
    /// The edge index in its panel.
    pub edge: usize,
}

/// A stitch between two panel edges, resolved to indices.
#[derive(Clone, Debug)]
pub struct LoadedStitch {
    /// The stitched edges.
    pub sides: [StitchSide; 2],
    /// Is the second side walked backwards?
    pub swap: bool,
    /// The number of vertices both edges are sampled with.
    pub vertex_count: usize,
    /// The label of the stitch.
    pub label: Option<String>,
}

/// A validated pattern: panels are closed loops with a well-defined normal, stitches reference
/// existing edges and no edge is stitched twice.
#[derive(Clone, Debug)]
pub struct LoadedPattern {
    pub(crate) params: BoxMeshParams,
    pub(crate) panels: Vec<LoadedPanel>,
    pub(crate) stitches: Vec<LoadedStitch>,
}

impl LoadedPattern {
    /// Loads and validates a pattern.
    ///
    /// Both edges of a stitch are sampled with the same number of vertices: the largest of
    /// the two counts required by the mesh resolution.
    pub fn load(pattern: &PatternSpec, params: &BoxMeshParams) -> Result<Self, BoxMeshError> {
        if !(params.mesh_resolution > 0.0 && params.mesh_resolution.is_finite()) {
            return Err(BoxMeshError::InvalidResolution(params.mesh_resolution));
        }

        let mut panels = Vec::with_capacity(pattern.panels.len());

        for (name, spec) in &pattern.panels {
            let panel = Panel::from_spec(name, spec, params.closure_tolerance)?;
            let norm = panel.norm()?;
            let edge_vertex_counts = panel
                .edges
                .iter()
                .enumerate()
                .map(|(edge, e)| {
                    let length = e.length();
                    params.edge_vertex_count(length).ok_or_else(|| {
                        BoxMeshError::TooManyEdgeVertices {
                            panel: name.clone(),
                            edge,
                            length,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let edge_stitches = vec![None; panel.edges.len()];

            panels.push(LoadedPanel {
                panel,
                norm,
                edge_vertex_counts,
                edge_stitches,
            });
        }

        let mut stitches = Vec::with_capacity(pattern.stitches.len());

        for (id, stitch) in pattern.stitches.iter().enumerate() {
            let mut sides = [StitchSide { panel: 0, edge: 0 }; 2];

            for (side, edge_ref) in sides.iter_mut().zip(stitch.sides.iter()) {
                let panel = pattern.panels.get_index_of(&edge_ref.panel).ok_or_else(|| {
                    PatternLoadingError::UnknownPanel {
                        stitch: id,
                        panel: edge_ref.panel.clone(),
                    }
                })?;
                let loaded = &mut panels[panel];

                if edge_ref.edge >= loaded.edge_stitches.len() {
                    return Err(PatternLoadingError::UnknownEdge {
                        stitch: id,
                        panel: edge_ref.panel.clone(),
                        edge: edge_ref.edge,
                        num_edges: loaded.edge_stitches.len(),
                    }
                    .into());
                }

                if let Some(first) = loaded.edge_stitches[edge_ref.edge] {
                    return Err(MultiStitchingError {
                        panel: edge_ref.panel.clone(),
                        edge: edge_ref.edge,
                        first,
                        second: id,
                    }
                    .into());
                }

                loaded.edge_stitches[edge_ref.edge] = Some(id);
                *side = StitchSide {
                    panel,
                    edge: edge_ref.edge,
                };
            }

            let vertex_count = sides
                .iter()
                .map(|s| panels[s.panel].edge_vertex_counts[s.edge])
                .max()
                .unwrap_or(2);

            for side in &sides {
                panels[side.panel].edge_vertex_counts[side.edge] = vertex_count;
            }

            stitches.push(LoadedStitch {
                sides,
                swap: stitch.swap(),
                vertex_count,
                label: stitch.label.clone(),
            });
        }

        log::debug!(
            "Loaded {} panels and {} stitches.",
            panels.len(),
            stitches.len()
        );

        Ok(LoadedPattern {
            params: *params,
            panels,
            stitches,
        })
    }

    /// The compiler parameters.
    pub fn params(&self) -> &BoxMeshParams {
        &self.params
    }

    /// The loaded panels, in document order.
    pub fn panels(&self) -> &[LoadedPanel] {
        &self.panels
    }

    /// The loaded stitches, in document order.
    pub fn stitches(&self) -> &[LoadedStitch] {
        &self.stitches
    }

    /// The index of the panel with the given name.
    pub fn panel_index(&self, name: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.panel.name == name)
    }
}
