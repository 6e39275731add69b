use crate::math::{Real, VERTEX_TOLERANCE};

/// Parameters of the pattern compiler.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxMeshParams {
    /// Target distance between consecutive vertices along the panel boundaries, in pattern
    /// units.
    ///
    /// An edge of length `l` gets `ceil(l / mesh_resolution) + 1` vertices, endpoints
    /// included.
    pub mesh_resolution: Real,
    /// Distance under which the end of an edge is considered to coincide with the start of
    /// the next one.
    pub closure_tolerance: Real,
    /// Spacing of the interior vertices, relative to `mesh_resolution`.
    pub interior_spacing: Real,
    /// Minimal distance between an interior vertex and the panel boundary, relative to the
    /// interior spacing.
    pub boundary_clearance: Real,
}

impl Default for BoxMeshParams {
    fn default() -> Self {
        BoxMeshParams {
            mesh_resolution: 1.0,
            closure_tolerance: VERTEX_TOLERANCE,
            interior_spacing: 1.0,
            boundary_clearance: 0.5,
        }
    }
}

impl BoxMeshParams {
    /// The largest number of vertices an edge can be sampled with.
    pub const MAX_EDGE_VERTICES: usize = 1 << 24;

    /// Default parameters with the given mesh resolution.
    pub fn with_resolution(mesh_resolution: Real) -> Self {
        BoxMeshParams {
            mesh_resolution,
            ..Default::default()
        }
    }

    /// The number of vertices sampled along an edge of the given length, endpoints included.
    ///
    /// Returns `None` if the count is not finite or exceeds [`Self::MAX_EDGE_VERTICES`].
    pub fn edge_vertex_count(&self, length: Real) -> Option<usize> {
        let segments = (length / self.mesh_resolution).ceil();

        if !segments.is_finite() || segments >= Self::MAX_EDGE_VERTICES as Real {
            return None;
        }

        Some((segments.max(0.0) as usize).saturating_add(1).max(2))
    }
}
