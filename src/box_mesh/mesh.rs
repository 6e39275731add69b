use crate::math::{Point2, Point3, Real};
use crate::utils::hashmap::HashMap;
use crate::utils::VertexPair;
use core::fmt;
use core::ops::Range;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::io::{self, Write};

/// The part of the garment a vertex belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentTag {
    /// The vertex is inside a panel, or on a free edge of it.
    Panel(String),
    /// The vertex is on the seam with the given stitch index.
    Stitch(usize),
}

impl fmt::Display for SegmentTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegmentTag::Panel(name) => f.write_str(name),
            SegmentTag::Stitch(id) => write!(f, "stitch_{id}"),
        }
    }
}

/// The segment tags of one vertex.
pub type SegmentTags = SmallVec<[SegmentTag; 2]>;

/// A pattern compiled into a single triangle mesh.
///
/// Vertices on a seam come first, numbered in the order the stitches are walked. The
/// remaining vertices of each panel follow, panel by panel.
#[derive(Clone, Debug, Default)]
pub struct CompiledMesh {
    /// The world-space vertex positions.
    pub vertices: Vec<Point3<Real>>,
    /// The triangles, counter-clockwise when seen from outside the garment.
    pub faces: Vec<[u32; 3]>,
    /// The texture coordinates: the position of each panel vertex in its panel plane.
    ///
    /// A seam vertex has one texture coordinate per panel it belongs to.
    pub uvs: Vec<Point2<Real>>,
    /// The texture coordinates of each triangle, indexing `uvs`.
    pub texture_faces: Vec<[u32; 3]>,
    /// The range of `faces` generated by each panel.
    pub panel_faces: IndexMap<String, Range<usize>>,
    /// The segment tags of each vertex.
    pub segmentation: Vec<SegmentTags>,
    /// The rest length of the mesh edges touching a seam.
    pub rest_lengths: HashMap<VertexPair, Real>,
    /// The number of seam edges whose rest length could not satisfy every adjacent triangle.
    pub rest_length_conflicts: usize,
    /// The vertices of every labeled edge or stitch, by label.
    pub vertex_labels: IndexMap<String, Vec<u32>>,
    /// The number of vertices on a seam.
    pub num_seam_vertices: usize,
}

impl CompiledMesh {
    /// The number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Is the vertex on a seam?
    pub fn is_seam_vertex(&self, vertex: u32) -> bool {
        (vertex as usize) < self.num_seam_vertices
    }

    /// How many faces share each edge of the mesh.
    pub fn edge_valences(&self) -> HashMap<VertexPair, usize> {
        let mut result = HashMap::default();

        for face in &self.faces {
            for k in 0..3 {
                *result
                    .entry(VertexPair::new(face[k], face[(k + 1) % 3]))
                    .or_insert(0) += 1;
            }
        }

        result
    }

    /// Is this mesh an oriented 2-manifold (with boundary)?
    ///
    /// Every edge must be shared by at most two faces traversing it in opposite directions.
    pub fn is_manifold(&self) -> bool {
        let mut directed = crate::utils::hashmap::HashSet::default();

        for face in &self.faces {
            for k in 0..3 {
                if !directed.insert((face[k], face[(k + 1) % 3])) {
                    return false;
                }
            }
        }

        self.edge_valences().values().all(|n| *n <= 2)
    }

    /// The number of edges belonging to a single face.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_valences().values().filter(|n| **n == 1).count()
    }

    /// The total area of the triangles.
    pub fn area(&self) -> Real {
        self.faces
            .iter()
            .map(|[a, b, c]| {
                let [pa, pb, pc] = [a, b, c].map(|i| self.vertices[*i as usize]);
                (pb - pa).cross(&(pc - pa)).norm() / 2.0
            })
            .sum()
    }

    /// Writes the segmentation, one line per vertex with its comma-separated tags.
    pub fn write_segmentation(&self, out: &mut impl Write) -> io::Result<()> {
        for tags in &self.segmentation {
            let line = tags
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "{line}")?;
        }

        Ok(())
    }
}
