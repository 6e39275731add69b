use super::collapse::CollapsedPattern;
use super::mesh::{CompiledMesh, SegmentTag};
use super::BoxMeshError;
use crate::math::Real;
use crate::utils::hashmap::{Entry, HashMap};
use crate::utils::{Interval, VertexPair};
use indexmap::IndexMap;
use smallvec::smallvec;

// The candidate rest lengths of one mesh edge, and the range allowed by its triangles.
#[derive(Copy, Clone, Debug)]
struct RestLengthCandidates {
    sum: Real,
    count: usize,
    bounds: Option<Interval>,
    lower: Real,
}

impl RestLengthCandidates {
    fn new(length: Real, bounds: Interval) -> Self {
        RestLengthCandidates {
            sum: length,
            count: 1,
            bounds: Some(bounds),
            lower: bounds.0,
        }
    }

    fn add(&mut self, length: Real, bounds: Interval) {
        self.sum += length;
        self.count += 1;
        self.lower = self.lower.max(bounds.0);
        self.bounds = self.bounds.and_then(|b| b.intersect(bounds));
    }

    // `None` if no length satisfies every triangle.
    fn resolve(&self) -> Option<Real> {
        let mean = self.sum / self.count as Real;
        self.bounds.map(|b| b.clamp(mean))
    }
}

impl CollapsedPattern {
    /// Builds the final mesh.
    ///
    /// The pattern is validated first. The vertices that are not on a seam are appended
    /// after the seam vertices, panel by panel, and faces collapsed into a point or a segment
    /// by the stitches are dropped.
    pub fn finalize(self) -> Result<CompiledMesh, BoxMeshError> {
        self.validate()?;

        let num_seam_vertices = self.seam_positions.len();
        let mut vertices = self.seam_positions.clone();
        let mut segmentation = self.seam_tags.clone();
        let mut uvs = vec![];
        let mut faces = vec![];
        let mut texture_faces = vec![];
        let mut panel_faces = IndexMap::new();
        let mut candidates: HashMap<VertexPair, RestLengthCandidates> = HashMap::default();
        let mut num_degenerate = 0;
        let mut local_to_global = Vec::with_capacity(self.panels.len());

        for (p, panel) in self.panels.iter().enumerate() {
            let uv_offset = uvs.len() as u32;
            uvs.extend_from_slice(&panel.points);

            let globals: Vec<u32> = (0..panel.num_vertices() as u32)
                .map(|local| {
                    self.global_vertex(p, local).unwrap_or_else(|| {
                        vertices.push(panel.positions[local as usize]);
                        segmentation.push(smallvec![SegmentTag::Panel(panel.name.clone())]);
                        vertices.len() as u32 - 1
                    })
                })
                .collect();

            let first_face = faces.len();

            for face in &panel.faces {
                let [a, b, c] = face.map(|i| globals[i as usize]);

                if a == b || b == c || c == a {
                    num_degenerate += 1;
                    continue;
                }

                faces.push([a, b, c]);
                texture_faces.push(face.map(|i| i + uv_offset));

                if [a, b, c].iter().all(|v| *v as usize >= num_seam_vertices) {
                    continue;
                }

                let [pa, pb, pc] = face.map(|i| panel.points[i as usize]);
                let lengths = [
                    na::distance(&pa, &pb),
                    na::distance(&pb, &pc),
                    na::distance(&pc, &pa),
                ];
                let verts = [a, b, c];

                for k in 0..3 {
                    let (v1, v2) = (verts[k], verts[(k + 1) % 3]);
                    if v1 as usize >= num_seam_vertices && v2 as usize >= num_seam_vertices {
                        continue;
                    }

                    let key = VertexPair::new(v1, v2);
                    let bounds = Interval::triangle_side(lengths[(k + 1) % 3], lengths[(k + 2) % 3]);

                    match candidates.entry(key) {
                        Entry::Occupied(mut e) => e.get_mut().add(lengths[k], bounds),
                        Entry::Vacant(e) => {
                            let _ = e.insert(RestLengthCandidates::new(lengths[k], bounds));
                        }
                    }
                }
            }

            let _ = panel_faces.insert(panel.name.clone(), first_face..faces.len());
            local_to_global.push(globals);
        }

        if num_degenerate > 0 {
            log::debug!("Dropped {num_degenerate} faces collapsed by the stitches.");
        }

        let mut rest_lengths = HashMap::default();
        let mut rest_length_conflicts = 0;

        for (pair, candidate) in &candidates {
            let length = match candidate.resolve() {
                Some(length) => length,
                None => {
                    log::warn!(
                        "No rest length between vertices {} and {} satisfies all their triangles, using {}.",
                        pair.low(),
                        pair.high(),
                        candidate.lower
                    );
                    rest_length_conflicts += 1;
                    candidate.lower
                }
            };
            let _ = rest_lengths.insert(*pair, length);
        }

        let vertex_labels = self.vertex_labels(&local_to_global);

        log::info!(
            "Compiled {} panels into {} vertices ({} on seams) and {} faces.",
            self.panels.len(),
            vertices.len(),
            num_seam_vertices,
            faces.len()
        );

        Ok(CompiledMesh {
            vertices,
            faces,
            uvs,
            texture_faces,
            panel_faces,
            segmentation,
            rest_lengths,
            rest_length_conflicts,
            vertex_labels,
            num_seam_vertices,
        })
    }

    // The vertices of labeled edges and stitches.
    fn vertex_labels(&self, local_to_global: &[Vec<u32>]) -> IndexMap<String, Vec<u32>> {
        let mut labels: IndexMap<String, Vec<u32>> = IndexMap::new();

        for (p, panel) in self.panels.iter().enumerate() {
            for (edge, label) in panel.edge_labels.iter().enumerate() {
                if let Some(label) = label {
                    let verts = panel.edge_vertices[edge].iter();
                    labels
                        .entry(label.clone())
                        .or_default()
                        .extend(verts.map(|l| local_to_global[p][*l as usize]));
                }
            }
        }

        for stitch in &self.stitches {
            if let Some(label) = &stitch.label {
                let entry = labels.entry(label.clone()).or_default();

                for side in &stitch.sides {
                    let verts = self.panels[side.panel].edge_vertices[side.edge].iter();
                    entry.extend(verts.map(|l| local_to_global[side.panel][*l as usize]));
                }
            }
        }

        for verts in labels.values_mut() {
            verts.sort_unstable();
            verts.dedup();
        }

        labels
    }
}
