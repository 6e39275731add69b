use super::load::LoadedStitch;
use super::mesh::{SegmentTag, SegmentTags};
use super::triangulate::{MeshedPanel, MeshedPattern};
use super::BoxMeshParams;
use crate::math::{Point3, Real};
use crate::utils::hashmap::HashMap;
use ena::unify::{InPlaceUnificationTable, NoError, UnifyKey, UnifyValue};

/// A panel vertex, as `(panel index, local vertex index)`.
pub type LocalVertex = (usize, u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct SeamKey(u32);

// The merged position of a set of seam vertices, and the creation rank of its oldest member.
#[derive(Copy, Clone, Debug, PartialEq)]
struct SeamVertex {
    position: Point3<Real>,
    rank: u32,
}

impl UnifyKey for SeamKey {
    type Value = SeamVertex;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(i: u32) -> Self {
        SeamKey(i)
    }

    fn tag() -> &'static str {
        "SeamKey"
    }
}

impl UnifyValue for SeamVertex {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, NoError> {
        Ok(SeamVertex {
            position: na::center(&a.position, &b.position),
            rank: a.rank.min(b.rank),
        })
    }
}

/// A pattern whose stitched vertices are merged into global seam vertices.
///
/// Vertices that are not on a seam keep their panel-local numbering until the mesh is
/// finalized.
#[derive(Clone, Debug)]
pub struct CollapsedPattern {
    pub(crate) params: BoxMeshParams,
    pub(crate) panels: Vec<MeshedPanel>,
    pub(crate) stitches: Vec<LoadedStitch>,
    pub(crate) seam_positions: Vec<Point3<Real>>,
    pub(crate) seam_tags: Vec<SegmentTags>,
    pub(crate) verts_loc_glob: HashMap<LocalVertex, u32>,
    pub(crate) verts_glob_loc: Vec<Vec<LocalVertex>>,
    pub(crate) darts: HashMap<LocalVertex, Vec<u32>>,
}

impl CollapsedPattern {
    /// The compiler parameters.
    pub fn params(&self) -> &BoxMeshParams {
        &self.params
    }

    /// The number of seam vertices.
    pub fn num_seam_vertices(&self) -> usize {
        self.seam_positions.len()
    }

    /// The merged world-space position of each seam vertex.
    pub fn seam_positions(&self) -> &[Point3<Real>] {
        &self.seam_positions
    }

    /// The seam vertex a panel vertex was merged into, if any.
    pub fn global_vertex(&self, panel: usize, local: u32) -> Option<u32> {
        self.verts_loc_glob.get(&(panel, local)).copied()
    }

    /// The panel vertices merged into a seam vertex.
    pub fn local_vertices(&self, global: u32) -> &[LocalVertex] {
        self.verts_glob_loc
            .get(global as usize)
            .map_or(&[], |v| v.as_slice())
    }

    /// The stitch tags of each seam vertex.
    pub fn seam_tags(&self) -> &[SegmentTags] {
        &self.seam_tags
    }

    /// The triangulated panels.
    pub fn panels(&self) -> &[MeshedPanel] {
        &self.panels
    }

    /// The stitches.
    pub fn stitches(&self) -> &[LoadedStitch] {
        &self.stitches
    }
}

// Builds the union-find of the seam vertices, one key per stitched panel vertex.
struct SeamBuilder<'a> {
    panels: &'a [MeshedPanel],
    table: InPlaceUnificationTable<SeamKey>,
    keys: HashMap<LocalVertex, SeamKey>,
    // Indexed by key.
    locals: Vec<LocalVertex>,
    tags: Vec<Vec<usize>>,
}

impl<'a> SeamBuilder<'a> {
    fn key(&mut self, vertex: LocalVertex, stitch: usize) -> SeamKey {
        let key = match self.keys.get(&vertex).copied() {
            Some(key) => key,
            None => {
                let (panel, local) = vertex;
                let key = self.table.new_key(SeamVertex {
                    position: self.panels[panel].positions[local as usize],
                    rank: self.locals.len() as u32,
                });
                let _ = self.keys.insert(vertex, key);
                self.locals.push(vertex);
                self.tags.push(vec![]);
                key
            }
        };

        let tags = &mut self.tags[key.0 as usize];
        if !tags.contains(&stitch) {
            tags.push(stitch);
        }

        key
    }
}

impl MeshedPattern {
    /// Merges the vertices paired by the stitches.
    ///
    /// The vertices of both edges of a stitch are paired in order, the second edge being
    /// walked backwards if the stitch swaps it. Paired vertices are merged into one seam
    /// vertex located at the middle of their positions. Seam vertices are numbered once every
    /// stitch is processed, in the order they were first encountered.
    pub fn collapse_stitches(self) -> CollapsedPattern {
        let mut builder = SeamBuilder {
            panels: &self.panels,
            table: InPlaceUnificationTable::new(),
            keys: HashMap::default(),
            locals: vec![],
            tags: vec![],
        };
        let mut darts: HashMap<LocalVertex, Vec<u32>> = HashMap::default();

        for (id, stitch) in self.stitches.iter().enumerate() {
            let [a, b] = stitch.sides;
            let verts_a = &self.panels[a.panel].edge_vertices[a.edge];
            let verts_b = &self.panels[b.panel].edge_vertices[b.edge];
            let verts_b: Vec<u32> = if stitch.swap {
                verts_b.iter().rev().copied().collect()
            } else {
                verts_b.clone()
            };

            for (la, lb) in verts_a.iter().zip(verts_b.iter()) {
                let (va, vb) = ((a.panel, *la), (b.panel, *lb));
                let ka = builder.key(va, id);
                let kb = builder.key(vb, id);

                if va == vb {
                    // The tip of a dart.
                    continue;
                }

                if a.panel == b.panel {
                    darts.entry(va).or_default().push(*lb);
                    darts.entry(vb).or_default().push(*la);
                }

                builder.table.union(ka, kb);
            }
        }

        // Compaction: one global index per class, by rank of its oldest member.
        let num_keys = builder.locals.len();
        let mut roots: Vec<(u32, SeamKey)> = vec![];
        let mut root_of_key = Vec::with_capacity(num_keys);

        for k in 0..num_keys as u32 {
            let root = builder.table.find(SeamKey(k));
            if root == SeamKey(k) {
                roots.push((builder.table.probe_value(root).rank, root));
            }
            root_of_key.push(root);
        }

        roots.sort_by_key(|(rank, _)| *rank);

        let mut global_of_root: HashMap<SeamKey, u32> = HashMap::default();
        let mut seam_positions = Vec::with_capacity(roots.len());

        for (global, (_, root)) in roots.iter().enumerate() {
            let _ = global_of_root.insert(*root, global as u32);
            seam_positions.push(builder.table.probe_value(*root).position);
        }

        let mut verts_loc_glob: HashMap<LocalVertex, u32> = HashMap::default();
        let mut verts_glob_loc = vec![vec![]; roots.len()];
        let mut stitch_ids: Vec<Vec<usize>> = vec![vec![]; roots.len()];

        for (k, root) in root_of_key.iter().enumerate() {
            let global = global_of_root[root];
            let local = builder.locals[k];
            let _ = verts_loc_glob.insert(local, global);
            verts_glob_loc[global as usize].push(local);
            stitch_ids[global as usize].extend_from_slice(&builder.tags[k]);
        }

        let seam_tags: Vec<SegmentTags> = stitch_ids
            .into_iter()
            .map(|mut ids| {
                ids.sort_unstable();
                ids.dedup();
                ids.into_iter().map(SegmentTag::Stitch).collect()
            })
            .collect();

        log::debug!(
            "Merged {} stitched panel vertices into {} seam vertices.",
            num_keys,
            roots.len()
        );

        CollapsedPattern {
            params: self.params,
            panels: self.panels,
            stitches: self.stitches,
            seam_positions,
            seam_tags,
            verts_loc_glob,
            verts_glob_loc,
            darts,
        }
    }
}
