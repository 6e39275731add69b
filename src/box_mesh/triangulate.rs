use super::load::{LoadedPanel, LoadedPattern, LoadedStitch};
use super::{BoxMeshError, BoxMeshParams, DegenerateTrianglesError};
use crate::bounding_volume::Aabb2;
use crate::math::{Point2, Point3, Real};
use crate::transformation::triangulate_delaunay;
use crate::utils::{point_in_poly2d, point_segment_distance2d};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A triangulated panel.
///
/// Its vertices are numbered locally: the boundary samples come first, in the order the
/// boundary is walked, followed by the interior vertices.
#[derive(Clone, Debug)]
pub struct MeshedPanel {
    /// The panel name.
    pub name: String,
    /// The vertices, in the panel plane.
    pub points: Vec<Point2<Real>>,
    /// The vertices, in world space.
    pub positions: Vec<Point3<Real>>,
    /// The triangles, oriented along the panel normal.
    pub faces: Vec<[u32; 3]>,
    /// For each edge, its vertices from start to end, both endpoints included.
    pub edge_vertices: Vec<Vec<u32>>,
    /// The label of each edge.
    pub edge_labels: Vec<Option<String>>,
    /// The number of boundary vertices.
    pub num_boundary_vertices: usize,
}

impl MeshedPanel {
    /// The number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }
}

/// A pattern whose panels are all triangulated independently.
#[derive(Clone, Debug)]
pub struct MeshedPattern {
    pub(crate) params: BoxMeshParams,
    pub(crate) panels: Vec<MeshedPanel>,
    pub(crate) stitches: Vec<LoadedStitch>,
}

impl MeshedPattern {
    /// The compiler parameters.
    pub fn params(&self) -> &BoxMeshParams {
        &self.params
    }

    /// The triangulated panels, in document order.
    pub fn panels(&self) -> &[MeshedPanel] {
        &self.panels
    }

    /// The stitches, in document order.
    pub fn stitches(&self) -> &[LoadedStitch] {
        &self.stitches
    }
}

impl LoadedPattern {
    /// Triangulates every panel.
    ///
    /// Panels are independent and triangulated in parallel when the `parallel` feature is
    /// enabled.
    pub fn triangulate(self) -> Result<MeshedPattern, BoxMeshError> {
        let params = self.params;

        #[cfg(feature = "parallel")]
        let panels = self
            .panels
            .par_iter()
            .map(|p| mesh_panel(p, &params))
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let panels = self
            .panels
            .iter()
            .map(|p| mesh_panel(p, &params))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MeshedPattern {
            params,
            panels,
            stitches: self.stitches,
        })
    }
}

fn mesh_panel(loaded: &LoadedPanel, params: &BoxMeshParams) -> Result<MeshedPanel, BoxMeshError> {
    let panel = &loaded.panel;
    let mut boundary = Vec::new();
    let mut starts = Vec::with_capacity(panel.edges.len());

    // The last sample of an edge is the first sample of the next one.
    for (edge, n) in panel.edges.iter().zip(&loaded.edge_vertex_counts) {
        let samples = edge.sample(*n);
        starts.push(boundary.len() as u32);
        boundary.extend_from_slice(&samples[..samples.len() - 1]);
    }

    let edge_vertices: Vec<Vec<u32>> = (0..starts.len())
        .map(|i| {
            let end = starts.get(i + 1).copied().unwrap_or(0);
            let n = loaded.edge_vertex_counts[i] as u32;
            (starts[i]..starts[i] + n - 1).chain([end]).collect()
        })
        .collect();

    let interior = interior_points(&boundary, params);
    let triangulation =
        triangulate_delaunay(&boundary, &interior).map_err(|source| DegenerateTrianglesError {
            panel: panel.name.clone(),
            source,
        })?;

    let positions = panel.points_to_3d(&triangulation.points);
    let mut faces = triangulation.triangles;

    // The triangulation is consistently oriented, checking one face is enough.
    if let Some([a, b, c]) = faces.first().copied() {
        let [pa, pb, pc] = [a, b, c].map(|i| positions[i as usize]);
        if (pb - pa).cross(&(pc - pa)).dot(&*loaded.norm) < 0.0 {
            faces.iter_mut().for_each(|f| f.swap(1, 2));
        }
    }

    log::debug!(
        "Panel `{}`: {} boundary vertices, {} interior vertices, {} triangles.",
        panel.name,
        boundary.len(),
        triangulation.points.len() - boundary.len(),
        faces.len()
    );

    Ok(MeshedPanel {
        name: panel.name.clone(),
        num_boundary_vertices: boundary.len(),
        points: triangulation.points,
        positions,
        faces,
        edge_vertices,
        edge_labels: panel.edges.iter().map(|e| e.label.clone()).collect(),
    })
}

// A regular grid of points inside the boundary, away from it.
fn interior_points(boundary: &[Point2<Real>], params: &BoxMeshParams) -> Vec<Point2<Real>> {
    let spacing = params.mesh_resolution * params.interior_spacing;
    let clearance = spacing * params.boundary_clearance;

    if !(spacing > 0.0) {
        return vec![];
    }

    let aabb = Aabb2::from_points(boundary.iter().copied());
    let extents = aabb.extents();
    let nx = (extents.x / spacing).ceil() as usize;
    let ny = (extents.y / spacing).ceil() as usize;
    let mut result = vec![];

    for i in 1..nx {
        for j in 1..ny {
            let pt = aabb.mins + na::Vector2::new(i as Real, j as Real) * spacing;

            if !point_in_poly2d(&pt, boundary) {
                continue;
            }

            let n = boundary.len();
            let far_from_boundary = (0..n).all(|k| {
                point_segment_distance2d(&pt, &boundary[k], &boundary[(k + 1) % n]) >= clearance
            });

            if far_from_boundary {
                result.push(pt);
            }
        }
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pattern::{factory, Panel, PatternSpec};

    fn load(panel: Panel, resolution: Real) -> LoadedPattern {
        let mut pattern = PatternSpec::default();
        let _ = pattern.panels.insert(panel.name.clone(), panel.to_spec());
        LoadedPattern::load(&pattern, &BoxMeshParams::with_resolution(resolution)).unwrap()
    }

    #[test]
    fn unit_square_has_no_interior_vertex() {
        let panel = Panel::new("square", factory::rectangle(1.0, 1.0)).unwrap();
        let meshed = load(panel, 1.0).triangulate().unwrap();
        let square = &meshed.panels()[0];

        assert_eq!(square.num_vertices(), 4);
        assert_eq!(square.faces.len(), 2);
        assert_eq!(square.edge_vertices, vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 0]]);
    }

    #[test]
    fn edges_share_their_end_vertices() {
        let panel = Panel::new("rect", factory::rectangle(4.0, 2.0)).unwrap();
        let meshed = load(panel, 1.0).triangulate().unwrap();
        let rect = &meshed.panels()[0];

        assert_eq!(rect.num_boundary_vertices, 12);
        assert_eq!(rect.edge_vertices[0], [0, 1, 2, 3, 4]);
        assert_eq!(rect.edge_vertices[3], [10, 11, 0]);
        // Interior vertices at (1, 1), (2, 1) and (3, 1).
        assert_eq!(rect.num_vertices(), 15);

        for (edge, verts) in rect.edge_vertices.iter().enumerate() {
            let e = &rect_edges()[edge];
            assert_relative_eq!(rect.points[verts[0] as usize], e.start, epsilon = 1.0e-9);
            assert_relative_eq!(
                rect.points[*verts.last().unwrap() as usize],
                e.end,
                epsilon = 1.0e-9
            );
        }
    }

    fn rect_edges() -> Vec<crate::pattern::Edge> {
        factory::rectangle(4.0, 2.0).iter().cloned().collect()
    }

    #[test]
    fn faces_follow_the_panel_normal() {
        // A clockwise boundary: the panel faces -z.
        let panel = Panel::new("back", factory::rectangle(3.0, 2.0).reversed()).unwrap();
        let loaded = load(panel, 1.0);
        let norm = loaded.panels()[0].norm;
        assert_relative_eq!(norm.into_inner(), -na::Vector3::z(), epsilon = 1.0e-9);

        let meshed = loaded.triangulate().unwrap();
        let back = &meshed.panels()[0];

        for [a, b, c] in &back.faces {
            let [pa, pb, pc] = [a, b, c].map(|i| back.positions[*i as usize]);
            assert!((pb - pa).cross(&(pc - pa)).dot(&*norm) > 0.0);
        }
    }
}
