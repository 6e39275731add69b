use boxmesh::box_mesh::{compile, BoxMeshParams, LoadedPattern};
use boxmesh::math::Point3;
use boxmesh::pattern::{factory, Panel, PatternPart};

#[test]
fn dart_sides_are_sewn_together() {
    let mut panel = Panel::new("front", factory::rectangle(10.0, 10.0)).unwrap();
    let bottom = panel.edges[0].id();
    let _ = panel
        .insert_dart(bottom, &factory::dart_shape(2.0, 4.0), 5.0, false)
        .unwrap();
    let pattern = panel.assembly().unwrap();
    let params = BoxMeshParams::default();

    let meshed = LoadedPattern::load(&pattern, &params)
        .unwrap()
        .triangulate()
        .unwrap();
    // Both sides have 6 vertices: the tip is shared, the 5 other pairs are merged.
    assert_eq!(meshed.stitches()[0].vertex_count, 6);
    let num_panel_vertices = meshed.panels()[0].num_vertices();

    let mesh = compile(&pattern, &params).unwrap();
    assert_eq!(mesh.num_vertices(), num_panel_vertices - 5);
    assert!(mesh.is_manifold());
    assert_eq!(mesh.rest_length_conflicts, 0);

    let count_at = |pt: Point3<f64>| {
        mesh.vertices
            .iter()
            .filter(|v| na::distance(*v, &pt) < 1.0e-6)
            .count()
    };
    assert_eq!(count_at(Point3::new(5.0, 4.0, 0.0)), 1);
    // The dart base is closed at its middle.
    assert_eq!(count_at(Point3::new(5.0, 0.0, 0.0)), 1);
    assert_eq!(count_at(Point3::new(4.0, 0.0, 0.0)), 0);
    assert_eq!(count_at(Point3::new(6.0, 0.0, 0.0)), 0);
}

#[test]
fn dart_rest_lengths_keep_the_flat_geometry() {
    let mut panel = Panel::new("front", factory::rectangle(10.0, 10.0)).unwrap();
    let bottom = panel.edges[0].id();
    let _ = panel
        .insert_dart(bottom, &factory::dart_shape(2.0, 4.0), 5.0, false)
        .unwrap();
    let mesh = compile(&panel.assembly().unwrap(), &BoxMeshParams::default()).unwrap();

    // Along the closed dart, consecutive seam vertices keep their distance on the dart sides.
    let side = (17.0f64).sqrt() / 5.0;
    let seam_edges = mesh
        .rest_lengths
        .iter()
        .filter(|(pair, _)| mesh.is_seam_vertex(pair.low()) && mesh.is_seam_vertex(pair.high()))
        .count();
    assert!(seam_edges >= 5);

    for (pair, length) in &mesh.rest_lengths {
        if mesh.is_seam_vertex(pair.low()) && mesh.is_seam_vertex(pair.high()) {
            assert_relative_eq!(*length, side, epsilon = 1.0e-6);
        }
    }
}
