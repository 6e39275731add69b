use boxmesh::box_mesh::{compile, BoxMeshParams, SegmentTag};
use boxmesh::math::{Point3, Vector3};
use boxmesh::pattern::{factory, EdgeRef, Panel, PatternSpec, StitchSpec};
use boxmesh::utils::VertexPair;

// Two unit squares side by side, the right edge of `a` sewn to the left edge of `b`.
fn two_squares() -> PatternSpec {
    let a = Panel::new("a", factory::rectangle(1.0, 1.0)).unwrap();
    let mut b = Panel::new("b", factory::rectangle(1.0, 1.0)).unwrap();
    b.translation = Vector3::new(1.0, 0.0, 0.0);

    let mut pattern = PatternSpec::default();
    let mut a_spec = a.to_spec();
    a_spec.edges[0].label = Some("hem".to_string());
    let _ = pattern.panels.insert("a".to_string(), a_spec);
    let _ = pattern.panels.insert("b".to_string(), b.to_spec());

    let mut stitch = StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("b", 3));
    stitch.label = Some("side".to_string());
    pattern.stitches.push(stitch);
    pattern
}

#[test]
fn stitched_squares_share_their_seam() {
    let mesh = compile(&two_squares(), &BoxMeshParams::default()).unwrap();

    assert_eq!(mesh.num_vertices(), 6);
    assert_eq!(mesh.num_seam_vertices, 2);
    assert_eq!(mesh.faces.len(), 4);
    assert!(mesh.is_manifold());
    assert_eq!(mesh.boundary_edge_count(), 6);
    assert_relative_eq!(mesh.area(), 2.0, epsilon = 1.0e-9);

    assert_relative_eq!(mesh.vertices[0], Point3::new(1.0, 0.0, 0.0), epsilon = 1.0e-9);
    assert_relative_eq!(mesh.vertices[1], Point3::new(1.0, 1.0, 0.0), epsilon = 1.0e-9);
    assert_eq!(mesh.panel_faces["a"], 0..2);
    assert_eq!(mesh.panel_faces["b"], 2..4);
    assert_eq!(mesh.uvs.len(), 8);
    assert_eq!(mesh.texture_faces.len(), mesh.faces.len());
}

#[test]
fn seam_rest_lengths_are_exact() {
    let mesh = compile(&two_squares(), &BoxMeshParams::default()).unwrap();

    assert_eq!(mesh.rest_length_conflicts, 0);
    assert_relative_eq!(mesh.rest_lengths[&VertexPair::new(0, 1)], 1.0, epsilon = 1.0e-12);

    // The panels are flat and not deformed by the seam.
    for (pair, length) in &mesh.rest_lengths {
        assert!(mesh.is_seam_vertex(pair.low()) || mesh.is_seam_vertex(pair.high()));
        let [a, b] = pair.as_array();
        let dist = na::distance(&mesh.vertices[a as usize], &mesh.vertices[b as usize]);
        assert_relative_eq!(*length, dist, epsilon = 1.0e-9);
    }
}

#[test]
fn labels_and_segmentation() {
    let mesh = compile(&two_squares(), &BoxMeshParams::default()).unwrap();

    assert_eq!(mesh.vertex_labels["side"], [0, 1]);
    // The hem goes from the free corner of `a` to the bottom of the seam.
    assert_eq!(mesh.vertex_labels["hem"], [0, 2]);

    assert_eq!(mesh.segmentation.len(), mesh.num_vertices());
    assert_eq!(mesh.segmentation[0].as_slice(), [SegmentTag::Stitch(0)]);
    let in_b = mesh
        .segmentation
        .iter()
        .filter(|tags| tags.as_slice() == [SegmentTag::Panel("b".to_string())])
        .count();
    assert_eq!(in_b, 2);
}
