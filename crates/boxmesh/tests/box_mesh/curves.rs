use boxmesh::box_mesh::{compile, BoxMeshParams};
use boxmesh::math::{Point2, Real, Rotation3, Vector3};
use boxmesh::pattern::{factory, Component, Edge, EdgeSequence, Interface, Panel, PatternPart};

// A 2x2 square whose top is a quadratic bulging up to y = 2.5.
fn bulged(name: &str, bottom: Edge) -> Panel {
    let edges = EdgeSequence::new(vec![
        bottom,
        Edge::new(Point2::new(2.0, 0.0), Point2::new(2.0, 2.0)),
        Edge::quadratic(
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 3.0),
        ),
        Edge::new(Point2::new(0.0, 2.0), Point2::new(0.0, 0.0)),
    ]);
    Panel::new(name, edges).unwrap()
}

#[test]
fn curved_edges_are_sampled_along_their_arc_length() {
    let mut front = bulged("front", Edge::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)));
    front.translation = Vector3::new(0.0, 0.0, 1.0);
    // The bottom of the back is a half circle bulging down to y = -1.
    let arc = Edge::circle_arc(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 1.0, false, true);
    let mut back = bulged("back", arc);
    back.rotate_to(&Rotation3::from_euler_angles(0.0, core::f64::consts::PI, 0.0));
    back.translation = Vector3::new(2.0, 0.0, -1.0);

    let side = (
        Interface::new(&front, [front.edges[1].id()]),
        Interface::new(&back, [back.edges[3].id()]),
    );
    let top = (
        Interface::new(&front, [front.edges[2].id()]),
        Interface::new(&back, [back.edges[2].id()]),
    );
    let mut component = Component::new("bag").with_child(front).with_child(back);
    component.add_stitch(side.0, side.1).unwrap();
    component.add_stitch(top.0, top.1).unwrap();

    let pattern = component.assembly().unwrap();
    let params = BoxMeshParams::with_resolution(0.5);
    let mesh = compile(&pattern, &params).unwrap();

    assert!(mesh.is_manifold());
    // 5 vertices on the straight side, 6 on the curved top, one corner shared.
    assert_eq!(mesh.num_seam_vertices, 10);
    assert_eq!(mesh.rest_length_conflicts, 0);

    let max_y = mesh.vertices.iter().map(|v| v.y).fold(Real::MIN, Real::max);
    let min_y = mesh.vertices.iter().map(|v| v.y).fold(Real::MAX, Real::min);
    assert!(max_y > 2.4 && max_y <= 2.5 + 1.0e-9);
    assert!(min_y < -0.95 && min_y >= -1.0 - 1.0e-9);
}

#[test]
fn ruffled_seams_pair_edges_of_different_lengths() {
    let long = Panel::new("long", factory::rectangle(1.0, 1.5)).unwrap();
    let mut short = Panel::new("short", factory::rectangle(1.0, 1.0)).unwrap();
    short.translation = Vector3::new(1.0, 0.0, 0.0);

    let gathered = Interface::new(&long, [long.edges[1].id()]).with_ruffle(1.5);
    let flat = Interface::new(&short, [short.edges[3].id()]);
    let mut component = Component::new("gathered")
        .with_child(long)
        .with_child(short);
    component.add_stitch(gathered, flat).unwrap();

    let pattern = component.assembly().unwrap();
    assert_eq!(pattern.stitches.len(), 1);

    let mesh = compile(&pattern, &BoxMeshParams::with_resolution(0.5)).unwrap();
    assert!(mesh.is_manifold());
    assert_eq!(mesh.num_seam_vertices, 4);
    assert_eq!(mesh.num_vertices(), 18);
    assert_eq!(mesh.rest_length_conflicts, 0);

    // Seam segments are 0.5 long on `long` and 1/3 long on `short`.
    let seam_edges: Vec<_> = mesh
        .rest_lengths
        .iter()
        .filter(|(pair, _)| mesh.is_seam_vertex(pair.low()) && mesh.is_seam_vertex(pair.high()))
        .collect();
    assert_eq!(seam_edges.len(), 3);
    for (_, length) in seam_edges {
        assert_relative_eq!(*length, 5.0 / 12.0, epsilon = 1.0e-9);
    }
}
