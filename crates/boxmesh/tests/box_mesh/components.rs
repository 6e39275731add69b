use boxmesh::box_mesh::{compile, BoxMeshParams};
use boxmesh::math::{Real, Rotation3, Vector3};
use boxmesh::pattern::{factory, Component, Interface, Panel, PatternPart};

// A skirt: a front panel and a back panel turned around the y axis, sewn on both sides.
fn skirt() -> Component {
    let mut front = Panel::new("front", factory::rectangle(2.0, 2.0)).unwrap();
    front.translation = Vector3::new(0.0, 0.0, 1.0);
    let mut back = Panel::new("back", factory::rectangle(2.0, 2.0)).unwrap();
    back.rotate_to(&Rotation3::from_euler_angles(0.0, core::f64::consts::PI, 0.0));
    back.translation = Vector3::new(2.0, 0.0, -1.0);

    let front_right = Interface::new(&front, [front.edges[1].id()]);
    let front_left = Interface::new(&front, [front.edges[3].id()]);
    let back_right = Interface::new(&back, [back.edges[1].id()]);
    let back_left = Interface::new(&back, [back.edges[3].id()]);

    let mut skirt = Component::new("skirt").with_child(front).with_child(back);
    skirt.add_stitch(front_right, back_left).unwrap();
    skirt.add_stitch(front_left, back_right).unwrap();
    skirt
}

#[test]
fn assembled_component_compiles_into_a_tube() {
    let pattern = skirt().assembly().unwrap();
    let mesh = compile(&pattern, &BoxMeshParams::default()).unwrap();

    assert_eq!(mesh.num_vertices(), 12);
    assert!(mesh.is_manifold());
    assert_eq!(mesh.boundary_edge_count(), 8);
}

#[test]
fn placement_is_carried_to_the_mesh() {
    let mut skirt = skirt();
    skirt.translate_to(&na::Point3::new(0.0, 10.0, 0.0));
    let pattern = skirt.assembly().unwrap();
    let mesh = compile(&pattern, &BoxMeshParams::default()).unwrap();

    let max_y = mesh.vertices.iter().map(|v| v.y).fold(Real::MIN, Real::max);
    let min_y = mesh.vertices.iter().map(|v| v.y).fold(Real::MAX, Real::min);
    assert_relative_eq!(max_y, 10.0, epsilon = 1.0e-9);
    assert_relative_eq!(min_y, 8.0, epsilon = 1.0e-9);
}

#[test]
fn mismatched_interfaces_are_subdivided() {
    let a = Panel::new("a", factory::rectangle(1.0, 1.0)).unwrap();
    let mut b = Panel::new("b", factory::rectangle(2.0, 1.0)).unwrap();
    b.translation = Vector3::new(3.0, 0.0, 0.0);

    let a_corner = Interface::new(&a, [a.edges[1].id(), a.edges[2].id()]);
    let b_bottom = Interface::new(&b, [b.edges[0].id()]);
    let mut component = Component::new("pair").with_child(a).with_child(b);
    component.add_stitch(a_corner, b_bottom).unwrap();

    let pattern = component.assembly().unwrap();
    assert_eq!(pattern.stitches.len(), 2);

    let mesh = compile(&pattern, &BoxMeshParams::default()).unwrap();
    assert!(mesh.is_manifold());
    // The corner of `a` meets the split point of `b`.
    assert_eq!(mesh.num_seam_vertices, 3);
}
