use boxmesh::box_mesh::{compile, BoxMeshParams};
use boxmesh::math::{Rotation3, Vector3};
use boxmesh::pattern::{factory, Component, Interface, Panel, PatternDocument, PatternPart};

fn main() {
    env_logger::init();

    /*
     * Build a skirt out of a front and a back panel.
     */
    let mut front = Panel::new("front", factory::rectangle(40.0, 50.0)).unwrap();
    let bottom = front.edges[0].id();
    let _ = front
        .insert_dart(bottom, &factory::dart_shape(4.0, 10.0), 20.0, false)
        .unwrap();
    front.translation = Vector3::new(-20.0, 50.0, 15.0);

    let mut back = Panel::new("back", factory::rectangle(40.0, 50.0)).unwrap();
    back.rotate_to(&Rotation3::from_euler_angles(0.0, core::f64::consts::PI, 0.0));
    back.translation = Vector3::new(20.0, 50.0, -15.0);

    let n = front.edges.len();
    let front_right = Interface::new(&front, [front.edges[n - 3].id()]);
    let front_left = Interface::new(&front, [front.edges[n - 1].id()]);
    let back_right = Interface::new(&back, [back.edges[1].id()]);
    let back_left = Interface::new(&back, [back.edges[3].id()]);

    let mut skirt = Component::new("skirt").with_child(front).with_child(back);
    skirt.add_stitch(front_right, back_left).unwrap();
    skirt.add_stitch(front_left, back_right).unwrap();

    /*
     * Export the pattern, then compile it.
     */
    let pattern = skirt.assembly().unwrap();
    let document = PatternDocument::new(pattern);
    println!("{}", document.to_json().unwrap());

    let mesh = compile(&document.pattern, &BoxMeshParams::with_resolution(2.0)).unwrap();
    println!(
        "{} vertices ({} on seams), {} faces, manifold: {}, rest-length conflicts: {}",
        mesh.num_vertices(),
        mesh.num_seam_vertices,
        mesh.faces.len(),
        mesh.is_manifold(),
        mesh.rest_length_conflicts
    );
}
