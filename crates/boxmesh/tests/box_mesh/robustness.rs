use boxmesh::box_mesh::{compile, BoxMeshParams, CompiledMesh, LoadedPattern};
use boxmesh::math::{Real, Vector3};
use boxmesh::pattern::{factory, EdgeRef, Panel, PatternSpec, StitchSpec};
use oorandom::Rand64;

// A row of random rectangles, each one sewn to the next.
fn random_row(rng: &mut Rand64, num_panels: usize) -> PatternSpec {
    let mut pattern = PatternSpec::default();
    let mut x = 0.0;

    for i in 0..num_panels {
        let width = 1.0 + rng.rand_float() * 4.0;
        let height = 1.0 + rng.rand_float() * 4.0;
        let name = format!("panel{i}");
        let mut panel = Panel::new(name.clone(), factory::rectangle(width, height)).unwrap();
        panel.translation = Vector3::new(x, 0.0, 0.0);
        x += width;

        let _ = pattern.panels.insert(name, panel.to_spec());

        if i > 0 {
            pattern.stitches.push(StitchSpec::new(
                EdgeRef::new(format!("panel{}", i - 1), 1),
                EdgeRef::new(format!("panel{i}"), 3),
            ));
        }
    }

    pattern
}

fn check_mesh(mesh: &CompiledMesh) {
    let num_vertices = mesh.num_vertices() as u32;

    assert!(mesh.is_manifold());
    assert_eq!(mesh.segmentation.len(), mesh.num_vertices());
    assert_eq!(mesh.texture_faces.len(), mesh.faces.len());
    assert!(mesh
        .vertices
        .iter()
        .all(|v| v.coords.iter().all(|c| c.is_finite())));

    for face in &mesh.faces {
        assert!(face.iter().all(|i| *i < num_vertices));
        assert!(face[0] != face[1] && face[1] != face[2] && face[2] != face[0]);
    }

    for length in mesh.rest_lengths.values() {
        assert!(length.is_finite() && *length > 0.0);
    }
}

#[test]
fn random_rows_compile_into_manifolds() {
    let mut rng = Rand64::new(42);

    for _ in 0..20 {
        let num_panels = 2 + rng.rand_range(0..4) as usize;
        let resolution: Real = 0.3 + rng.rand_float() * 0.7;
        let pattern = random_row(&mut rng, num_panels);
        let params = BoxMeshParams::with_resolution(resolution);

        let mesh = compile(&pattern, &params).unwrap();
        check_mesh(&mesh);
        assert!(mesh.num_seam_vertices >= 2 * (num_panels - 1));
    }
}

#[test]
fn compilation_is_deterministic() {
    let mut rng = Rand64::new(7);
    let pattern = random_row(&mut rng, 3);
    let params = BoxMeshParams::with_resolution(0.5);

    let first = compile(&pattern, &params).unwrap();
    let second = compile(&pattern, &params).unwrap();
    assert_eq!(first.vertices, second.vertices);
    assert_eq!(first.faces, second.faces);
    assert_eq!(first.segmentation, second.segmentation);
    assert_eq!(first.rest_lengths, second.rest_lengths);
    assert_eq!(first.vertex_labels, second.vertex_labels);
}

#[test]
fn seam_vertices_are_numbered_consistently() {
    let mut rng = Rand64::new(1234);

    for _ in 0..10 {
        let num_panels = 2 + rng.rand_range(0..3) as usize;
        let pattern = random_row(&mut rng, num_panels);
        let params = BoxMeshParams::with_resolution(0.25 + rng.rand_float() * 0.5);
        let meshed = LoadedPattern::load(&pattern, &params)
            .unwrap()
            .triangulate()
            .unwrap();

        // Both sides of a stitch are sampled identically.
        for stitch in meshed.stitches() {
            let [a, b] = stitch.sides;
            assert_eq!(
                meshed.panels()[a.panel].edge_vertices[a.edge].len(),
                meshed.panels()[b.panel].edge_vertices[b.edge].len()
            );
        }

        let expected: usize = meshed.stitches().iter().map(|s| s.vertex_count).sum();
        let collapsed = meshed.collapse_stitches();
        // The seams of a row never touch each other.
        assert_eq!(collapsed.num_seam_vertices(), expected);

        for global in 0..collapsed.num_seam_vertices() as u32 {
            let locals = collapsed.local_vertices(global);
            assert_eq!(locals.len(), 2);
            for (panel, local) in locals {
                assert_eq!(collapsed.global_vertex(*panel, *local), Some(global));
            }
        }

        assert!(collapsed.validate().is_ok());
    }
}
