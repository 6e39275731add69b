use boxmesh::box_mesh::{
    compile, BoxMeshError, BoxMeshParams, DegenerateTrianglesError, MultiStitchingError,
    StitchingError,
};
use boxmesh::math::Point2;
use boxmesh::pattern::{factory, EdgeRef, Panel, PatternLoadingError, PatternSpec, StitchSpec};
use boxmesh::transformation::TriangulationError;

fn pattern_with(panels: &[(&str, Panel)], stitches: Vec<StitchSpec>) -> PatternSpec {
    let mut pattern = PatternSpec::default();
    for (name, panel) in panels {
        let _ = pattern.panels.insert(name.to_string(), panel.to_spec());
    }
    pattern.stitches = stitches;
    pattern
}

fn square(name: &str) -> (&str, Panel) {
    (name, Panel::new(name, factory::rectangle(1.0, 1.0)).unwrap())
}

fn polygon<'a>(name: &'a str, pts: &[[f64; 2]]) -> (&'a str, Panel) {
    let pts: Vec<_> = pts.iter().map(|p| Point2::new(p[0], p[1])).collect();
    (name, Panel::new(name, factory::from_verts(&pts, true)).unwrap())
}

fn compile_default(pattern: &PatternSpec) -> Result<(), BoxMeshError> {
    compile(pattern, &BoxMeshParams::default()).map(|_| ())
}

#[test]
fn edge_stitched_twice() {
    let pattern = pattern_with(
        &[square("a"), square("b"), square("c")],
        vec![
            StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("b", 3)),
            StitchSpec::new(EdgeRef::new("c", 3), EdgeRef::new("a", 1)),
        ],
    );

    assert_eq!(
        compile_default(&pattern),
        Err(BoxMeshError::MultiStitching(MultiStitchingError {
            panel: "a".to_string(),
            edge: 1,
            first: 0,
            second: 1,
        }))
    );
}

#[test]
fn missing_panel_or_edge() {
    let pattern = pattern_with(
        &[square("a")],
        vec![StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("sleeve", 0))],
    );
    assert_eq!(
        compile_default(&pattern),
        Err(BoxMeshError::PatternLoading(PatternLoadingError::UnknownPanel {
            stitch: 0,
            panel: "sleeve".to_string(),
        }))
    );

    let pattern = pattern_with(
        &[square("a"), square("b")],
        vec![StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("b", 4))],
    );
    assert_eq!(
        compile_default(&pattern),
        Err(BoxMeshError::PatternLoading(PatternLoadingError::UnknownEdge {
            stitch: 0,
            panel: "b".to_string(),
            edge: 4,
            num_edges: 4,
        }))
    );
}

#[test]
fn neighbor_edges_sewn_together() {
    let mut stitch = StitchSpec::new(EdgeRef::new("tri", 0), EdgeRef::new("tri", 1));
    stitch.right_wrong = true;
    let pattern = pattern_with(
        &[polygon("tri", &[[0.0, 0.0], [2.0, 0.0], [1.0, 2.0]])],
        vec![stitch],
    );

    assert!(matches!(
        compile_default(&pattern),
        Err(BoxMeshError::Stitching(StitchingError::EdgeCollapsed { edge: 0, .. }))
    ));
}

#[test]
fn corners_of_a_panel_sewn_together() {
    let pattern = pattern_with(
        &[square("a"), square("b")],
        vec![
            StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("b", 3)),
            StitchSpec::new(EdgeRef::new("a", 2), EdgeRef::new("b", 0)),
        ],
    );

    match compile_default(&pattern) {
        Err(BoxMeshError::Stitching(StitchingError::SelfCollapse { panel, .. })) => {
            assert_eq!(panel, "a")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn flat_panel_has_no_normal() {
    let pattern = pattern_with(
        &[polygon("flat", &[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]])],
        vec![],
    );
    assert!(matches!(
        compile_default(&pattern),
        Err(BoxMeshError::Norm(_))
    ));
}

#[test]
fn crossing_boundary_cannot_be_triangulated() {
    let pattern = pattern_with(
        &[polygon(
            "twisted",
            &[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [1.0, -1.0]],
        )],
        vec![],
    );

    match compile_default(&pattern) {
        Err(BoxMeshError::DegenerateTriangles(DegenerateTrianglesError { panel, source })) => {
            assert_eq!(panel, "twisted");
            assert!(matches!(source, TriangulationError::CrossingBoundary(..)));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn open_panels_are_rejected() {
    let (_, panel) = square("a");
    let mut spec = panel.to_spec();
    spec.vertices.push([5.0, 5.0]);
    spec.edges[3].endpoints = [3, 4];
    let mut pattern = PatternSpec::default();
    let _ = pattern.panels.insert("a".to_string(), spec);

    assert_eq!(
        compile_default(&pattern),
        Err(BoxMeshError::PatternLoading(PatternLoadingError::OpenLoop {
            panel: "a".to_string(),
            edge: 3,
        }))
    );
}
