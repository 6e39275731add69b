use boxmesh::box_mesh::{compile_json, BoxMeshError, BoxMeshParams};
use boxmesh::pattern::{PatternDocument, PatternLoadingError};

// A tube: the front faces +z, the back is turned around the y axis and faces -z.
const TUBE: &str = r#"{
  "pattern": {
    "panels": {
      "front": {
        "translation": [0.0, 0.0, 1.0],
        "rotation": [0.0, 0.0, 0.0],
        "vertices": [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
        "edges": [
          {"endpoints": [0, 1], "label": "hem"},
          {"endpoints": [1, 2]},
          {"endpoints": [2, 3]},
          {"endpoints": [3, 0]}
        ]
      },
      "back": {
        "translation": [2.0, 0.0, -1.0],
        "rotation": [0.0, 180.0, 0.0],
        "vertices": [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
        "edges": [
          {"endpoints": [0, 1]},
          {"endpoints": [1, 2]},
          {"endpoints": [2, 3]},
          {"endpoints": [3, 0]}
        ]
      }
    },
    "stitches": [
      [{"panel": "front", "edge": 1}, {"panel": "back", "edge": 3}, "side_seam"],
      [{"panel": "front", "edge": 3}, {"panel": "back", "edge": 1}]
    ]
  },
  "properties": {"units_in_meter": 100}
}"#;

#[test]
fn tube_document() {
    let mesh = compile_json(TUBE, &BoxMeshParams::default()).unwrap();

    // 9 vertices per panel, 3 merged on each seam.
    assert_eq!(mesh.num_vertices(), 12);
    assert_eq!(mesh.num_seam_vertices, 6);
    assert_eq!(mesh.faces.len(), 16);
    assert!(mesh.is_manifold());
    // The top and bottom openings.
    assert_eq!(mesh.boundary_edge_count(), 8);
    assert_eq!(mesh.panel_faces["back"], 8..16);

    assert_eq!(mesh.vertex_labels["side_seam"].len(), 3);
    assert_eq!(mesh.vertex_labels["hem"].len(), 3);

    // Seam vertices are halfway between the front and the back.
    for v in &mesh.vertices[..mesh.num_seam_vertices] {
        assert_relative_eq!(v.z, 0.0, epsilon = 1.0e-9);
    }
}

#[test]
fn documents_round_trip_through_json() {
    let document = PatternDocument::from_json(TUBE).unwrap();
    let json = document.to_json().unwrap();
    assert_eq!(PatternDocument::from_json(&json).unwrap(), document);
    assert_eq!(document.pattern.stitches[0].label.as_deref(), Some("side_seam"));
    assert!(!document.pattern.stitches[1].right_wrong);
}

#[test]
fn invalid_json_is_a_loading_error() {
    let err = compile_json("{\"pattern\": 3}", &BoxMeshParams::default()).unwrap_err();
    assert!(matches!(
        err,
        BoxMeshError::PatternLoading(PatternLoadingError::Format(_))
    ));
}
