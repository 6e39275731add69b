use super::CompiledMesh;
use obj::{Group, IndexTuple, ObjData, ObjError, Object, SimplePolygon};
use std::path::Path;

impl CompiledMesh {
    /// Outputs a Wavefront (`.obj`) file at the given path, texture coordinates included.
    ///
    /// Each panel is written as its own group.
    ///
    /// This function is enabled by the `wavefront` feature flag.
    pub fn to_obj_file(&self, path: &Path) -> Result<(), ObjError> {
        let mut file = std::fs::File::create(path)?;

        let groups = self
            .panel_faces
            .iter()
            .enumerate()
            .map(|(index, (name, range))| Group {
                polys: self.faces[range.clone()]
                    .iter()
                    .zip(&self.texture_faces[range.clone()])
                    .map(|(tri, tex)| {
                        SimplePolygon(
                            (0..3)
                                .map(|k| IndexTuple(tri[k] as usize, Some(tex[k] as usize), None))
                                .collect(),
                        )
                    })
                    .collect(),
                name: name.clone(),
                index,
                material: None,
            })
            .collect();

        ObjData {
            position: self
                .vertices
                .iter()
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect(),
            texture: self.uvs.iter().map(|uv| [uv.x as f32, uv.y as f32]).collect(),
            objects: vec![Object {
                groups,
                name: "garment".to_string(),
            }],
            ..Default::default()
        }
        .write_to_buf(&mut file)
    }
}
