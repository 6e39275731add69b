use super::collapse::CollapsedPattern;
use super::StitchingError;
use crate::utils::hashmap::HashSet;

impl CollapsedPattern {
    /// Checks that collapsing the stitches did not degenerate the mesh.
    ///
    /// Two configurations are rejected:
    /// - both ends of a stitched edge merged into the same vertex,
    /// - two distinct vertices of the same panel merged together, unless they are paired
    ///   (possibly through several steps) by stitches between edges of that panel, as the
    ///   sides of a dart are.
    pub fn validate(&self) -> Result<(), StitchingError> {
        for (id, stitch) in self.stitches.iter().enumerate() {
            for side in &stitch.sides {
                let verts = &self.panels[side.panel].edge_vertices[side.edge];
                let ends = (verts.first(), verts.last());

                if let (Some(first), Some(last)) = ends {
                    let front = self.global_vertex(side.panel, *first);
                    if front.is_some() && front == self.global_vertex(side.panel, *last) {
                        return Err(StitchingError::EdgeCollapsed {
                            stitch: id,
                            panel: self.panels[side.panel].name.clone(),
                            edge: side.edge,
                        });
                    }
                }
            }
        }

        for (id, stitch) in self.stitches.iter().enumerate() {
            for side in &stitch.sides {
                let verts = &self.panels[side.panel].edge_vertices[side.edge];

                for local in verts.first().into_iter().chain(verts.last()) {
                    if let Some(global) = self.global_vertex(side.panel, *local) {
                        self.check_same_panel_merges(id, global)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn check_same_panel_merges(&self, stitch: usize, global: u32) -> Result<(), StitchingError> {
        let locals = self.local_vertices(global);

        for (k, (panel, first)) in locals.iter().enumerate() {
            // Only the first vertex of each panel needs to reach the others.
            if locals[..k].iter().any(|(p, _)| p == panel) {
                continue;
            }

            let mut reached = HashSet::default();
            let mut stack = vec![*first];
            let _ = reached.insert(*first);

            while let Some(curr) = stack.pop() {
                for next in self.darts.get(&(*panel, curr)).into_iter().flatten() {
                    if reached.insert(*next) {
                        stack.push(*next);
                    }
                }
            }

            let disconnected = locals
                .iter()
                .any(|(p, l)| p == panel && !reached.contains(l));

            if disconnected {
                return Err(StitchingError::SelfCollapse {
                    stitch,
                    panel: self.panels[*panel].name.clone(),
                    vertex: global,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::box_mesh::{BoxMeshParams, LoadedPattern, StitchingError};
    use crate::math::Point2;
    use crate::pattern::{factory, EdgeRef, Panel, PatternSpec, StitchSpec};

    fn collapse(pattern: &PatternSpec) -> Result<(), StitchingError> {
        LoadedPattern::load(pattern, &BoxMeshParams::default())
            .unwrap()
            .triangulate()
            .unwrap()
            .collapse_stitches()
            .validate()
    }

    #[test]
    fn edge_collapsed_onto_its_neighbor() {
        let mut pattern = PatternSpec::default();
        let verts = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 2.0),
        ];
        let panel = Panel::new("tri", factory::from_verts(&verts, true)).unwrap();
        let _ = pattern.panels.insert("tri".to_string(), panel.to_spec());
        let mut stitch = StitchSpec::new(EdgeRef::new("tri", 0), EdgeRef::new("tri", 1));
        stitch.right_wrong = true;
        pattern.stitches.push(stitch);

        assert_eq!(
            collapse(&pattern),
            Err(StitchingError::EdgeCollapsed {
                stitch: 0,
                panel: "tri".to_string(),
                edge: 0
            })
        );
    }

    #[test]
    fn accidental_self_collapse() {
        let mut pattern = PatternSpec::default();
        for name in ["a", "b"] {
            let panel = Panel::new(name, factory::rectangle(1.0, 1.0)).unwrap();
            let _ = pattern.panels.insert(name.to_string(), panel.to_spec());
        }
        // a.v1 ~ b.v0 and a.v3 ~ b.v0: two corners of `a` end up merged.
        pattern
            .stitches
            .push(StitchSpec::new(EdgeRef::new("a", 1), EdgeRef::new("b", 3)));
        pattern
            .stitches
            .push(StitchSpec::new(EdgeRef::new("a", 2), EdgeRef::new("b", 0)));

        assert_eq!(
            collapse(&pattern),
            Err(StitchingError::SelfCollapse {
                stitch: 0,
                panel: "a".to_string(),
                vertex: 0
            })
        );
    }
}
