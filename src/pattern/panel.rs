use super::{
    cut_corner, cut_into_edge, Curvature, CurvatureSpec, CutError, Edge, EdgeId, EdgeSequence,
    EdgeSpec, Interface, PanelLookup, PanelSpec, PatternError, PatternLoadingError, PatternPart,
    Stitch, CURVE_LINEARIZATION_SEGMENTS,
};
use crate::bounding_volume::Aabb3;
use crate::math::{lift, Point2, Point3, Real, Rotation3, Unit, Vector2, Vector3, VERTEX_TOLERANCE};
use crate::utils::center;
use indexmap::IndexMap;

/// Error raised when the normal of a panel cannot be computed.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("the normal of panel `{panel}` is undefined: its boundary encloses no area.")]
pub struct NormError {
    /// The panel name.
    pub panel: String,
}

/// The edges created by [`Panel::insert_dart`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DartInsertion {
    /// The sides of the dart, stitched together.
    pub inserted: Vec<EdgeId>,
    /// What remains of the cut edge.
    pub leftover: Vec<EdgeId>,
}

/// A flat piece of fabric: a closed loop of edges placed in 3D.
///
/// The loop lives in the `z = 0` plane of the panel frame, which is placed in the world by
/// `rotation` followed by `translation`. The edges are expected to run counter-clockwise
/// when seen from the outside of the garment, see [`Panel::autonorm`].
#[derive(Clone, Debug)]
pub struct Panel {
    /// The panel name, unique within a pattern.
    pub name: String,
    /// The boundary of the panel.
    pub edges: EdgeSequence,
    /// The position of the panel frame origin.
    pub translation: Vector3<Real>,
    /// The orientation of the panel frame.
    pub rotation: Rotation3<Real>,
    interfaces: IndexMap<String, Interface>,
    stitching_rules: Vec<Stitch>,
}

impl Panel {
    /// Creates a panel at the world origin.
    ///
    /// # Errors
    ///
    /// Fails if `edges` is not a closed loop.
    pub fn new(name: impl Into<String>, edges: EdgeSequence) -> Result<Self, PatternError> {
        let name = name.into();

        if !edges.is_loop(VERTEX_TOLERANCE) {
            let edge = edges
                .first_gap(VERTEX_TOLERANCE)
                .unwrap_or(edges.len().saturating_sub(1));
            return Err(PatternError::OpenLoop { panel: name, edge });
        }

        Ok(Panel {
            name,
            edges,
            translation: Vector3::zeros(),
            rotation: Rotation3::identity(),
            interfaces: IndexMap::new(),
            stitching_rules: vec![],
        })
    }

    /// Exposes `interface` under `name`, replacing any interface with that name.
    pub fn set_interface(&mut self, name: impl Into<String>, interface: Interface) {
        let _ = self.interfaces.insert(name.into(), interface);
    }

    /// An interface made of the edges of this panel at the given positions.
    pub fn interface_from_indices(
        &self,
        indices: impl IntoIterator<Item = usize>,
    ) -> Result<Interface, PatternError> {
        let ids = indices
            .into_iter()
            .map(|i| {
                if i < self.edges.len() {
                    Ok(self.edges[i].id())
                } else {
                    Err(PatternError::EdgeIndexOutOfBounds(i))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Interface::new(self, ids))
    }

    /// The position of the edge `edge` in the boundary.
    pub fn edge_index(&self, edge: EdgeId) -> Result<usize, PatternError> {
        self.edges
            .position(edge)
            .ok_or_else(|| PatternError::UnknownEdge {
                panel: self.name.clone(),
                edge,
            })
    }

    /// The world position of a point of the panel plane.
    pub fn point_to_3d(&self, pt: &Point2<Real>) -> Point3<Real> {
        self.rotation * lift(pt) + self.translation
    }

    /// The world positions of points of the panel plane.
    pub fn points_to_3d(&self, pts: &[Point2<Real>]) -> Vec<Point3<Real>> {
        pts.iter().map(|p| self.point_to_3d(p)).collect()
    }

    /// Sets the orientation of the panel frame.
    pub fn rotate_to(&mut self, rotation: &Rotation3<Real>) {
        self.rotation = *rotation;
    }

    /// Moves the origin of the panel frame to `point`, expressed in the panel plane.
    ///
    /// With `replicate_placement`, the translation is updated so that the panel does not move
    /// in the world.
    pub fn set_pivot(&mut self, point: &Point2<Real>, replicate_placement: bool) {
        self.edges.translate_by(&-point.coords);

        if replicate_placement {
            self.translation += self.rotation * lift(point).coords;
        }
    }

    /// The mean of the vertices of the linearized boundary.
    pub fn center_2d(&self) -> Point2<Real> {
        center(&self.edges.linearize(CURVE_LINEARIZATION_SEGMENTS)).unwrap_or_else(Point2::origin)
    }

    /// Does the boundary cross itself?
    pub fn is_self_intersecting(&self) -> bool {
        self.edges.is_self_intersecting()
    }

    /// The world normal of the panel, pointing toward the side from which the boundary runs
    /// counter-clockwise.
    ///
    /// The normal is the mean of the cross products of consecutive boundary vertices taken
    /// relative to the boundary center, so it is robust to non-convex boundaries.
    ///
    /// # Errors
    ///
    /// Fails if the boundary encloses no area.
    pub fn norm(&self) -> Result<Unit<Vector3<Real>>, NormError> {
        let verts = self.points_to_3d(&self.edges.linearize(CURVE_LINEARIZATION_SEGMENTS));
        let err = || NormError {
            panel: self.name.clone(),
        };
        let center = center(&verts).ok_or_else(err)?;
        let n = verts.len();

        let sum = (0..n).fold(Vector3::zeros(), |acc, i| {
            acc + (verts[i] - center).cross(&(verts[(i + 1) % n] - center))
        });
        let mean = sum / n as Real;

        if mean.iter().any(|c| !c.is_finite()) {
            return Err(err());
        }

        Unit::try_new(mean, VERTEX_TOLERANCE * VERTEX_TOLERANCE).ok_or_else(err)
    }

    /// Reverses the boundary if the normal points toward the world origin.
    ///
    /// Garments are built around a body at the origin, so outward normals point away from it.
    /// Returns `true` if the boundary was reversed.
    pub fn autonorm(&mut self) -> Result<bool, NormError> {
        let norm = self.norm()?;
        let center = self.point_to_3d(&self.center_2d());

        if norm.dot(&center.coords) < 0.0 {
            log::debug!("Reversing the boundary of panel `{}`.", self.name);
            self.reverse_boundary();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Mirrors the panel shape across the line through the frame origin along `axis`.
    ///
    /// The boundary is reversed to stay counter-clockwise. The placement is unchanged, so the
    /// panel is mirrored in the world across the plane containing this line and the normal.
    pub fn mirror(&mut self, axis: &Unit<Vector2<Real>>) {
        self.edges.reflect(&Point2::origin(), axis);
        self.reverse_boundary();
    }

    /// Mirrors the panel, placement included, across the world plane `x = 0`.
    pub fn mirror_x(&mut self) {
        let m = na::Matrix3::from_diagonal(&Vector3::new(-1.0, 1.0, 1.0));
        self.mirror(&Vector2::y_axis());
        self.translation.x = -self.translation.x;
        self.rotation = Rotation3::from_matrix_unchecked(m * self.rotation.matrix() * m);
    }

    fn reverse_boundary(&mut self) {
        self.edges.reverse();

        for interface in self.interfaces.values_mut() {
            *interface = interface.reversed();
        }

        for stitch in &mut self.stitching_rules {
            stitch.left = stitch.left.reversed();
            stitch.right = stitch.right.reversed();
        }
    }

    /// Splits an edge of the boundary into pieces of lengths proportional to `fractions`.
    ///
    /// Interfaces are not updated: use [`PanelLookup::split_edge`] for that.
    pub fn subdivide_edge(
        &mut self,
        edge: EdgeId,
        fractions: &[Real],
    ) -> Result<Vec<EdgeId>, PatternError> {
        let index = self.edge_index(edge)?;
        let pieces = self.edges[index].subdivide_len(fractions)?;
        let ids = pieces.iter().map(|e| e.id()).collect();
        self.edges.substitute(index, pieces)?;
        Ok(ids)
    }

    /// Cuts a dart into `edge` and stitches its sides together.
    ///
    /// `shape` is a dart in the frame of [`factory`](super::factory): its first half of edges
    /// is stitched to its second half. See [`cut_into_edge`] for `offset` and `right`. The
    /// interfaces referencing `edge` now reference what remains of it.
    ///
    /// # Errors
    ///
    /// Fails if `edge` is not part of this panel, if `shape` has an odd number of edges, or
    /// if it does not fit in `edge`.
    pub fn insert_dart(
        &mut self,
        edge: EdgeId,
        shape: &EdgeSequence,
        offset: Real,
        right: bool,
    ) -> Result<DartInsertion, PatternError> {
        if shape.is_empty() || shape.len() % 2 != 0 {
            return Err(CutError::OddDartShape(shape.len()).into());
        }

        let index = self.edge_index(edge)?;
        let cut = cut_into_edge(shape, &self.edges[index], offset, right)?;
        let inserted: Vec<_> = cut.inserted.iter().map(|e| e.id()).collect();
        let leftover: Vec<_> = cut.leftover.iter().map(|e| e.id()).collect();

        self.edges.substitute(index, cut.new_edges.into_edges())?;
        self.substitute_edge(edge, &leftover);

        let half = inserted.len() / 2;
        let stitch = Stitch::new(
            Interface::new(self, inserted[..half].iter().copied()),
            Interface::new(self, inserted[half..].iter().copied()),
        );
        self.stitching_rules.push(stitch);

        Ok(DartInsertion { inserted, leftover })
    }

    /// Cuts the corner between `edge` and the next boundary edge with `shape`.
    ///
    /// Returns the interface made of the inserted edges. Interfaces referencing the corner
    /// edges now reference what remains of them.
    pub fn cut_corner(
        &mut self,
        edge: EdgeId,
        shape: &EdgeSequence,
    ) -> Result<Interface, PatternError> {
        let i = self.edge_index(edge)?;
        let n = self.edges.len();
        let j = (i + 1) % n;
        let second_id = self.edges[j].id();

        let cut = cut_corner(shape, &self.edges[i], &self.edges[j])?;
        let inserted: Vec<_> = cut.inserted.iter().map(|e| e.id()).collect();
        let first_ids: Vec<_> = cut.first.iter().map(|e| e.id()).collect();
        let second_ids: Vec<_> = cut.second.iter().map(|e| e.id()).collect();

        if j == 0 {
            // The corner is at the loop closure: restart the loop after it.
            let mut edges = core::mem::take(&mut self.edges).into_edges();
            let _ = edges.pop();
            let middle = edges.drain(1..);
            let mut result: Vec<Edge> = cut.second.into_iter().collect();
            result.extend(middle);
            result.extend(cut.first);
            result.extend(cut.inserted.into_edges());
            self.edges = EdgeSequence::new(result);
        } else {
            self.edges.substitute(i, cut.new_edges.into_edges())?;
            let old = self.edge_index(second_id)?;
            self.edges.substitute(old, vec![])?;
        }

        self.substitute_edge(edge, &first_ids);
        self.substitute_edge(second_id, &second_ids);

        Ok(Interface::new(self, inserted))
    }

    /// The exchange record of this panel.
    ///
    /// Vertex `i` is the start of edge `i`, so edge `i` joins vertices `i` and `i + 1`.
    pub fn to_spec(&self) -> PanelSpec {
        let n = self.edges.len();
        let (roll, pitch, yaw) = self.rotation.euler_angles();

        PanelSpec {
            translation: self.translation.into(),
            rotation: [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
            vertices: self.edges.iter().map(|e| [e.start.x, e.start.y]).collect(),
            edges: self
                .edges
                .iter()
                .enumerate()
                .map(|(i, e)| EdgeSpec {
                    endpoints: [i, (i + 1) % n],
                    curvature: e.curvature.map(CurvatureSpec::from),
                    label: e.label.clone(),
                })
                .collect(),
        }
    }

    /// Builds a panel from its exchange record.
    ///
    /// # Errors
    ///
    /// Fails if an edge references a missing vertex, has a zero length, or if the edges do not
    /// form a loop within `tolerance`.
    pub fn from_spec(
        name: &str,
        spec: &PanelSpec,
        tolerance: Real,
    ) -> Result<Self, PatternLoadingError> {
        if spec.edges.len() < 2 {
            return Err(PatternLoadingError::TooFewEdges {
                panel: name.to_string(),
                num_edges: spec.edges.len(),
            });
        }

        let vertex = |edge: usize, id: usize| {
            spec.vertices
                .get(id)
                .map(|v| Point2::new(v[0], v[1]))
                .ok_or_else(|| PatternLoadingError::VertexOutOfBounds {
                    panel: name.to_string(),
                    edge,
                    vertex: id,
                    num_vertices: spec.vertices.len(),
                })
        };

        let mut edges = Vec::with_capacity(spec.edges.len());

        for (i, e) in spec.edges.iter().enumerate() {
            let start = vertex(i, e.endpoints[0])?;
            let end = vertex(i, e.endpoints[1])?;
            let mut edge = match e.curvature {
                Some(curvature) => Edge::curved(start, end, Curvature::from(curvature)),
                None => Edge::new(start, end),
            };
            edge.label = e.label.clone();

            if edge.length() <= tolerance {
                return Err(PatternLoadingError::DegenerateEdge {
                    panel: name.to_string(),
                    edge: i,
                });
            }

            edges.push(edge);
        }

        let edges = EdgeSequence::new(edges);
        if !edges.is_loop(tolerance) {
            let edge = edges.first_gap(tolerance).unwrap_or(edges.len() - 1);
            return Err(PatternLoadingError::OpenLoop {
                panel: name.to_string(),
                edge,
            });
        }

        let [rx, ry, rz] = spec.rotation.map(|a| a.to_radians());

        Ok(Panel {
            name: name.to_string(),
            edges,
            translation: Vector3::from(spec.translation),
            rotation: Rotation3::from_euler_angles(rx, ry, rz),
            interfaces: IndexMap::new(),
            stitching_rules: vec![],
        })
    }
}

impl PanelLookup for Panel {
    fn panel(&self, name: &str) -> Option<&Panel> {
        (self.name == name).then_some(self)
    }

    fn panel_mut(&mut self, name: &str) -> Option<&mut Panel> {
        if self.name == name {
            Some(self)
        } else {
            None
        }
    }

    fn substitute_edge(&mut self, edge: EdgeId, new_edges: &[EdgeId]) {
        for interface in self.interfaces.values_mut() {
            let _ = interface.substitute(edge, new_edges);
        }

        for stitch in &mut self.stitching_rules {
            stitch.substitute(edge, new_edges);
        }
    }
}

impl PatternPart for Panel {
    fn name(&self) -> &str {
        &self.name
    }

    fn interfaces(&self) -> &IndexMap<String, Interface> {
        &self.interfaces
    }

    fn stitching_rules(&self) -> &[Stitch] {
        &self.stitching_rules
    }

    fn panels(&self) -> Vec<&Panel> {
        vec![self]
    }

    fn all_stitching_rules(&self) -> Vec<&Stitch> {
        self.stitching_rules.iter().collect()
    }

    fn translate_by(&mut self, shift: &Vector3<Real>) {
        self.translation += shift;
    }

    fn rotate_about(&mut self, rotation: &Rotation3<Real>, pivot: &Point3<Real>) {
        self.rotation = rotation * self.rotation;
        self.translation = pivot.coords + rotation * (self.translation - pivot.coords);
    }

    fn bbox3d(&self) -> Aabb3 {
        Aabb3::from_points(self.points_to_3d(&self.edges.linearize(CURVE_LINEARIZATION_SEGMENTS)))
    }

    /// Panels rotate around the origin of their frame.
    fn pivot(&self) -> Point3<Real> {
        Point3::from(self.translation)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pattern::factory;

    fn square() -> Panel {
        Panel::new("square", factory::rectangle(10.0, 10.0)).unwrap()
    }

    #[test]
    fn placement_in_3d() {
        let mut panel = square();
        panel.translation = Vector3::new(1.0, 2.0, 3.0);
        panel.rotate_by(&Rotation3::from_euler_angles(0.0, core::f64::consts::FRAC_PI_2, 0.0));

        let p = panel.point_to_3d(&Point2::new(1.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(panel.norm().unwrap().into_inner(), Vector3::x(), epsilon = 1.0e-12);
    }

    #[test]
    fn autonorm_points_away_from_the_origin() {
        let mut panel = square();
        panel.translation = Vector3::new(-5.0, 0.0, -4.0);
        assert!(panel.autonorm().unwrap());
        assert!(panel.norm().unwrap().z < 0.0);
        assert!(!panel.autonorm().unwrap());
    }

    #[test]
    fn degenerate_panels_have_no_normal() {
        let edges = factory::from_verts(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], true);
        let edges = EdgeSequence::new(vec![edges[0].clone(), edges[0].reversed()]);
        let panel = Panel::new("flat", edges).unwrap();
        assert!(panel.norm().is_err());
    }

    #[test]
    fn set_pivot_keeps_the_world_position() {
        let mut panel = square();
        panel.rotation = Rotation3::from_euler_angles(0.3, 0.2, 0.1);
        let before = panel.point_to_3d(&panel.edges[2].start);
        panel.set_pivot(&Point2::new(5.0, 5.0), true);
        let after = panel.point_to_3d(&panel.edges[2].start);
        assert_relative_eq!(before, after, epsilon = 1.0e-12);
        assert_eq!(panel.edges[0].start, Point2::new(-5.0, -5.0));
    }

    #[test]
    fn mirror_x_reflects_the_world_geometry() {
        let mut panel = square();
        panel.translation = Vector3::new(3.0, 1.0, 2.0);
        panel.rotation = Rotation3::from_euler_angles(0.0, 0.4, 0.2);
        let before = panel.bbox3d();
        panel.mirror_x();
        let after = panel.bbox3d();

        assert!(panel.edges.is_loop(VERTEX_TOLERANCE));
        assert_relative_eq!(after.mins.x, -before.maxs.x, epsilon = 1.0e-9);
        assert_relative_eq!(after.maxs.x, -before.mins.x, epsilon = 1.0e-9);
        assert_relative_eq!(after.mins.y, before.mins.y, epsilon = 1.0e-9);
        assert_relative_eq!(after.maxs.z, before.maxs.z, epsilon = 1.0e-9);
        assert!(panel.rotation.matrix().determinant() > 0.0);
    }

    #[test]
    fn dart_insertion_updates_interfaces() {
        let mut panel = square();
        let bottom = panel.edges[0].id();
        panel.set_interface("bottom", Interface::new(&panel, [bottom]));

        let dart = panel
            .insert_dart(bottom, &factory::dart_shape(2.0, 4.0), 5.0, false)
            .unwrap();
        assert_eq!(panel.edges.len(), 7);
        assert!(panel.edges.is_loop(0.0));
        assert_eq!(
            panel.interface("bottom").unwrap().edge_ids().collect::<Vec<_>>(),
            dart.leftover
        );

        let spec = panel.assembly().unwrap();
        assert_eq!(spec.stitches.len(), 1);
        assert_eq!(spec.stitches[0].sides[0].edge, 1);
        assert_eq!(spec.stitches[0].sides[1].edge, 2);
        // The dart tip points inside the panel.
        assert_relative_eq!(panel.edges[1].end, Point2::new(5.0, 4.0), epsilon = 1.0e-9);
    }

    #[test]
    fn corner_cut_at_the_loop_closure() {
        let mut panel = square();
        let left = panel.edges[3].id();
        let shape = factory::from_verts(&[Point2::new(0.0, 0.0), Point2::new(2.0, -2.0)], false);
        let armhole = panel.cut_corner(left, &shape).unwrap();

        assert_eq!(armhole.len(), 1);
        assert_eq!(panel.edges.len(), 5);
        assert!(panel.edges.is_loop(VERTEX_TOLERANCE));
        let cut = panel.edges.find(armhole.edge_ids().next().unwrap()).unwrap();
        assert_relative_eq!(cut.start, Point2::new(0.0, 2.0), epsilon = 1.0e-6);
        assert_relative_eq!(cut.end, Point2::new(2.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn spec_record_keeps_the_geometry() {
        let mut panel = square();
        panel.edges[2].curvature = Some(Curvature::Quadratic { control: [0.5, 0.3] });
        panel.translation = Vector3::new(0.0, 10.0, 20.0);
        panel.rotation = Rotation3::from_euler_angles(0.1, -0.2, 0.3);

        let spec = panel.to_spec();
        assert_eq!(spec.edges[3].endpoints, [3, 0]);
        let loaded = Panel::from_spec("square", &spec, VERTEX_TOLERANCE).unwrap();
        assert_relative_eq!(loaded.rotation, panel.rotation, epsilon = 1.0e-12);
        assert_relative_eq!(
            loaded.point_to_3d(&loaded.edges[2].midpoint()),
            panel.point_to_3d(&panel.edges[2].midpoint()),
            epsilon = 1.0e-9
        );
    }
}
