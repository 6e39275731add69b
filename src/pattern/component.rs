use super::{match_interfaces, EdgeId, Interface, Panel, PatternError, PatternSpec, Stitch};
use crate::bounding_volume::Aabb3;
use crate::math::{Point3, Real, Rotation3, Vector3};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Access to panels by name.
///
/// Interfaces and stitches only hold panel names and edge identifiers. Their geometry is
/// resolved through this trait, implemented by every part of a pattern tree.
pub trait PanelLookup {
    /// The panel named `name`, if it belongs to this part.
    fn panel(&self, name: &str) -> Option<&Panel>;

    /// The panel named `name`, if it belongs to this part.
    fn panel_mut(&mut self, name: &str) -> Option<&mut Panel>;

    /// Replaces `edge` with `new_edges` in every interface and stitch held by this part.
    fn substitute_edge(&mut self, edge: EdgeId, new_edges: &[EdgeId]);

    /// Splits an edge of the panel named `panel` into pieces of lengths proportional to
    /// `fractions`, and updates every interface and stitch referencing it.
    fn split_edge(
        &mut self,
        panel: &str,
        edge: EdgeId,
        fractions: &[Real],
    ) -> Result<Vec<EdgeId>, PatternError> {
        let target = self
            .panel_mut(panel)
            .ok_or_else(|| PatternError::UnknownPanel(panel.to_string()))?;
        let new_edges = target.subdivide_edge(edge, fractions)?;
        self.substitute_edge(edge, &new_edges);
        Ok(new_edges)
    }
}

/// Operations shared by panels and components.
pub trait PatternPart: PanelLookup {
    /// The name of this part.
    fn name(&self) -> &str;

    /// The named interfaces exposed by this part.
    fn interfaces(&self) -> &IndexMap<String, Interface>;

    /// The stitches defined at the level of this part, its children excluded.
    fn stitching_rules(&self) -> &[Stitch];

    /// Every panel of this part, depth first.
    fn panels(&self) -> Vec<&Panel>;

    /// The stitches of this part and of all its descendants.
    fn all_stitching_rules(&self) -> Vec<&Stitch>;

    /// Translates the part in 3D.
    fn translate_by(&mut self, shift: &Vector3<Real>);

    /// Rotates the part around `pivot`.
    fn rotate_about(&mut self, rotation: &Rotation3<Real>, pivot: &Point3<Real>);

    /// The interface named `name`.
    fn interface(&self, name: &str) -> Result<&Interface, PatternError> {
        self.interfaces()
            .get(name)
            .ok_or_else(|| PatternError::UnknownInterface(name.to_string()))
    }

    /// The 3D bounding box of all the panels.
    fn bbox3d(&self) -> Aabb3 {
        self.panels()
            .iter()
            .fold(Aabb3::new_invalid(), |acc, p| acc.merged(&p.bbox3d()))
    }

    /// The extent of the part along the world `x` axis.
    fn width(&self) -> Real {
        self.bbox3d().extents().x
    }

    /// The reference point of rotations and of [`PatternPart::translate_to`].
    ///
    /// This is the top-center of the 3D bounding box: its center along `x` and `z`, its
    /// maximum along `y`.
    fn pivot(&self) -> Point3<Real> {
        let bbox = self.bbox3d();
        let center = bbox.center();
        Point3::new(center.x, bbox.maxs.y, center.z)
    }

    /// Translates the part so that its pivot lands on `target`.
    fn translate_to(&mut self, target: &Point3<Real>) {
        let shift = target - self.pivot();
        self.translate_by(&shift);
    }

    /// Rotates the part around its pivot.
    fn rotate_by(&mut self, rotation: &Rotation3<Real>) {
        let pivot = self.pivot();
        self.rotate_about(rotation, &pivot);
    }

    /// Flattens this part into an exchange document.
    ///
    /// # Errors
    ///
    /// Fails if two panels share a name, or if a stitch cannot be resolved.
    fn assembly(&self) -> Result<PatternSpec, PatternError> {
        let mut spec = PatternSpec::default();

        for panel in self.panels() {
            match spec.panels.entry(panel.name.clone()) {
                Entry::Occupied(entry) => {
                    return Err(PatternError::Assembly(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    let _ = entry.insert(panel.to_spec());
                }
            }
        }

        for stitch in self.all_stitching_rules() {
            spec.stitches.extend(stitch.resolve(self)?);
        }

        log::debug!(
            "Assembled `{}`: {} panels, {} stitched edge pairs.",
            self.name(),
            spec.panels.len(),
            spec.stitches.len()
        );

        Ok(spec)
    }
}

/// A child of a component.
#[derive(Clone, Debug)]
pub enum PatternNode {
    /// A leaf panel.
    Panel(Panel),
    /// A nested component.
    Component(Component),
}

impl From<Panel> for PatternNode {
    fn from(panel: Panel) -> Self {
        PatternNode::Panel(panel)
    }
}

impl From<Component> for PatternNode {
    fn from(component: Component) -> Self {
        PatternNode::Component(component)
    }
}

macro_rules! dispatch {
    ($node: expr, $part: ident => $body: expr) => {
        match $node {
            PatternNode::Panel($part) => $body,
            PatternNode::Component($part) => $body,
        }
    };
}

impl PanelLookup for PatternNode {
    fn panel(&self, name: &str) -> Option<&Panel> {
        dispatch!(self, part => part.panel(name))
    }

    fn panel_mut(&mut self, name: &str) -> Option<&mut Panel> {
        dispatch!(self, part => part.panel_mut(name))
    }

    fn substitute_edge(&mut self, edge: EdgeId, new_edges: &[EdgeId]) {
        dispatch!(self, part => part.substitute_edge(edge, new_edges))
    }
}

impl PatternPart for PatternNode {
    fn name(&self) -> &str {
        dispatch!(self, part => part.name())
    }

    fn interfaces(&self) -> &IndexMap<String, Interface> {
        dispatch!(self, part => part.interfaces())
    }

    fn stitching_rules(&self) -> &[Stitch] {
        dispatch!(self, part => part.stitching_rules())
    }

    fn panels(&self) -> Vec<&Panel> {
        dispatch!(self, part => part.panels())
    }

    fn all_stitching_rules(&self) -> Vec<&Stitch> {
        dispatch!(self, part => part.all_stitching_rules())
    }

    fn translate_by(&mut self, shift: &Vector3<Real>) {
        dispatch!(self, part => part.translate_by(shift))
    }

    fn rotate_about(&mut self, rotation: &Rotation3<Real>, pivot: &Point3<Real>) {
        dispatch!(self, part => part.rotate_about(rotation, pivot))
    }

    fn pivot(&self) -> Point3<Real> {
        dispatch!(self, part => part.pivot())
    }
}

/// A node of the pattern tree: a group of panels and sub-components with the stitches
/// joining them.
#[derive(Clone, Debug, Default)]
pub struct Component {
    name: String,
    children: Vec<PatternNode>,
    interfaces: IndexMap<String, Interface>,
    stitching_rules: Vec<Stitch>,
}

impl Component {
    /// An empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Component {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a child panel or component.
    pub fn add(&mut self, child: impl Into<PatternNode>) {
        self.children.push(child.into())
    }

    /// Adds a child panel or component.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<PatternNode>) -> Self {
        self.add(child);
        self
    }

    /// The direct children of this component.
    pub fn children(&self) -> &[PatternNode] {
        &self.children
    }

    /// The direct children of this component.
    pub fn children_mut(&mut self) -> &mut [PatternNode] {
        &mut self.children
    }

    /// Exposes `interface` under `name`, replacing any interface with that name.
    pub fn set_interface(&mut self, name: impl Into<String>, interface: Interface) {
        let _ = self.interfaces.insert(name.into(), interface);
    }

    /// Sews two interfaces right side to right side.
    ///
    /// See [`Component::add_stitch_rule`].
    pub fn add_stitch(&mut self, left: Interface, right: Interface) -> Result<(), PatternError> {
        self.add_stitch_rule(Stitch::new(left, right))
    }

    /// Records a stitch.
    ///
    /// The edges of both interfaces are subdivided until they can be paired one to one. The
    /// subdivided edges replace the original ones in every interface and stitch of this
    /// component and its descendants; interfaces held outside of this component are not
    /// updated.
    ///
    /// # Errors
    ///
    /// Fails if an interface is empty or references an edge that is not part of this component.
    pub fn add_stitch_rule(&mut self, mut stitch: Stitch) -> Result<(), PatternError> {
        let swap = stitch.swap();
        match_interfaces(self, &mut stitch.left, &mut stitch.right, swap)?;
        self.stitching_rules.push(stitch);
        Ok(())
    }

    /// Mirrors every panel across the world plane `x = 0`.
    pub fn mirror(&mut self) {
        for child in &mut self.children {
            match child {
                PatternNode::Panel(panel) => panel.mirror_x(),
                PatternNode::Component(component) => component.mirror(),
            }
        }

        for interface in self.interfaces.values_mut() {
            *interface = interface.reversed();
        }

        for stitch in &mut self.stitching_rules {
            stitch.left = stitch.left.reversed();
            stitch.right = stitch.right.reversed();
        }
    }
}

impl PanelLookup for Component {
    fn panel(&self, name: &str) -> Option<&Panel> {
        self.children.iter().find_map(|c| c.panel(name))
    }

    fn panel_mut(&mut self, name: &str) -> Option<&mut Panel> {
        self.children.iter_mut().find_map(|c| c.panel_mut(name))
    }

    fn substitute_edge(&mut self, edge: EdgeId, new_edges: &[EdgeId]) {
        for child in &mut self.children {
            child.substitute_edge(edge, new_edges);
        }

        for interface in self.interfaces.values_mut() {
            let _ = interface.substitute(edge, new_edges);
        }

        for stitch in &mut self.stitching_rules {
            stitch.substitute(edge, new_edges);
        }
    }
}

impl PatternPart for Component {
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
        self.children.iter().flat_map(|c| c.panels()).collect()
    }

    fn all_stitching_rules(&self) -> Vec<&Stitch> {
        let mut result: Vec<_> = self
            .children
            .iter()
            .flat_map(|c| c.all_stitching_rules())
            .collect();
        result.extend(self.stitching_rules.iter());
        result
    }

    fn translate_by(&mut self, shift: &Vector3<Real>) {
        self.children.iter_mut().for_each(|c| c.translate_by(shift));
    }

    fn rotate_about(&mut self, rotation: &Rotation3<Real>, pivot: &Point3<Real>) {
        self.children
            .iter_mut()
            .for_each(|c| c.rotate_about(rotation, pivot));
    }
}
