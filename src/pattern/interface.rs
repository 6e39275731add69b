use super::{Edge, EdgeId, EdgeSequence, Panel, PanelLookup, PatternError};
use crate::math::{Point3, Real};
use ordered_float::OrderedFloat;

/// One edge of an interface.
#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceEdge {
    /// The name of the panel owning the edge.
    pub panel: String,
    /// The edge identifier.
    pub edge: EdgeId,
    /// How much fabric is gathered along this edge: the edge is `ruffle` times longer than
    /// the seam it is sewn into.
    pub ruffle: Real,
}

/// An ordered list of panel edges that can be stitched to another interface.
///
/// The edges may belong to different panels, e.g. the waist of a skirt made of a front and a
/// back panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interface {
    items: Vec<InterfaceEdge>,
}

impl Interface {
    /// An interface made of the given edges of `panel`.
    pub fn new(panel: &Panel, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        Self::from_edges(panel.name.clone(), edges)
    }

    /// An interface made of the given edges of the panel named `panel`.
    pub fn from_edges(panel: impl Into<String>, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        let panel = panel.into();
        Interface {
            items: edges
                .into_iter()
                .map(|edge| InterfaceEdge {
                    panel: panel.clone(),
                    edge,
                    ruffle: 1.0,
                })
                .collect(),
        }
    }

    /// Concatenates several interfaces into one, keeping their order.
    pub fn concat<'a>(interfaces: impl IntoIterator<Item = &'a Interface>) -> Self {
        Interface {
            items: interfaces
                .into_iter()
                .flat_map(|i| i.items.iter().cloned())
                .collect(),
        }
    }

    /// Merges several interfaces into one.
    ///
    /// The first interface comes first. Each following one is the remaining interface whose
    /// 3D midpoint is the closest to the midpoint of the previously added one, so that the
    /// merged interface runs along a chain of neighbors.
    pub fn from_multiple<'a>(
        lookup: &(impl PanelLookup + ?Sized),
        interfaces: impl IntoIterator<Item = &'a Interface>,
    ) -> Result<Self, PatternError> {
        let mut remaining = interfaces
            .into_iter()
            .map(|i| Ok((i, i.midpoint_3d(lookup)?)))
            .collect::<Result<Vec<_>, PatternError>>()?;

        if remaining.is_empty() {
            return Ok(Interface::default());
        }

        let (first, mut last) = remaining.remove(0);
        let mut items = first.items.clone();

        while !remaining.is_empty() {
            let next = remaining
                .iter()
                .enumerate()
                .min_by_key(|(_, (_, mid))| OrderedFloat(na::distance(mid, &last)))
                .map_or(0, |(k, _)| k);
            let (interface, mid) = remaining.remove(next);
            items.extend(interface.items.iter().cloned());
            last = mid;
        }

        Ok(Interface { items })
    }

    /// Sets the ruffle coefficient of every edge.
    #[must_use]
    pub fn with_ruffle(mut self, ruffle: Real) -> Self {
        self.items.iter_mut().for_each(|i| i.ruffle = ruffle);
        self
    }

    /// The number of edges.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Does this interface contain no edge?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The edges of this interface.
    pub fn items(&self) -> &[InterfaceEdge] {
        &self.items
    }

    /// The identifiers of the edges of this interface.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.items.iter().map(|i| i.edge)
    }

    /// The interface with its edges listed in opposite order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Interface {
            items: self.items.iter().rev().cloned().collect(),
        }
    }

    /// Replaces every occurrence of `edge` by `new_edges`, keeping its panel and ruffle.
    ///
    /// Returns `true` if `edge` was part of this interface.
    pub fn substitute(&mut self, edge: EdgeId, new_edges: &[EdgeId]) -> bool {
        let mut found = false;
        let mut result = Vec::with_capacity(self.items.len() + new_edges.len());

        for item in self.items.drain(..) {
            if item.edge == edge {
                found = true;
                result.extend(new_edges.iter().map(|e| InterfaceEdge {
                    edge: *e,
                    ..item.clone()
                }));
            } else {
                result.push(item);
            }
        }

        self.items = result;
        found
    }

    /// Resolves the edges of this interface.
    pub fn edges<'a>(
        &self,
        lookup: &'a (impl PanelLookup + ?Sized),
    ) -> Result<Vec<(&'a Panel, &'a Edge)>, PatternError> {
        self.items
            .iter()
            .map(|item| {
                let panel = lookup
                    .panel(&item.panel)
                    .ok_or_else(|| PatternError::UnknownPanel(item.panel.clone()))?;
                let edge = panel.edges.find(item.edge).ok_or_else(|| {
                    PatternError::UnknownEdge {
                        panel: item.panel.clone(),
                        edge: item.edge,
                    }
                })?;
                Ok((panel, edge))
            })
            .collect()
    }

    /// The length of each edge.
    pub fn lengths(&self, lookup: &(impl PanelLookup + ?Sized)) -> Result<Vec<Real>, PatternError> {
        Ok(self.edges(lookup)?.iter().map(|(_, e)| e.length()).collect())
    }

    /// The length of the seam covered by each edge, i.e., its length divided by its ruffle.
    pub fn seam_lengths(
        &self,
        lookup: &(impl PanelLookup + ?Sized),
    ) -> Result<Vec<Real>, PatternError> {
        Ok(self
            .lengths(lookup)?
            .into_iter()
            .zip(self.items.iter())
            .map(|(l, item)| l / item.ruffle)
            .collect())
    }

    /// The edges of this interface chained into one contiguous 2D shape, each one shrunk by
    /// its ruffle so that the shape has the length of the seam.
    pub fn projecting_edges(
        &self,
        lookup: &(impl PanelLookup + ?Sized),
    ) -> Result<EdgeSequence, PatternError> {
        let mut result: EdgeSequence = self
            .edges(lookup)?
            .into_iter()
            .zip(self.items.iter())
            .map(|((_, e), item)| {
                let mut edge = e.clone();
                let start = edge.start;
                edge.scale_about(1.0 / item.ruffle, &start);
                edge
            })
            .collect();
        result.chain();
        Ok(result)
    }

    /// The average of the 3D midpoints of the edges.
    pub fn midpoint_3d(
        &self,
        lookup: &(impl PanelLookup + ?Sized),
    ) -> Result<Point3<Real>, PatternError> {
        let edges = self.edges(lookup)?;
        if edges.is_empty() {
            return Err(PatternError::EmptyInterface);
        }

        let sum = edges
            .iter()
            .fold(Point3::origin().coords, |acc, (panel, edge)| {
                acc + panel.point_to_3d(&edge.midpoint()).coords
            });
        Ok(Point3::from(sum / edges.len() as Real))
    }
}
