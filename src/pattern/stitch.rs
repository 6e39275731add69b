use super::{EdgeId, EdgeRef, Interface, PanelLookup, PatternError, StitchSpec};
use crate::math::{Real, VERTEX_TOLERANCE};

/// A seam joining two interfaces.
///
/// Both interfaces list their edges in the direction their panels walk them. By default
/// (`right_wrong == false`) the fabric is sewn "right side to right side": the second
/// interface is walked backwards, so that its last edge is sewn to the first edge of the
/// first interface, each pair of edges running in opposite directions. This is what two
/// counter-clockwise panels facing each other need. With `right_wrong`, both interfaces
/// are walked forward.
#[derive(Clone, Debug, PartialEq)]
pub struct Stitch {
    /// The first side of the seam.
    pub left: Interface,
    /// The second side of the seam.
    pub right: Interface,
    /// Is the seam sewn right side to wrong side?
    pub right_wrong: bool,
    /// A label propagated to the compiled mesh.
    pub label: Option<String>,
}

impl Stitch {
    /// A right-to-right stitch between two interfaces.
    pub fn new(left: Interface, right: Interface) -> Self {
        Stitch {
            left,
            right,
            right_wrong: false,
            label: None,
        }
    }

    /// Marks this stitch as sewn right side to wrong side.
    #[must_use]
    pub fn right_wrong(mut self) -> Self {
        self.right_wrong = true;
        self
    }

    /// Sets the label of this stitch.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Are paired edges walked in opposite directions?
    pub fn swap(&self) -> bool {
        !self.right_wrong
    }

    /// Replaces `edge` with `new_edges` on both sides.
    pub fn substitute(&mut self, edge: EdgeId, new_edges: &[EdgeId]) {
        let _ = self.left.substitute(edge, new_edges);
        let _ = self.right.substitute(edge, new_edges);
    }

    /// The pairs of edges sewn together, as exchange records.
    ///
    /// # Errors
    ///
    /// Fails if an interface is empty, if the interfaces have different lengths, or if an edge
    /// cannot be found in its panel.
    pub fn resolve(&self, lookup: &(impl PanelLookup + ?Sized)) -> Result<Vec<StitchSpec>, PatternError> {
        if self.left.is_empty() || self.right.is_empty() {
            return Err(PatternError::EmptyInterface);
        }

        if self.left.len() != self.right.len() {
            return Err(PatternError::InterfaceMismatch {
                left: self.left.len(),
                right: self.right.len(),
            });
        }

        let left = edge_refs(&self.left, lookup)?;
        let mut right = edge_refs(&self.right, lookup)?;
        if self.swap() {
            right.reverse();
        }

        Ok(left
            .into_iter()
            .zip(right)
            .map(|(l, r)| StitchSpec {
                sides: [l, r],
                right_wrong: self.right_wrong,
                label: self.label.clone(),
            })
            .collect())
    }
}

fn edge_refs(
    interface: &Interface,
    lookup: &(impl PanelLookup + ?Sized),
) -> Result<Vec<EdgeRef>, PatternError> {
    interface
        .items()
        .iter()
        .map(|item| {
            let panel = lookup
                .panel(&item.panel)
                .ok_or_else(|| PatternError::UnknownPanel(item.panel.clone()))?;
            let edge = panel
                .edges
                .position(item.edge)
                .ok_or_else(|| PatternError::UnknownEdge {
                    panel: item.panel.clone(),
                    edge: item.edge,
                })?;
            Ok(EdgeRef {
                panel: item.panel.clone(),
                edge,
            })
        })
        .collect()
}

// Relative positions of the junctions between consecutive edges along the seam.
fn junctions(
    interface: &Interface,
    lookup: &(impl PanelLookup + ?Sized),
) -> Result<Vec<Real>, PatternError> {
    let lengths = interface.seam_lengths(lookup)?;
    let total: Real = lengths.iter().sum();
    let mut cumulated = 0.0;
    let mut result = Vec::with_capacity(lengths.len());

    for l in &lengths[..lengths.len().saturating_sub(1)] {
        cumulated += l;
        result.push(cumulated / total);
    }

    Ok(result)
}

// Splits the edges of `target` so that it has a junction at each of the relative `positions`.
fn split_at_junctions(
    parts: &mut (impl PanelLookup + ?Sized),
    target: &mut Interface,
    other: &mut Interface,
    positions: &[Real],
) -> Result<(), PatternError> {
    for pos in positions {
        let lengths = target.seam_lengths(&*parts)?;
        let total: Real = lengths.iter().sum();
        let tolerance = VERTEX_TOLERANCE / total.max(VERTEX_TOLERANCE);
        let mut start = 0.0;

        for (k, l) in lengths.iter().enumerate() {
            let end = start + l / total;

            if (pos - start).abs() <= tolerance || (pos - end).abs() <= tolerance {
                break;
            }

            if *pos > start && *pos < end {
                let local = (pos - start) / (end - start);
                let item = target.items()[k].clone();
                let new_edges =
                    parts.split_edge(&item.panel, item.edge, &[local, 1.0 - local])?;
                let _ = target.substitute(item.edge, &new_edges);
                let _ = other.substitute(item.edge, &new_edges);
                log::debug!(
                    "Split edge {:?} of panel `{}` to match the opposite side of a stitch.",
                    item.edge,
                    item.panel
                );
                break;
            }

            start = end;
        }
    }

    Ok(())
}

/// Subdivides the edges of two interfaces so that both have the same number of edges, paired
/// edges covering the same part of the seam.
///
/// Positions along the seam account for the ruffle of each edge. `swap` tells whether `right`
/// is walked backwards, see [`Stitch`]. Split edges are substituted in every interface and
/// stitch known to `parts`.
pub fn match_interfaces(
    parts: &mut (impl PanelLookup + ?Sized),
    left: &mut Interface,
    right: &mut Interface,
    swap: bool,
) -> Result<(), PatternError> {
    if left.is_empty() || right.is_empty() {
        return Err(PatternError::EmptyInterface);
    }

    let flip = |positions: Vec<Real>| -> Vec<Real> {
        if swap {
            positions.into_iter().map(|p| 1.0 - p).collect()
        } else {
            positions
        }
    };

    let right_junctions = junctions(right, &*parts)?;
    split_at_junctions(parts, left, right, &flip(right_junctions))?;

    let left_junctions = junctions(left, &*parts)?;
    split_at_junctions(parts, right, left, &flip(left_junctions))?;

    if left.len() != right.len() {
        return Err(PatternError::InterfaceMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(())
}
