use super::{Edge, EdgeId, PatternError};
use crate::bounding_volume::Aabb2;
use crate::math::{Point2, Real, Vector2, VERTEX_TOLERANCE};
use crate::utils::polyline_self_intersects2d;
use core::ops::{Index, IndexMut};
use na::Unit;

/// Number of segments used to approximate curved edges in polyline queries.
pub const CURVE_LINEARIZATION_SEGMENTS: usize = 16;

/// An ordered chain of edges, the end of each one being the start of the next.
///
/// Panels own a closed `EdgeSequence`; open sequences describe parts of a
/// boundary, such as the shape of a dart before it is cut into an edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeSequence {
    edges: Vec<Edge>,
}

impl EdgeSequence {
    /// Creates a sequence from the given edges.
    pub fn new(edges: Vec<Edge>) -> Self {
        EdgeSequence { edges }
    }

    /// Builds a chain of straight edges through `verts`.
    ///
    /// If `close` is `true`, a last edge joins the last vertex back to the first one.
    pub fn from_verts(verts: &[Point2<Real>], close: bool) -> Self {
        let mut edges: Vec<_> = verts.windows(2).map(|w| Edge::new(w[0], w[1])).collect();

        if close && verts.len() > 2 {
            edges.push(Edge::new(verts[verts.len() - 1], verts[0]));
        }

        EdgeSequence { edges }
    }

    /// The number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Does this sequence contain no edge?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The edges of this sequence.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consumes the sequence, returning its edges.
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// Iterates through the edges.
    pub fn iter(&self) -> core::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Iterates mutably through the edges.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Edge> {
        self.edges.iter_mut()
    }

    /// The first edge, if any.
    pub fn first(&self) -> Option<&Edge> {
        self.edges.first()
    }

    /// The last edge, if any.
    pub fn last(&self) -> Option<&Edge> {
        self.edges.last()
    }

    /// Appends an edge at the end of the sequence.
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge)
    }

    /// Appends all the edges of `other` at the end of this sequence.
    pub fn append(&mut self, other: EdgeSequence) {
        self.edges.extend(other.edges)
    }

    /// The position of the edge with the given identifier.
    pub fn position(&self, id: EdgeId) -> Option<usize> {
        self.edges.iter().position(|e| e.id() == id)
    }

    /// The edge with the given identifier.
    pub fn find(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    /// Total length of the sequence.
    pub fn length(&self) -> Real {
        self.edges.iter().map(|e| e.length()).sum()
    }

    /// The length of every edge.
    pub fn lengths(&self) -> Vec<Real> {
        self.edges.iter().map(|e| e.length()).collect()
    }

    /// The length of every edge, divided by the total length.
    pub fn fractions(&self) -> Vec<Real> {
        let lengths = self.lengths();
        let total: Real = lengths.iter().sum();
        lengths.into_iter().map(|l| l / total).collect()
    }

    /// The straight vector from the start of the first edge to the end of the last one.
    pub fn shortcut(&self) -> Vector2<Real> {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => last.end - first.start,
            _ => Vector2::zeros(),
        }
    }

    /// The index of the first edge whose end does not match the start of the next one.
    pub fn first_gap(&self, tolerance: Real) -> Option<usize> {
        self.edges
            .windows(2)
            .position(|w| na::distance(&w[0].end, &w[1].start) > tolerance)
    }

    /// Does every edge start where the previous one ends?
    pub fn is_chained(&self, tolerance: Real) -> bool {
        self.first_gap(tolerance).is_none()
    }

    /// Is this sequence a closed chain?
    pub fn is_loop(&self, tolerance: Real) -> bool {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => {
                self.edges.len() > 1
                    && self.is_chained(tolerance)
                    && na::distance(&last.end, &first.start) <= tolerance
            }
            _ => false,
        }
    }

    /// Closes an open chain with a straight edge from its last to its first vertex.
    pub fn close_loop(&mut self) {
        if let (Some(first), Some(last)) = (self.edges.first(), self.edges.last()) {
            if na::distance(&last.end, &first.start) > VERTEX_TOLERANCE {
                let closing = Edge::new(last.end, first.start);
                self.edges.push(closing);
            }
        }
    }

    /// The start vertex of every edge, followed by the end of the last one for open chains.
    pub fn verts(&self) -> Vec<Point2<Real>> {
        let mut result: Vec<_> = self.edges.iter().map(|e| e.start).collect();

        if !self.is_loop(VERTEX_TOLERANCE) {
            if let Some(last) = self.edges.last() {
                result.push(last.end);
            }
        }

        result
    }

    /// A polyline approximation of the sequence, without repeating shared vertices.
    pub fn linearize(&self, n_segments: usize) -> Vec<Point2<Real>> {
        let mut result = vec![];

        for edge in &self.edges {
            let pts = edge.linearize(n_segments);
            result.extend_from_slice(&pts[..pts.len() - 1]);
        }

        if !self.is_loop(VERTEX_TOLERANCE) {
            if let Some(last) = self.edges.last() {
                result.push(last.end);
            }
        }

        result
    }

    /// The 2D bounding box of the sequence, curves included.
    pub fn bbox(&self) -> Aabb2 {
        Aabb2::from_points(self.linearize(CURVE_LINEARIZATION_SEGMENTS))
    }

    /// Does this closed sequence cross itself?
    pub fn is_self_intersecting(&self) -> bool {
        let poly = self.linearize(CURVE_LINEARIZATION_SEGMENTS);
        polyline_self_intersects2d(&poly, VERTEX_TOLERANCE * VERTEX_TOLERANCE)
    }

    /// Reverses the sequence: edges are walked in opposite order and direction.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        self.edges.iter_mut().for_each(|e| e.reverse());
    }

    /// The reversed sequence.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut result = self.clone();
        result.reverse();
        result
    }

    /// Replaces the edge at `index` by `new_edges`, in place.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of bounds.
    pub fn substitute(
        &mut self,
        index: usize,
        new_edges: impl IntoIterator<Item = Edge>,
    ) -> Result<(), PatternError> {
        if index >= self.edges.len() {
            return Err(PatternError::EdgeIndexOutOfBounds(index));
        }

        let _ = self.edges.splice(index..=index, new_edges);
        Ok(())
    }

    /// Inserts edges before the edge at `index`.
    pub fn insert(&mut self, index: usize, new_edges: impl IntoIterator<Item = Edge>) {
        let index = index.min(self.edges.len());
        let _ = self.edges.splice(index..index, new_edges);
    }

    /// Translates every edge.
    pub fn translate_by(&mut self, shift: &Vector2<Real>) {
        self.edges.iter_mut().for_each(|e| e.translate_by(shift));
    }

    /// Translates the sequence so that it starts at `point`.
    pub fn snap_to(&mut self, point: &Point2<Real>) {
        if let Some(first) = self.edges.first() {
            let shift = point - first.start;
            self.translate_by(&shift);
        }
    }

    /// Rotates every edge by `angle` radians around `pivot`.
    pub fn rotate_by(&mut self, angle: Real, pivot: &Point2<Real>) {
        self.edges.iter_mut().for_each(|e| e.rotate_by(angle, pivot));
    }

    /// Reflects every edge across the line through `origin` along `axis`.
    pub fn reflect(&mut self, origin: &Point2<Real>, axis: &Unit<Vector2<Real>>) {
        self.edges.iter_mut().for_each(|e| e.reflect(origin, axis));
    }

    /// Scales every edge uniformly by `factor` around `pivot`.
    pub fn scale_about(&mut self, factor: Real, pivot: &Point2<Real>) {
        self.edges
            .iter_mut()
            .for_each(|e| e.scale_about(factor, pivot));
    }

    /// Scales the sequence uniformly around its first vertex, multiplying every length by `factor`.
    pub fn extend_by(&mut self, factor: Real) {
        if let Some(first) = self.edges.first() {
            let pivot = first.start;
            self.scale_about(factor, &pivot);
        }
    }

    /// Translates each edge so that it starts exactly where the previous one ends.
    ///
    /// Used to chain edges coming from different panels into one contiguous shape.
    pub fn chain(&mut self) {
        for i in 1..self.edges.len() {
            let shift = self.edges[i - 1].end - self.edges[i].start;
            self.edges[i].translate_by(&shift);
        }
    }
}

impl Index<usize> for EdgeSequence {
    type Output = Edge;

    fn index(&self, index: usize) -> &Edge {
        &self.edges[index]
    }
}

impl IndexMut<usize> for EdgeSequence {
    fn index_mut(&mut self, index: usize) -> &mut Edge {
        &mut self.edges[index]
    }
}

impl From<Vec<Edge>> for EdgeSequence {
    fn from(edges: Vec<Edge>) -> Self {
        EdgeSequence::new(edges)
    }
}

impl FromIterator<Edge> for EdgeSequence {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        EdgeSequence::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EdgeSequence {
    type Item = &'a Edge;
    type IntoIter = core::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
