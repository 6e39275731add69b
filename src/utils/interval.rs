use crate::math::Real;

/// A closed interval `[low, high]` of admissible values.
///
/// Used to reconcile edge rest lengths constrained by several triangles at
/// once: every triangle restricts an edge length to the range allowed by the
/// triangle inequality, and the admissible range is the intersection of all
/// of them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval(pub Real, pub Real);

impl Interval {
    /// The range of lengths a triangle side can take given its two other sides.
    pub fn triangle_side(a: Real, b: Real) -> Self {
        Interval((a - b).abs(), a + b)
    }

    /// Is this interval non-empty?
    pub fn is_valid(&self) -> bool {
        self.0 <= self.1
    }

    /// Computes the intersection of two intervals.
    ///
    /// Returns `None` if the intervals are disjoint.
    #[must_use]
    pub fn intersect(self, rhs: Self) -> Option<Self> {
        let result = Interval(self.0.max(rhs.0), self.1.min(rhs.1));
        result.is_valid().then_some(result)
    }

    /// The value of this interval closest to `t`.
    pub fn clamp(&self, t: Real) -> Real {
        t.max(self.0).min(self.1)
    }
}
