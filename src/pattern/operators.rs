//! Cutting shapes into panel boundaries.

use super::{CutError, Edge, EdgeSequence};
use crate::math::{Point2, Real, Vector2, VERTEX_TOLERANCE};
use crate::utils::levenberg_marquardt2;
use na::Unit;

/// The result of [`cut_into_edge`].
#[derive(Clone, Debug)]
pub struct EdgeCut {
    /// The edges replacing the cut edge, in boundary order.
    pub new_edges: EdgeSequence,
    /// The edges of the inserted shape, a subset of `new_edges`.
    pub inserted: EdgeSequence,
    /// What remains of the cut edge on both sides of the shape, a subset of `new_edges`.
    pub leftover: EdgeSequence,
}

/// The result of [`cut_corner`].
#[derive(Clone, Debug)]
pub struct CornerCut {
    /// The edges replacing the two corner edges, in boundary order.
    pub new_edges: EdgeSequence,
    /// The edges of the inserted shape, a subset of `new_edges`.
    pub inserted: EdgeSequence,
    /// The first corner edge shortened to the start of the shape, unless nothing is left of it.
    pub first: Option<Edge>,
    /// The second corner edge shortened to the end of the shape, unless nothing is left of it.
    pub second: Option<Edge>,
}

/// Inserts a copy of `target` into `base`, centered at the arc length `offset` along `base`.
///
/// The copy is rotated and uniformly scaled so that its endpoints land on `base`, keeping
/// the side of its shortcut it bulges to. With `right == true`, the copy is first reflected
/// across its shortcut so that it bulges to the other side.
///
/// If the shape does not fit at `offset`, it is moved along the edge until it does and a
/// warning is emitted.
///
/// # Errors
///
/// Fails if `target` is degenerate or wider than `base`.
pub fn cut_into_edge(
    target: &EdgeSequence,
    base: &Edge,
    offset: Real,
    right: bool,
) -> Result<EdgeCut, CutError> {
    let width = target.shortcut().norm();
    if target.is_empty() || width <= VERTEX_TOLERANCE {
        return Err(CutError::DegenerateShape);
    }

    let curve = base.as_curve();
    let edge_length = curve.length();
    if width >= edge_length {
        return Err(CutError::ShapeTooWide {
            shape_width: width,
            edge_length,
        });
    }

    let half = width * 0.5;
    let center = offset.clamp(half, edge_length - half);
    if (center - offset).abs() > VERTEX_TOLERANCE {
        log::warn!(
            "Cut shape does not fit at offset {} of an edge of length {}, moved to {}.",
            offset,
            edge_length,
            center
        );
    }

    let has_before = center - half > VERTEX_TOLERANCE;
    let has_after = center + half < edge_length - VERTEX_TOLERANCE;
    let t0 = if has_before {
        curve.param_at_length(center - half)
    } else {
        0.0
    };
    let t1 = if has_after {
        curve.param_at_length(center + half)
    } else {
        1.0
    };
    let pieces = base.subdivide_param(&[t0, t1]);
    let middle = &pieces[has_before as usize];
    let (p0, p1) = (middle.start, middle.end);

    let mut inserted: EdgeSequence = target.iter().map(|e| e.duplicate()).collect();
    let origin = Point2::origin();
    let shortcut = target.shortcut();
    inserted.snap_to(&origin);

    if right {
        inserted.reflect(&origin, &Unit::new_normalize(shortcut));
    }

    let chord = p1 - p0;
    let angle = chord.y.atan2(chord.x) - shortcut.y.atan2(shortcut.x);
    inserted.rotate_by(angle, &origin);
    inserted.scale_about(chord.norm() / width, &origin);
    inserted.translate_by(&p0.coords);
    snap_ends(&mut inserted, &p0, &p1);

    let mut new_edges = EdgeSequence::default();
    let mut leftover = EdgeSequence::default();
    let mut pieces = pieces.into_iter();

    if has_before {
        if let Some(before) = pieces.next() {
            new_edges.push(before.clone());
            leftover.push(before);
        }
    }
    let _ = pieces.next();
    new_edges.append(inserted.clone());
    if has_after {
        if let Some(after) = pieces.next() {
            new_edges.push(after.clone());
            leftover.push(after);
        }
    }

    Ok(EdgeCut {
        new_edges,
        inserted,
        leftover,
    })
}

/// Cuts the corner between `first` and `second`, where `first` ends at the start of `second`,
/// with a rigid copy of `target`.
///
/// The copy is placed so that it starts on `first` and ends on `second`. Both placements are
/// found by a least-squares fit of the curve parameters along the two edges.
///
/// # Errors
///
/// Fails if the edges are not consecutive, if `target` is degenerate, or if no placement
/// matches the shortcut of `target`.
pub fn cut_corner(
    target: &EdgeSequence,
    first: &Edge,
    second: &Edge,
) -> Result<CornerCut, CutError> {
    if na::distance(&first.end, &second.start) > VERTEX_TOLERANCE {
        return Err(CutError::NotConsecutive);
    }

    let shortcut = target.shortcut();
    let width = shortcut.norm();
    if target.is_empty() || width <= VERTEX_TOLERANCE {
        return Err(CutError::DegenerateShape);
    }

    let curve_a = first.as_curve();
    let curve_b = second.as_curve();
    let residual = |p: [Real; 2]| -> Vector2<Real> {
        (curve_b.point_at(p[1]) - curve_a.point_at(p[0])) - shortcut
    };

    let tolerance = VERTEX_TOLERANCE * width.max(1.0);
    let fit = levenberg_marquardt2(residual, [0.5, 0.5], tolerance * 1.0e-6, 200);
    if fit.residual > tolerance {
        return Err(CutError::CornerFitFailed {
            residual: fit.residual,
        });
    }

    let [ta, tb] = fit.params;
    let kept_a = first.split_at(ta).0;
    let kept_b = second.split_at(tb).1;
    let start = kept_a.end;
    let end = kept_b.start;

    let mut inserted: EdgeSequence = target.iter().map(|e| e.duplicate()).collect();
    inserted.snap_to(&start);
    snap_ends(&mut inserted, &start, &end);

    let first = (kept_a.length() > VERTEX_TOLERANCE).then_some(kept_a);
    let second = (kept_b.length() > VERTEX_TOLERANCE).then_some(kept_b);

    let mut new_edges = EdgeSequence::default();
    if let Some(edge) = &first {
        new_edges.push(edge.clone());
    }
    new_edges.append(inserted.clone());
    if let Some(edge) = &second {
        new_edges.push(edge.clone());
    }

    Ok(CornerCut {
        new_edges,
        inserted,
        first,
        second,
    })
}

fn snap_ends(seq: &mut EdgeSequence, start: &Point2<Real>, end: &Point2<Real>) {
    if !seq.is_empty() {
        seq[0].start = *start;
        let last = seq.len() - 1;
        seq[last].end = *end;
    }
}
