//! Split-plane search.
//!
//! When no orientation fits, candidate planes are enumerated from
//! geometric discontinuities (aligned face boundaries — mortar lines,
//! course repeats) and explicit floor-break labels along the piece's
//! dominant axes, filtered against fragile openings, and scored by how
//! well the predicted children orient.

use rayon::prelude::*;

use lithoprep_classify::{classify, Classification};
use lithoprep_kernel::{run_with_retries, SolidKernel};
use lithoprep_math::{Aabb, Axis, Plane};
use lithoprep_model::{BuildVolume, Face, FaceCategory, LabelMap, Piece, PrepConfig};
use lithoprep_orient::select_orientation;

use crate::error::{Result, SplitError};

/// Why a candidate position exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitReason {
    /// An explicit floor-break label.
    FloorBreak,
    /// A pattern break: many face boundaries aligned at one coordinate.
    PatternBreak,
}

/// The geometry of the joint a plane would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    /// Flat butt joint; receives pin/socket registration.
    Butt,
    /// Two walls meeting at a right angle; the overlapping corner
    /// volume already aligns both axes, so no pins are generated.
    Corner,
}

/// One scored candidate split.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// The cut plane.
    pub plane: Plane,
    /// Axis the plane is perpendicular to.
    pub axis: Axis,
    /// Plane coordinate along that axis.
    pub position: f64,
    /// Provenance of the candidate.
    pub reason: SplitReason,
    /// Joint geometry at the plane.
    pub joint: JointKind,
    /// Predicted child bounds (negative side, positive side).
    pub child_bounds: (Aabb, Aabb),
    /// Lower is better; infeasible children push the score up.
    pub score: f64,
}

/// Search split planes for a piece that does not fit.
///
/// Returns candidates best-first. An already-fitting piece yields an
/// empty plan — re-running the planner on a fit piece is a no-op.
pub fn plan_split(
    piece: &Piece,
    classification: &Classification,
    labels: &LabelMap,
    volume: &BuildVolume,
    config: &PrepConfig,
) -> Result<Vec<SplitPlan>> {
    if select_orientation(piece, classification, labels, volume, config).is_ok() {
        tracing::debug!(piece = piece.name(), "piece fits; no split needed");
        return Ok(Vec::new());
    }

    let candidates = candidate_positions(piece, labels, config);
    if candidates.is_empty() {
        return Err(SplitError::NoCandidates(piece.name().to_string()));
    }

    let mut plans: Vec<SplitPlan> = candidates
        .par_iter()
        .filter_map(|&(axis, position, reason)| {
            if crosses_fragile_opening(labels, axis, position) {
                return None;
            }
            score_candidate(
                piece,
                classification,
                labels,
                volume,
                config,
                axis,
                position,
                reason,
            )
        })
        .collect();

    if plans.is_empty() {
        return Err(SplitError::NoCandidates(piece.name().to_string()));
    }

    plans.sort_by(|a, b| a.score.total_cmp(&b.score));
    tracing::info!(
        piece = piece.name(),
        candidates = plans.len(),
        best_axis = ?plans[0].axis,
        best_position = plans[0].position,
        "split plan ready"
    );
    Ok(plans)
}

/// Candidate (axis, position, reason) triples along the dominant axes.
fn candidate_positions(
    piece: &Piece,
    labels: &LabelMap,
    config: &PrepConfig,
) -> Vec<(Axis, f64, SplitReason)> {
    let bounds = piece.bounds();
    let extents = bounds.extents();
    let mut axes: Vec<Axis> = Axis::all().to_vec();
    axes.sort_by(|a, b| extents[b.index()].total_cmp(&extents[a.index()]));
    let dominant = &axes[..2];

    let mut candidates: Vec<(Axis, f64, SplitReason)> = Vec::new();

    for &(axis, position) in labels.floor_breaks() {
        if dominant.contains(&axis)
            && position > bounds.min[axis.index()]
            && position < bounds.max[axis.index()]
        {
            candidates.push((axis, position, SplitReason::FloorBreak));
        }
    }

    for &axis in dominant {
        for position in pattern_breaks(piece.faces(), bounds, axis, config) {
            let duplicate = candidates
                .iter()
                .any(|&(a, p, _)| a == axis && (p - position).abs() < 1.0);
            if !duplicate {
                candidates.push((axis, position, SplitReason::PatternBreak));
            }
        }
    }

    candidates
}

/// Coordinates where many face boundaries align: course repeats,
/// mortar lines, storey joints. Restricted to the central band of the
/// piece so a split always produces two substantial children.
fn pattern_breaks(faces: &[Face], bounds: &Aabb, axis: Axis, config: &PrepConfig) -> Vec<f64> {
    use std::collections::HashMap;

    let i = axis.index();
    let lo = bounds.min[i] + 0.2 * (bounds.max[i] - bounds.min[i]);
    let hi = bounds.min[i] + 0.8 * (bounds.max[i] - bounds.min[i]);

    let mut histogram: HashMap<i64, usize> = HashMap::new();
    for face in faces {
        for value in [face.bounds.min[i], face.bounds.max[i]] {
            let key = (value / 0.5).round() as i64;
            *histogram.entry(key).or_default() += 1;
        }
    }

    let mut breaks: Vec<f64> = histogram
        .into_iter()
        .filter(|&(_, count)| count >= 4)
        .map(|(key, _)| key as f64 * 0.5)
        .filter(|&p| p > lo && p < hi)
        .collect();
    breaks.sort_by(f64::total_cmp);
    // Avoid a forest of near-identical planes on dense texture.
    breaks.dedup_by(|a, b| (*a - *b).abs() < config.cluster_grid / 4.0);
    breaks
}

/// True when the plane would cut through a labeled fragile opening.
fn crosses_fragile_opening(labels: &LabelMap, axis: Axis, position: f64) -> bool {
    let i = axis.index();
    labels
        .fragile_openings()
        .iter()
        .any(|o| o.min[i] < position && position < o.max[i])
}

#[allow(clippy::too_many_arguments)]
fn score_candidate(
    piece: &Piece,
    classification: &Classification,
    labels: &LabelMap,
    volume: &BuildVolume,
    config: &PrepConfig,
    axis: Axis,
    position: f64,
    reason: SplitReason,
) -> Option<SplitPlan> {
    let (neg_bounds, pos_bounds) = split_bounds(piece.bounds(), axis, position);
    // Each child needs two substantial dimensions; a corner split may
    // legitimately leave a child thin along the split axis.
    if neg_bounds.sorted_extents()[1] < 5.0 || pos_bounds.sorted_extents()[1] < 5.0 {
        return None;
    }

    let mut score = 0.0;

    // Prefer balanced splits, lightly.
    let i = axis.index();
    let center = (piece.bounds().min[i] + piece.bounds().max[i]) / 2.0;
    let extent = piece.bounds().extent(axis);
    if extent > 0.0 {
        score += 5.0 * ((position - center) / extent).abs();
    }

    // Child feasibility dominates. Both fitting beats one fitting
    // beats none; the residual overflow orders candidates that need
    // recursion.
    for side_positive in [false, true] {
        let faces = child_faces(piece.faces(), axis, position, side_positive);
        if faces.is_empty() {
            return None;
        }
        let bounds = if side_positive { pos_bounds } else { neg_bounds };
        let child = Piece::from_parts("candidate", piece.handle(), faces, bounds);
        let child_cls = classify(child.faces(), labels, config).ok()?;
        match select_orientation(&child, &child_cls, labels, volume, config) {
            Ok(choice) => {
                // Tilt compromise: distance from the preferred low end
                // of the sweep.
                score += choice.tilt_deg - config.tilt_min_deg;
            }
            Err(lithoprep_orient::OrientError::Infeasible { best_overflow, .. }) => {
                score += 1000.0 + best_overflow;
            }
            Err(_) => return None,
        }
    }

    // Preserve labeled structural features: bisecting a localized
    // structural face's bounding box is penalized (full-span faces are
    // unavoidable and exempt).
    let piece_extent = extent;
    for face in piece.faces() {
        let cat = classification.category(face.index);
        if !matches!(
            cat,
            Some(FaceCategory::Structural) | Some(FaceCategory::StructuralOverhang)
        ) {
            continue;
        }
        let extent = face.bounds.extent(axis);
        if extent < 0.3 * piece_extent
            && face.bounds.min[i] + 0.1 < position
            && position < face.bounds.max[i] - 0.1
        {
            score += 50.0;
        }
    }

    let plane = Plane::axis_aligned(axis, position);
    let joint = detect_joint(piece, classification, axis, position);

    Some(SplitPlan {
        plane,
        axis,
        position,
        reason,
        joint,
        child_bounds: (neg_bounds, pos_bounds),
        score,
    })
}

/// Predicted child bounds for an axis-aligned cut.
fn split_bounds(bounds: &Aabb, axis: Axis, position: f64) -> (Aabb, Aabb) {
    let i = axis.index();
    let mut neg = *bounds;
    neg.max[i] = position;
    let mut pos = *bounds;
    pos.min[i] = position;
    (neg, pos)
}

/// Faces on one side of the cut, renumbered for the child.
pub(crate) fn child_faces(
    faces: &[Face],
    axis: Axis,
    position: f64,
    side_positive: bool,
) -> Vec<Face> {
    let i = axis.index();
    faces
        .iter()
        .filter(|f| {
            if side_positive {
                f.centroid[i] >= position
            } else {
                f.centroid[i] < position
            }
        })
        .enumerate()
        .map(|(index, f)| {
            let mut face = f.clone();
            face.index = index;
            face
        })
        .collect()
}

/// Classify the joint the plane would produce.
///
/// A flat butt cut of a thin wall crosses only faces that run the full
/// length of that wall. At an L-corner the plane additionally crosses
/// a transverse wall's horizontal caps: short along the split axis but
/// long across it. The presence of such a transverse run marks the
/// joint as a corner.
fn detect_joint(
    piece: &Piece,
    classification: &Classification,
    axis: Axis,
    position: f64,
) -> JointKind {
    let i = axis.index();
    let other_horizontal = match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
        Axis::Z => return JointKind::Butt,
    };

    let transverse_run = piece.faces().iter().any(|f| {
        if !matches!(
            classification.category(f.index),
            Some(FaceCategory::Structural) | Some(FaceCategory::StructuralOverhang)
        ) {
            return false;
        }
        // Horizontal cap crossing the plane.
        if f.normal.z.abs() < 0.7 {
            return false;
        }
        if !(f.bounds.min[i] + 0.05 < position && position < f.bounds.max[i] - 0.05) {
            return false;
        }
        let along = f.bounds.extent(axis);
        let across = f.bounds.extent(other_horizontal);
        across > 3.0 * along
    });

    if transverse_run {
        JointKind::Corner
    } else {
        JointKind::Butt
    }
}

/// Execute a chosen split on the kernel.
///
/// The parent is consumed: on success its handle is retired and the
/// two children take ownership. The boolean runs as a cancellable job
/// with bounded retries; exhaustion is fatal for this piece only.
pub fn execute_split(
    kernel: &std::sync::Arc<dyn SolidKernel>,
    piece: Piece,
    plan: &SplitPlan,
    config: &PrepConfig,
) -> Result<(Piece, Piece)> {
    let name = piece.name().to_string();
    let handle = piece.handle();
    let job_kernel = kernel.clone();
    let plane = plan.plane.clone();

    let outcome = run_with_retries(
        "split",
        config.kernel_retries,
        config.kernel_timeout(),
        move |_| job_kernel.split(handle, &plane),
    );

    let (neg_handle, pos_handle) = match outcome {
        Ok(handles) => handles,
        Err(e) => {
            kernel.retire(piece.into_handle());
            return Err(e.into());
        }
    };
    kernel.retire(piece.into_handle());

    let neg = Piece::from_kernel(kernel.as_ref(), neg_handle, format!("{name}/neg"))?;
    let pos = Piece::from_kernel(kernel.as_ref(), pos_handle, format!("{name}/pos"))?;
    tracing::info!(
        parent = name,
        axis = ?plan.axis,
        position = plan.position,
        "split executed"
    );
    Ok((neg, pos))
}
