//! Orientation search.
//!
//! Sweeps tilt candidates about the wall's in-plane horizontal axis,
//! signed so the interior faces the build plate, and scores every
//! candidate that fits the build volume. Orientation is finalized here,
//! before any support exists; supports never influence the choice
//! beyond the fixed allowance reserved by the fit checker.

use lithoprep_classify::Classification;
use lithoprep_math::{Aabb, Point3, Transform, Vec3, GEOM_TOL};
use lithoprep_model::{BuildVolume, FaceCategory, LabelMap, ModelError, Piece, PrepConfig};
use nalgebra::Unit;
use thiserror::Error;

use crate::fit::check_fit;

/// Errors from orientation selection.
#[derive(Error, Debug)]
pub enum OrientError {
    /// No candidate in the sweep fits the build volume.
    #[error("no orientation fits build volume '{volume}' (best overflow {best_overflow:.1}mm)")]
    Infeasible {
        /// Name of the printer that was tested.
        volume: String,
        /// Smallest worst-axis overflow over all candidates.
        best_overflow: f64,
    },

    /// Label input was unusable.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Score components for one orientation candidate. Lower is better.
#[derive(Debug, Clone, Copy)]
pub struct OrientationScore {
    /// Total structural-overhang area that will need support.
    pub support_area: f64,
    /// Longest unsupported horizontal span among those faces.
    pub max_span: f64,
    /// Penalty when a fragile bar's long axis runs along Z: layer
    /// stacking along a thin bar removes cross-layer bonding.
    pub bar_penalty: f64,
}

impl OrientationScore {
    /// Combined score.
    pub fn total(&self) -> f64 {
        self.support_area + 0.5 * self.max_span + self.bar_penalty
    }
}

/// The selected orientation, frozen before support generation.
#[derive(Debug, Clone)]
pub struct OrientationChoice {
    /// In-plane reorientation applied first (degrees about Z).
    pub yaw_deg: f64,
    /// Tilt about the wall's horizontal axis (degrees).
    pub tilt_deg: f64,
    /// Whether the secondary peel tilts were applied.
    pub peel_applied: bool,
    /// Full placement: rotation, then shift to positive XY with the
    /// lowest point raised to `model_raise`.
    pub transform: Transform,
    /// Piece bounds after placement.
    pub bounds: Aabb,
    /// Outward (display) direction in the oriented frame.
    pub outward: Vec3,
    /// Candidate score.
    pub score: OrientationScore,
}

struct Candidate {
    yaw_deg: f64,
    tilt_deg: f64,
    rotation: Transform,
    bounds: Aabb,
    score: OrientationScore,
}

/// Search tilt/yaw candidates and select the cheapest that fits.
pub fn select_orientation(
    piece: &Piece,
    classification: &Classification,
    labels: &LabelMap,
    volume: &BuildVolume,
    config: &PrepConfig,
) -> Result<OrientationChoice, OrientError> {
    let outward = *labels.outward_dir().map_err(OrientError::Model)?.as_ref();

    let mut tilts = Vec::new();
    let mut t = config.tilt_min_deg;
    while t <= config.tilt_max_deg + 1e-9 {
        tilts.push(t);
        t += config.tilt_step_deg;
    }

    let mut best: Option<Candidate> = None;
    let mut best_overflow = f64::INFINITY;

    for yaw_deg in [0.0f64, 90.0] {
        let yaw = Transform::rotation_z(yaw_deg.to_radians());
        let outward_yawed = yaw.apply_vec(&outward);
        // Tilt about the horizontal axis lying in the wall plane, so
        // the wall leans back rather than sideways.
        let horizontal = Vec3::new(outward_yawed.x, outward_yawed.y, 0.0);
        let tilt_axis = if horizontal.norm() > GEOM_TOL {
            Unit::new_normalize(Vec3::z().cross(&horizontal))
        } else {
            Unit::new_unchecked(Vec3::x())
        };

        for &tilt_deg in &tilts {
            let Some(rotation) = tilt_toward_plate(&yaw, &tilt_axis, tilt_deg, &outward) else {
                continue;
            };
            let bounds = placed_bounds(piece.bounds(), &rotation, config);
            let fit = check_fit(&bounds, volume, config);
            if !fit.fits {
                best_overflow = best_overflow.min(fit.worst_overflow());
                continue;
            }
            let score = score_candidate(piece, classification, &rotation, config);
            let candidate = Candidate {
                yaw_deg,
                tilt_deg,
                rotation,
                bounds,
                score,
            };
            if best.as_ref().map_or(true, |b| beats(&candidate, b)) {
                best = Some(candidate);
            }
        }
    }

    let Some(winner) = best else {
        return Err(OrientError::Infeasible {
            volume: volume.name.clone(),
            best_overflow,
        });
    };

    Ok(finalize(winner, piece, volume, &outward, config))
}

/// Rotation = yaw then tilt, with the tilt sign that lifts the display
/// side away from the plate. `None` when neither sign does (the tilt
/// axis is parallel to the outward direction).
fn tilt_toward_plate(
    yaw: &Transform,
    tilt_axis: &lithoprep_math::Dir3,
    tilt_deg: f64,
    outward: &Vec3,
) -> Option<Transform> {
    for sign in [1.0, -1.0] {
        let rotation = yaw.then(&Transform::rotation_about_axis(
            tilt_axis,
            sign * tilt_deg.to_radians(),
        ));
        if rotation.apply_vec(outward).z > GEOM_TOL {
            return Some(rotation);
        }
    }
    None
}

/// Bounds after rotation, shifted to positive XY and raised off the
/// raft. Cheap: a corner transform, no surface recomputation.
fn placed_bounds(bounds: &Aabb, rotation: &Transform, config: &PrepConfig) -> Aabb {
    let rotated = rotation.apply_aabb(bounds);
    let ext = rotated.extents();
    Aabb::new(
        Point3::new(0.0, 0.0, config.model_raise),
        Point3::new(ext.x, ext.y, ext.z + config.model_raise),
    )
}

/// Placement transform matching [`placed_bounds`].
fn placement(bounds: &Aabb, rotation: &Transform, config: &PrepConfig) -> Transform {
    let rotated = rotation.apply_aabb(bounds);
    rotation.then(&Transform::translation(
        -rotated.min.x,
        -rotated.min.y,
        -rotated.min.z + config.model_raise,
    ))
}

fn score_candidate(
    piece: &Piece,
    classification: &Classification,
    rotation: &Transform,
    config: &PrepConfig,
) -> OrientationScore {
    let mut support_area = 0.0;
    let mut max_span = 0.0_f64;

    for face in piece.faces() {
        // Only structural overhangs cost supports; display faces never
        // receive contacts and cosmetic detail prints bare.
        if !matches!(
            classification.category(face.index),
            Some(FaceCategory::StructuralOverhang)
        ) {
            continue;
        }
        let normal = rotation.apply_vec(&face.normal);
        if normal.z < config.overhang_dot_threshold {
            support_area += face.area;
            let rotated = rotation.apply_aabb(&face.bounds);
            let ext = rotated.extents();
            max_span = max_span.max(ext.x.max(ext.y));
        }
    }

    let mut bar_penalty = 0.0;
    for bar in &classification.bars {
        let along = rotation.apply_vec(&bar.long_axis.unit());
        if along.z.abs() > 0.9 {
            bar_penalty += 1000.0;
        }
    }

    OrientationScore {
        support_area,
        max_span,
        bar_penalty,
    }
}

/// Lower score wins; ties break toward the smaller footprint.
fn beats(a: &Candidate, b: &Candidate) -> bool {
    let (ta, tb) = (a.score.total(), b.score.total());
    if (ta - tb).abs() > 1e-9 {
        return ta < tb;
    }
    let foot = |c: &Candidate| {
        let e = c.bounds.extents();
        e.x * e.y
    };
    foot(a) < foot(b)
}

/// Attach the placement translation and, when they still fit, the
/// secondary peel tilts (progressive peel along the length, diagonal
/// sweep) to the winning rotation.
fn finalize(
    winner: Candidate,
    piece: &Piece,
    volume: &BuildVolume,
    outward: &Vec3,
    config: &PrepConfig,
) -> OrientationChoice {
    let mut rotation = winner.rotation;
    let mut bounds = winner.bounds;
    let mut peel_applied = false;

    if config.peel_tilt_y_deg.abs() > 0.0 || config.peel_tilt_z_deg.abs() > 0.0 {
        let peeled = rotation
            .then(&Transform::rotation_y(config.peel_tilt_y_deg.to_radians()))
            .then(&Transform::rotation_z(config.peel_tilt_z_deg.to_radians()));
        let peeled_bounds = placed_bounds(piece.bounds(), &peeled, config);
        if check_fit(&peeled_bounds, volume, config).fits {
            rotation = peeled;
            bounds = peeled_bounds;
            peel_applied = true;
        }
    }

    let transform = placement(piece.bounds(), &rotation, config);
    let oriented_outward = rotation.apply_vec(outward);

    tracing::info!(
        piece = piece.name(),
        yaw = winner.yaw_deg,
        tilt = winner.tilt_deg,
        peel = peel_applied,
        support_area = winner.score.support_area,
        "orientation selected"
    );

    OrientationChoice {
        yaw_deg: winner.yaw_deg,
        tilt_deg: winner.tilt_deg,
        peel_applied,
        transform,
        bounds,
        outward: oriented_outward,
        score: winner.score,
    }
}
