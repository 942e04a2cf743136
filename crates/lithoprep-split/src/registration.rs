//! Pin/socket registration features for split pieces.
//!
//! Pins and sockets are computed from the *same* plane and the *same*
//! sampled offsets, so mutual alignment is a consequence of shared
//! input rather than a post-hoc search: `socket.center == pin.center`
//! and `socket.base_radius == pin.base_radius + clearance`, exactly.

use std::sync::Arc;

use lithoprep_kernel::{run_with_retries, SolidKernel, SolidSpec};
use lithoprep_math::{Aabb, Plane, Point3, Vec3};
use lithoprep_model::{Piece, PrepConfig};

use crate::error::Result;
use crate::planner::JointKind;

/// A tapered registration pin protruding from the negative half.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    /// Center of the pin base, on the split plane.
    pub center: Point3,
    /// Unit direction into the mating piece.
    pub direction: Vec3,
    /// Radius at the base.
    pub base_radius: f64,
    /// Radius at the tip (base minus draft taper).
    pub tip_radius: f64,
    /// Pin length.
    pub height: f64,
}

impl Pin {
    /// The solid to fuse onto the negative half.
    pub fn to_spec(&self) -> SolidSpec {
        SolidSpec::Cone {
            base: self.center,
            axis: self.direction,
            base_radius: self.base_radius,
            top_radius: self.tip_radius,
            height: self.height,
        }
    }
}

/// The matching cavity cut into the positive half.
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    /// Center of the socket opening; identical to the pin center.
    pub center: Point3,
    /// Unit direction into the body, identical to the pin direction.
    pub direction: Vec3,
    /// Pin base radius plus radial clearance.
    pub base_radius: f64,
    /// Pin tip radius plus radial clearance.
    pub tip_radius: f64,
    /// Pin height plus bottoming clearance.
    pub depth: f64,
}

impl Socket {
    /// The solid to subtract from the positive half.
    pub fn to_spec(&self) -> SolidSpec {
        SolidSpec::Cone {
            base: self.center,
            axis: self.direction,
            base_radius: self.base_radius,
            top_radius: self.tip_radius,
            height: self.depth,
        }
    }

    /// Smallest enclosing region of the cavity, used to bound the cut.
    pub fn region(&self) -> Aabb {
        let tip = self.center + self.direction * self.depth;
        Aabb::from_points([self.center, tip]).expanded(self.base_radius + 0.1)
    }
}

/// One pin and its socket, derived from one sampled plane offset.
#[derive(Debug, Clone, PartialEq)]
pub struct PinSocketPair {
    /// The pin, fused onto the negative half.
    pub pin: Pin,
    /// The socket, cut from the positive half.
    pub socket: Socket,
}

impl PinSocketPair {
    /// Build the pair from one sample point. Alignment holds by
    /// construction: both solids share `center` and `direction`.
    pub fn at(center: Point3, direction: Vec3, config: &PrepConfig) -> Self {
        let draft = config.pin_draft_deg.to_radians();
        let tip_radius = (config.pin_radius - config.pin_height * draft.tan()).max(0.1);
        let pin = Pin {
            center,
            direction,
            base_radius: config.pin_radius,
            tip_radius,
            height: config.pin_height,
        };
        let socket = Socket {
            center,
            direction,
            base_radius: config.pin_radius + config.pin_clearance,
            tip_radius: tip_radius + config.pin_clearance,
            depth: config.pin_height + config.pin_clearance,
        };
        Self { pin, socket }
    }
}

/// Sample pin positions on the shared split face and derive the pairs.
///
/// Walks the split face at the configured spacing along its longer
/// in-plane direction, inset by the edge margin, centered on the
/// shorter direction. L-joints get no pairs: the overlapping corner
/// volume already provides two-axis alignment.
pub fn plan_registration(
    neg: &Piece,
    plane: &Plane,
    joint: JointKind,
    config: &PrepConfig,
) -> Vec<PinSocketPair> {
    if joint == JointKind::Corner {
        tracing::info!(piece = neg.name(), "corner joint; skipping pins");
        return Vec::new();
    }

    let (u, v) = plane.basis();

    // Project the corners of every face lying on the split plane to
    // find the shared face's in-plane extent.
    let mut u_min = f64::INFINITY;
    let mut u_max = f64::NEG_INFINITY;
    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    let mut found = false;
    for face in neg.faces() {
        if plane.signed_distance(&face.centroid).abs() > 0.1 {
            continue;
        }
        if face.normal.dot(plane.normal.as_ref()).abs() < 0.95 {
            continue;
        }
        found = true;
        for corner in face.bounds.corners() {
            let d = corner - plane.origin;
            let cu = d.dot(&u);
            let cv = d.dot(&v);
            u_min = u_min.min(cu);
            u_max = u_max.max(cu);
            v_min = v_min.min(cv);
            v_max = v_max.max(cv);
        }
    }
    if !found {
        tracing::warn!(piece = neg.name(), "no split face found for pin placement");
        return Vec::new();
    }

    let (long_dir, long_min, long_max, short_mid) = if u_max - u_min >= v_max - v_min {
        (u, u_min, u_max, (v_min + v_max) / 2.0)
    } else {
        (v, v_min, v_max, (u_min + u_max) / 2.0)
    };
    let short_dir = if u_max - u_min >= v_max - v_min { v } else { u };

    let span = (long_max - long_min) - 2.0 * config.pin_edge_margin;
    if span <= 0.0 {
        tracing::warn!(piece = neg.name(), "split face too short for pins");
        return Vec::new();
    }

    let count = ((span / config.pin_spacing) as usize + 1).max(2);
    let step = span / (count - 1) as f64;
    let direction = *plane.normal.as_ref();

    (0..count)
        .map(|i| {
            let along = long_min + config.pin_edge_margin + i as f64 * step;
            let center = plane.origin + long_dir * along + short_dir * short_mid;
            PinSocketPair::at(center, direction, config)
        })
        .collect()
}

/// Fuse pins onto the negative half and cut sockets from the positive
/// half, then rebuild both piece records.
///
/// Pin attachment is a non-destructive union; only the socket cavity
/// needs a true subtraction, and that cut is bounded to the cavity's
/// enclosing sub-region.
pub fn apply_registration(
    kernel: &Arc<dyn SolidKernel>,
    neg: Piece,
    pos: Piece,
    pairs: &[PinSocketPair],
    config: &PrepConfig,
) -> Result<(Piece, Piece)> {
    if pairs.is_empty() {
        return Ok((neg, pos));
    }

    let mut neg_handle = neg.handle();
    for pair in pairs {
        let tool = kernel.create(&pair.pin.to_spec())?;
        let target = neg_handle;
        let job_kernel = kernel.clone();
        let fused = run_with_retries(
            "fuse-pin",
            config.kernel_retries,
            config.kernel_timeout(),
            move |_| job_kernel.fuse(target, tool),
        )?;
        if fused != neg_handle && neg_handle != neg.handle() {
            kernel.retire(neg_handle);
        }
        kernel.retire(tool);
        neg_handle = fused;
    }

    let mut pos_handle = pos.handle();
    for pair in pairs {
        let tool = kernel.create(&pair.socket.to_spec())?;
        let region = pair.socket.region();
        let target = pos_handle;
        let job_kernel = kernel.clone();
        let cut = run_with_retries(
            "cut-socket",
            config.kernel_retries,
            config.kernel_timeout(),
            move |_| job_kernel.cut(target, tool, Some(&region)),
        )?;
        if cut != pos_handle && pos_handle != pos.handle() {
            kernel.retire(pos_handle);
        }
        kernel.retire(tool);
        pos_handle = cut;
    }

    tracing::info!(pairs = pairs.len(), "registration features applied");
    let neg = neg.rebuilt(kernel, neg_handle)?;
    let pos = pos.rebuilt(kernel, pos_handle)?;
    Ok((neg, pos))
}
