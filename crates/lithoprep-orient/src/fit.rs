//! Build-volume fit checking.

use lithoprep_math::{Aabb, Vec3};
use lithoprep_model::{BuildVolume, PrepConfig};

/// Result of testing a candidate placement against a build volume.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// True when the worst-case print fits.
    pub fits: bool,
    /// Worst-case size actually required (model + supports + raft).
    pub required: Vec3,
    /// Overflow per axis; positive components mean "does not fit".
    pub overflow: Vec3,
}

impl FitReport {
    /// Largest positive overflow component, 0.0 when fitting.
    pub fn worst_overflow(&self) -> f64 {
        self.overflow
            .iter()
            .fold(0.0_f64, |acc, &o| acc.max(o))
    }
}

/// Test placed bounds against a printer's build volume.
///
/// `bounds` is the piece after placement: min corner at the origin in
/// XY and raised to `model_raise` in Z. Supports and raft do not exist
/// yet, so a conservative fixed allowance is reserved for them in XY
/// and the raft thickness in Z.
pub fn check_fit(bounds: &Aabb, volume: &BuildVolume, config: &PrepConfig) -> FitReport {
    let ext = bounds.extents();
    let required = Vec3::new(
        ext.x + config.support_margin_allowance,
        ext.y + config.support_margin_allowance,
        bounds.max.z + config.raft_thickness,
    );
    let available = Vec3::new(
        volume.x - 2.0 * config.fit_margin,
        volume.y - 2.0 * config.fit_margin,
        volume.z - 2.0 * config.fit_margin,
    );
    let overflow = required - available;
    let fits = overflow.iter().all(|&o| o <= 0.0);
    FitReport {
        fits,
        required,
        overflow,
    }
}
