//! Numeric configuration for the preparation pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Every tunable threshold of the pipeline, with its default.
///
/// All dimensions are in print-scale mm. Overridable from a TOML
/// fragment via [`PrepConfig::from_toml_str`]; omitted fields keep
/// their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    // --- classification ---
    /// Features thinner than this (smallest bounding extent) are fragile.
    pub fragile_threshold: f64,
    /// Below this a fragile feature is flagged unresolvable (warning only).
    pub min_resolvable: f64,
    /// Overhang faces smaller than this area are cosmetic candidates.
    pub cosmetic_area_max: f64,
    /// Overhang projection depth below this is cosmetic regardless of area.
    pub cosmetic_depth_max: f64,
    /// normal.z below this marks a downward-facing overhang.
    pub overhang_dot_threshold: f64,
    /// |dot with outward| above this marks a wall (display/interior) face.
    /// 0.5 was too loose: brick step overhangs reach dot ~0.59.
    pub wall_dot_threshold: f64,
    /// Minimum sibling count for the regular-spacing cosmetic test.
    pub cosmetic_sibling_min: usize,
    /// Max coefficient of variation of sibling Z spacing to count as regular.
    pub cosmetic_spacing_cv_max: f64,
    /// A fragile feature at least this long (largest extent) is a bar.
    pub bar_min_length: f64,

    // --- orientation ---
    /// Lower end of the tilt sweep (degrees).
    pub tilt_min_deg: f64,
    /// Upper end of the tilt sweep (degrees).
    pub tilt_max_deg: f64,
    /// Tilt sweep step (degrees).
    pub tilt_step_deg: f64,
    /// Longitudinal peel tilt added to the winning candidate (degrees).
    pub peel_tilt_y_deg: f64,
    /// Diagonal peel tilt added to the winning candidate (degrees).
    pub peel_tilt_z_deg: f64,
    /// Conservative XY footprint allowance reserved for supports + raft
    /// before any are generated.
    pub support_margin_allowance: f64,
    /// Safety margin from the build-volume walls.
    pub fit_margin: f64,

    // --- splitting / registration ---
    /// Maximum split recursion depth (2 = at most quartering).
    pub split_recursion_limit: u32,
    /// Pin outer radius.
    pub pin_radius: f64,
    /// Pin length from the split face.
    pub pin_height: f64,
    /// Pin taper for press-fit (degrees).
    pub pin_draft_deg: f64,
    /// Radial clearance added to sockets.
    pub pin_clearance: f64,
    /// Spacing between pins along the split edge.
    pub pin_spacing: f64,
    /// Inset from the ends of the split edge.
    pub pin_edge_margin: f64,

    // --- supports ---
    /// Steepness (degrees from vertical) a cross-intersection overhang
    /// must exceed before a fragile bar may receive a contact.
    pub steepness_threshold_deg: f64,
    /// Grid cell size for clustering contact candidates.
    pub cluster_grid: f64,
    /// Shift applied to contacts toward the piece center.
    pub inward_nudge: f64,
    /// Clearance between a contact and an interior face edge.
    pub interior_edge_clear: f64,
    /// Clearance between a contact and a display-side face edge.
    pub display_edge_clear: f64,
    /// Faces narrower than this get a single interior-biased contact.
    pub narrow_face_threshold: f64,
    /// Span handled by one support; a region gets span/this supports,
    /// clamped to 1..=3.
    pub span_per_support: f64,
    /// Contacts snap to a structural junction within this radius.
    pub junction_snap_radius: f64,
    /// Support tip radius at the contact point.
    ///
    /// The source material gives two revisions of the taper table
    /// (0.25 vs 0.15 radius tips, i.e. 0.5 vs 0.3 diameter); this
    /// default follows the later 3-stage profile. Override per resin.
    pub tip_radius: f64,
    /// Reduced tip radius used within `display_safety_margin` of a
    /// display face.
    pub tip_radius_near_display: f64,
    /// Height of the tip cone.
    pub tip_height: f64,
    /// Support column radius.
    pub column_radius: f64,
    /// Base pad radius where a support meets the raft.
    pub base_pad_radius: f64,
    /// Base pad height.
    pub base_pad_height: f64,
    /// Distance from a display face below which the reduced tip is used.
    pub display_safety_margin: f64,
    /// Gap left between a model-resting support base and the surface
    /// it rests on.
    pub model_rest_gap: f64,
    /// How far the piece is raised off the raft.
    pub model_raise: f64,
    /// Pitch of the bottom support grid under the raised piece.
    pub bottom_support_spacing: f64,
    /// Undersides deeper than this get two rows of bottom supports.
    pub bottom_double_row_depth: f64,

    // --- raft ---
    /// Raft extension beyond the combined footprint.
    pub raft_margin: f64,
    /// Raft thickness.
    pub raft_thickness: f64,
    /// Chamfer on the plate-facing raft edges.
    pub raft_chamfer: f64,

    // --- kernel jobs ---
    /// Retries after the first failed boolean attempt.
    pub kernel_retries: u32,
    /// Timeout per boolean attempt (seconds).
    pub kernel_timeout_secs: f64,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            fragile_threshold: 0.6,
            min_resolvable: 0.2,
            cosmetic_area_max: 1.0,
            cosmetic_depth_max: 1.0,
            overhang_dot_threshold: -0.3,
            wall_dot_threshold: 0.7,
            cosmetic_sibling_min: 8,
            cosmetic_spacing_cv_max: 0.25,
            bar_min_length: 2.0,

            tilt_min_deg: 15.0,
            tilt_max_deg: 30.0,
            tilt_step_deg: 3.0,
            peel_tilt_y_deg: 5.0,
            peel_tilt_z_deg: 2.0,
            support_margin_allowance: 4.0,
            fit_margin: 2.0,

            split_recursion_limit: 2,
            pin_radius: 0.6,
            pin_height: 1.5,
            pin_draft_deg: 2.0,
            pin_clearance: 0.12,
            pin_spacing: 15.0,
            pin_edge_margin: 3.0,

            steepness_threshold_deg: 60.0,
            cluster_grid: 8.0,
            inward_nudge: 0.3,
            interior_edge_clear: 0.7,
            display_edge_clear: 1.9,
            narrow_face_threshold: 2.0,
            span_per_support: 12.0,
            junction_snap_radius: 3.0,
            tip_radius: 0.15,
            tip_radius_near_display: 0.1,
            tip_height: 1.0,
            column_radius: 0.4,
            base_pad_radius: 1.0,
            base_pad_height: 0.5,
            display_safety_margin: 2.0,
            model_rest_gap: 0.3,
            model_raise: 3.0,
            bottom_support_spacing: 5.0,
            bottom_double_row_depth: 3.0,

            raft_margin: 2.0,
            raft_thickness: 1.5,
            raft_chamfer: 0.4,

            kernel_retries: 2,
            kernel_timeout_secs: 30.0,
        }
    }
}

impl PrepConfig {
    /// Parse overrides from a TOML fragment; missing keys keep defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range or contradictory values.
    pub fn validate(&self) -> Result<()> {
        if self.min_resolvable >= self.fragile_threshold {
            return Err(ModelError::InvalidConfig(
                "min_resolvable must be below fragile_threshold".into(),
            ));
        }
        if self.tilt_min_deg <= 0.0 || self.tilt_max_deg < self.tilt_min_deg {
            return Err(ModelError::InvalidConfig(
                "tilt range must be positive and ordered".into(),
            ));
        }
        if self.tilt_step_deg <= 0.0 {
            return Err(ModelError::InvalidConfig("tilt_step_deg must be positive".into()));
        }
        if !(-1.0..=0.0).contains(&self.overhang_dot_threshold) {
            return Err(ModelError::InvalidConfig(
                "overhang_dot_threshold must be in [-1, 0]".into(),
            ));
        }
        if self.tip_radius > self.column_radius {
            return Err(ModelError::InvalidConfig(
                "tip_radius must not exceed column_radius".into(),
            ));
        }
        if self.tip_radius_near_display > self.tip_radius {
            return Err(ModelError::InvalidConfig(
                "tip_radius_near_display must not exceed tip_radius".into(),
            ));
        }
        if self.pin_clearance <= 0.0 {
            return Err(ModelError::InvalidConfig("pin_clearance must be positive".into()));
        }
        if self.pin_spacing <= 2.0 * self.pin_radius {
            return Err(ModelError::InvalidConfig(
                "pin_spacing must exceed the pin diameter".into(),
            ));
        }
        if self.raft_thickness <= 0.0 || self.raft_margin < 0.0 {
            return Err(ModelError::InvalidConfig(
                "raft dimensions must be positive".into(),
            ));
        }
        if self.model_raise <= 0.0 {
            return Err(ModelError::InvalidConfig("model_raise must be positive".into()));
        }
        if self.kernel_timeout_secs <= 0.0 {
            return Err(ModelError::InvalidConfig(
                "kernel_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Timeout per boolean attempt as a `Duration`.
    pub fn kernel_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.kernel_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        PrepConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toml_partial_override() {
        let config = PrepConfig::from_toml_str("tilt_min_deg = 18.0\ntip_radius = 0.25\n").unwrap();
        assert_eq!(config.tilt_min_deg, 18.0);
        assert_eq!(config.tip_radius, 0.25);
        // Untouched fields keep defaults.
        assert_eq!(config.pin_spacing, 15.0);
    }

    #[test]
    fn test_invalid_tilt_range() {
        let mut config = PrepConfig::default();
        config.tilt_max_deg = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tip_exceeding_column_rejected() {
        let mut config = PrepConfig::default();
        config.tip_radius = 1.0;
        assert!(config.validate().is_err());
    }
}
