//! Face categories assigned by the surface classifier.

use serde::{Deserialize, Serialize};

/// Exactly one category per well-formed face.
///
/// `Display` and support-requiring overhang are mutually exclusive by
/// construction: a face that classifies as `Display` can never also be
/// `StructuralOverhang`, so no support contact can ever target it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceCategory {
    /// Outward-facing cosmetic surface. Never touched by supports.
    Display,
    /// Inward-facing surface; the preferred support side.
    Interior,
    /// Load-bearing geometry with no special handling.
    Structural,
    /// Feature thin enough that contact risks breakage.
    Fragile,
    /// Downward-facing detail that prints acceptably without support.
    CosmeticOverhang,
    /// Downward-facing span that requires support.
    StructuralOverhang,
}

impl FaceCategory {
    /// Short lowercase name for reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Interior => "interior",
            Self::Structural => "structural",
            Self::Fragile => "fragile",
            Self::CosmeticOverhang => "cosmetic_overhang",
            Self::StructuralOverhang => "structural_overhang",
        }
    }

    /// True for the two overhang categories.
    pub fn is_overhang(self) -> bool {
        matches!(self, Self::CosmeticOverhang | Self::StructuralOverhang)
    }
}

impl std::fmt::Display for FaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
