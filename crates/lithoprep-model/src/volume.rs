//! Printer build-volume profiles.

use lithoprep_math::Vec3;
use serde::{Deserialize, Serialize};

/// The printable bounding region of one printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildVolume {
    /// Printer name.
    pub name: String,
    /// X limit (mm).
    pub x: f64,
    /// Y limit (mm).
    pub y: f64,
    /// Z limit (mm).
    pub z: f64,
}

impl BuildVolume {
    /// A custom profile not in the static table.
    pub fn custom(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z,
        }
    }

    /// Limits as a vector.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Known printers. Looked up by id, immutable.
const PRINTERS: &[(&str, f64, f64, f64)] = &[
    ("m7_pro", 218.0, 123.0, 260.0),
    ("m7_max", 298.0, 164.0, 300.0),
];

/// Look up a printer profile by id.
pub fn lookup_printer(name: &str) -> Option<BuildVolume> {
    PRINTERS
        .iter()
        .find(|(id, _, _, _)| *id == name)
        .map(|&(id, x, y, z)| BuildVolume::custom(id, x, y, z))
}
