//! Parametric support and raft solids.
//!
//! Supports and rafts are generated as parametric descriptions and
//! realized by the kernel on demand; no boolean is needed to build
//! them. The data model admits no free-standing support: every support
//! terminates on the raft top or on a model surface reachable from it.

use lithoprep_kernel::SolidSpec;
use lithoprep_math::{Aabb, Point3, Vec3};

/// Where a support's base terminates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SupportBase {
    /// On the raft top, through a base pad.
    Raft {
        /// Pad radius.
        pad_radius: f64,
        /// Pad height.
        pad_height: f64,
    },
    /// On an intervening model surface (collision-resolved); no pad.
    Model,
}

/// One tapered support column.
#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    /// Contact point on the model.
    pub contact: Point3,
    /// Tip radius at the contact.
    pub tip_radius: f64,
    /// Height of the tip cone.
    pub tip_height: f64,
    /// Column radius.
    pub column_radius: f64,
    /// Z of the support base (raft top or resting surface).
    pub base_z: f64,
    /// Terminal attachment.
    pub base: SupportBase,
}

impl Support {
    /// True when the support stands on the raft.
    pub fn on_raft(&self) -> bool {
        matches!(self.base, SupportBase::Raft { .. })
    }

    /// The solids realizing this support, bottom to top.
    pub fn to_specs(&self) -> Vec<SolidSpec> {
        let up = Vec3::z();
        let mut specs = Vec::with_capacity(3);
        let mut column_bottom = self.base_z;

        if let SupportBase::Raft {
            pad_radius,
            pad_height,
        } = self.base
        {
            specs.push(SolidSpec::Cylinder {
                base: Point3::new(self.contact.x, self.contact.y, self.base_z),
                axis: up,
                radius: pad_radius,
                height: pad_height,
            });
            column_bottom += pad_height;
        }

        let column_top = (self.contact.z - self.tip_height).max(column_bottom);
        if column_top > column_bottom {
            specs.push(SolidSpec::Cylinder {
                base: Point3::new(self.contact.x, self.contact.y, column_bottom),
                axis: up,
                radius: self.column_radius,
                height: column_top - column_bottom,
            });
        }

        specs.push(SolidSpec::Cone {
            base: Point3::new(self.contact.x, self.contact.y, column_top),
            axis: up,
            base_radius: self.column_radius,
            top_radius: self.tip_radius,
            height: self.contact.z - column_top,
        });

        specs
    }
}

/// The sacrificial raft every raft-based support terminates on.
#[derive(Debug, Clone, PartialEq)]
pub struct Raft {
    /// Footprint and vertical extent: Z runs from `-thickness` to 0.
    pub footprint: Aabb,
    /// Thickness.
    pub thickness: f64,
    /// Chamfer on the plate-facing edges.
    pub chamfer: f64,
}

impl Raft {
    /// Z of the raft's top surface (the support datum).
    pub fn top_z(&self) -> f64 {
        0.0
    }

    /// The solid realizing this raft.
    pub fn to_spec(&self) -> SolidSpec {
        SolidSpec::ChamferedSlab {
            min: self.footprint.min,
            size: self.footprint.extents(),
            chamfer: self.chamfer,
        }
    }
}
