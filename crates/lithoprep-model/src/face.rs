//! Derived per-face records.

use lithoprep_kernel::FaceData;
use lithoprep_math::{Aabb, Point3, Vec3};

/// A single face of a piece, as derived from the kernel's enumeration.
///
/// Immutable once computed; a transformed piece re-enumerates its faces
/// from the kernel rather than patching these records.
#[derive(Debug, Clone)]
pub struct Face {
    /// Index within the owning piece's face list.
    pub index: usize,
    /// Face centroid.
    pub centroid: Point3,
    /// Unit outward normal (may be degenerate on malformed faces).
    pub normal: Vec3,
    /// Surface area.
    pub area: f64,
    /// Axis-aligned bounds in the piece's current frame.
    pub bounds: Aabb,
    /// Shortest boundary edge length.
    pub min_edge: f64,
}

impl Face {
    /// Build a face record from kernel data.
    pub fn from_data(index: usize, data: FaceData) -> Self {
        Self {
            index,
            centroid: data.centroid,
            normal: data.normal,
            area: data.area,
            bounds: data.bounds,
            min_edge: data.min_edge,
        }
    }

    /// The three bounding extents in ascending order.
    pub fn sorted_extents(&self) -> [f64; 3] {
        self.bounds.sorted_extents()
    }

    /// Smallest bounding extent of the feature this face belongs to —
    /// the fragility proxy.
    ///
    /// A planar axis-aligned face collapses one bounding extent to
    /// ~zero; that collapse is the face's own flatness, not feature
    /// thinness, and is skipped.
    pub fn feature_extent(&self) -> f64 {
        let dims = self.sorted_extents();
        if dims[0] < Self::PLANAR_EPS {
            dims[1]
        } else {
            dims[0]
        }
    }

    /// Second-smallest bounding extent — how far an overhang face
    /// protrudes unsupported.
    pub fn projection_depth(&self) -> f64 {
        self.sorted_extents()[1]
    }

    /// Below this an extent is treated as the planar collapse of the
    /// face itself.
    pub const PLANAR_EPS: f64 = 0.05;

    /// Z of the lowest point of the face.
    pub fn low_z(&self) -> f64 {
        self.bounds.min.z
    }

    /// Degenerate normal or vanishing area; excluded from classification.
    pub fn is_malformed(&self) -> bool {
        self.area <= 1e-9 || (self.normal.norm() - 1.0).abs() > 1e-3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_face() -> Face {
        Face {
            index: 0,
            centroid: Point3::new(1.0, 0.5, 2.0),
            normal: Vec3::new(0.0, 0.0, -1.0),
            area: 2.0,
            bounds: Aabb::new(Point3::new(0.0, 0.0, 2.0), Point3::new(4.0, 0.3, 3.0)),
            min_edge: 0.3,
        }
    }

    #[test]
    fn test_extent_proxies() {
        let f = sample_face();
        assert_relative_eq!(f.feature_extent(), 0.3);
        assert_relative_eq!(f.projection_depth(), 1.0);
    }

    #[test]
    fn test_planar_collapse_skipped() {
        // A flat 10x10 wall face: the 0.001 extent is flatness, not
        // feature thinness.
        let f = Face {
            index: 0,
            centroid: Point3::new(5.0, 0.0, 5.0),
            normal: Vec3::new(0.0, -1.0, 0.0),
            area: 100.0,
            bounds: Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.001, 10.0)),
            min_edge: 10.0,
        };
        assert_relative_eq!(f.feature_extent(), 10.0);
    }

    #[test]
    fn test_malformed_detection() {
        let mut f = sample_face();
        assert!(!f.is_malformed());
        f.normal = Vec3::new(0.0, 0.0, 0.0);
        assert!(f.is_malformed());
        let mut g = sample_face();
        g.area = 0.0;
        assert!(g.is_malformed());
    }
}
