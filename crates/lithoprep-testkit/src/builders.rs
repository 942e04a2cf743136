//! Synthetic wall fixtures.
//!
//! Builders for the geometry the integration tests exercise: plain and
//! segmented walls, a brick-course wall with lintels, and a window wall
//! with crossing mullion bars.

use lithoprep_kernel::{FaceData, SolidId};
use lithoprep_math::{Aabb, Point3, Vec3};
use lithoprep_model::LabelMap;

use crate::{Compound, PanelKernel};

/// A label map for a wall whose display surface faces -Y.
pub fn wall_labels() -> LabelMap {
    LabelMap::new().with_outward(Vec3::new(0.0, -1.0, 0.0))
}

/// A single-panel wall with its minimum corner at the origin.
pub fn plain_wall(kernel: &PanelKernel, length: f64, thickness: f64, height: f64) -> SolidId {
    kernel.insert(Compound::from_panel(Aabb::new(
        Point3::origin(),
        Point3::new(length, thickness, height),
    )))
}

/// A wall built from equal-length segments; the segment boundaries are
/// the pattern breaks the split planner finds.
pub fn segmented_wall(
    kernel: &PanelKernel,
    length: f64,
    thickness: f64,
    height: f64,
    segments: usize,
) -> SolidId {
    let step = length / segments as f64;
    let mut compound = Compound::default();
    for i in 0..segments {
        let x0 = i as f64 * step;
        compound.panels.push(Aabb::new(
            Point3::new(x0, 0.0, 0.0),
            Point3::new(x0 + step, thickness, height),
        ));
    }
    kernel.insert(compound)
}

/// A downward-facing detail face (brick-course step, lintel underside).
fn down_face(bounds: Aabb, area: f64, min_edge: f64) -> FaceData {
    FaceData {
        centroid: bounds.center(),
        normal: Vec3::new(0.0, 0.0, -1.0),
        area,
        bounds,
        min_edge,
    }
}

/// A wall textured with `courses` regularly spaced brick-course
/// overhang faces (area 0.8, depth 0.3) and two lintel faces
/// (area 3.0, projection depth 4.5).
pub fn brick_wall_with_lintels(
    kernel: &PanelKernel,
    length: f64,
    thickness: f64,
    height: f64,
    courses: usize,
) -> SolidId {
    let mut compound = Compound::from_panel(Aabb::new(
        Point3::origin(),
        Point3::new(length, thickness, height),
    ));

    let spacing = (height - 4.0) / courses as f64;
    let x0 = length / 2.0 - 1.335;
    for i in 0..courses {
        let z = 2.0 + i as f64 * spacing;
        compound.details.push(down_face(
            Aabb::new(Point3::new(x0, 0.0, z), Point3::new(x0 + 2.67, 0.3, z)),
            0.8,
            0.3,
        ));
    }

    for x in [length * 0.25, length * 0.65] {
        let z = height * 0.6;
        compound.details.push(down_face(
            Aabb::new(Point3::new(x, 0.0, z), Point3::new(x + 6.0, 4.5, z)),
            3.0,
            0.7,
        ));
    }

    kernel.insert(compound)
}

/// A window wall with two crossing 0.25-unit mullion bars, plus the
/// label map marking the opening as fragile.
pub fn mullion_window_wall(kernel: &PanelKernel) -> (SolidId, LabelMap) {
    let thickness = 1.2;
    let mut compound = Compound::default();
    // Wall panels around a 20x20 window opening at x 40..60, z 10..30.
    compound.panels.push(Aabb::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(40.0, thickness, 40.0),
    ));
    compound.panels.push(Aabb::new(
        Point3::new(60.0, 0.0, 0.0),
        Point3::new(100.0, thickness, 40.0),
    ));
    compound.panels.push(Aabb::new(
        Point3::new(40.0, 0.0, 30.0),
        Point3::new(60.0, thickness, 40.0),
    ));
    compound.panels.push(Aabb::new(
        Point3::new(40.0, 0.0, 0.0),
        Point3::new(60.0, thickness, 10.0),
    ));
    // Vertical mullion bar, 0.25 square section, biased slightly
    // toward the interior side of the wall midplane.
    compound.panels.push(Aabb::new(
        Point3::new(49.9, 0.5, 10.0),
        Point3::new(50.15, 0.75, 30.0),
    ));
    // Horizontal mullion bar.
    compound.panels.push(Aabb::new(
        Point3::new(40.0, 0.5, 19.9),
        Point3::new(60.0, 0.75, 20.15),
    ));

    let labels = wall_labels().with_fragile_opening(Aabb::new(
        Point3::new(40.0, -1.0, 10.0),
        Point3::new(60.0, 2.2, 30.0),
    ));

    (kernel.insert(compound), labels)
}

/// An oversized L-shaped corner: a long front wall running along X and
/// a deep side wall running along Y, overlapping at the corner. Too
/// large for the small printer, so it must split.
pub fn corner_walls(kernel: &PanelKernel) -> SolidId {
    let thickness = 1.2;
    let mut compound = Compound::default();
    // Front wall along X.
    compound.panels.push(Aabb::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(240.0, thickness, 160.0),
    ));
    // Side wall along Y, sharing the corner at x ~ 0.
    compound.panels.push(Aabb::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(thickness, 160.0, 160.0),
    ));
    kernel.insert(compound)
}
