//! Thin-bar (mullion) detection and cross-intersection points.

use lithoprep_math::{Aabb, Axis, Point3};
use lithoprep_model::{Face, FaceCategory, PrepConfig};

/// A fragile feature elongated along one axis and thin in the other two.
#[derive(Debug, Clone)]
pub struct BarFeature {
    /// Index of the face the bar was detected from.
    pub face: usize,
    /// Bounds of the bar face.
    pub bounds: Aabb,
    /// The elongated axis.
    pub long_axis: Axis,
}

/// Where two orthogonal bars meet: the only fragile location eligible
/// for a support contact.
///
/// Carries the steepest bar-face normal so overhang steepness can be
/// evaluated after the piece is rotated into print orientation, where
/// faces re-enumerate under new indices.
#[derive(Debug, Clone)]
pub struct CrossPoint {
    /// Center of the bars' bounding-box intersection.
    pub point: Point3,
    /// Face indices of the two intersecting bars (in this frame).
    pub bars: (usize, usize),
    /// The most-downward normal among the bar faces meeting here.
    pub normal: lithoprep_math::Vec3,
}

/// Detect bars among fragile faces and record their crossings.
pub fn detect_bars(
    faces: &[Face],
    categories: &[Option<FaceCategory>],
    config: &PrepConfig,
) -> (Vec<BarFeature>, Vec<CrossPoint>) {
    let mut bars = Vec::new();
    for face in faces {
        if categories[face.index] != Some(FaceCategory::Fragile) {
            continue;
        }
        let dims = face.sorted_extents();
        // Thin in two axes, elongated in the third.
        if dims[1] < config.fragile_threshold && dims[2] >= config.bar_min_length {
            let extents = face.bounds.extents();
            let long_axis = if extents.x >= extents.y && extents.x >= extents.z {
                Axis::X
            } else if extents.y >= extents.z {
                Axis::Y
            } else {
                Axis::Z
            };
            bars.push(BarFeature {
                face: face.index,
                bounds: face.bounds,
                long_axis,
            });
        }
    }

    let mut crossings: Vec<CrossPoint> = Vec::new();
    for (i, a) in bars.iter().enumerate() {
        for b in bars.iter().skip(i + 1) {
            if a.long_axis == b.long_axis {
                continue;
            }
            let Some(overlap) = a.bounds.expanded(1e-6).intersection(&b.bounds.expanded(1e-6))
            else {
                continue;
            };
            let point = overlap.center();
            let na = faces[a.face].normal;
            let nb = faces[b.face].normal;
            let normal = if na.z <= nb.z { na } else { nb };
            // Faces of the same physical mullion pair produce the same
            // crossing; keep one record per location, remembering the
            // steepest underside normal seen there.
            if let Some(existing) = crossings
                .iter_mut()
                .find(|c| (c.point - point).norm() < config.cluster_grid / 2.0)
            {
                if normal.z < existing.normal.z {
                    existing.normal = normal;
                }
            } else {
                crossings.push(CrossPoint {
                    point,
                    bars: (a.face, b.face),
                    normal,
                });
            }
        }
    }

    (bars, crossings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithoprep_math::Vec3;

    fn bar_face(index: usize, min: Point3, max: Point3) -> Face {
        let bounds = Aabb::new(min, max);
        Face {
            index,
            centroid: bounds.center(),
            normal: Vec3::new(0.0, -1.0, 0.0),
            area: 1.0,
            bounds,
            min_edge: 0.25,
        }
    }

    #[test]
    fn test_orthogonal_bars_cross() {
        // Vertical bar (long in Z) and horizontal bar (long in X),
        // both 0.25 thick, crossing at (5, 0, 5).
        let faces = vec![
            bar_face(0, Point3::new(4.9, -0.125, 0.0), Point3::new(5.15, 0.125, 10.0)),
            bar_face(1, Point3::new(0.0, -0.125, 4.9), Point3::new(10.0, 0.125, 5.15)),
        ];
        let categories = vec![Some(FaceCategory::Fragile), Some(FaceCategory::Fragile)];
        let (bars, crossings) = detect_bars(&faces, &categories, &PrepConfig::default());
        assert_eq!(bars.len(), 2);
        assert_eq!(crossings.len(), 1);
        let p = crossings[0].point;
        assert!((p.x - 5.025).abs() < 0.01);
        assert!((p.z - 5.025).abs() < 0.01);
    }

    #[test]
    fn test_parallel_bars_do_not_cross() {
        let faces = vec![
            bar_face(0, Point3::new(2.0, -0.125, 0.0), Point3::new(2.25, 0.125, 10.0)),
            bar_face(1, Point3::new(2.1, -0.125, 0.0), Point3::new(2.35, 0.125, 10.0)),
        ];
        let categories = vec![Some(FaceCategory::Fragile), Some(FaceCategory::Fragile)];
        let (bars, crossings) = detect_bars(&faces, &categories, &PrepConfig::default());
        assert_eq!(bars.len(), 2);
        assert!(crossings.is_empty());
    }

    #[test]
    fn test_short_fragile_face_is_not_a_bar() {
        let faces = vec![bar_face(
            0,
            Point3::new(0.0, -0.125, 0.0),
            Point3::new(0.5, 0.125, 0.5),
        )];
        let categories = vec![Some(FaceCategory::Fragile)];
        let (bars, _) = detect_bars(&faces, &categories, &PrepConfig::default());
        assert!(bars.is_empty());
    }
}
