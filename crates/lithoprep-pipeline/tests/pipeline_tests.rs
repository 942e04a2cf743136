//! End-to-end pipeline tests on synthetic kernel geometry.

use std::sync::Arc;

use lithoprep_kernel::SolidKernel;
use lithoprep_model::{lookup_printer, FaceCategory, Piece, PrepConfig};
use lithoprep_pipeline::{PrepError, PrintPipeline};
use lithoprep_testkit::builders::{
    brick_wall_with_lintels, mullion_window_wall, plain_wall, segmented_wall, wall_labels,
};
use lithoprep_testkit::PanelKernel;

fn pipeline(kernel: &Arc<PanelKernel>, printer: &str) -> PrintPipeline {
    let dyn_kernel: Arc<dyn SolidKernel> = kernel.clone();
    PrintPipeline::new(
        dyn_kernel,
        lookup_printer(printer).unwrap(),
        PrepConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_plain_wall_end_to_end() {
    let kernel = Arc::new(PanelKernel::new());
    let id = plain_wall(&kernel, 100.0, 1.2, 60.0);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();

    assert_eq!(output.pieces.len(), 1);
    assert!(output.report.splits.is_empty());
    let result = &output.pieces[0];
    assert!(!result.supports.is_empty());
    // Every support terminates on the raft top or on the model,
    // reachable from it; none float.
    for support in &result.supports {
        if support.on_raft() {
            assert!((support.base_z - result.raft.top_z()).abs() < 1e-9);
        } else {
            assert!(support.base_z > result.raft.top_z());
        }
        assert!(support.contact.z > support.base_z);
    }
    // The oriented piece is raised off the raft.
    let config = PrepConfig::default();
    assert!((result.piece.bounds().min.z - config.model_raise).abs() < 1e-6);
    // Ownership: the only live kernel solid is the finalized piece.
    assert_eq!(kernel.live_solids(), 1);
}

#[test]
fn test_contacts_stay_on_interior_half() {
    let kernel = Arc::new(PanelKernel::new());
    let id = plain_wall(&kernel, 100.0, 1.2, 60.0);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();
    let result = &output.pieces[0];

    // No tilt-direction warnings, and every contact projects onto the
    // interior half of the outward axis: a vertical support column's
    // worst projection is at its contact, so no support crosses in
    // front of the display surface.
    for report in &output.report.pieces {
        assert!(report.warnings.iter().all(|w| !w.contains("display side")));
    }
    let n = result.orientation.outward.normalize();
    let projections: Vec<f64> = result
        .piece
        .bounds()
        .corners()
        .iter()
        .map(|c| c.coords.dot(&n))
        .collect();
    let hi = projections.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let lo = projections.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let mid = (hi + lo) / 2.0;
    for support in &result.supports {
        assert!(support.contact.coords.dot(&n) <= mid + 1e-6);
    }
}

#[test]
fn test_oversized_wall_splits_on_small_printer() {
    let kernel = Arc::new(PanelKernel::new());
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();

    // The 240x160 piece cannot fit the 218x123 volume at any tilt and
    // must split; both children prepare successfully.
    assert_eq!(output.report.splits.len(), 1);
    assert_eq!(output.pieces.len(), 2);
    assert!(output.report.failures.is_empty());
    let split = &output.report.splits[0];
    assert_eq!(split.axis, "X");
    assert!(split.registration_pairs > 0);
    // Pairs ride with the pieces of the split.
    let total_pairs: usize = output.pieces.iter().map(|p| p.registration.len()).sum();
    assert_eq!(total_pairs, 2 * split.registration_pairs);
    // Two finalized pieces own the only two live solids.
    assert_eq!(kernel.live_solids(), 2);
}

#[test]
fn test_same_wall_fits_larger_printer_unsplit() {
    let kernel = Arc::new(PanelKernel::new());
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let output = pipeline(&kernel, "m7_max").run(piece, &labels).unwrap();

    assert!(output.report.splits.is_empty());
    assert_eq!(output.pieces.len(), 1);
    let report = &output.report.pieces[0];
    let config = PrepConfig::default();
    assert!(report.tilt_deg >= config.tilt_min_deg);
    assert!(report.tilt_deg <= config.tilt_max_deg);
}

#[test]
fn test_pin_socket_alignment_in_output() {
    let kernel = Arc::new(PanelKernel::new());
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();
    let config = PrepConfig::default();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();

    let mut saw_pairs = false;
    for result in &output.pieces {
        for pair in &result.registration {
            saw_pairs = true;
            // Exact by construction, no floating measurement gap.
            assert_eq!(pair.socket.center, pair.pin.center);
            assert_eq!(pair.socket.base_radius, pair.pin.base_radius + config.pin_clearance);
            assert_eq!(pair.socket.depth, pair.pin.height + config.pin_clearance);
        }
    }
    assert!(saw_pairs);
}

#[test]
fn test_unsplittable_oversize_is_infeasible() {
    let kernel = Arc::new(PanelKernel::new());
    // A plain wall has no pattern breaks and no floor-break labels:
    // nothing to split along, so the run fails as infeasible for this
    // printer rather than silently shrinking scope.
    let id = plain_wall(&kernel, 240.0, 1.2, 160.0);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let result = pipeline(&kernel, "m7_pro").run(piece, &labels);
    assert!(matches!(result, Err(PrepError::InfeasibleFit { .. })));
}

#[test]
fn test_brick_course_classification_scenario() {
    let kernel = PanelKernel::new();
    let id = brick_wall_with_lintels(&kernel, 100.0, 1.2, 160.0, 500);
    let piece = Piece::from_kernel(&kernel, id, "wall").unwrap();
    let labels = wall_labels();
    let config = PrepConfig::default();

    let cls = lithoprep_classify::classify(piece.faces(), &labels, &config).unwrap();

    // 500 brick-course faces (area 0.8, depth 0.3) are cosmetic; the 2
    // lintel faces (area 3.0, depth 4.5) are structural.
    assert_eq!(cls.count(FaceCategory::CosmeticOverhang), 500);
    let face_count = piece.faces().len();
    assert_eq!(cls.category(face_count - 1), Some(FaceCategory::StructuralOverhang));
    assert_eq!(cls.category(face_count - 2), Some(FaceCategory::StructuralOverhang));

    // Depth dominance: a face with projection depth under the
    // threshold is never a structural overhang, whatever its area.
    for face in piece.faces() {
        if face.projection_depth() < config.cosmetic_depth_max {
            assert_ne!(cls.category(face.index), Some(FaceCategory::StructuralOverhang));
        }
    }
}

#[test]
fn test_mullion_supports_only_at_crossing() {
    let kernel = Arc::new(PanelKernel::new());
    let (id, labels) = mullion_window_wall(&kernel);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "window-wall").unwrap();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();
    let result = &output.pieces[0];
    let xform = &result.orientation.transform;

    // The semantic-frame bar boxes and their crossing, mapped into the
    // oriented frame.
    let vertical_bar = lithoprep_math::Aabb::new(
        lithoprep_math::Point3::new(49.9, 0.5, 10.0),
        lithoprep_math::Point3::new(50.15, 0.75, 30.0),
    );
    let horizontal_bar = lithoprep_math::Aabb::new(
        lithoprep_math::Point3::new(40.0, 0.5, 19.9),
        lithoprep_math::Point3::new(60.0, 0.75, 20.15),
    );
    let crossing = xform.apply_point(&lithoprep_math::Point3::new(50.025, 0.625, 20.025));
    let bar_bounds = [
        xform.apply_aabb(&vertical_bar).expanded(0.5),
        xform.apply_aabb(&horizontal_bar).expanded(0.5),
    ];

    // The crossing is steep at an 15-30 degree print tilt (the bar
    // underside is ~75 degrees from vertical), so it gets exactly its
    // one permitted support.
    let crossing_supports: Vec<_> = result
        .supports
        .iter()
        .filter(|s| (s.contact - crossing).norm() < 3.0)
        .collect();
    assert_eq!(crossing_supports.len(), 1);

    // No other support touches the mullion bars anywhere.
    for support in &result.supports {
        if (support.contact - crossing).norm() < 3.0 {
            continue;
        }
        for bounds in &bar_bounds {
            assert!(
                !bounds.contains_point(&support.contact),
                "support at {:?} touches a mullion bar",
                support.contact
            );
        }
    }
}

#[test]
fn test_report_serializes() {
    let kernel = Arc::new(PanelKernel::new());
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();

    let output = pipeline(&kernel, "m7_pro").run(piece, &labels).unwrap();
    let json = output.report.to_json().unwrap();
    assert!(json.contains("\"printer\": \"m7_pro\""));
    assert!(json.contains("\"splits\""));
    assert!(json.contains("PatternBreak"));
}

#[test]
fn test_missing_outward_is_configuration_error() {
    let kernel = Arc::new(PanelKernel::new());
    let id = plain_wall(&kernel, 100.0, 1.2, 60.0);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();

    let result = pipeline(&kernel, "m7_pro").run(piece, &lithoprep_model::LabelMap::new());
    assert!(matches!(result, Err(PrepError::Configuration(_))));
}
