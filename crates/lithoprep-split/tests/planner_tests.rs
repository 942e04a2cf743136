//! Split-planner integration tests on synthetic kernel geometry.

use std::sync::Arc;

use lithoprep_classify::classify;
use lithoprep_model::{lookup_printer, Piece, PrepConfig};
use lithoprep_split::{execute_split, plan_registration, plan_split, JointKind};
use lithoprep_testkit::builders::{corner_walls, plain_wall, segmented_wall, wall_labels};
use lithoprep_testkit::PanelKernel;

#[test]
fn test_fitting_piece_needs_no_split() {
    let kernel = PanelKernel::new();
    let id = plain_wall(&kernel, 100.0, 1.2, 60.0);
    let piece = Piece::from_kernel(&kernel, id, "wall").unwrap();
    let labels = wall_labels();
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let plans = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    assert!(plans.is_empty());

    // Idempotence: asking again gives the same answer.
    let again = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_oversized_wall_gets_split_plan() {
    let kernel = PanelKernel::new();
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(&kernel, id, "wall").unwrap();
    let labels = wall_labels();
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let plans = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    assert!(!plans.is_empty());
    let best = &plans[0];
    // Splitting across the long axis, somewhere in the central band.
    assert_eq!(best.axis, lithoprep_math::Axis::X);
    assert!(best.position > 48.0 && best.position < 192.0);
    assert_eq!(best.joint, JointKind::Butt);
    // Both predicted children are real pieces.
    assert!(best.child_bounds.0.extents().x > 10.0);
    assert!(best.child_bounds.1.extents().x > 10.0);
}

#[test]
fn test_floor_break_label_is_a_candidate() {
    let kernel = PanelKernel::new();
    let id = plain_wall(&kernel, 240.0, 1.2, 160.0);
    let piece = Piece::from_kernel(&kernel, id, "wall").unwrap();
    let labels = wall_labels().with_floor_break(lithoprep_math::Axis::X, 118.0);
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let plans = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    // A plain wall has no interior pattern breaks; the labeled break
    // is the only candidate.
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].reason, lithoprep_split::SplitReason::FloorBreak);
    assert!((plans[0].position - 118.0).abs() < 1e-9);
}

#[test]
fn test_plane_through_window_rejected() {
    let kernel = PanelKernel::new();
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 2);
    let piece = Piece::from_kernel(&kernel, id, "wall").unwrap();
    // The only pattern break (x=120) falls inside a labeled window.
    let labels = wall_labels().with_fragile_opening(lithoprep_math::Aabb::new(
        lithoprep_math::Point3::new(110.0, -1.0, 20.0),
        lithoprep_math::Point3::new(130.0, 2.2, 60.0),
    ));
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let result = plan_split(&piece, &cls, &labels, &volume, &config);
    assert!(result.is_err());
}

#[test]
fn test_execute_split_retires_parent() {
    let kernel: Arc<PanelKernel> = Arc::new(PanelKernel::new());
    let id = segmented_wall(&kernel, 240.0, 1.2, 160.0, 4);
    let piece = Piece::from_kernel(kernel.as_ref(), id, "wall").unwrap();
    let labels = wall_labels();
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let plans = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    let dyn_kernel: Arc<dyn lithoprep_kernel::SolidKernel> = kernel.clone();
    let (neg, pos) = execute_split(&dyn_kernel, piece, &plans[0], &config).unwrap();

    // Parent handle is gone; only the two children remain.
    assert_eq!(kernel.live_solids(), 2);
    assert!(neg.bounds().max.x <= plans[0].position + 1e-9);
    assert!(pos.bounds().min.x >= plans[0].position - 1e-9);
    assert_eq!(neg.name(), "wall/neg");
    assert_eq!(pos.name(), "wall/pos");
}

#[test]
fn test_corner_split_detected_and_skips_registration() {
    let kernel = PanelKernel::new();
    let id = corner_walls(&kernel);
    let piece = Piece::from_kernel(&kernel, id, "corner").unwrap();
    // A floor break through the corner column separates the side wall
    // from the front wall.
    let labels = wall_labels().with_floor_break(lithoprep_math::Axis::X, 1.0);
    let config = PrepConfig::default();
    let cls = classify(piece.faces(), &labels, &config).unwrap();
    let volume = lookup_printer("m7_pro").unwrap();

    let plans = plan_split(&piece, &cls, &labels, &volume, &config).unwrap();
    let corner_plan = plans
        .iter()
        .find(|p| (p.position - 1.0).abs() < 1e-9)
        .expect("corner candidate present");
    // The side wall's caps cross the plane as a transverse run, so
    // this is an L-joint: the overlapping corner volume aligns the
    // pieces and no pins are generated.
    assert_eq!(corner_plan.joint, JointKind::Corner);

    let pairs = plan_registration(&piece, &corner_plan.plane, corner_plan.joint, &config);
    assert!(pairs.is_empty());
}
