#![warn(missing_docs)]

//! Tapered support and raft generation for lithoprep.
//!
//! Runs last, on a finalized piece + orientation: filters eligible
//! overhang faces, clusters them into support regions, places tapered
//! supports (collision-resolved against intervening geometry), lays a
//! bottom-support grid under the raised piece, and sizes a chamfered
//! raft under everything.
//!
//! The hard invariants hold by construction: contacts are only ever
//! derived from faces already classified non-display, and every
//! support's base is either the raft top or a model surface directly
//! above it — the data model has no free-standing variant.

pub mod solids;

pub use solids::{Raft, Support, SupportBase};

use rayon::prelude::*;

use lithoprep_classify::Classification;
use lithoprep_math::{Aabb, Axis, Point3, Vec3};
use lithoprep_model::{Face, FaceCategory, Piece, PrepConfig};
use lithoprep_orient::OrientationChoice;

/// A cluster of overhang faces sharing one support decision.
#[derive(Debug, Clone)]
pub struct SupportRegion {
    /// Member face indices, in face order.
    pub faces: Vec<usize>,
    /// Union of member bounds.
    pub bounds: Aabb,
    /// Longest horizontal extent of the region.
    pub span: f64,
}

/// A contact that could not be supported, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedContact {
    /// Where the contact would have been.
    pub point: Point3,
    /// Why it was skipped.
    pub reason: String,
}

/// Everything the generator produced for one piece.
#[derive(Debug, Clone)]
pub struct SupportOutcome {
    /// Generated supports.
    pub supports: Vec<Support>,
    /// The raft all raft-based supports terminate on.
    pub raft: Raft,
    /// The clustered regions the supports were derived from.
    pub regions: Vec<SupportRegion>,
    /// Contacts dropped during base resolution.
    pub skipped: Vec<SkippedContact>,
    /// Contacts that got the reduced tip for display proximity.
    pub reduced_tip_contacts: usize,
    /// Soft-rule violations and other findings for the report.
    pub warnings: Vec<String>,
}

/// A placed contact awaiting base resolution.
#[derive(Debug, Clone)]
struct Contact {
    point: Point3,
    tip_radius: f64,
}

/// Generate supports and a raft for an oriented piece.
///
/// `classification` must describe the piece in its oriented frame
/// (outward direction from the orientation choice).
pub fn generate_supports(
    piece: &Piece,
    orientation: &OrientationChoice,
    classification: &Classification,
    config: &PrepConfig,
) -> SupportOutcome {
    let mut warnings = Vec::new();

    // Underside faces get the grid treatment; everything else clusters
    // into regions.
    let bottom_limit = piece.bounds().min.z + 2.0;
    let mut bottom_faces: Vec<&Face> = Vec::new();
    let mut overhang_faces: Vec<&Face> = Vec::new();
    for face in piece.faces() {
        if !classification.is(face.index, FaceCategory::StructuralOverhang) {
            continue;
        }
        if face.bounds.min.z < bottom_limit && face.area > 10.0 {
            bottom_faces.push(face);
        } else {
            overhang_faces.push(face);
        }
    }

    let regions = cluster_regions(&overhang_faces, config);

    let junctions = junction_points(piece, classification);
    let display_bounds: Vec<Aabb> = classification
        .faces_with(FaceCategory::Display)
        .into_iter()
        .map(|i| piece.faces()[i].bounds.expanded(config.display_safety_margin))
        .collect();

    let mut contacts: Vec<Contact> = Vec::new();
    let mut reduced_tip_contacts = 0;

    for region in &regions {
        for mut point in region_contact_points(region, piece, orientation, config) {
            snap_to_junction(&mut point, &junctions, region, config);
            nudge_inward(&mut point, piece, config);
            let tip_radius = if near_display(&point, &display_bounds) {
                reduced_tip_contacts += 1;
                config.tip_radius_near_display
            } else {
                config.tip_radius
            };
            contacts.push(Contact { point, tip_radius });
        }
    }

    // Fragile bars accept contact only at a recorded cross-intersection
    // point, and only where the local overhang is steep enough.
    for crossing in &classification.crossings {
        let steep = crossing_steepness(crossing);
        if steep > config.steepness_threshold_deg {
            contacts.push(Contact {
                point: crossing.point,
                tip_radius: config.tip_radius_near_display,
            });
            reduced_tip_contacts += 1;
        } else {
            warnings.push(format!(
                "mullion crossing at ({:.1}, {:.1}, {:.1}) left unsupported: overhang {:.0}\u{b0} below threshold",
                crossing.point.x, crossing.point.y, crossing.point.z, steep
            ));
        }
    }

    for face in &bottom_faces {
        for point in bottom_grid_points(face, orientation, config) {
            let tip_radius = if near_display(&point, &display_bounds) {
                reduced_tip_contacts += 1;
                config.tip_radius_near_display
            } else {
                config.tip_radius
            };
            contacts.push(Contact { point, tip_radius });
        }
    }

    dedupe_contacts(&mut contacts, config);

    // Tilt-direction validation: every contact must sit on the
    // interior half of the piece along the outward axis.
    let violations = validate_tilt_direction(&contacts, piece, &orientation.outward);
    if violations > 0 {
        warnings.push(format!(
            "{violations} contact(s) landed on the display side of the midplane"
        ));
    }

    // Collision-aware base resolution, independent per contact.
    let resolved: Vec<std::result::Result<Support, SkippedContact>> = contacts
        .par_iter()
        .map(|c| resolve_base(c, piece, config))
        .collect();

    let mut supports = Vec::new();
    let mut skipped = Vec::new();
    for r in resolved {
        match r {
            Ok(s) => supports.push(s),
            Err(s) => skipped.push(s),
        }
    }

    let raft = build_raft(piece, &supports, config);

    tracing::info!(
        piece = piece.name(),
        supports = supports.len(),
        regions = regions.len(),
        skipped = skipped.len(),
        reduced_tips = reduced_tip_contacts,
        "support generation complete"
    );

    SupportOutcome {
        supports,
        raft,
        regions,
        skipped,
        reduced_tip_contacts,
        warnings,
    }
}

/// Merge overhang faces into proximity clusters, in face order.
fn cluster_regions(faces: &[&Face], config: &PrepConfig) -> Vec<SupportRegion> {
    let reach = config.cluster_grid / 2.0;
    let mut regions: Vec<SupportRegion> = Vec::new();

    for face in faces {
        let probe = face.bounds.expanded(reach);
        let touching: Vec<usize> = regions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.bounds.expanded(reach).intersects(&probe))
            .map(|(i, _)| i)
            .collect();

        if touching.is_empty() {
            regions.push(SupportRegion {
                faces: vec![face.index],
                bounds: face.bounds,
                span: 0.0,
            });
        } else {
            // Merge everything this face touches into the first region.
            let target = touching[0];
            for &other in touching[1..].iter().rev() {
                let merged = regions.remove(other);
                regions[target].faces.extend(merged.faces);
                regions[target].bounds = regions[target].bounds.union(&merged.bounds);
            }
            regions[target].faces.push(face.index);
            regions[target].bounds = regions[target].bounds.union(&face.bounds);
            regions[target].faces.sort_unstable();
        }
    }

    for region in &mut regions {
        let e = region.bounds.extents();
        region.span = e.x.max(e.y);
    }
    regions
}

/// 1-3 contact points per region, scaled to its span and placed on the
/// interior side with asymmetric edge clearances.
fn region_contact_points(
    region: &SupportRegion,
    piece: &Piece,
    orientation: &OrientationChoice,
    config: &PrepConfig,
) -> Vec<Point3> {
    let count = ((region.span / config.span_per_support).ceil() as usize).clamp(1, 3);

    let e = region.bounds.extents();
    let (long_axis, cross_axis) = if e.x >= e.y {
        (Axis::X, Axis::Y)
    } else {
        (Axis::Y, Axis::X)
    };

    // The representative face: the lowest member, whose plane the
    // contact Z is interpolated on.
    let Some(rep) = region
        .faces
        .iter()
        .map(|&i| &piece.faces()[i])
        .min_by(|a, b| a.bounds.min.z.total_cmp(&b.bounds.min.z))
    else {
        return Vec::new();
    };

    let cross = cross_position(&region.bounds, cross_axis, orientation, config);

    let li = long_axis.index();
    let lo = region.bounds.min[li] + 1.5;
    let hi = region.bounds.max[li] - 1.5;

    (0..count)
        .map(|i| {
            let t = (i as f64 + 0.5) / count as f64;
            let along = (region.bounds.min[li] + t * e[li]).clamp(lo.min(hi), hi.max(lo));
            let (x, y) = match long_axis {
                Axis::X => (along, cross),
                _ => (cross, along),
            };
            let z = face_z_at(rep, x, y);
            Point3::new(x, y, z)
        })
        .collect()
}

/// Interior-biased position across the region, honoring the tight
/// interior and generous display-side clearances; narrow faces get a
/// single stability-biased position instead.
fn cross_position(
    bounds: &Aabb,
    cross_axis: Axis,
    orientation: &OrientationChoice,
    config: &PrepConfig,
) -> f64 {
    let ci = cross_axis.index();
    let lo = bounds.min[ci];
    let hi = bounds.max[ci];
    let extent = hi - lo;
    // Which side of this axis faces the display?
    let display_at_max = orientation.outward[ci] > 0.0;

    if extent < config.narrow_face_threshold {
        let bias = config.column_radius + config.tip_radius + 0.1;
        return if display_at_max { hi - bias } else { lo + bias };
    }

    let (safe_lo, safe_hi) = if display_at_max {
        (lo + config.interior_edge_clear, hi - config.display_edge_clear)
    } else {
        (lo + config.display_edge_clear, hi - config.interior_edge_clear)
    };
    if safe_lo > safe_hi {
        // Clearances conflict: fall back to the interior edge.
        return if display_at_max {
            lo + config.interior_edge_clear
        } else {
            hi - config.interior_edge_clear
        };
    }
    // Interior-most allowed position.
    if display_at_max {
        safe_lo
    } else {
        safe_hi
    }
}

/// Z on the face plane at (x, y), clamped to the face's extent.
fn face_z_at(face: &Face, x: f64, y: f64) -> f64 {
    let n = face.normal;
    let c = face.centroid;
    let z = if n.z.abs() < 0.05 {
        face.bounds.min.z
    } else {
        c.z - (n.x / n.z) * (x - c.x) - (n.y / n.z) * (y - c.y)
    };
    z.clamp(face.bounds.min.z - 0.2, face.bounds.max.z + 0.2)
}

/// XY corners of structural faces: the strongest, least visually
/// damaging attachment points.
fn junction_points(piece: &Piece, classification: &Classification) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for &i in &classification.faces_with(FaceCategory::Structural) {
        let b = &piece.faces()[i].bounds;
        points.push((b.min.x, b.min.y));
        points.push((b.min.x, b.max.y));
        points.push((b.max.x, b.min.y));
        points.push((b.max.x, b.max.y));
    }
    points
}

/// Snap a contact to the nearest structural junction within the snap
/// radius, staying inside the region.
fn snap_to_junction(
    point: &mut Point3,
    junctions: &[(f64, f64)],
    region: &SupportRegion,
    config: &PrepConfig,
) {
    let mut best: Option<(f64, f64, f64)> = None;
    for &(jx, jy) in junctions {
        let d = ((jx - point.x).powi(2) + (jy - point.y).powi(2)).sqrt();
        if d <= config.junction_snap_radius && best.map_or(true, |(bd, _, _)| d < bd) {
            best = Some((d, jx, jy));
        }
    }
    if let Some((_, jx, jy)) = best {
        point.x = jx.clamp(region.bounds.min.x, region.bounds.max.x);
        point.y = jy.clamp(region.bounds.min.y, region.bounds.max.y);
    }
}

/// Shift a contact toward the piece center.
fn nudge_inward(point: &mut Point3, piece: &Piece, config: &PrepConfig) {
    let center = piece.bounds().center();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d > 0.01 {
        point.x -= config.inward_nudge * dx / d;
        point.y -= config.inward_nudge * dy / d;
    }
}

fn near_display(point: &Point3, display_bounds: &[Aabb]) -> bool {
    display_bounds.iter().any(|b| b.contains_point(point))
}

/// Steepness (degrees from vertical) of the overhang at a bar
/// crossing; 90 means a flat underside, 0 a vertical surface.
fn crossing_steepness(crossing: &lithoprep_classify::CrossPoint) -> f64 {
    let nz = crossing.normal.z;
    if nz < 0.0 {
        (-nz).clamp(0.0, 1.0).asin().to_degrees()
    } else {
        0.0
    }
}

/// Regular grid under an underside face: interior row, doubled when
/// the face is deep enough that peel forces could tip the piece.
fn bottom_grid_points(
    face: &Face,
    orientation: &OrientationChoice,
    config: &PrepConfig,
) -> Vec<Point3> {
    let e = face.bounds.extents();
    let (long_axis, cross_axis) = if e.x >= e.y {
        (Axis::X, Axis::Y)
    } else {
        (Axis::Y, Axis::X)
    };
    let li = long_axis.index();
    let ci = cross_axis.index();

    let count = ((e[li] / config.bottom_support_spacing) as usize + 1).max(2);
    let margin = 1.5;
    let row_inset = 0.5;

    let display_at_max = orientation.outward[ci] > 0.0;
    let interior_row = if display_at_max {
        face.bounds.min[ci] + row_inset
    } else {
        face.bounds.max[ci] - row_inset
    };
    let mut rows = vec![interior_row];
    if e[ci] > config.bottom_double_row_depth {
        let display_row = if display_at_max {
            face.bounds.max[ci] - row_inset
        } else {
            face.bounds.min[ci] + row_inset
        };
        rows.push(display_row);
    }

    let mut points = Vec::new();
    for i in 0..count {
        let t = (i as f64 + 0.5) / count as f64;
        let along = face.bounds.min[li] + margin + t * (e[li] - 2.0 * margin);
        for &row in &rows {
            let (x, y) = match long_axis {
                Axis::X => (along, row),
                _ => (row, along),
            };
            points.push(Point3::new(x, y, face_z_at(face, x, y)));
        }
    }
    points
}

/// Drop contacts that landed in the same cluster cell, keeping the
/// lowest (it reaches the overhang first).
fn dedupe_contacts(contacts: &mut Vec<Contact>, config: &PrepConfig) {
    use std::collections::HashMap;
    let mut cells: HashMap<(i64, i64), usize> = HashMap::new();
    let mut keep = vec![true; contacts.len()];
    for (i, c) in contacts.iter().enumerate() {
        let key = (
            (c.point.x / config.cluster_grid).round() as i64,
            (c.point.y / config.cluster_grid).round() as i64,
        );
        let existing = cells.get(&key).copied();
        match existing {
            Some(j) if contacts[j].point.z <= c.point.z => keep[i] = false,
            Some(j) => {
                keep[j] = false;
                cells.insert(key, i);
            }
            None => {
                cells.insert(key, i);
            }
        }
    }
    let mut index = 0;
    contacts.retain(|_| {
        let kept = keep[index];
        index += 1;
        kept
    });
}

/// Count contacts on the display half of the outward axis.
fn validate_tilt_direction(contacts: &[Contact], piece: &Piece, outward: &Vec3) -> usize {
    let n = outward.normalize();
    let projections: Vec<f64> = piece
        .bounds()
        .corners()
        .iter()
        .map(|c| c.coords.dot(&n))
        .collect();
    let display_side = projections.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let interior_side = projections.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let midplane = (display_side + interior_side) / 2.0;

    contacts
        .iter()
        .filter(|c| c.point.coords.dot(&n) > midplane)
        .count()
}

/// Resolve where a support's column can stand: the raft when the path
/// down is clear, an intervening surface when blocked, or nowhere.
fn resolve_base(
    contact: &Contact,
    piece: &Piece,
    config: &PrepConfig,
) -> std::result::Result<Support, SkippedContact> {
    let margin = config.column_radius + 0.5;
    let mut rest_top: Option<f64> = None;

    for face in piece.faces() {
        // Upward surfaces below the contact can carry a column base.
        if face.normal.z < 0.3 {
            continue;
        }
        let top = face.bounds.max.z;
        if top > contact.point.z - 3.0 || top < 0.1 {
            continue;
        }
        let b = &face.bounds;
        if contact.point.x + margin < b.min.x
            || contact.point.x - margin > b.max.x
            || contact.point.y + margin < b.min.y
            || contact.point.y - margin > b.max.y
        {
            continue;
        }
        rest_top = Some(rest_top.map_or(top, |r: f64| r.max(top)));
    }

    match rest_top {
        None => Ok(Support {
            contact: contact.point,
            tip_radius: contact.tip_radius,
            tip_height: config.tip_height,
            column_radius: config.column_radius,
            base_z: 0.0,
            base: SupportBase::Raft {
                pad_radius: config.base_pad_radius,
                pad_height: config.base_pad_height,
            },
        }),
        Some(top) => {
            let base_z = top + config.model_rest_gap;
            if base_z > contact.point.z - (config.tip_height + 1.0) {
                Err(SkippedContact {
                    point: contact.point,
                    reason: "blocked path leaves no room for a column".into(),
                })
            } else {
                Ok(Support {
                    contact: contact.point,
                    tip_radius: contact.tip_radius,
                    tip_height: config.tip_height,
                    column_radius: config.column_radius,
                    base_z,
                    base: SupportBase::Model,
                })
            }
        }
    }
}

/// Raft sized to the piece footprint plus every base pad, with margin.
fn build_raft(piece: &Piece, supports: &[Support], config: &PrepConfig) -> Raft {
    let pb = piece.bounds();
    let mut footprint = Aabb::new(
        Point3::new(pb.min.x, pb.min.y, -config.raft_thickness),
        Point3::new(pb.max.x, pb.max.y, 0.0),
    );
    for support in supports {
        if let SupportBase::Raft { pad_radius, .. } = support.base {
            footprint.include(&Point3::new(
                support.contact.x - pad_radius,
                support.contact.y - pad_radius,
                -config.raft_thickness,
            ));
            footprint.include(&Point3::new(
                support.contact.x + pad_radius,
                support.contact.y + pad_radius,
                0.0,
            ));
        }
    }
    let mut min = footprint.min;
    let mut max = footprint.max;
    min.x -= config.raft_margin;
    min.y -= config.raft_margin;
    max.x += config.raft_margin;
    max.y += config.raft_margin;

    Raft {
        footprint: Aabb::new(min, max),
        thickness: config.raft_thickness,
        chamfer: config.raft_chamfer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithoprep_classify::classify;
    use lithoprep_kernel::SolidId;
    use lithoprep_model::{lookup_printer, LabelMap};
    use lithoprep_orient::select_orientation;

    /// An oriented wall fixture: built in the semantic frame, then run
    /// through the real orientation solver so the support generator
    /// sees exactly what the pipeline would hand it.
    fn oriented_wall() -> (Piece, OrientationChoice, Classification, PrepConfig) {
        let config = PrepConfig::default();
        let length = 60.0;
        let thickness = 1.2;
        let height = 40.0;
        let faces = vec![
            Face {
                index: 0,
                centroid: Point3::new(length / 2.0, 0.0, height / 2.0),
                normal: Vec3::new(0.0, -1.0, 0.0),
                area: length * height,
                bounds: Aabb::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(length, 0.001, height),
                ),
                min_edge: height,
            },
            Face {
                index: 1,
                centroid: Point3::new(length / 2.0, thickness, height / 2.0),
                normal: Vec3::new(0.0, 1.0, 0.0),
                area: length * height,
                bounds: Aabb::new(
                    Point3::new(0.0, thickness, 0.0),
                    Point3::new(length, thickness + 0.001, height),
                ),
                min_edge: height,
            },
            Face {
                index: 2,
                centroid: Point3::new(length / 2.0, thickness / 2.0, 0.0),
                normal: Vec3::new(0.0, 0.0, -1.0),
                area: length * thickness,
                bounds: Aabb::new(
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(length, thickness, 0.001),
                ),
                min_edge: thickness,
            },
        ];
        let bounds = Aabb::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(length, thickness, height),
        );
        let piece = Piece::from_parts("wall", SolidId::default(), faces, bounds);
        let labels = LabelMap::new().with_outward(Vec3::new(0.0, -1.0, 0.0));
        let cls = classify(piece.faces(), &labels, &config).unwrap();
        let volume = lookup_printer("m7_pro").unwrap();
        let choice = select_orientation(&piece, &cls, &labels, &volume, &config).unwrap();

        // Re-derive the oriented faces the way the pipeline would:
        // transform each record and re-classify with the oriented
        // outward direction.
        let oriented_faces: Vec<Face> = piece
            .faces()
            .iter()
            .map(|f| Face {
                index: f.index,
                centroid: choice.transform.apply_point(&f.centroid),
                normal: choice.transform.apply_vec(&f.normal),
                area: f.area,
                bounds: choice.transform.apply_aabb(&f.bounds),
                min_edge: f.min_edge,
            })
            .collect();
        let oriented_bounds = choice.transform.apply_aabb(piece.bounds());
        let oriented = Piece::from_parts("wall", SolidId::default(), oriented_faces, oriented_bounds);
        let oriented_labels = labels.transformed(&choice.transform);
        let oriented_cls = classify(oriented.faces(), &oriented_labels, &config).unwrap();
        (oriented, choice, oriented_cls, config)
    }

    #[test]
    fn test_wall_base_gets_supports_on_raft() {
        let (piece, choice, cls, config) = oriented_wall();
        let outcome = generate_supports(&piece, &choice, &cls, &config);
        assert!(!outcome.supports.is_empty());
        for support in &outcome.supports {
            assert!(support.on_raft());
            // Terminates on the raft top.
            assert!((support.base_z - outcome.raft.top_z()).abs() < 1e-9);
            assert!(support.contact.z > support.base_z);
        }
    }

    #[test]
    fn test_no_support_contacts_display_face() {
        let (piece, choice, cls, config) = oriented_wall();
        let outcome = generate_supports(&piece, &choice, &cls, &config);
        let n = choice.outward.normalize();
        for face in piece.faces() {
            if !cls.is(face.index, FaceCategory::Display) {
                continue;
            }
            // The display surface is a plane perpendicular to the
            // outward direction; every contact stays strictly behind
            // it.
            let plane_proj = face.centroid.coords.dot(&n);
            for support in &outcome.supports {
                assert!(
                    support.contact.coords.dot(&n) < plane_proj - 1e-6,
                    "support at {:?} reaches display face {}",
                    support.contact,
                    face.index
                );
            }
        }
    }

    #[test]
    fn test_contacts_on_interior_half() {
        let (piece, choice, cls, config) = oriented_wall();
        let outcome = generate_supports(&piece, &choice, &cls, &config);
        assert!(outcome.warnings.iter().all(|w| !w.contains("display side")));

        let n = choice.outward.normalize();
        let projections: Vec<f64> = piece
            .bounds()
            .corners()
            .iter()
            .map(|c| c.coords.dot(&n))
            .collect();
        let mid = (projections.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
            + projections.iter().fold(f64::INFINITY, |a, &b| a.min(b)))
            / 2.0;
        for support in &outcome.supports {
            assert!(support.contact.coords.dot(&n) <= mid + 1e-6);
        }
    }

    #[test]
    fn test_raft_covers_piece_and_pads() {
        let (piece, choice, cls, config) = oriented_wall();
        let outcome = generate_supports(&piece, &choice, &cls, &config);
        let fp = &outcome.raft.footprint;
        assert!(fp.min.x <= piece.bounds().min.x - config.raft_margin + 1e-9);
        assert!(fp.max.x >= piece.bounds().max.x + config.raft_margin - 1e-9);
        for support in outcome.supports.iter().filter(|s| s.on_raft()) {
            assert!(fp.min.x <= support.contact.x - config.base_pad_radius + 1e-9);
            assert!(fp.max.x >= support.contact.x + config.base_pad_radius - 1e-9);
        }
        assert!((fp.min.z + config.raft_thickness).abs() < 1e-9);
        assert!(fp.max.z.abs() < 1e-9);
    }

    #[test]
    fn test_transform_uses_transformed_labels() {
        // Sanity check on the fixture itself: the oriented
        // classification still separates display from interior.
        let (_, _, cls, _) = oriented_wall();
        assert_eq!(cls.count(FaceCategory::Display), 1);
        assert_eq!(cls.count(FaceCategory::Interior), 1);
    }
}
