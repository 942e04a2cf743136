#![warn(missing_docs)]

//! Surface classification for the lithoprep print-preparation core.
//!
//! Assigns every well-formed face exactly one [`FaceCategory`] from its
//! geometry plus the externally supplied labels. Pure and
//! deterministic: same faces + labels + config always produce the same
//! classification, regardless of worker scheduling.

pub mod bars;

pub use bars::{detect_bars, BarFeature, CrossPoint};

use rayon::prelude::*;

use lithoprep_model::{Face, FaceCategory, Label, LabelMap, ModelError, PrepConfig};

/// The classifier's complete output for one piece.
#[derive(Debug, Clone)]
pub struct Classification {
    categories: Vec<Option<FaceCategory>>,
    /// Detected thin bars (mullions).
    pub bars: Vec<BarFeature>,
    /// Bar cross-intersection points, the only fragile support sites.
    pub crossings: Vec<CrossPoint>,
    /// Fragile faces below the minimum resolvable size (warning only).
    pub unresolvable: Vec<usize>,
    /// Malformed faces excluded from classification.
    pub malformed: Vec<usize>,
}

impl Classification {
    /// Category of a face; `None` for malformed/excluded faces.
    pub fn category(&self, face: usize) -> Option<FaceCategory> {
        self.categories.get(face).copied().flatten()
    }

    /// True if the face carries the given category.
    pub fn is(&self, face: usize, category: FaceCategory) -> bool {
        self.category(face) == Some(category)
    }

    /// Number of faces in a category.
    pub fn count(&self, category: FaceCategory) -> usize {
        self.categories
            .iter()
            .filter(|c| **c == Some(category))
            .count()
    }

    /// Indices of all faces in a category, in face order.
    pub fn faces_with(&self, category: FaceCategory) -> Vec<usize> {
        self.categories
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Some(category))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of faces that received a category.
    pub fn classified_count(&self) -> usize {
        self.categories.iter().filter(|c| c.is_some()).count()
    }
}

/// Per-face outcome of the first (parallel, purely local) pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Prelim {
    Malformed,
    Fixed(FaceCategory),
    /// Overhang with small area but real depth: cosmetic only if it has
    /// enough regularly spaced siblings, decided in the second pass.
    SmallOverhang,
}

/// Classify every face of a piece.
///
/// Fails only when the label map lacks a usable outward direction;
/// malformed faces are excluded and reported, never fatal.
pub fn classify(
    faces: &[Face],
    labels: &LabelMap,
    config: &PrepConfig,
) -> Result<Classification, ModelError> {
    let outward = labels.outward_dir()?;
    let outward = *outward.as_ref();

    let prelim: Vec<Prelim> = faces
        .par_iter()
        .map(|face| categorize(face, labels, &outward, config))
        .collect();

    let mut categories: Vec<Option<FaceCategory>> = prelim
        .iter()
        .map(|p| match p {
            Prelim::Malformed => None,
            Prelim::Fixed(c) => Some(*c),
            Prelim::SmallOverhang => None, // resolved below
        })
        .collect();

    resolve_small_overhangs(faces, &prelim, &mut categories, config);

    let malformed: Vec<usize> = prelim
        .iter()
        .enumerate()
        .filter(|(_, p)| **p == Prelim::Malformed)
        .map(|(i, _)| i)
        .collect();

    let unresolvable: Vec<usize> = faces
        .iter()
        .filter(|f| {
            categories[f.index] == Some(FaceCategory::Fragile)
                && f.feature_extent() < config.min_resolvable
        })
        .map(|f| f.index)
        .collect();
    for &face in &unresolvable {
        tracing::warn!(face, "fragile feature below minimum resolvable size");
    }

    let (bars, crossings) = detect_bars(faces, &categories, config);

    tracing::debug!(
        faces = faces.len(),
        malformed = malformed.len(),
        bars = bars.len(),
        crossings = crossings.len(),
        "classification complete"
    );

    Ok(Classification {
        categories,
        bars,
        crossings,
        unresolvable,
        malformed,
    })
}

/// Classify one face from purely local information.
fn categorize(face: &Face, labels: &LabelMap, outward: &lithoprep_math::Vec3, config: &PrepConfig) -> Prelim {
    if face.is_malformed() {
        return Prelim::Malformed;
    }

    let label = labels.label_for(face);
    match label {
        Some(Label::Display) => return Prelim::Fixed(FaceCategory::Display),
        Some(Label::Interior) => return Prelim::Fixed(FaceCategory::Interior),
        _ => {}
    }

    let thin = face.feature_extent() < config.fragile_threshold;
    let in_opening = labels
        .fragile_openings()
        .iter()
        .any(|o| o.contains(&face.bounds));

    // Wall alignment is checked before the overhang test: a tilted
    // wall's interior surface can reach normal.z below the overhang
    // threshold while still being a wall face.
    let dot_wall = face.normal.dot(outward);
    if dot_wall.abs() > config.wall_dot_threshold {
        if thin {
            return Prelim::Fixed(FaceCategory::Fragile);
        }
        // Assembly-joint faces are never display, whatever their normal.
        if dot_wall > 0.0 && label != Some(Label::AssemblyJoint) {
            return Prelim::Fixed(FaceCategory::Display);
        }
        return Prelim::Fixed(FaceCategory::Interior);
    }

    if face.normal.z < config.overhang_dot_threshold {
        // A thin underside inside a fragile opening is mullion material.
        if thin && in_opening {
            return Prelim::Fixed(FaceCategory::Fragile);
        }
        // The depth test dominates: shallow protrusions are cosmetic
        // regardless of area.
        if face.projection_depth() < config.cosmetic_depth_max {
            return Prelim::Fixed(FaceCategory::CosmeticOverhang);
        }
        if face.area < config.cosmetic_area_max {
            return Prelim::SmallOverhang;
        }
        return Prelim::Fixed(FaceCategory::StructuralOverhang);
    }

    if thin {
        return Prelim::Fixed(FaceCategory::Fragile);
    }

    Prelim::Fixed(FaceCategory::Structural)
}

/// Second pass: a small-area overhang is cosmetic only when it belongs
/// to a large family of similar-area faces at a regular Z rhythm
/// (brick courses, clapboard steps); otherwise it needs support.
fn resolve_small_overhangs(
    faces: &[Face],
    prelim: &[Prelim],
    categories: &mut [Option<FaceCategory>],
    config: &PrepConfig,
) {
    use std::collections::HashMap;

    let mut buckets: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, p) in prelim.iter().enumerate() {
        if *p == Prelim::SmallOverhang {
            let key = (faces[i].area / 0.1).round() as i64;
            buckets.entry(key).or_default().push(i);
        }
    }

    for members in buckets.values() {
        let cosmetic = members.len() >= config.cosmetic_sibling_min
            && regular_z_spacing(faces, members, config);
        let category = if cosmetic {
            FaceCategory::CosmeticOverhang
        } else {
            FaceCategory::StructuralOverhang
        };
        for &i in members {
            categories[i] = Some(category);
        }
    }
}

/// True when the members' distinct Z positions form an even rhythm.
fn regular_z_spacing(faces: &[Face], members: &[usize], config: &PrepConfig) -> bool {
    let mut zs: Vec<i64> = members
        .iter()
        .map(|&i| (faces[i].low_z() * 1000.0).round() as i64)
        .collect();
    zs.sort_unstable();
    zs.dedup();
    if zs.len() < 3 {
        return false;
    }
    let diffs: Vec<f64> = zs.windows(2).map(|w| (w[1] - w[0]) as f64 / 1000.0).collect();
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    if mean <= 1e-6 {
        return false;
    }
    let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;
    (var.sqrt() / mean) <= config.cosmetic_spacing_cv_max
}
