//! Externally supplied semantic labels.
//!
//! Labels are read-only input: the core consumes a finished label map
//! and never infers or negotiates one. A label applies either to a
//! single face id or to a spatial region; region labels survive splits
//! and transforms are never applied to them (labelling happens in the
//! part's semantic "up" frame, before orientation).

use std::collections::HashMap;

use lithoprep_math::{Aabb, Axis, Dir3, Vec3, GEOM_TOL};
use nalgebra::Unit;

use crate::error::{ModelError, Result};
use crate::face::Face;

/// One semantic label value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The face/region is a display surface (visible after assembly).
    Display,
    /// The face/region faces the part interior.
    Interior,
    /// The face/region mates with another part at assembly time.
    AssemblyJoint,
    /// Free-form post-processing intent; carried through to the report.
    PostProcessHint,
}

/// A label attached to a spatial region rather than a face id.
#[derive(Debug, Clone)]
pub struct LabeledRegion {
    /// The labeled volume, in the semantic up frame.
    pub bounds: Aabb,
    /// The label value.
    pub label: Label,
}

/// The complete label input for one piece.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    face_labels: HashMap<usize, Label>,
    regions: Vec<LabeledRegion>,
    outward: Option<Vec3>,
    fragile_openings: Vec<Aabb>,
    floor_breaks: Vec<(Axis, f64)>,
}

impl LabelMap {
    /// An empty map (insufficient for classification until an outward
    /// direction is set).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wall outward direction: from interior toward display.
    #[must_use]
    pub fn with_outward(mut self, outward: Vec3) -> Self {
        self.outward = Some(outward);
        self
    }

    /// Attach a label to one face id.
    #[must_use]
    pub fn with_face_label(mut self, face: usize, label: Label) -> Self {
        self.face_labels.insert(face, label);
        self
    }

    /// Attach a label to a spatial region.
    #[must_use]
    pub fn with_region(mut self, bounds: Aabb, label: Label) -> Self {
        self.regions.push(LabeledRegion { bounds, label });
        self
    }

    /// Mark a region as containing a fragile opening (e.g. a window);
    /// split planes must not cross it.
    #[must_use]
    pub fn with_fragile_opening(mut self, bounds: Aabb) -> Self {
        self.fragile_openings.push(bounds);
        self
    }

    /// Record an explicit floor-break position: a preferred split plane
    /// coordinate along an axis.
    #[must_use]
    pub fn with_floor_break(mut self, axis: Axis, position: f64) -> Self {
        self.floor_breaks.push((axis, position));
        self
    }

    /// The outward direction as a unit vector.
    ///
    /// Missing or degenerate outward input is a configuration error —
    /// display/interior separation is definitionally unavailable
    /// without it.
    pub fn outward_dir(&self) -> Result<Dir3> {
        let v = self.outward.ok_or(ModelError::MissingOutward)?;
        Unit::try_new(v, GEOM_TOL).ok_or(ModelError::DegenerateOutward)
    }

    /// The label applying to a face, if any.
    ///
    /// A face-id label wins over a region label; the first region
    /// containing the face centroid wins among regions.
    pub fn label_for(&self, face: &Face) -> Option<Label> {
        if let Some(&label) = self.face_labels.get(&face.index) {
            return Some(label);
        }
        self.regions
            .iter()
            .find(|r| r.bounds.contains_point(&face.centroid))
            .map(|r| r.label)
    }

    /// Regions containing fragile openings.
    pub fn fragile_openings(&self) -> &[Aabb] {
        &self.fragile_openings
    }

    /// Explicit floor-break split positions.
    pub fn floor_breaks(&self) -> &[(Axis, f64)] {
        &self.floor_breaks
    }

    /// The label map re-expressed in a transformed frame.
    ///
    /// Region bounds become the (conservative) bounds of their
    /// transformed corners and the outward direction rotates along.
    /// Face-id labels and floor breaks do not survive — ids are
    /// re-enumerated and axis-aligned break positions lose meaning
    /// under rotation — so orient-frame consumers must work from a
    /// map that was [`LabelMap::resolved`] first.
    #[must_use]
    pub fn transformed(&self, xform: &lithoprep_math::Transform) -> Self {
        Self {
            face_labels: HashMap::new(),
            regions: self
                .regions
                .iter()
                .map(|r| LabeledRegion {
                    bounds: xform.apply_aabb(&r.bounds),
                    label: r.label,
                })
                .collect(),
            outward: self.outward.map(|v| xform.apply_vec(&v)),
            fragile_openings: self
                .fragile_openings
                .iter()
                .map(|b| xform.apply_aabb(b))
                .collect(),
            floor_breaks: Vec::new(),
        }
    }

    /// Materialize face-id labels as regions (each face's bounds).
    ///
    /// Face ids do not survive a split — the children re-enumerate
    /// their faces — so the orchestrator resolves id-keyed labels into
    /// spatial regions once, against the root piece, before any split.
    #[must_use]
    pub fn resolved(mut self, faces: &[Face]) -> Self {
        for (&index, &label) in &self.face_labels {
            if let Some(face) = faces.get(index) {
                self.regions.push(LabeledRegion {
                    bounds: face.bounds.expanded(1e-6),
                    label,
                });
            }
        }
        self.face_labels.clear();
        self
    }
}
