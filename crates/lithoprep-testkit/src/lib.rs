#![warn(missing_docs)]

//! Synthetic-geometry kernel and wall builders for lithoprep tests.
//!
//! [`PanelKernel`] implements [`SolidKernel`] over compounds of
//! axis-aligned panel boxes plus explicit detail faces — the same
//! shape the production pipeline sees from a real kernel, without the
//! kernel. Booleans are exact for the axis-aligned splits the planner
//! produces; fuse/cut record their tools so tests can assert on them.

pub mod builders;

use std::sync::RwLock;

use slotmap::SlotMap;

use lithoprep_kernel::{FaceData, KernelError, KernelResult, SolidId, SolidKernel, SolidSpec};
use lithoprep_math::{Aabb, Plane, Point3, Transform, Vec3};

/// A compound of axis-aligned panels and decorative detail faces.
///
/// Panels and details are stored in the semantic (untransformed) frame;
/// the accumulated rigid transform is applied on enumeration.
#[derive(Debug, Clone, Default)]
pub struct Compound {
    /// Structural panel boxes.
    pub panels: Vec<Aabb>,
    /// Decorative faces (brick steps, lintels) in the semantic frame.
    pub details: Vec<FaceData>,
    /// Primitives fused on (registration pins).
    pub fused: Vec<SolidSpec>,
    /// Primitives cut out (sockets).
    pub cut: Vec<SolidSpec>,
    /// Accumulated rigid transform.
    pub xform: Transform,
}

impl Compound {
    /// A compound holding one panel box.
    pub fn from_panel(panel: Aabb) -> Self {
        Self {
            panels: vec![panel],
            ..Self::default()
        }
    }

    fn is_semantic_frame(&self) -> bool {
        self.xform == Transform::identity()
    }
}

#[derive(Debug, Clone)]
enum Solid {
    Compound(Compound),
    Primitive(SolidSpec),
}

/// A synchronous in-memory kernel over panel compounds.
#[derive(Debug, Default)]
pub struct PanelKernel {
    solids: RwLock<SlotMap<SolidId, Solid>>,
}

impl PanelKernel {
    /// An empty kernel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compound and get its handle.
    pub fn insert(&self, compound: Compound) -> SolidId {
        self.solids
            .write()
            .unwrap()
            .insert(Solid::Compound(compound))
    }

    /// Inspect a compound (panics on primitives; tests only).
    pub fn compound(&self, id: SolidId) -> Option<Compound> {
        match self.solids.read().unwrap().get(id) {
            Some(Solid::Compound(c)) => Some(c.clone()),
            _ => None,
        }
    }

    /// Number of live solids (leak checking).
    pub fn live_solids(&self) -> usize {
        self.solids.read().unwrap().len()
    }

    fn get(&self, id: SolidId) -> KernelResult<Solid> {
        self.solids
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(KernelError::UnknownSolid)
    }

    fn get_compound(&self, id: SolidId) -> KernelResult<Compound> {
        match self.get(id)? {
            Solid::Compound(c) => Ok(c),
            Solid::Primitive(_) => Err(KernelError::Unsupported(
                "operation requires a compound".into(),
            )),
        }
    }
}

/// The six faces of an axis-aligned box.
fn panel_faces(panel: &Aabb) -> Vec<FaceData> {
    let e = panel.extents();
    let c = panel.center();
    let mut faces = Vec::with_capacity(6);
    for axis in 0..3 {
        let (a1, a2) = ((axis + 1) % 3, (axis + 2) % 3);
        let area = e[a1] * e[a2];
        let min_edge = e[a1].min(e[a2]);
        for (coordinate, sign) in [(panel.min[axis], -1.0), (panel.max[axis], 1.0)] {
            let mut normal = Vec3::zeros();
            normal[axis] = sign;
            let mut centroid = c;
            centroid[axis] = coordinate;
            let mut lo = panel.min;
            let mut hi = panel.max;
            lo[axis] = coordinate;
            hi[axis] = coordinate;
            faces.push(FaceData {
                centroid,
                normal,
                area,
                bounds: Aabb::new(lo, hi),
                min_edge,
            });
        }
    }
    faces
}

fn transform_face(face: &FaceData, xform: &Transform) -> FaceData {
    FaceData {
        centroid: xform.apply_point(&face.centroid),
        normal: xform.apply_vec(&face.normal),
        area: face.area,
        bounds: xform.apply_aabb(&face.bounds),
        min_edge: face.min_edge,
    }
}

fn spec_bounds(spec: &SolidSpec) -> Aabb {
    match spec {
        SolidSpec::Cuboid { min, size } => Aabb::new(*min, min + size),
        SolidSpec::ChamferedSlab { min, size, .. } => Aabb::new(*min, min + size),
        SolidSpec::Cylinder {
            base,
            axis,
            radius,
            height,
        } => Aabb::from_points([*base, base + axis.normalize() * *height]).expanded(*radius),
        SolidSpec::Cone {
            base,
            axis,
            base_radius,
            top_radius,
            height,
        } => Aabb::from_points([*base, base + axis.normalize() * *height])
            .expanded(base_radius.max(*top_radius)),
    }
}

impl SolidKernel for PanelKernel {
    fn faces(&self, solid: SolidId) -> KernelResult<Vec<FaceData>> {
        let compound = self.get_compound(solid)?;
        let mut faces = Vec::new();
        for panel in &compound.panels {
            faces.extend(panel_faces(panel));
        }
        faces.extend(compound.details.iter().cloned());
        if !compound.is_semantic_frame() {
            for face in &mut faces {
                *face = transform_face(face, &compound.xform);
            }
        }
        Ok(faces)
    }

    fn bounds(&self, solid: SolidId) -> KernelResult<Aabb> {
        let faces = self.faces(solid)?;
        let mut bounds = Aabb::empty();
        for face in &faces {
            bounds = bounds.union(&face.bounds);
        }
        if bounds.is_empty() {
            return Err(KernelError::Degenerate("solid has no faces".into()));
        }
        Ok(bounds)
    }

    fn transform(&self, solid: SolidId, xform: &Transform) -> KernelResult<SolidId> {
        let mut compound = self.get_compound(solid)?;
        compound.xform = compound.xform.then(xform);
        Ok(self.insert(compound))
    }

    fn create(&self, spec: &SolidSpec) -> KernelResult<SolidId> {
        Ok(self
            .solids
            .write()
            .unwrap()
            .insert(Solid::Primitive(spec.clone())))
    }

    fn split(&self, solid: SolidId, plane: &Plane) -> KernelResult<(SolidId, SolidId)> {
        let compound = self.get_compound(solid)?;
        if !compound.is_semantic_frame() {
            return Err(KernelError::Unsupported(
                "panel kernel splits only in the semantic frame".into(),
            ));
        }
        let n = plane.normal.as_ref();
        let axis = (0..3)
            .find(|&i| n[i].abs() > 0.999)
            .ok_or_else(|| KernelError::Unsupported("panel kernel splits are axis-aligned".into()))?;
        let position = plane.origin[axis];

        let mut neg = Compound::default();
        let mut pos = Compound::default();

        for panel in &compound.panels {
            if panel.max[axis] <= position {
                neg.panels.push(*panel);
            } else if panel.min[axis] >= position {
                pos.panels.push(*panel);
            } else {
                let mut low = *panel;
                low.max[axis] = position;
                let mut high = *panel;
                high.min[axis] = position;
                neg.panels.push(low);
                pos.panels.push(high);
            }
        }
        for detail in &compound.details {
            if detail.centroid[axis] < position {
                neg.details.push(detail.clone());
            } else {
                pos.details.push(detail.clone());
            }
        }
        for spec in &compound.fused {
            let b = spec_bounds(spec);
            if b.center()[axis] < position {
                neg.fused.push(spec.clone());
            } else {
                pos.fused.push(spec.clone());
            }
        }
        for spec in &compound.cut {
            let b = spec_bounds(spec);
            if b.center()[axis] < position {
                neg.cut.push(spec.clone());
            } else {
                pos.cut.push(spec.clone());
            }
        }

        if neg.panels.is_empty() || pos.panels.is_empty() {
            return Err(KernelError::BooleanFailed(
                "split plane misses the solid".into(),
            ));
        }
        Ok((self.insert(neg), self.insert(pos)))
    }

    fn fuse(&self, target: SolidId, tool: SolidId) -> KernelResult<SolidId> {
        let mut compound = self.get_compound(target)?;
        match self.get(tool)? {
            Solid::Primitive(spec) => compound.fused.push(spec),
            Solid::Compound(other) => {
                compound.panels.extend(other.panels);
                compound.details.extend(other.details);
            }
        }
        Ok(self.insert(compound))
    }

    fn cut(&self, target: SolidId, tool: SolidId, region: Option<&Aabb>) -> KernelResult<SolidId> {
        let mut compound = self.get_compound(target)?;
        let spec = match self.get(tool)? {
            Solid::Primitive(spec) => spec,
            Solid::Compound(_) => {
                return Err(KernelError::Unsupported(
                    "panel kernel cuts primitives only".into(),
                ))
            }
        };
        if let Some(region) = region {
            if !region.intersects(&spec_bounds(&spec)) {
                return Err(KernelError::BooleanFailed(
                    "cut region does not contain the tool".into(),
                ));
            }
        }
        compound.cut.push(spec);
        Ok(self.insert(compound))
    }

    fn retire(&self, solid: SolidId) {
        self.solids.write().unwrap().remove(solid);
    }
}
