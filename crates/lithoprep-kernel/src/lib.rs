#![warn(missing_docs)]

//! Modeling-kernel boundary for the lithoprep print-preparation core.
//!
//! The core never owns surface geometry. It holds opaque [`SolidId`]
//! handles into an external solid-modeling kernel and drives it through
//! the [`SolidKernel`] trait: face enumeration, rigid transforms,
//! boolean cut/fuse, half-space splits, and parametric primitive
//! creation. Slow boolean operations are wrapped in cancellable polled
//! jobs (see [`job`]) rather than called synchronously.

pub mod error;
pub mod job;

pub use error::{KernelError, KernelResult};
pub use job::{run_with_retries, CancelToken, JobStatus, KernelJob};

use lithoprep_math::{Aabb, Plane, Point3, Transform, Vec3};

slotmap::new_key_type! {
    /// Opaque handle to a solid owned by the modeling kernel.
    pub struct SolidId;
}

/// One face record as reported by the kernel's face enumeration.
///
/// Everything downstream (classification, orientation scoring, support
/// placement) is computed from these records; the surface geometry
/// itself stays inside the kernel.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Face centroid.
    pub centroid: Point3,
    /// Unit outward normal. May be degenerate on malformed faces.
    pub normal: Vec3,
    /// Surface area.
    pub area: f64,
    /// Axis-aligned bounds in the current frame.
    pub bounds: Aabb,
    /// Shortest boundary edge length.
    pub min_edge: f64,
}

/// A parametric primitive the core asks the kernel to realize.
///
/// Supports, rafts, and registration pins are generated as these
/// descriptions; only socket cavities and split cuts need booleans.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidSpec {
    /// Axis-aligned box.
    Cuboid {
        /// Minimum corner.
        min: Point3,
        /// Edge lengths.
        size: Vec3,
    },
    /// Right circular cylinder.
    Cylinder {
        /// Center of the base disc.
        base: Point3,
        /// Axis direction (need not be unit).
        axis: Vec3,
        /// Radius.
        radius: f64,
        /// Height along the axis.
        height: f64,
    },
    /// Axis-aligned slab with its plate-facing (bottom) edges chamfered.
    ChamferedSlab {
        /// Minimum corner.
        min: Point3,
        /// Edge lengths.
        size: Vec3,
        /// Chamfer depth on the bottom edges.
        chamfer: f64,
    },
    /// Truncated cone.
    Cone {
        /// Center of the base disc.
        base: Point3,
        /// Axis direction (need not be unit).
        axis: Vec3,
        /// Radius at the base.
        base_radius: f64,
        /// Radius at the top.
        top_radius: f64,
        /// Height along the axis.
        height: f64,
    },
}

/// The external solid-modeling collaborator.
///
/// All operations are functional: inputs are never mutated and results
/// are fresh handles. That property is what makes job cancellation safe
/// — the orchestrator commits a returned handle only after the job
/// completes, so an abandoned operation leaves no trace.
pub trait SolidKernel: Send + Sync {
    /// Enumerate the faces of a solid.
    fn faces(&self, solid: SolidId) -> KernelResult<Vec<FaceData>>;

    /// Axis-aligned bounds of a solid.
    fn bounds(&self, solid: SolidId) -> KernelResult<Aabb>;

    /// Apply a rigid transform, returning a new solid.
    ///
    /// This is a vertex-coordinate transform, not a surface
    /// recomputation; kernels are expected to make it cheap.
    fn transform(&self, solid: SolidId, xform: &Transform) -> KernelResult<SolidId>;

    /// Realize a parametric primitive.
    fn create(&self, spec: &SolidSpec) -> KernelResult<SolidId>;

    /// Split a solid by a plane into (negative side, positive side).
    fn split(&self, solid: SolidId, plane: &Plane) -> KernelResult<(SolidId, SolidId)>;

    /// Boolean union of `target` with `tool`.
    fn fuse(&self, target: SolidId, tool: SolidId) -> KernelResult<SolidId>;

    /// Boolean subtraction of `tool` from `target`.
    ///
    /// When `region` is given, the kernel may restrict the cut to that
    /// sub-region of `target`; the tool is guaranteed to lie inside it.
    fn cut(&self, target: SolidId, tool: SolidId, region: Option<&Aabb>) -> KernelResult<SolidId>;

    /// Release a handle the core no longer needs.
    ///
    /// Retiring an unknown handle is a no-op.
    fn retire(&self, solid: SolidId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_spec_equality() {
        let a = SolidSpec::Cylinder {
            base: Point3::new(0.0, 0.0, 0.0),
            axis: Vec3::new(0.0, 0.0, 1.0),
            radius: 0.4,
            height: 5.0,
        };
        assert_eq!(a, a.clone());
    }
}
