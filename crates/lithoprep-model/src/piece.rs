//! Printable pieces: ownership roots for kernel solids.

use std::sync::Arc;

use lithoprep_kernel::{KernelResult, SolidId, SolidKernel};
use lithoprep_math::{Aabb, Transform};

use crate::face::Face;

/// One printable piece: a kernel solid handle plus its derived faces.
///
/// A piece is the unit of ownership. Transforms and splits consume the
/// piece by value and retire the old handle, so stale geometry can
/// never be referenced — the arena-style one-way transfer from parent
/// to children.
#[derive(Debug, Clone)]
pub struct Piece {
    name: String,
    handle: SolidId,
    faces: Vec<Face>,
    bounds: Aabb,
}

impl Piece {
    /// Build a piece from a kernel solid, enumerating its faces.
    pub fn from_kernel(
        kernel: &dyn SolidKernel,
        handle: SolidId,
        name: impl Into<String>,
    ) -> KernelResult<Self> {
        let faces = kernel
            .faces(handle)?
            .into_iter()
            .enumerate()
            .map(|(index, data)| Face::from_data(index, data))
            .collect();
        let bounds = kernel.bounds(handle)?;
        Ok(Self {
            name: name.into(),
            handle,
            faces,
            bounds,
        })
    }

    /// Assemble a piece from already-derived parts.
    ///
    /// Used by kernels' test fixtures and by callers that enumerate
    /// faces themselves; [`Piece::from_kernel`] is the normal path.
    pub fn from_parts(
        name: impl Into<String>,
        handle: SolidId,
        faces: Vec<Face>,
        bounds: Aabb,
    ) -> Self {
        Self {
            name: name.into(),
            handle,
            faces,
            bounds,
        }
    }

    /// Piece name, used in reports (children get `parent/neg` etc.).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kernel handle.
    pub fn handle(&self) -> SolidId {
        self.handle
    }

    /// The derived face records.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Axis-aligned bounds in the current frame.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Apply a rigid transform, producing the transformed piece.
    ///
    /// The old handle is retired; faces are re-enumerated from the
    /// kernel so every record is consistent with the new frame.
    pub fn transformed(self, kernel: &Arc<dyn SolidKernel>, xform: &Transform) -> KernelResult<Self> {
        let new_handle = kernel.transform(self.handle, xform)?;
        kernel.retire(self.handle);
        Self::from_kernel(kernel.as_ref(), new_handle, self.name)
    }

    /// Consume the piece, handing its handle to a split or boolean step.
    ///
    /// The caller becomes responsible for retiring the handle.
    pub fn into_handle(self) -> SolidId {
        self.handle
    }

    /// Rebuild the piece record after the kernel replaced its solid
    /// (e.g. after registration features were fused/cut).
    pub fn rebuilt(self, kernel: &Arc<dyn SolidKernel>, new_handle: SolidId) -> KernelResult<Self> {
        if new_handle != self.handle {
            kernel.retire(self.handle);
        }
        Self::from_kernel(kernel.as_ref(), new_handle, self.name)
    }
}
