//! Per-shape kernel variants and parameter binding.

use plume_core::ShapeKind;
use plume_space::ShapeParameters;

use crate::binding::Bindings;
use crate::kernel::{ForcePattern, KernelId};

/// How one shape kind maps onto kernels.
#[derive(Clone, Copy, Debug)]
pub struct ShapeCapability {
    /// Shape classification.
    pub kind: ShapeKind,
    /// Name of the extents binding for this kind.
    pub extent_binding: &'static str,
}

impl ShapeCapability {
    /// Obstacle rasterisation kernel.
    pub fn obstacle_kernel(&self) -> KernelId {
        KernelId::Obstacle(self.kind)
    }

    /// External-force kernel for `pattern`.
    pub fn external_kernel(&self, pattern: ForcePattern) -> KernelId {
        KernelId::External(self.kind, pattern)
    }
}

/// Capability table, indexed by [`ShapeKind::index`].
pub const SHAPE_CAPABILITIES: [ShapeCapability; 2] = [
    ShapeCapability {
        kind: ShapeKind::Sphere,
        extent_binding: "sphere_scale",
    },
    ShapeCapability {
        kind: ShapeKind::Box,
        extent_binding: "box_extent",
    },
];

/// Capability entry for `kind`.
pub fn capability(kind: ShapeKind) -> &'static ShapeCapability {
    &SHAPE_CAPABILITIES[kind.index()]
}

/// Add a shape's voxel-space parameters to `bindings`.
///
/// Binds `center`, the kind's extents binding, `local_to_world` and
/// `world_to_local` (world here meaning the grid's voxel space).
pub fn bind_shape(params: &ShapeParameters, bindings: Bindings) -> Bindings {
    bindings
        .with_vec3("center", params.center)
        .with_vec3(capability(params.kind).extent_binding, params.extents)
        .with_mat4("local_to_world", params.local_to_voxel)
        .with_mat4("world_to_local", params.voxel_to_local)
}
