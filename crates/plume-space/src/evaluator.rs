//! Shape-to-voxel conversion: kernel parameters and dispatch boxes.

use glam::{Mat4, Vec3};
use plume_core::ShapeKind;

use crate::descriptor::SpatialDescriptor;
use crate::shape::Shape;
use crate::voxel_box::VoxelBox;

/// Voxel-space parameters a shape kernel needs.
///
/// A voxel-space point `p` is inside the shape when the transformed point
/// `voxel_to_local.transform_point3(p)`, divided component-wise by
/// `extents`, has length ≤ 1 (sphere) or max-abs component ≤ 1 (box).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParameters {
    /// Which kernel variant applies.
    pub kind: ShapeKind,
    /// Shape centre in voxel coordinates.
    pub center: Vec3,
    /// Half edge lengths (box) or semi-axes (sphere), in voxels.
    pub extents: Vec3,
    /// Rotation about `center`, then translation to `center`.
    pub local_to_voxel: Mat4,
    /// Inverse of `local_to_voxel`.
    pub voxel_to_local: Mat4,
}

/// Converts world-space shapes into per-grid kernel inputs.
#[derive(Clone, Copy, Debug)]
pub struct ShapeEvaluator {
    descriptor: SpatialDescriptor,
}

impl ShapeEvaluator {
    /// Evaluator bound to one grid's sizing.
    pub fn new(descriptor: SpatialDescriptor) -> Self {
        Self { descriptor }
    }

    /// The grid sizing this evaluator maps into.
    pub fn descriptor(&self) -> &SpatialDescriptor {
        &self.descriptor
    }

    /// Centre, extents and placement of `shape` in voxel space.
    ///
    /// Scale is taken from the absolute decomposed scale of the shape's
    /// unit transform, so shear in `local_to_world` is discarded.
    pub fn parameters_for(&self, shape: &Shape) -> ShapeParameters {
        let tpu = self.descriptor.texel_per_unit() as f32;
        let (scale, rotation, translation) = shape.unit_to_world().to_scale_rotation_translation();
        let center = self.descriptor.world_to_voxel(translation);
        let local_to_voxel = Mat4::from_rotation_translation(rotation, center);
        ShapeParameters {
            kind: shape.kind(),
            center,
            extents: scale.abs() * 0.5 * tpu,
            local_to_voxel,
            voxel_to_local: local_to_voxel.inverse(),
        }
    }

    /// Voxel box covering `shape`, clamped to the grid.
    ///
    /// Returns `None` when the clamped box is less than one voxel on any
    /// axis, or when the shape has a zero or non-finite extent (a shape
    /// scaled to nothing); the caller skips such shapes without
    /// dispatching.
    pub fn dispatch_box_for(&self, shape: &Shape) -> Option<VoxelBox> {
        let params = self.parameters_for(shape);
        if !params.extents.is_finite()
            || params.extents.cmple(Vec3::ZERO).any()
            || !params.voxel_to_local.is_finite()
        {
            return None;
        }
        let bounds = shape.bounds();
        let res = self.descriptor.resolution().as_vec3();
        // Clamp before casting so far-away bounds cannot overflow.
        let clamp = |v: Vec3| v.max(Vec3::ZERO).min(res).as_uvec3();
        let min = clamp(self.descriptor.world_to_voxel(bounds.min).floor());
        let max = clamp(self.descriptor.world_to_voxel(bounds.max).floor() + Vec3::ONE);
        if min.cmpge(max).any() {
            return None;
        }
        Some(VoxelBox::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, UVec3};
    use plume_core::Aabb;

    fn eight_cubed() -> ShapeEvaluator {
        let b = Aabb::from_min_size(Vec3::ZERO, Vec3::splat(8.0));
        ShapeEvaluator::new(SpatialDescriptor::compute(b, 8).unwrap())
    }

    #[test]
    fn sphere_parameters_in_voxels() {
        let e = eight_cubed();
        let p = e.parameters_for(&Shape::sphere(Vec3::splat(4.0), 1.0));
        assert_eq!(p.kind, ShapeKind::Sphere);
        assert!((p.center - Vec3::splat(32.0)).length() < 1e-4);
        assert!((p.extents - Vec3::splat(8.0)).length() < 1e-4);
        let local = p.voxel_to_local.transform_point3(Vec3::new(40.0, 32.0, 32.0));
        assert!((local - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn box_rotation_survives() {
        let e = eight_cubed();
        let rot = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let p = e.parameters_for(&Shape::cuboid(Vec3::splat(4.0), Vec3::new(2.0, 1.0, 1.0), rot));
        assert!((p.extents - Vec3::new(8.0, 4.0, 4.0)).length() < 1e-3);
        // Local +x now points along world +y.
        let local = p.voxel_to_local.transform_point3(Vec3::new(32.0, 40.0, 32.0));
        assert!((local - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn dispatch_box_covers_sphere() {
        let e = eight_cubed();
        let b = e.dispatch_box_for(&Shape::sphere(Vec3::splat(4.0), 1.0)).unwrap();
        assert_eq!(b.min, UVec3::splat(24));
        assert_eq!(b.max, UVec3::splat(41));
    }

    #[test]
    fn dispatch_box_clamps_to_grid() {
        let e = eight_cubed();
        let b = e.dispatch_box_for(&Shape::sphere(Vec3::new(0.0, 4.0, 8.0), 1.0)).unwrap();
        assert_eq!(b.min.x, 0);
        assert_eq!(b.max.z, 64);
        assert!(b.fits(UVec3::splat(64)));
    }

    #[test]
    fn shape_outside_grid_is_skipped() {
        let e = eight_cubed();
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(-5.0), 1.0)).is_none());
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(20.0), 1.0)).is_none());
    }

    #[test]
    fn tiny_shape_still_gets_one_voxel() {
        let e = eight_cubed();
        let b = e.dispatch_box_for(&Shape::sphere(Vec3::splat(4.01), 0.001)).unwrap();
        assert_eq!(b.extent(), UVec3::ONE);
    }

    #[test]
    fn far_away_shapes_never_overflow() {
        let e = eight_cubed();
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(1e9), 1.0)).is_none());
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(-1e9), 1.0)).is_none());
        // A huge shape around the grid covers all of it.
        let b = e.dispatch_box_for(&Shape::sphere(Vec3::splat(4.0), 1e9)).unwrap();
        assert_eq!(b.min, UVec3::ZERO);
        assert_eq!(b.max, UVec3::splat(64));
    }

    #[test]
    fn zero_scale_shapes_are_skipped() {
        let e = eight_cubed();
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(4.0), 0.0)).is_none());
        let flat = Shape::cuboid(Vec3::splat(4.0), Vec3::new(1.0, 0.0, 1.0), Quat::IDENTITY);
        assert!(e.dispatch_box_for(&flat).is_none());
        assert!(e.dispatch_box_for(&Shape::sphere(Vec3::splat(f32::NAN), 1.0)).is_none());
    }
}
