//! Shape rasterisation: obstacles and external forces.

use glam::{Mat4, Vec3};
use plume_core::{DispatchFailure, GridFormat, ShapeKind};
use plume_kernel::{capability, ForcePattern};
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{is_solid, load, par_region, store};

/// A shape's bound parameters in voxel space.
struct Footprint {
    kind: ShapeKind,
    center: Vec3,
    extents: Vec3,
    local_to_world: Mat4,
    world_to_local: Mat4,
}

impl Footprint {
    fn bind(args: &Args<'_, '_>, kind: ShapeKind) -> Result<Self, DispatchFailure> {
        Ok(Self {
            kind,
            center: args.vec3("center")?,
            extents: args.vec3(capability(kind).extent_binding)?,
            local_to_world: args.mat4("local_to_world")?,
            world_to_local: args.mat4("world_to_local")?,
        })
    }

    /// Normalised distance from the centre: ≤ 1 inside.
    fn radius(&self, p: Vec3) -> f32 {
        let local = self.world_to_local.transform_point3(p) / self.extents;
        match self.kind {
            ShapeKind::Sphere => local.length(),
            ShapeKind::Box => local.abs().max_element(),
        }
    }
}

/// Whether a normalised radius lies inside the shape. NaN is outside.
fn inside_radius(r: f32) -> bool {
    r <= 1.0
}

/// Stamp a collider: `mask = max(mask, 1)` and `obstacle_velocity = velocity`
/// for voxel centres inside the shape.
pub(crate) fn obstacle(
    args: &mut Args<'_, '_>,
    region: VoxelBox,
    kind: ShapeKind,
) -> Result<(), DispatchFailure> {
    let shape = Footprint::bind(args, kind)?;
    let velocity = args.vec3("velocity")?;
    let mask = args.output_as("mask", GridFormat::Scalar)?;
    let obstacle_velocity = args.output_as("obstacle_velocity", GridFormat::Vector)?;

    let inside = |v: glam::UVec3| inside_radius(shape.radius(v.as_vec3() + 0.5));
    par_region(mask, region, |v, slot| {
        if inside(v) {
            slot[0] = slot[0].max(1.0);
        }
    });
    par_region(obstacle_velocity, region, |v, slot| {
        if inside(v) {
            store(slot, velocity);
        }
    });
    Ok(())
}

/// Add an injector or motor contribution inside the shape.
///
/// Weight is `1 - r^falloff` for normalised radius `r`; solid voxels are
/// skipped. `Scalar` adds `amount * weight`; the motor patterns add a unit
/// direction scaled by the same factor.
pub(crate) fn external(
    args: &mut Args<'_, '_>,
    region: VoxelBox,
    kind: ShapeKind,
    pattern: ForcePattern,
) -> Result<(), DispatchFailure> {
    let shape = Footprint::bind(args, kind)?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let amount = args.float("amount")?;
    let falloff = args.float("falloff")?;
    let out = match pattern {
        ForcePattern::Scalar => args.output("output")?,
        _ => args.output_as("output", GridFormat::Vector)?,
    };

    let axis = |local: Vec3| shape.local_to_world.transform_vector3(local).normalize_or_zero();
    let forward = axis(Vec3::Z);
    let up = axis(Vec3::Y);

    par_region(out, region, |v, slot| {
        let p = v.as_vec3() + 0.5;
        let r = shape.radius(p);
        if !inside_radius(r) || is_solid(obstacles, v.as_ivec3()) {
            return;
        }
        let weight = amount * (1.0 - r.powf(falloff));
        let offset = p - shape.center;
        let add = match pattern {
            ForcePattern::Scalar => Vec3::splat(weight),
            ForcePattern::Direction => forward * weight,
            ForcePattern::Omni => offset.normalize_or_zero() * weight,
            ForcePattern::Vortex => up.cross(offset).normalize_or_zero() * weight,
        };
        store(slot, load(slot) + add);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint(kind: ShapeKind) -> Footprint {
        let m = Mat4::from_translation(Vec3::splat(8.0));
        Footprint {
            kind,
            center: Vec3::splat(8.0),
            extents: Vec3::new(4.0, 2.0, 2.0),
            local_to_world: m,
            world_to_local: m.inverse(),
        }
    }

    #[test]
    fn sphere_radius_is_ellipsoidal() {
        let s = footprint(ShapeKind::Sphere);
        assert!((s.radius(Vec3::new(12.0, 8.0, 8.0)) - 1.0).abs() < 1e-6);
        assert!((s.radius(Vec3::new(8.0, 9.0, 8.0)) - 0.5).abs() < 1e-6);
        assert!(s.radius(Vec3::new(11.0, 9.5, 8.0)) > 1.0);
    }

    #[test]
    fn box_radius_is_max_norm() {
        let b = footprint(ShapeKind::Box);
        assert!((b.radius(Vec3::new(11.0, 9.5, 8.0)) - 0.75).abs() < 1e-6);
        assert!(b.radius(Vec3::new(8.0, 10.5, 8.0)) > 1.0);
    }

    #[test]
    fn degenerate_footprint_covers_nothing() {
        let mut s = footprint(ShapeKind::Sphere);
        s.extents = Vec3::ZERO;
        let r = s.radius(Vec3::splat(8.0));
        assert!(r.is_nan());
        assert!(!inside_radius(r));
        assert!(!inside_radius(f32::INFINITY));
        assert!(inside_radius(1.0));
    }
}
