//! Benchmark scenes for the Plume fluid solver.
//!
//! Provides pre-built [`FieldConfig`] profiles and a standard scene:
//!
//! - [`reference_config`]: 8-unit cube at 8 voxels per unit (64³)
//! - [`small_config`]: unit cube at 32 voxels per unit (32³)
//! - [`populate_scene`]: one injector, one upward motor, one collider
//! - [`reference_field`]: a populated CPU field ready to tick

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glam::{Quat, Vec3};
use plume_core::{Aabb, MotorKind};
use plume_engine::{
    AdvectionPolicy, Collider, ConfigError, FieldConfig, FluidField, Injector, Motor,
    SceneRegistry, SolverConfig,
};
use plume_kernels::CpuBackend;
use plume_space::Shape;

/// Fixed tick length used by every benchmark.
pub const BENCH_DT: f32 = 1.0 / 30.0;

/// 64³ profile: 8-unit cube, 8 voxels per unit, default solver.
pub fn reference_config(advection: AdvectionPolicy) -> FieldConfig {
    FieldConfig {
        texel_per_unit: 8,
        size: Vec3::splat(8.0),
        solver: SolverConfig {
            advection,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// 32³ profile: unit cube, 32 voxels per unit, default solver.
pub fn small_config(advection: AdvectionPolicy) -> FieldConfig {
    FieldConfig {
        texel_per_unit: 32,
        size: Vec3::ONE,
        solver: SolverConfig {
            advection,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Register the standard scene inside `bounds`: a density source near the
/// floor, a motor pushing up through it, and a collider above.
pub fn populate_scene(scene: &mut SceneRegistry, bounds: Aabb) {
    let size = bounds.size();
    let at = |fx: f32, fy: f32, fz: f32| bounds.min + size * Vec3::new(fx, fy, fz);
    let radius = size.min_element() * 0.1;
    let up = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);

    scene.add_injector(Injector::new(Shape::sphere(at(0.5, 0.2, 0.5), radius), 5.0));
    scene.add_motor(Motor::new(
        Shape::cuboid(at(0.5, 0.2, 0.5), Vec3::splat(radius * 2.5), up),
        MotorKind::Direction,
        2.0,
    ));
    scene.add_motor(Motor::new(
        Shape::sphere(at(0.5, 0.5, 0.5), radius * 1.5),
        MotorKind::Vortex,
        1.0,
    ));
    scene.add_collider(Collider::new(Shape::sphere(at(0.5, 0.7, 0.5), radius)));
}

/// A populated field on the default CPU backend.
pub fn reference_field(config: FieldConfig) -> Result<FluidField<CpuBackend>, ConfigError> {
    let mut field = FluidField::new(config, CpuBackend::new())?;
    let bounds = field.simulator().descriptor().bounds();
    populate_scene(field.registry_mut(), bounds);
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;

    #[test]
    fn profiles_have_expected_resolution() {
        let field = reference_field(reference_config(AdvectionPolicy::Bfecc)).unwrap();
        assert_eq!(field.simulator().resolution(), UVec3::splat(64));
        let field = reference_field(small_config(AdvectionPolicy::Back)).unwrap();
        assert_eq!(field.simulator().resolution(), UVec3::splat(32));
        assert_eq!(field.memory_report().motors, 2);
    }

    #[test]
    fn reference_scene_ticks() {
        let mut field = reference_field(small_config(AdvectionPolicy::Bfecc)).unwrap();
        field.step(BENCH_DT).unwrap();
        field.step(BENCH_DT).unwrap();
        assert!(field.simulator().density().unwrap().sum() > 0.0);
    }
}
