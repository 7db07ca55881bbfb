//! Post-process kernels: density gradient and jump flooding.

use glam::{IVec3, Vec3};
use plume_core::{DispatchFailure, GridFormat};
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{fetch_scalar, par_region, store};

/// Seed value for a voxel with no nearest seed yet.
pub const NO_SEED: f32 = -1.0;

/// Central-difference gradient of a scalar field.
pub(crate) fn gradient(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let source = args.input("source")?;
    let out = args.output_as("output", GridFormat::Vector)?;
    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        let d = |o: IVec3| fetch_scalar(source, iv + o) - fetch_scalar(source, iv - o);
        store(slot, 0.5 * Vec3::new(d(IVec3::X), d(IVec3::Y), d(IVec3::Z)));
    });
    Ok(())
}

/// Seed every voxel whose `source` reaches `threshold` with its own
/// coordinate; everything else gets [`NO_SEED`].
pub(crate) fn jfa_init(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let source = args.input("source")?;
    let threshold = args.float("threshold")?;
    let out = args.output_as("output", GridFormat::Vector)?;
    par_region(out, region, |v, slot| {
        let seed = if source.vector(v).x >= threshold {
            v.as_vec3()
        } else {
            Vec3::splat(NO_SEED)
        };
        store(slot, seed);
    });
    Ok(())
}

/// One jump-flood pass: adopt the nearest seed among the 27 voxels at
/// offsets `{-step, 0, step}³`.
pub(crate) fn jfa(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let input = args.input_as("input", GridFormat::Vector)?;
    let step = args.int("step")?;
    if step < 1 {
        return Err(DispatchFailure::Backend {
            reason: format!("jump-flood step must be positive, got {step}"),
        });
    }
    let out = args.output_as("output", GridFormat::Vector)?;
    let res = input.resolution().as_ivec3();

    par_region(out, region, |v, slot| {
        let here = v.as_vec3();
        let iv = v.as_ivec3();
        let mut best = Vec3::splat(NO_SEED);
        let mut best_d2 = f32::INFINITY;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let n = iv + IVec3::new(dx, dy, dz) * step;
                    if n.cmplt(IVec3::ZERO).any() || n.cmpge(res).any() {
                        continue;
                    }
                    let seed = input.vector(n.as_uvec3());
                    if seed.x < 0.0 {
                        continue;
                    }
                    let d2 = seed.distance_squared(here);
                    if d2 < best_d2 {
                        best_d2 = d2;
                        best = seed;
                    }
                }
            }
        }
        store(slot, best);
    });
    Ok(())
}
