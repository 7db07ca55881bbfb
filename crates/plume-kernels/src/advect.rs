//! Semi-Lagrangian advection and the BFECC combine.

use glam::Vec3;
use plume_core::{DispatchFailure, GridFormat};
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{is_solid, par_region, sample, sample_range, store};

/// Trace each voxel centre along `-dt * velocity` and sample `source`.
///
/// A negative `dt` traces forward. Solid voxels take the bound
/// `obstacle_velocity`, or zero when it is left unbound.
pub(crate) fn advect(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let velocity = args.input_as("velocity", GridFormat::Vector)?;
    let source = args.input("source")?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let obstacle_velocity = args.optional_input_as("obstacle_velocity", GridFormat::Vector)?;
    let dt = args.float("dt")?;
    let modulate = args.float("modulate")?;
    let out = args.output("output")?;

    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        if is_solid(obstacles, iv) {
            store(slot, obstacle_velocity.map_or(Vec3::ZERO, |g| g.vector(v)));
            return;
        }
        let p = v.as_vec3() + 0.5 - dt * velocity.vector(v);
        store(slot, sample(source, p) * modulate);
    });
    Ok(())
}

/// Combine `phi + 0.5 * (phi - reverse)` at the backward trace position.
///
/// `source` is the field at the start of the tick and `reverse` the result
/// of advecting it forward then back. With `clamp != 0` the result is
/// limited to the range of the eight `source` voxels around the trace.
pub(crate) fn bfecc(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let velocity = args.input_as("velocity", GridFormat::Vector)?;
    let source = args.input("source")?;
    let reverse = args.input("reverse")?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let dt = args.float("dt")?;
    let modulate = args.float("modulate")?;
    let clamp = args.int("clamp")? != 0;
    let out = args.output("output")?;

    par_region(out, region, |v, slot| {
        if is_solid(obstacles, v.as_ivec3()) {
            store(slot, Vec3::ZERO);
            return;
        }
        let p = v.as_vec3() + 0.5 - dt * velocity.vector(v);
        let phi = sample(source, p);
        let phi_bar = sample(reverse, p);
        let mut corrected = phi + 0.5 * (phi - phi_bar);
        if clamp {
            let (lo, hi) = sample_range(source, p);
            corrected = corrected.clamp(lo, hi);
        }
        store(slot, corrected * modulate);
    });
    Ok(())
}
