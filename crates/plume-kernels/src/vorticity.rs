//! Curl and vorticity confinement.

use glam::{IVec3, Vec3};
use plume_core::{DispatchFailure, GridFormat};
use plume_grid::Grid;
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{fetch, is_solid, load, par_region, store};

fn curl_at(velocity: &Grid, v: IVec3) -> Vec3 {
    let l = fetch(velocity, v - IVec3::X);
    let r = fetch(velocity, v + IVec3::X);
    let b = fetch(velocity, v - IVec3::Y);
    let t = fetch(velocity, v + IVec3::Y);
    let k = fetch(velocity, v - IVec3::Z);
    let f = fetch(velocity, v + IVec3::Z);
    0.5 * Vec3::new(
        (t.z - b.z) - (f.y - k.y),
        (f.x - k.x) - (r.z - l.z),
        (r.y - l.y) - (t.x - b.x),
    )
}

/// Central-difference curl of `velocity`.
pub(crate) fn curl(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let velocity = args.input_as("velocity", GridFormat::Vector)?;
    let out = args.output_as("output", GridFormat::Vector)?;
    par_region(out, region, |v, slot| store(slot, curl_at(velocity, v.as_ivec3())));
    Ok(())
}

/// Add `coefficient * (N × ω) * dt` to the velocity in `output`.
///
/// `N` is the normalised gradient of `|ω|`. Solid voxels are left alone.
pub(crate) fn confinement(
    args: &mut Args<'_, '_>,
    region: VoxelBox,
) -> Result<(), DispatchFailure> {
    let curl = args.input_as("curl", GridFormat::Vector)?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let coefficient = args.float("coefficient")?;
    let dt = args.float("dt")?;
    let out = args.output_as("output", GridFormat::Vector)?;

    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        if is_solid(obstacles, iv) {
            return;
        }
        let mag = |o: IVec3| fetch(curl, iv + o).length();
        let eta = 0.5
            * Vec3::new(
                mag(IVec3::X) - mag(IVec3::NEG_X),
                mag(IVec3::Y) - mag(IVec3::NEG_Y),
                mag(IVec3::Z) - mag(IVec3::NEG_Z),
            );
        let n = eta / (eta.length() + 1e-5);
        let force = coefficient * n.cross(curl.vector(v));
        store(slot, load(slot) + force * dt);
    });
    Ok(())
}
