//! Constant fills: clear and boundary stamping.

use glam::Vec3;
use plume_core::{DispatchFailure, GridFormat};
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{par_region, store};

/// `output = value` over the region.
pub(crate) fn clear(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let value = Vec3::splat(args.float("value")?);
    let out = args.output("output")?;
    par_region(out, region, |_, slot| store(slot, value));
    Ok(())
}

/// Mark the region of a mask solid.
pub(crate) fn boundary(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let out = args.output_as("output", GridFormat::Scalar)?;
    par_region(out, region, |_, slot| slot[0] = 1.0);
    Ok(())
}
