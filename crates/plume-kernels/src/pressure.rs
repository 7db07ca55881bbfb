//! Divergence, Jacobi relaxation and gradient subtraction.
//!
//! Solid neighbours act as walls moving with the obstacle velocity: the
//! divergence reads their obstacle velocity, relaxation and projection
//! mirror the centre value across them (zero normal pressure gradient).

use glam::{IVec3, Vec3};
use plume_core::{DispatchFailure, GridFormat};
use plume_space::VoxelBox;

use crate::args::Args;
use crate::grid_helpers::{fetch, is_solid, par_region, store, FACES};

/// `0.5 * (∂u/∂x + ∂v/∂y + ∂w/∂z)`, written as a splat.
pub(crate) fn divergence(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let velocity = args.input_as("velocity", GridFormat::Vector)?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let obstacle_velocity = args.input_as("obstacle_velocity", GridFormat::Vector)?;
    let out = args.output("output")?;

    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        if is_solid(obstacles, iv) {
            store(slot, Vec3::ZERO);
            return;
        }
        let at = |o: IVec3| {
            let n = iv + o;
            if is_solid(obstacles, n) {
                fetch(obstacle_velocity, n)
            } else {
                fetch(velocity, n)
            }
        };
        let div = 0.5
            * ((at(IVec3::X).x - at(IVec3::NEG_X).x)
                + (at(IVec3::Y).y - at(IVec3::NEG_Y).y)
                + (at(IVec3::Z).z - at(IVec3::NEG_Z).z));
        store(slot, Vec3::splat(div));
    });
    Ok(())
}

/// `output = (Σ neighbours(input1) + alpha * input0) * rbeta`.
///
/// Works per component, so the same kernel relaxes pressure (scalar) and
/// smooths vector fields. Solid neighbours contribute the centre value;
/// solid centres copy `input1` through.
pub(crate) fn jacobi(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let b = args.input("input0")?;
    let x = args.input("input1")?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let alpha = args.float("alpha")?;
    let rbeta = args.float("rbeta")?;
    let out = args.output("output")?;

    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        let centre = x.vector(v);
        if is_solid(obstacles, iv) {
            store(slot, centre);
            return;
        }
        let sum: Vec3 = FACES
            .iter()
            .map(|&o| {
                let n = iv + o;
                if is_solid(obstacles, n) {
                    centre
                } else {
                    fetch(x, n)
                }
            })
            .sum();
        store(slot, (sum + alpha * b.vector(v)) * rbeta);
    });
    Ok(())
}

/// `output = velocity - 0.5 * ∇pressure`, with solid-adjacent components
/// replaced by the neighbour's obstacle velocity.
pub(crate) fn project(args: &mut Args<'_, '_>, region: VoxelBox) -> Result<(), DispatchFailure> {
    let velocity = args.input_as("velocity", GridFormat::Vector)?;
    let pressure = args.input("pressure")?;
    let obstacles = args.input_as("obstacles", GridFormat::Scalar)?;
    let obstacle_velocity = args.input_as("obstacle_velocity", GridFormat::Vector)?;
    let out = args.output_as("output", GridFormat::Vector)?;

    par_region(out, region, |v, slot| {
        let iv = v.as_ivec3();
        if is_solid(obstacles, iv) {
            store(slot, obstacle_velocity.vector(v));
            return;
        }
        let pc = pressure.vector(v).x;
        let mut p = [pc; 6];
        let mut keep = Vec3::ONE;
        let mut wall = Vec3::ZERO;
        for (face, &o) in FACES.iter().enumerate() {
            let n = iv + o;
            let axis = face / 2;
            if is_solid(obstacles, n) {
                keep[axis] = 0.0;
                wall[axis] = fetch(obstacle_velocity, n)[axis];
            } else {
                p[face] = fetch(pressure, n).x;
            }
        }
        let grad = 0.5 * Vec3::new(p[1] - p[0], p[3] - p[2], p[5] - p[4]);
        store(slot, keep * (velocity.vector(v) - grad) + wall);
    });
    Ok(())
}
