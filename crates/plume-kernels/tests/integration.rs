//! Kernel behaviour through the public dispatcher.
//!
//! Each test drives `CpuBackend` via `KernelDispatcher` on a real
//! `GridBufferSet`, the same path the simulator uses.

use plume_core::{DispatchFailure, GridFormat, ShapeKind, UVec3, Vec3};
use plume_grid::{GridBufferSet, GridRole};
use plume_kernel::{bind_shape, Bindings, ForcePattern, KernelDispatcher, KernelId};
use plume_kernels::{CpuBackend, NO_SEED};
use plume_space::{Shape, ShapeEvaluator, SpatialDescriptor, VoxelBox};

const N: u32 = 16;

fn setup() -> (KernelDispatcher<CpuBackend>, GridBufferSet) {
    (
        KernelDispatcher::new(CpuBackend::new()),
        GridBufferSet::new(UVec3::splat(N)),
    )
}

fn full() -> VoxelBox {
    VoxelBox::full(UVec3::splat(N))
}

fn stamp_walls(d: &mut KernelDispatcher<CpuBackend>, grids: &mut GridBufferSet) {
    let b = Bindings::new().with_output("output", grids.slot(GridRole::Obstacles));
    for face in VoxelBox::faces(UVec3::splat(N)) {
        d.dispatch(grids, KernelId::Boundary, &b, face).unwrap();
    }
}

fn advect_bindings(grids: &GridBufferSet, source: GridRole, out: GridRole, dt: f32) -> Bindings {
    Bindings::new()
        .with_input("velocity", grids.slot(GridRole::Velocity))
        .with_input("source", grids.slot(source))
        .with_input("obstacles", grids.slot(GridRole::Obstacles))
        .with_input("obstacle_velocity", grids.slot(GridRole::ObstacleVelocity))
        .with_output("output", grids.slot(out))
        .with_float("dt", dt)
        .with_float("modulate", 1.0)
}

#[test]
fn boundary_faces_mark_only_the_shell() {
    let (mut d, mut grids) = setup();
    stamp_walls(&mut d, &mut grids);
    let mask = grids.grid(GridRole::Obstacles).unwrap();
    let shell = N * N * N - (N - 2) * (N - 2) * (N - 2);
    assert_eq!(mask.sum(), shell as f64);
    assert_eq!(mask.scalar(UVec3::splat(5)), 0.0);
    assert_eq!(mask.scalar(UVec3::new(0, 5, 5)), 1.0);
    assert_eq!(d.count(KernelId::Boundary), 6);
}

#[test]
fn advection_shifts_by_whole_voxels() {
    let (mut d, mut grids) = setup();
    grids
        .grid_mut(GridRole::Velocity)
        .unwrap()
        .data_mut()
        .chunks_mut(3)
        .for_each(|v| v[0] = 2.0);
    grids
        .grid_mut(GridRole::Density)
        .unwrap()
        .set_scalar(UVec3::new(5, 8, 8), 1.0);

    let b = advect_bindings(&grids, GridRole::Density, GridRole::DensityNext, 1.0);
    d.dispatch(&mut grids, KernelId::Advect, &b, full()).unwrap();

    let out = grids.grid(GridRole::DensityNext).unwrap();
    assert_eq!(out.scalar(UVec3::new(7, 8, 8)), 1.0);
    assert_eq!(out.scalar(UVec3::new(5, 8, 8)), 0.0);
    assert_eq!(out.sum(), 1.0);
}

#[test]
fn reverse_trace_undoes_forward_trace() {
    let (mut d, mut grids) = setup();
    grids
        .grid_mut(GridRole::Velocity)
        .unwrap()
        .data_mut()
        .chunks_mut(3)
        .for_each(|v| v[1] = 1.0);
    grids
        .grid_mut(GridRole::Density)
        .unwrap()
        .set_scalar(UVec3::new(8, 6, 8), 3.0);

    let fwd = advect_bindings(&grids, GridRole::Density, GridRole::TempVector, 1.0);
    d.dispatch(&mut grids, KernelId::Advect, &fwd, full()).unwrap();
    let back = advect_bindings(&grids, GridRole::TempVector, GridRole::TempScalar, -1.0);
    d.dispatch(&mut grids, KernelId::Advect, &back, full()).unwrap();

    let moved = grids.grid(GridRole::TempVector).unwrap();
    assert_eq!(moved.vector(UVec3::new(8, 7, 8)), Vec3::splat(3.0));
    let restored = grids.grid(GridRole::TempScalar).unwrap();
    assert_eq!(restored.scalar(UVec3::new(8, 6, 8)), 3.0);
}

#[test]
fn bfecc_with_still_fluid_matches_source() {
    let (mut d, mut grids) = setup();
    let density = grids.grid_mut(GridRole::Density).unwrap();
    for (i, v) in density.data_mut().iter_mut().enumerate() {
        *v = (i % 7) as f32 * 0.25;
    }
    let src = grids.grid(GridRole::Density).unwrap().clone();
    let b = Bindings::new()
        .with_input("velocity", grids.slot(GridRole::Velocity))
        .with_input("source", grids.slot(GridRole::Density))
        .with_input("reverse", grids.slot(GridRole::Density))
        .with_input("obstacles", grids.slot(GridRole::Obstacles))
        .with_output("output", grids.slot(GridRole::DensityNext))
        .with_float("dt", 0.1)
        .with_float("modulate", 0.5)
        .with_int("clamp", 0);
    d.dispatch(&mut grids, KernelId::Bfecc, &b, full()).unwrap();
    let out = grids.grid(GridRole::DensityNext).unwrap();
    for (a, b) in out.data().iter().zip(src.data()) {
        assert_eq!(*a, *b * 0.5);
    }
}

#[test]
fn solid_voxels_advect_obstacle_velocity() {
    let (mut d, mut grids) = setup();
    stamp_walls(&mut d, &mut grids);
    grids
        .grid_mut(GridRole::ObstacleVelocity)
        .unwrap()
        .set_vector(UVec3::new(0, 4, 4), Vec3::new(0.0, 3.0, 0.0));
    grids
        .grid_mut(GridRole::Velocity)
        .unwrap()
        .data_mut()
        .fill(1.0);
    let b = advect_bindings(&grids, GridRole::Velocity, GridRole::VelocityNext, 0.1);
    d.dispatch(&mut grids, KernelId::Advect, &b, full()).unwrap();
    let out = grids.grid(GridRole::VelocityNext).unwrap();
    assert_eq!(out.vector(UVec3::new(0, 4, 4)), Vec3::new(0.0, 3.0, 0.0));
    assert_eq!(out.vector(UVec3::new(0, 5, 4)), Vec3::ZERO);
    assert_eq!(out.vector(UVec3::splat(6)), Vec3::ONE);
}

#[test]
fn obstacle_stamps_sphere_with_velocity() {
    let (mut d, mut grids) = setup();
    let desc = SpatialDescriptor::compute(
        plume_core::Aabb::from_min_size(Vec3::ZERO, Vec3::splat(2.0)),
        8,
    )
    .unwrap();
    let eval = ShapeEvaluator::new(desc);
    let shape = Shape::sphere(Vec3::ONE, 0.5);
    let region = eval.dispatch_box_for(&shape).unwrap();
    let b = bind_shape(
        &eval.parameters_for(&shape),
        Bindings::new()
            .with_output("mask", grids.slot(GridRole::Obstacles))
            .with_output("obstacle_velocity", grids.slot(GridRole::ObstacleVelocity))
            .with_vec3("velocity", Vec3::new(8.0, 0.0, 0.0)),
    );
    d.dispatch(&mut grids, KernelId::Obstacle(ShapeKind::Sphere), &b, region)
        .unwrap();

    let mask = grids.grid(GridRole::Obstacles).unwrap();
    assert_eq!(mask.scalar(UVec3::splat(8)), 1.0);
    assert_eq!(mask.scalar(UVec3::new(8, 8, 12)), 0.0);
    assert_eq!(mask.scalar(UVec3::new(1, 1, 1)), 0.0);
    let ov = grids.grid(GridRole::ObstacleVelocity).unwrap();
    assert_eq!(ov.vector(UVec3::splat(7)), Vec3::new(8.0, 0.0, 0.0));
    // Voxels outside the sphere keep zero velocity.
    let inside = mask.data().iter().filter(|&&m| m >= 1.0).count();
    assert!(inside > 200 && inside < 4 * 4 * 4 * 8);
    assert_eq!(ov.sum(), inside as f64 * 8.0);
}

#[test]
fn injector_adds_weighted_density_inside_box() {
    let (mut d, mut grids) = setup();
    let desc = SpatialDescriptor::compute(
        plume_core::Aabb::from_min_size(Vec3::ZERO, Vec3::splat(16.0)),
        1,
    )
    .unwrap();
    let eval = ShapeEvaluator::new(desc);
    let shape = Shape::cuboid(Vec3::splat(8.0), Vec3::splat(4.0), Default::default());
    let region = eval.dispatch_box_for(&shape).unwrap();
    let b = bind_shape(
        &eval.parameters_for(&shape),
        Bindings::new()
            .with_input("obstacles", grids.slot(GridRole::Obstacles))
            .with_output("output", grids.slot(GridRole::Density))
            .with_float("amount", 2.0)
            .with_float("falloff", 2.4),
    );
    let kernel = KernelId::External(ShapeKind::Box, ForcePattern::Scalar);
    d.dispatch(&mut grids, kernel, &b, region).unwrap();
    d.dispatch(&mut grids, kernel, &b, region).unwrap();

    let g = grids.grid(GridRole::Density).unwrap();
    // Voxel 7 centre is 0.5 from the box centre: r = 0.25.
    let expected = 2.0 * 2.0 * (1.0 - 0.25f32.powf(2.4));
    assert!((g.scalar(UVec3::splat(7)) - expected).abs() < 1e-4);
    assert_eq!(g.scalar(UVec3::new(3, 8, 8)), 0.0);
    assert!(g.data().iter().all(|&x| x >= 0.0));
}

#[test]
fn omni_motor_pushes_outward() {
    let (mut d, mut grids) = setup();
    let desc = SpatialDescriptor::compute(
        plume_core::Aabb::from_min_size(Vec3::ZERO, Vec3::splat(16.0)),
        1,
    )
    .unwrap();
    let eval = ShapeEvaluator::new(desc);
    let shape = Shape::sphere(Vec3::splat(8.0), 4.0);
    let b = bind_shape(
        &eval.parameters_for(&shape),
        Bindings::new()
            .with_input("obstacles", grids.slot(GridRole::Obstacles))
            .with_output("output", grids.slot(GridRole::Velocity))
            .with_float("amount", 1.0)
            .with_float("falloff", 2.4),
    );
    let region = eval.dispatch_box_for(&shape).unwrap();
    d.dispatch(
        &mut grids,
        KernelId::External(ShapeKind::Sphere, ForcePattern::Omni),
        &b,
        region,
    )
    .unwrap();
    let v = grids.grid(GridRole::Velocity).unwrap();
    assert!(v.vector(UVec3::new(10, 8, 8)).x > 0.0);
    assert!(v.vector(UVec3::new(5, 8, 8)).x < 0.0);
}

fn divergence_energy(
    d: &mut KernelDispatcher<CpuBackend>,
    grids: &mut GridBufferSet,
    velocity: GridRole,
) -> f64 {
    let b = Bindings::new()
        .with_input("velocity", grids.slot(velocity))
        .with_input("obstacles", grids.slot(GridRole::Obstacles))
        .with_input("obstacle_velocity", grids.slot(GridRole::ObstacleVelocity))
        .with_output("output", grids.slot(GridRole::TempVector));
    d.dispatch(grids, KernelId::Divergence, &b, full()).unwrap();
    grids
        .grid(GridRole::TempVector)
        .unwrap()
        .data()
        .chunks(3)
        .map(|c| (c[0] as f64).powi(2))
        .sum()
}

#[test]
fn divergence_of_point_source() {
    let (mut d, mut grids) = setup();
    {
        let v = grids.grid_mut(GridRole::VelocityNext).unwrap();
        v.set_vector(UVec3::new(7, 8, 8), Vec3::new(-1.0, 0.0, 0.0));
        v.set_vector(UVec3::new(9, 8, 8), Vec3::new(1.0, 0.0, 0.0));
    }
    divergence_energy(&mut d, &mut grids, GridRole::VelocityNext);
    let div = grids.grid(GridRole::TempVector).unwrap();
    assert_eq!(div.vector(UVec3::splat(8)), Vec3::ONE);
    assert_eq!(div.scalar(UVec3::new(6, 8, 8)), -0.5);
    assert_eq!(div.scalar(UVec3::new(10, 8, 8)), -0.5);
}

#[test]
fn projection_removes_divergence() {
    let (mut d, mut grids) = setup();
    stamp_walls(&mut d, &mut grids);
    // Smooth outward blob centred in the grid.
    {
        let v = grids.grid_mut(GridRole::VelocityNext).unwrap();
        for z in 0..N {
            for y in 0..N {
                for x in 0..N {
                    let p = UVec3::new(x, y, z);
                    let off = p.as_vec3() + 0.5 - Vec3::splat(N as f32 * 0.5);
                    v.set_vector(p, off * (-off.length_squared() / 6.25).exp());
                }
            }
        }
    }
    let before = divergence_energy(&mut d, &mut grids, GridRole::VelocityNext);
    assert!(before > 0.0);

    for _ in 0..200 {
        let b = Bindings::new()
            .with_input("input0", grids.slot(GridRole::TempVector))
            .with_input("input1", grids.slot(GridRole::Pressure))
            .with_input("obstacles", grids.slot(GridRole::Obstacles))
            .with_output("output", grids.slot(GridRole::TempScalar))
            .with_float("alpha", -1.0)
            .with_float("rbeta", 1.0 / 6.0);
        d.dispatch(&mut grids, KernelId::Jacobi, &b, full()).unwrap();
        grids.swap(GridRole::Pressure, GridRole::TempScalar).unwrap();
    }
    assert_eq!(d.count(KernelId::Jacobi), 200);

    let proj = Bindings::new()
        .with_input("velocity", grids.slot(GridRole::VelocityNext))
        .with_input("pressure", grids.slot(GridRole::Pressure))
        .with_input("obstacles", grids.slot(GridRole::Obstacles))
        .with_input("obstacle_velocity", grids.slot(GridRole::ObstacleVelocity))
        .with_output("output", grids.slot(GridRole::Velocity));
    d.dispatch(&mut grids, KernelId::Project, &proj, full()).unwrap();
    let after = divergence_energy(&mut d, &mut grids, GridRole::Velocity);
    assert!(after < before * 0.5, "divergence energy {before} -> {after}");
}

#[test]
fn wrong_grid_format_is_reported() {
    let (mut d, mut grids) = setup();
    let b = Bindings::new().with_output("output", grids.slot(GridRole::Velocity));
    let err = d
        .dispatch(&mut grids, KernelId::Boundary, &b, full())
        .unwrap_err();
    assert_eq!(err.kernel, "boundary");
    assert!(matches!(
        err.failure,
        DispatchFailure::FormatMismatch {
            expected: GridFormat::Scalar,
            found: GridFormat::Vector,
            ..
        }
    ));
    assert_eq!(d.count(KernelId::Boundary), 0);
}

#[test]
fn jump_flood_finds_nearest_seed() {
    let (mut d, mut grids) = setup();
    {
        let g = grids.grid_mut(GridRole::Density).unwrap();
        g.set_scalar(UVec3::new(2, 2, 2), 1.0);
        g.set_scalar(UVec3::new(13, 12, 11), 1.0);
    }
    let init = Bindings::new()
        .with_input("source", grids.slot(GridRole::Density))
        .with_output("output", grids.slot(GridRole::VelocityNext))
        .with_float("threshold", 0.5);
    d.dispatch(&mut grids, KernelId::JfaInit, &init, full()).unwrap();
    grids
        .swap(GridRole::VelocityNext, GridRole::DistanceField)
        .unwrap();
    for pow in (0..4).rev() {
        let b = Bindings::new()
            .with_input("input", grids.slot(GridRole::DistanceField))
            .with_output("output", grids.slot(GridRole::VelocityNext))
            .with_int("step", 1 << pow);
        d.dispatch(&mut grids, KernelId::Jfa, &b, full()).unwrap();
        grids
            .swap(GridRole::VelocityNext, GridRole::DistanceField)
            .unwrap();
    }
    let sdf = grids.grid(GridRole::DistanceField).unwrap();
    assert_eq!(sdf.vector(UVec3::new(0, 0, 0)), Vec3::splat(2.0));
    assert_eq!(sdf.vector(UVec3::new(15, 15, 15)), Vec3::new(13.0, 12.0, 11.0));
    assert_eq!(sdf.vector(UVec3::new(4, 3, 2)), Vec3::splat(2.0));
    assert!(sdf.data().iter().all(|&x| x != NO_SEED));
}

#[test]
fn dedicated_pool_runs_kernels() {
    let mut d = KernelDispatcher::new(CpuBackend::with_threads(2).unwrap());
    let mut grids = GridBufferSet::new(UVec3::splat(N));
    assert_eq!(d.backend().threads(), 2);
    let b = Bindings::new()
        .with_output("output", grids.slot(GridRole::Pressure))
        .with_float("value", 0.5);
    d.dispatch(&mut grids, KernelId::Clear, &b, full()).unwrap();
    assert_eq!(
        grids.grid(GridRole::Pressure).unwrap().sum(),
        0.5 * (N * N * N) as f64
    );
}
