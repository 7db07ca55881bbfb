//! Shared scenes and seeding helpers.
//!
//! - [`reference_bounds`]: the 8-unit cube at 8 voxels per unit (64³).
//! - [`small_bounds`]: a 1-unit cube, 16³ at 16 voxels per unit.
//! - [`fill_box`], [`fill_vector`], [`seed_pattern`]: initial state.

use glam::{UVec3, Vec3};
use plume_core::Aabb;
use plume_grid::Grid;

/// World bounds `(0,0,0)` + `(8,8,8)`.
pub fn reference_bounds() -> Aabb {
    Aabb::from_min_size(Vec3::ZERO, Vec3::splat(8.0))
}

/// World bounds `(0,0,0)` + `(1,1,1)`.
pub fn small_bounds() -> Aabb {
    Aabb::from_min_size(Vec3::ZERO, Vec3::ONE)
}

/// Write `value` into every voxel of a scalar grid within the box
/// `[min, max)`.
pub fn fill_box(grid: &mut Grid, min: UVec3, max: UVec3, value: f32) {
    for z in min.z..max.z {
        for y in min.y..max.y {
            for x in min.x..max.x {
                grid.set_scalar(UVec3::new(x, y, z), value);
            }
        }
    }
}

/// Set every voxel of a vector grid to `v`.
pub fn fill_vector(grid: &mut Grid, v: Vec3) {
    for chunk in grid.data_mut().chunks_mut(3) {
        chunk.copy_from_slice(&v.to_array());
    }
}

/// A deterministic non-uniform scalar pattern, zero on the outer shell.
pub fn seed_pattern(grid: &mut Grid) {
    let res = grid.resolution();
    for z in 1..res.z.saturating_sub(1) {
        for y in 1..res.y.saturating_sub(1) {
            for x in 1..res.x.saturating_sub(1) {
                let v = ((x * 7 + y * 3 + z * 5) % 11) as f32 * 0.1;
                grid.set_scalar(UVec3::new(x, y, z), v);
            }
        }
    }
}
