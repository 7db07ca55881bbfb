//! Shared voxel access, sampling and parallel iteration.
//!
//! Every value is handled as a `Vec3`. A scalar grid loads as a splat and
//! stores its `x` component, so scalar results can be parked in vector
//! scratch grids and read back unchanged.

use glam::{IVec3, UVec3, Vec3};
use plume_grid::Grid;
use plume_space::VoxelBox;
use rayon::prelude::*;

/// Mask values at or above this are solid.
pub(crate) const SOLID: f32 = 0.5;

/// Face neighbour offsets in `-x, +x, -y, +y, -z, +z` order.
pub(crate) const FACES: [IVec3; 6] = [
    IVec3::NEG_X,
    IVec3::X,
    IVec3::NEG_Y,
    IVec3::Y,
    IVec3::NEG_Z,
    IVec3::Z,
];

#[inline]
pub(crate) fn load(slot: &[f32]) -> Vec3 {
    match slot {
        [s] => Vec3::splat(*s),
        _ => Vec3::new(slot[0], slot[1], slot[2]),
    }
}

#[inline]
pub(crate) fn store(slot: &mut [f32], v: Vec3) {
    match slot {
        [s] => *s = v.x,
        _ => slot[..3].copy_from_slice(&v.to_array()),
    }
}

/// Value at `v`, with coordinates clamped into the grid.
#[inline]
pub(crate) fn fetch(grid: &Grid, v: IVec3) -> Vec3 {
    let max = grid.resolution().as_ivec3() - IVec3::ONE;
    grid.vector(v.clamp(IVec3::ZERO, max).as_uvec3())
}

#[inline]
pub(crate) fn fetch_scalar(grid: &Grid, v: IVec3) -> f32 {
    fetch(grid, v).x
}

#[inline]
pub(crate) fn is_solid(mask: &Grid, v: IVec3) -> bool {
    fetch_scalar(mask, v) >= SOLID
}

#[inline]
fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// The eight voxels around continuous position `p` and the blend weights.
///
/// Voxel `i` has its centre at `i + 0.5`.
#[inline]
fn corners(grid: &Grid, p: Vec3) -> ([Vec3; 8], Vec3) {
    let q = p - Vec3::splat(0.5);
    let base = q.floor();
    let i = base.as_ivec3();
    let mut c = [Vec3::ZERO; 8];
    for (n, slot) in c.iter_mut().enumerate() {
        let o = IVec3::new((n & 1) as i32, ((n >> 1) & 1) as i32, ((n >> 2) & 1) as i32);
        *slot = fetch(grid, i + o);
    }
    (c, q - base)
}

/// Trilinear sample at continuous voxel position `p`, clamped at the edges.
///
/// A position exactly on a voxel centre returns that voxel's value
/// bit-for-bit.
pub(crate) fn sample(grid: &Grid, p: Vec3) -> Vec3 {
    let (c, t) = corners(grid, p);
    let x0 = lerp(c[0], c[1], t.x);
    let x1 = lerp(c[2], c[3], t.x);
    let x2 = lerp(c[4], c[5], t.x);
    let x3 = lerp(c[6], c[7], t.x);
    lerp(lerp(x0, x1, t.y), lerp(x2, x3, t.y), t.z)
}

/// Smallest and largest of the eight values `sample` would blend.
pub(crate) fn sample_range(grid: &Grid, p: Vec3) -> (Vec3, Vec3) {
    let (c, _) = corners(grid, p);
    c.iter()
        .skip(1)
        .fold((c[0], c[0]), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Run `f` on every voxel of `region` in `out`, one z-slab per task.
///
/// `f` receives the voxel coordinate and that voxel's storage (1 or 3
/// floats) and may read it before writing. Voxels outside `region` are not
/// visited.
pub(crate) fn par_region<F>(out: &mut Grid, region: VoxelBox, f: F)
where
    F: Fn(UVec3, &mut [f32]) + Sync,
{
    let res = out.resolution();
    let comps = out.components();
    let row = res.x as usize;
    let slab = row * res.y as usize * comps;
    out.data_mut()
        .par_chunks_mut(slab)
        .enumerate()
        .skip(region.min.z as usize)
        .take(region.extent().z as usize)
        .for_each(|(z, slab)| {
            for y in region.min.y..region.max.y {
                for x in region.min.x..region.max.x {
                    let i = (x as usize + y as usize * row) * comps;
                    f(UVec3::new(x, y, z as u32), &mut slab[i..i + comps]);
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::GridFormat;

    fn ramp() -> Grid {
        let mut g = Grid::zeroed(GridFormat::Scalar, UVec3::splat(8));
        for z in 0..8 {
            for y in 0..8 {
                for x in 0..8 {
                    g.set_scalar(UVec3::new(x, y, z), x as f32 + 10.0 * y as f32);
                }
            }
        }
        g
    }

    #[test]
    fn sample_at_centre_is_exact() {
        let g = ramp();
        let v = sample(&g, Vec3::new(3.5, 2.5, 4.5));
        assert_eq!(v.x, 23.0);
    }

    #[test]
    fn sample_interpolates_linearly() {
        let g = ramp();
        let v = sample(&g, Vec3::new(4.0, 2.5, 1.5));
        assert!((v.x - 23.5).abs() < 1e-5);
        let v = sample(&g, Vec3::new(1.5, 3.0, 1.5));
        assert!((v.x - 26.0).abs() < 1e-5);
    }

    #[test]
    fn sample_clamps_outside() {
        let g = ramp();
        assert_eq!(sample(&g, Vec3::new(-5.0, 0.5, 0.5)).x, 0.0);
        assert_eq!(sample(&g, Vec3::new(50.0, 0.5, 0.5)).x, 7.0);
    }

    #[test]
    fn range_brackets_sample() {
        let g = ramp();
        let p = Vec3::new(2.2, 5.7, 3.1);
        let (lo, hi) = sample_range(&g, p);
        let s = sample(&g, p);
        assert!(lo.x <= s.x && s.x <= hi.x);
    }

    #[test]
    fn par_region_visits_only_region() {
        let mut g = Grid::zeroed(GridFormat::Vector, UVec3::splat(16));
        let region = VoxelBox::new(UVec3::new(1, 2, 3), UVec3::new(5, 6, 7));
        par_region(&mut g, region, |v, slot| store(slot, v.as_vec3()));
        assert_eq!(g.vector(UVec3::new(4, 5, 6)), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(g.vector(UVec3::new(5, 5, 6)), Vec3::ZERO);
        assert_eq!(g.vector(UVec3::new(4, 5, 2)), Vec3::ZERO);
        let visited = g
            .data()
            .chunks(3)
            .filter(|c| c.iter().any(|&x| x != 0.0))
            .count();
        // Every visited voxel has a non-zero coordinate.
        assert_eq!(visited, 4 * 4 * 4);
    }

    #[test]
    fn scalar_store_keeps_x() {
        let mut s = [0.0f32];
        store(&mut s, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(load(&s), Vec3::splat(2.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sample_stays_within_range(x in -2.0f32..10.0, y in -2.0f32..10.0, z in -2.0f32..10.0) {
                let g = ramp();
                let p = Vec3::new(x, y, z);
                let (lo, hi) = sample_range(&g, p);
                let s = sample(&g, p);
                prop_assert!(lo.x - 1e-4 <= s.x && s.x <= hi.x + 1e-4);
            }
        }
    }
}
