//! Fixed grid sizing derived from world bounds and voxel density.

use glam::{UVec3, Vec3};
use plume_core::{Aabb, TILE_SIZE};

use crate::error::SpaceError;

const AXES: [char; 3] = ['x', 'y', 'z'];

/// Grid resolution, tile count and snapped bounds for one solver instance.
///
/// Computed once by [`SpatialDescriptor::compute`] and immutable afterwards.
/// Invariants:
///
/// - `resolution == group_count * TILE_SIZE` on every axis.
/// - `bounds.min` is the requested minimum; `bounds.max` is pushed outward
///   so the box covers exactly `resolution` voxels.
/// - `texel_size` is `1 / voxel_count` using the **unrounded** voxel count,
///   so it differs from `1 / resolution` whenever rounding occurred.
///
/// # Examples
///
/// ```
/// use plume_core::{Aabb, Vec3};
/// use plume_space::SpatialDescriptor;
///
/// let bounds = Aabb::from_min_size(Vec3::ZERO, Vec3::splat(8.0));
/// let desc = SpatialDescriptor::compute(bounds, 8).unwrap();
/// assert_eq!(desc.resolution().to_array(), [64, 64, 64]);
/// assert_eq!(desc.group_count().to_array(), [8, 8, 8]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialDescriptor {
    resolution: UVec3,
    texel_size: Vec3,
    group_count: UVec3,
    texel_per_unit: u32,
    bounds: Aabb,
}

impl SpatialDescriptor {
    /// Upper limit on tiles per axis (2048 voxels).
    pub const MAX_GROUPS: u32 = 256;

    /// Size a grid for `bounds` at `texel_per_unit` voxels per world unit.
    ///
    /// Pure; callers may use it for pre-flight sizing without building a
    /// simulator. An axis whose size is zero, negative or NaN resolves to
    /// zero tiles and is rejected with [`SpaceError::DegenerateAxis`]
    /// rather than clamped to one tile.
    pub fn compute(bounds: Aabb, texel_per_unit: u32) -> Result<Self, SpaceError> {
        if texel_per_unit == 0 {
            return Err(SpaceError::ZeroTexelDensity);
        }
        let size = bounds.size();
        let voxel_count = size * texel_per_unit as f32;
        let groups = voxel_count / TILE_SIZE as f32;

        let mut group_count = [0u32; 3];
        for (axis, g) in groups.to_array().into_iter().enumerate() {
            let tiles = g.ceil();
            // `!(x >= 1)` also catches NaN.
            if !(tiles >= 1.0) {
                return Err(SpaceError::DegenerateAxis {
                    axis: AXES[axis],
                    size: size[axis],
                });
            }
            if tiles > Self::MAX_GROUPS as f32 {
                return Err(SpaceError::DimensionTooLarge {
                    axis: AXES[axis],
                    groups: tiles,
                    max: Self::MAX_GROUPS,
                });
            }
            group_count[axis] = tiles as u32;
        }

        let group_count = UVec3::from_array(group_count);
        let resolution = group_count * TILE_SIZE;
        let snapped_max = bounds.min + resolution.as_vec3() / texel_per_unit as f32;

        Ok(Self {
            resolution,
            texel_size: Vec3::ONE / voxel_count,
            group_count,
            texel_per_unit,
            bounds: Aabb::new(bounds.min, snapped_max),
        })
    }

    /// Voxels per axis; always a multiple of [`TILE_SIZE`].
    pub fn resolution(&self) -> UVec3 {
        self.resolution
    }

    /// Reciprocal of the unrounded voxel count per axis.
    pub fn texel_size(&self) -> Vec3 {
        self.texel_size
    }

    /// Dispatch tiles per axis.
    pub fn group_count(&self) -> UVec3 {
        self.group_count
    }

    /// Voxels per world unit.
    pub fn texel_per_unit(&self) -> u32 {
        self.texel_per_unit
    }

    /// World bounds snapped outward to whole tiles.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Total voxels in one grid.
    pub fn voxel_count(&self) -> usize {
        self.resolution.x as usize * self.resolution.y as usize * self.resolution.z as usize
    }

    /// Largest axis resolution.
    pub fn max_resolution(&self) -> u32 {
        self.resolution.max_element()
    }

    /// Convert a world-space point into continuous voxel coordinates.
    ///
    /// Voxel `i` spans `[i, i + 1)` along each axis.
    pub fn world_to_voxel(&self, point: Vec3) -> Vec3 {
        (point - self.bounds.min) * self.texel_per_unit as f32
    }

    /// Convert continuous voxel coordinates back into world space.
    pub fn voxel_to_world(&self, voxel: Vec3) -> Vec3 {
        self.bounds.min + voxel / self.texel_per_unit as f32
    }
}
