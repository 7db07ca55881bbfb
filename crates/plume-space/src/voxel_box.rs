//! Integer voxel boxes used as dispatch regions.

use glam::UVec3;

/// Half-open box of voxels `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelBox {
    /// First voxel (inclusive).
    pub min: UVec3,
    /// One past the last voxel (exclusive).
    pub max: UVec3,
}

impl VoxelBox {
    /// Box from explicit corners.
    pub fn new(min: UVec3, max: UVec3) -> Self {
        Self { min, max }
    }

    /// Box covering a whole grid.
    pub fn full(resolution: UVec3) -> Self {
        Self {
            min: UVec3::ZERO,
            max: resolution,
        }
    }

    /// Voxels per axis. Zero on any axis where `max <= min`.
    pub fn extent(&self) -> UVec3 {
        self.max.saturating_sub(self.min)
    }

    /// Number of voxels covered.
    pub fn volume(&self) -> usize {
        let e = self.extent();
        e.x as usize * e.y as usize * e.z as usize
    }

    /// Whether the box covers no voxels.
    pub fn is_empty(&self) -> bool {
        self.extent().min_element() == 0
    }

    /// Whether voxel `v` lies inside.
    pub fn contains(&self, v: UVec3) -> bool {
        v.cmpge(self.min).all() && v.cmplt(self.max).all()
    }

    /// Whether the box lies fully inside a grid of `resolution`.
    pub fn fits(&self, resolution: UVec3) -> bool {
        self.max.cmple(resolution).all()
    }

    /// The six one-voxel-thick faces of a grid, in `-x, +x, -y, +y, -z, +z`
    /// order.
    pub fn faces(resolution: UVec3) -> [VoxelBox; 6] {
        let r = resolution;
        let last = r.saturating_sub(UVec3::ONE);
        [
            Self::new(UVec3::ZERO, UVec3::new(1, r.y, r.z)),
            Self::new(UVec3::new(last.x, 0, 0), r),
            Self::new(UVec3::ZERO, UVec3::new(r.x, 1, r.z)),
            Self::new(UVec3::new(0, last.y, 0), r),
            Self::new(UVec3::ZERO, UVec3::new(r.x, r.y, 1)),
            Self::new(UVec3::new(0, 0, last.z), r),
        ]
    }
}
