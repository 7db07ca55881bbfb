//! A single dense 3D grid.

use glam::{UVec3, Vec3};
use plume_core::GridFormat;

/// Dense `f32` voxel storage, x-fastest then y then z.
///
/// Vector grids interleave their three components per voxel.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    format: GridFormat,
    resolution: UVec3,
    data: Vec<f32>,
}

impl Grid {
    /// Zero-filled grid.
    pub fn zeroed(format: GridFormat, resolution: UVec3) -> Self {
        let len = resolution.x as usize
            * resolution.y as usize
            * resolution.z as usize
            * format.components();
        Self {
            format,
            resolution,
            data: vec![0.0; len],
        }
    }

    /// Per-voxel format.
    pub fn format(&self) -> GridFormat {
        self.format
    }

    /// Voxels per axis.
    pub fn resolution(&self) -> UVec3 {
        self.resolution
    }

    /// `f32` values per voxel.
    pub fn components(&self) -> usize {
        self.format.components()
    }

    /// Raw storage.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw storage.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Storage size in bytes.
    pub fn bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Address of the first element; stable for the grid's lifetime.
    pub fn address(&self) -> usize {
        self.data.as_ptr() as usize
    }

    /// Linear voxel index of `v` (not multiplied by components).
    #[inline]
    pub fn voxel_index(&self, v: UVec3) -> usize {
        let r = self.resolution;
        v.x as usize + r.x as usize * (v.y as usize + r.y as usize * v.z as usize)
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Sum of every stored value.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&x| x as f64).sum()
    }

    /// Largest stored value, or `None` for an empty grid.
    pub fn max_value(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    /// Scalar at voxel `v`. For vector grids, the x component.
    pub fn scalar(&self, v: UVec3) -> f32 {
        self.data[self.voxel_index(v) * self.components()]
    }

    /// Write a scalar at voxel `v`. For vector grids, the x component.
    pub fn set_scalar(&mut self, v: UVec3, value: f32) {
        let i = self.voxel_index(v) * self.components();
        self.data[i] = value;
    }

    /// Vector at voxel `v`. Scalar grids splat their value.
    pub fn vector(&self, v: UVec3) -> Vec3 {
        let i = self.voxel_index(v);
        match self.format {
            GridFormat::Scalar => Vec3::splat(self.data[i]),
            GridFormat::Vector => Vec3::from_slice(&self.data[i * 3..i * 3 + 3]),
        }
    }

    /// Write a vector at voxel `v`. Scalar grids store the x component.
    pub fn set_vector(&mut self, v: UVec3, value: Vec3) {
        let i = self.voxel_index(v);
        match self.format {
            GridFormat::Scalar => self.data[i] = value.x,
            GridFormat::Vector => value.write_to_slice(&mut self.data[i * 3..i * 3 + 3]),
        }
    }
}
