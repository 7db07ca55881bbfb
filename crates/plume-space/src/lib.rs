//! Grid sizing and shape voxelization for Plume.
//!
//! This crate owns the mapping between world space and voxel space:
//!
//! - [`SpatialDescriptor`]: resolution, tile count and snapped bounds for a
//!   world box at a given voxel density
//! - [`Shape`]: the closed set of analytic shapes (sphere, box)
//! - [`ShapeEvaluator`]: voxel-space kernel parameters and clamped dispatch
//!   boxes for a shape
//! - [`VoxelBox`]: integer voxel boxes used as dispatch regions

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod evaluator;
pub mod shape;
pub mod voxel_box;

pub use descriptor::SpatialDescriptor;
pub use error::SpaceError;
pub use evaluator::{ShapeEvaluator, ShapeParameters};
pub use shape::{Cuboid, Shape, Sphere};
pub use voxel_box::VoxelBox;
