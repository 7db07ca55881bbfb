//! Core types and errors for the Plume voxel fluid solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers, classifications, world-space bounds and error types used
//! throughout the Plume workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod kind;
pub mod math;

pub use error::{DispatchError, DispatchFailure, StepError};
pub use id::{SlotIndex, TickId};
pub use kind::{GridFormat, MotorKind, ShapeKind};
pub use math::{Aabb, IVec3, Mat4, Quat, UVec3, Vec3, TILE_SIZE};
