//! Voxel grid storage for Plume.
//!
//! All solver state lives in a fixed set of dense 3D grids allocated once
//! per simulator.
//!
//! # Architecture
//!
//! ```text
//! GridBufferSet (arena)
//! ├── Grid × 10 (one per GridRole, allocated at construction)
//! ├── roles: [SlotIndex; 10] (role → slot, exchanged by swap)
//! └── kernel_io() → KernelIo (split &/&mut borrows for one dispatch)
//! ```
//!
//! Ping-pong double buffering is a swap of two role entries. Voxel data is
//! never copied or reallocated after construction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod error;
pub mod grid;
pub mod io;
pub mod role;

pub use buffers::GridBufferSet;
pub use error::GridError;
pub use grid::Grid;
pub use io::KernelIo;
pub use role::GridRole;
