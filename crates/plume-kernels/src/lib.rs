//! Reference CPU kernels for the Plume fluid solver.
//!
//! [`CpuBackend`] implements every [`KernelId`](plume_kernel::KernelId)
//! with rayon data parallelism over z-slabs.
//!
//! # Kernel families
//!
//! - fills: `Clear`, `Boundary`
//! - transport: `Advect` (semi-Lagrangian, trilinear), `Bfecc`
//! - vorticity: `Curl`, `Confinement`
//! - shapes: `Obstacle`, `External` (sphere and box footprints)
//! - pressure: `Divergence`, `Jacobi`, `Project`
//! - attachments: `Gradient`, `JfaInit`, `Jfa`
//!
//! All kernels treat voxel `i` as centred at `i + 0.5` and clamp reads at
//! the grid edge.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod advect;
mod args;
mod attachments;
pub mod cpu;
mod fill;
mod grid_helpers;
mod pressure;
mod shapes;
mod vorticity;

pub use attachments::NO_SEED;
pub use cpu::CpuBackend;
