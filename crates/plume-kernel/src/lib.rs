//! Kernel identifiers, bindings and the dispatch seam for Plume.
//!
//! Every solver pass is one [`KernelId`] launched through a
//! [`KernelDispatcher`] onto some [`Backend`]. Arguments travel as named
//! [`Bindings`]; grids are referenced by slot and handed to the backend as
//! a split [`KernelIo`](plume_grid::KernelIo) borrow.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod binding;
pub mod dispatcher;
pub mod kernel;
pub mod shape;

pub use backend::{Backend, Launch};
pub use binding::{Binding, Bindings};
pub use dispatcher::KernelDispatcher;
pub use kernel::{ForcePattern, KernelId};
pub use shape::{bind_shape, capability, ShapeCapability, SHAPE_CAPABILITIES};
