//! The compute backend seam.

use glam::UVec3;
use plume_core::{DispatchFailure, TILE_SIZE};
use plume_grid::KernelIo;
use plume_space::VoxelBox;

use crate::binding::Bindings;
use crate::kernel::KernelId;

/// Geometry of one kernel launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Launch {
    /// Voxels the kernel must cover. Voxels outside are untouched.
    pub region: VoxelBox,
    /// Tiles launched per axis, `ceil(extent / TILE_SIZE)`.
    pub groups: UVec3,
    /// Resolution of every bound grid.
    pub resolution: UVec3,
}

impl Launch {
    /// Launch covering `region` in grids of `resolution`.
    pub fn new(region: VoxelBox, resolution: UVec3) -> Self {
        let extent = region.extent();
        Self {
            region,
            groups: (extent + UVec3::splat(TILE_SIZE - 1)) / TILE_SIZE,
            resolution,
        }
    }
}

/// Something that can execute solver kernels.
///
/// A backend receives the grids already split into readable inputs and
/// writable outputs, so it cannot observe a half-written input. It must
/// either finish the whole launch or return an error; the dispatcher
/// treats any error as fatal for the tick.
///
/// # Examples
///
/// A backend that only knows how to clear:
///
/// ```
/// use plume_core::DispatchFailure;
/// use plume_grid::KernelIo;
/// use plume_kernel::{Backend, Bindings, KernelId, Launch};
///
/// struct ClearOnly;
///
/// impl Backend for ClearOnly {
///     fn name(&self) -> &str { "clear_only" }
///
///     fn dispatch(
///         &mut self,
///         kernel: KernelId,
///         bindings: &Bindings,
///         _launch: &Launch,
///         mut io: KernelIo<'_>,
///     ) -> Result<(), DispatchFailure> {
///         match kernel {
///             KernelId::Clear => {
///                 let out = io.take_output(bindings.output("output")?)?;
///                 out.fill(bindings.float("value")?);
///                 Ok(())
///             }
///             _ => Err(DispatchFailure::UnknownKernel),
///         }
///     }
/// }
///
/// assert_eq!(ClearOnly.name(), "clear_only");
/// ```
pub trait Backend {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Run `kernel` over `launch.region`.
    fn dispatch(
        &mut self,
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dispatch(
        &mut self,
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure> {
        (**self).dispatch(kernel, bindings, launch, io)
    }
}
