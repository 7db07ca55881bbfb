//! Validated, counted kernel launches.

use indexmap::IndexMap;
use plume_core::{DispatchError, DispatchFailure};
use plume_grid::{GridBufferSet, GridError};
use plume_space::VoxelBox;

use crate::backend::{Backend, Launch};
use crate::binding::Bindings;
use crate::kernel::KernelId;

/// Issues kernels to a [`Backend`] in program order.
///
/// Before handing a launch to the backend the dispatcher checks that the
/// region is non-empty and inside the grid, and that no grid is bound as
/// both an input and an output. Any failure becomes a [`DispatchError`]
/// naming the kernel and extent. There is no retry.
pub struct KernelDispatcher<B> {
    backend: B,
    total: u64,
    per_kernel: IndexMap<KernelId, u64>,
}

impl<B: Backend> KernelDispatcher<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            total: 0,
            per_kernel: IndexMap::new(),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Completed dispatches since construction.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completed dispatches of one kernel since construction.
    pub fn count(&self, kernel: KernelId) -> u64 {
        self.per_kernel.get(&kernel).copied().unwrap_or(0)
    }

    /// Completed dispatches of every kernel matching `pred`.
    pub fn count_where(&self, pred: impl Fn(&KernelId) -> bool) -> u64 {
        self.per_kernel
            .iter()
            .filter(|(k, _)| pred(k))
            .map(|(_, n)| *n)
            .sum()
    }

    /// Per-kernel counts in first-dispatch order.
    pub fn counts(&self) -> impl Iterator<Item = (KernelId, u64)> + '_ {
        self.per_kernel.iter().map(|(k, n)| (*k, *n))
    }

    /// Launch `kernel` over `region` of `grids`.
    pub fn dispatch(
        &mut self,
        grids: &mut GridBufferSet,
        kernel: KernelId,
        bindings: &Bindings,
        region: VoxelBox,
    ) -> Result<(), DispatchError> {
        let resolution = grids.resolution();
        let fail = |failure| self.reject(kernel, region, failure);

        if region.is_empty() {
            return Err(fail(DispatchFailure::EmptyRegion));
        }
        if !region.fits(resolution) {
            return Err(fail(DispatchFailure::RegionOutOfRange {
                offset: region.min,
                resolution,
            }));
        }

        let outputs = bindings.output_slots();
        if let Some(slot) = bindings
            .input_slots()
            .into_iter()
            .find(|s| outputs.contains(s))
        {
            return Err(fail(DispatchFailure::AliasedOutput { slot }));
        }

        let io = match grids.kernel_io(&outputs) {
            Ok(io) => io,
            Err(e) => return Err(fail(grid_failure(e))),
        };
        let launch = Launch::new(region, resolution);
        if let Err(failure) = self.backend.dispatch(kernel, bindings, &launch, io) {
            return Err(self.reject(kernel, region, failure));
        }

        log::trace!(
            "{kernel}: offset {} extent {} groups {}",
            region.min,
            region.extent(),
            launch.groups
        );
        self.total += 1;
        *self.per_kernel.entry(kernel).or_insert(0) += 1;
        Ok(())
    }
}

impl<B: Backend> KernelDispatcher<B> {
    fn reject(&self, kernel: KernelId, region: VoxelBox, failure: DispatchFailure) -> DispatchError {
        log::error!(
            "kernel {kernel} over {} rejected by {}: {failure}",
            region.extent(),
            self.backend.name()
        );
        DispatchError {
            kernel: kernel.to_string(),
            extent: region.extent(),
            failure,
        }
    }
}

fn grid_failure(e: GridError) -> DispatchFailure {
    match e {
        GridError::UnknownSlot { slot } => DispatchFailure::UnknownSlot { slot },
        GridError::DuplicateOutput { slot } => DispatchFailure::AliasedOutput { slot },
        other => DispatchFailure::Backend {
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;
    use plume_core::SlotIndex;
    use plume_grid::{GridRole, KernelIo};

    struct Fill;

    impl Backend for Fill {
        fn name(&self) -> &str {
            "fill"
        }

        fn dispatch(
            &mut self,
            kernel: KernelId,
            bindings: &Bindings,
            launch: &Launch,
            mut io: KernelIo<'_>,
        ) -> Result<(), DispatchFailure> {
            if kernel != KernelId::Clear {
                return Err(DispatchFailure::UnknownKernel);
            }
            let value = bindings.float("value")?;
            let out = io.take_output(bindings.output("output")?)?;
            for z in launch.region.min.z..launch.region.max.z {
                for y in launch.region.min.y..launch.region.max.y {
                    for x in launch.region.min.x..launch.region.max.x {
                        out.set_scalar(UVec3::new(x, y, z), value);
                    }
                }
            }
            Ok(())
        }
    }

    fn setup() -> (KernelDispatcher<Fill>, GridBufferSet) {
        (
            KernelDispatcher::new(Fill),
            GridBufferSet::new(UVec3::splat(16)),
        )
    }

    #[test]
    fn writes_only_the_region() {
        let (mut d, mut grids) = setup();
        let out = grids.slot(GridRole::Pressure);
        let b = Bindings::new()
            .with_output("output", out)
            .with_float("value", 1.0);
        let region = VoxelBox::new(UVec3::new(2, 2, 2), UVec3::new(4, 5, 6));
        d.dispatch(&mut grids, KernelId::Clear, &b, region).unwrap();
        assert_eq!(grids.grid(GridRole::Pressure).unwrap().sum(), 24.0);
        assert_eq!(d.total(), 1);
        assert_eq!(d.count(KernelId::Clear), 1);
    }

    #[test]
    fn empty_region_is_rejected() {
        let (mut d, mut grids) = setup();
        let b = Bindings::new()
            .with_output("output", grids.slot(GridRole::Pressure))
            .with_float("value", 1.0);
        let err = d
            .dispatch(
                &mut grids,
                KernelId::Clear,
                &b,
                VoxelBox::new(UVec3::splat(3), UVec3::new(3, 8, 8)),
            )
            .unwrap_err();
        assert_eq!(err.failure, DispatchFailure::EmptyRegion);
        assert_eq!(err.kernel, "clear");
        assert_eq!(d.total(), 0);
    }

    #[test]
    fn out_of_range_region_is_rejected() {
        let (mut d, mut grids) = setup();
        let b = Bindings::new()
            .with_output("output", grids.slot(GridRole::Pressure))
            .with_float("value", 1.0);
        let err = d
            .dispatch(
                &mut grids,
                KernelId::Clear,
                &b,
                VoxelBox::new(UVec3::ZERO, UVec3::new(17, 16, 16)),
            )
            .unwrap_err();
        assert!(matches!(err.failure, DispatchFailure::RegionOutOfRange { .. }));
        assert_eq!(err.extent, UVec3::new(17, 16, 16));
    }

    #[test]
    fn aliasing_is_rejected() {
        let (mut d, mut grids) = setup();
        let s = grids.slot(GridRole::Pressure);
        let b = Bindings::new()
            .with_input("source", s)
            .with_output("output", s)
            .with_float("value", 1.0);
        let err = d
            .dispatch(&mut grids, KernelId::Clear, &b, VoxelBox::full(UVec3::splat(16)))
            .unwrap_err();
        assert_eq!(err.failure, DispatchFailure::AliasedOutput { slot: s });
    }

    #[test]
    fn backend_rejection_is_wrapped() {
        let (mut d, mut grids) = setup();
        let err = d
            .dispatch(
                &mut grids,
                KernelId::Curl,
                &Bindings::new(),
                VoxelBox::full(UVec3::splat(16)),
            )
            .unwrap_err();
        assert_eq!(err.failure, DispatchFailure::UnknownKernel);
        assert!(err.to_string().contains("curl"));
        assert_eq!(d.count(KernelId::Curl), 0);
    }

    #[test]
    fn unknown_output_slot_is_rejected() {
        let (mut d, mut grids) = setup();
        let b = Bindings::new()
            .with_output("output", SlotIndex(42))
            .with_float("value", 0.0);
        let err = d
            .dispatch(&mut grids, KernelId::Clear, &b, VoxelBox::full(UVec3::splat(16)))
            .unwrap_err();
        assert_eq!(err.failure, DispatchFailure::UnknownSlot { slot: SlotIndex(42) });
    }
}
