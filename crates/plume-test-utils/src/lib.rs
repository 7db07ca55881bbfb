//! Instrumented backends and scene fixtures for Plume development.
//!
//! [`RecordingBackend`] wraps a real backend and logs every dispatch it
//! forwards; [`RejectingBackend`] refuses a chosen kernel so error paths can
//! be exercised. [`fixtures`] has the grids and shapes the tests share.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use glam::UVec3;
use plume_core::DispatchFailure;
use plume_grid::KernelIo;
use plume_kernel::{Backend, Bindings, KernelId, Launch};
use plume_kernels::CpuBackend;
use plume_space::VoxelBox;

/// One forwarded dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchRecord {
    pub kernel: KernelId,
    pub region: VoxelBox,
    pub groups: UVec3,
}

/// Forwards to an inner backend and records each dispatch in order.
///
/// Only dispatches that reach the backend are recorded; the dispatcher
/// rejects malformed ones before that.
#[derive(Debug, Default)]
pub struct RecordingBackend<B = CpuBackend> {
    inner: B,
    log: Vec<DispatchRecord>,
}

impl RecordingBackend<CpuBackend> {
    /// Recording wrapper around the CPU reference backend.
    pub fn cpu() -> Self {
        Self::new(CpuBackend::new())
    }
}

impl<B> RecordingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    /// Every dispatch so far, oldest first.
    pub fn log(&self) -> &[DispatchRecord] {
        &self.log
    }

    /// Kernels in dispatch order.
    pub fn kernels(&self) -> Vec<KernelId> {
        self.log.iter().map(|r| r.kernel).collect()
    }

    /// How many dispatches matched `pred`.
    pub fn count(&self, pred: impl Fn(&KernelId) -> bool) -> usize {
        self.log.iter().filter(|r| pred(&r.kernel)).count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl<B: Backend> Backend for RecordingBackend<B> {
    fn name(&self) -> &str {
        "recording"
    }

    fn dispatch(
        &mut self,
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure> {
        self.log.push(DispatchRecord {
            kernel,
            region: launch.region,
            groups: launch.groups,
        });
        self.inner.dispatch(kernel, bindings, launch, io)
    }
}

/// Runs kernels on the CPU but refuses every dispatch of one kernel.
pub struct RejectingBackend {
    inner: CpuBackend,
    reject: fn(&KernelId) -> bool,
}

impl std::fmt::Debug for RejectingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectingBackend").finish_non_exhaustive()
    }
}

impl RejectingBackend {
    /// Reject every kernel for which `reject` returns true.
    pub fn new(reject: fn(&KernelId) -> bool) -> Self {
        Self {
            inner: CpuBackend::new(),
            reject,
        }
    }
}

impl Backend for RejectingBackend {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn dispatch(
        &mut self,
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure> {
        if (self.reject)(&kernel) {
            return Err(DispatchFailure::Backend {
                reason: format!("{kernel} rejected by test backend"),
            });
        }
        self.inner.dispatch(kernel, bindings, launch, io)
    }
}
