//! The rayon-parallel reference backend.

use std::sync::Arc;

use plume_core::DispatchFailure;
use plume_grid::KernelIo;
use plume_kernel::{Backend, Bindings, KernelId, Launch};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::args::Args;
use crate::{advect, attachments, fill, pressure, shapes, vorticity};

/// Runs every [`KernelId`] on the CPU, one z-slab per rayon task.
///
/// Only voxels inside the launch region are touched. By default work runs
/// on rayon's global pool; [`CpuBackend::with_threads`] gives the backend
/// a dedicated pool.
///
/// ```
/// use plume_kernel::Backend;
/// use plume_kernels::CpuBackend;
///
/// let backend = CpuBackend::new();
/// assert_eq!(backend.name(), "cpu");
/// ```
#[derive(Clone, Default)]
pub struct CpuBackend {
    pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("threads", &self.threads())
            .finish()
    }
}

impl CpuBackend {
    /// Backend on rayon's global pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with its own pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("plume-cpu-{i}"))
            .build()?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Worker count of the pool this backend runs on.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(p) => p.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn run(
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure> {
        let mut args = Args::new(bindings, io);
        let region = launch.region;
        match kernel {
            KernelId::Clear => fill::clear(&mut args, region),
            KernelId::Boundary => fill::boundary(&mut args, region),
            KernelId::Obstacle(kind) => shapes::obstacle(&mut args, region, kind),
            KernelId::Advect => advect::advect(&mut args, region),
            KernelId::Bfecc => advect::bfecc(&mut args, region),
            KernelId::Curl => vorticity::curl(&mut args, region),
            KernelId::Confinement => vorticity::confinement(&mut args, region),
            KernelId::External(kind, pattern) => {
                shapes::external(&mut args, region, kind, pattern)
            }
            KernelId::Divergence => pressure::divergence(&mut args, region),
            KernelId::Jacobi => pressure::jacobi(&mut args, region),
            KernelId::Project => pressure::project(&mut args, region),
            KernelId::Gradient => attachments::gradient(&mut args, region),
            KernelId::JfaInit => attachments::jfa_init(&mut args, region),
            KernelId::Jfa => attachments::jfa(&mut args, region),
        }
    }
}

impl Backend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn dispatch(
        &mut self,
        kernel: KernelId,
        bindings: &Bindings,
        launch: &Launch,
        io: KernelIo<'_>,
    ) -> Result<(), DispatchFailure> {
        match &self.pool {
            Some(pool) => pool.install(|| Self::run(kernel, bindings, launch, io)),
            None => Self::run(kernel, bindings, launch, io),
        }
    }
}
