//! Per-tick performance metrics for the solver.
//!
//! [`StepMetrics`] captures stage timings, dispatch counts and memory for a
//! single update.

/// Timing and workload metrics collected during a single update.
///
/// All durations are in microseconds. The simulator fills these after each
/// successful `update()`; a failed update leaves the previous values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire update.
    pub total_us: u64,
    /// Per-stage times in pipeline order: `(stage, microseconds)`.
    pub stage_us: Vec<(&'static str, u64)>,
    /// Kernel dispatches issued during the update.
    pub dispatches: u64,
    /// Jacobi pressure passes run.
    pub jacobi_passes: u32,
    /// Jump-flood passes run (zero when the distance field is off).
    pub jfa_passes: u32,
    /// Shapes skipped because their dispatch box was empty.
    pub skipped_shapes: u32,
    /// Bytes held by the grid set after the update.
    pub memory_bytes: usize,
}

impl StepMetrics {
    /// Time recorded for `stage`, if it ran.
    pub fn stage(&self, stage: &str) -> Option<u64> {
        self.stage_us
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|&(_, us)| us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.stage_us.is_empty());
        assert_eq!(m.dispatches, 0);
        assert_eq!(m.jacobi_passes, 0);
        assert_eq!(m.jfa_passes, 0);
        assert_eq!(m.skipped_shapes, 0);
        assert_eq!(m.memory_bytes, 0);
    }

    #[test]
    fn stage_lookup() {
        let m = StepMetrics {
            stage_us: vec![("advection", 12), ("projection", 40)],
            ..Default::default()
        };
        assert_eq!(m.stage("projection"), Some(40));
        assert_eq!(m.stage("vorticity"), None);
    }
}
