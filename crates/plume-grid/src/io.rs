//! Split borrows handed to a kernel backend for one dispatch.

use plume_core::{DispatchFailure, SlotIndex};
use smallvec::SmallVec;

use crate::grid::Grid;
use crate::role::GridRole;

/// Read-only and writable views of a [`GridBufferSet`](crate::GridBufferSet)
/// for a single dispatch.
///
/// Slots named as outputs are borrowed mutably and are absent from the
/// input side, so a kernel can never read a grid it is writing.
pub struct KernelIo<'a> {
    inputs: SmallVec<[(SlotIndex, &'a Grid); GridRole::COUNT]>,
    outputs: SmallVec<[(SlotIndex, &'a mut Grid); 2]>,
    aliased: SmallVec<[SlotIndex; 2]>,
}

impl<'a> KernelIo<'a> {
    pub(crate) fn new(
        inputs: SmallVec<[(SlotIndex, &'a Grid); GridRole::COUNT]>,
        outputs: SmallVec<[(SlotIndex, &'a mut Grid); 2]>,
    ) -> Self {
        let aliased = outputs.iter().map(|(s, _)| *s).collect();
        Self {
            inputs,
            outputs,
            aliased,
        }
    }

    /// Read-only grid in `slot`.
    ///
    /// Fails with [`DispatchFailure::AliasedOutput`] if `slot` is one of this
    /// dispatch's outputs.
    pub fn input(&self, slot: SlotIndex) -> Result<&'a Grid, DispatchFailure> {
        if let Some((_, g)) = self.inputs.iter().find(|(s, _)| *s == slot) {
            return Ok(*g);
        }
        if self.aliased.contains(&slot) {
            return Err(DispatchFailure::AliasedOutput { slot });
        }
        Err(DispatchFailure::UnknownSlot { slot })
    }

    /// Take the writable grid in `slot`. Each output can be taken once.
    pub fn take_output(&mut self, slot: SlotIndex) -> Result<&'a mut Grid, DispatchFailure> {
        match self.outputs.iter().position(|(s, _)| *s == slot) {
            Some(i) => Ok(self.outputs.swap_remove(i).1),
            None => Err(DispatchFailure::UnknownSlot { slot }),
        }
    }

    /// Slots borrowed for writing.
    pub fn output_slots(&self) -> &[SlotIndex] {
        &self.aliased
    }
}
