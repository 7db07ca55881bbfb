//! The solver's grid arena and role table.
//!
//! [`GridBufferSet`] allocates one [`Grid`] per [`GridRole`] at construction
//! and never allocates again. Roles are indices into that fixed slot array:
//!
//! ```text
//! roles:  Density ─┐   DensityNext ─┐
//!                  ▼                ▼
//! slots:  [ grid 0 ][ grid 1 ][ grid 2 ] ... [ grid 9 ]
//! ```
//!
//! A ping-pong [`swap`](GridBufferSet::swap) exchanges two role entries.

use glam::UVec3;
use plume_core::SlotIndex;
use smallvec::SmallVec;

use crate::error::GridError;
use crate::grid::Grid;
use crate::io::KernelIo;
use crate::role::GridRole;

/// Every grid the solver owns, plus the role-to-slot table.
#[derive(Debug)]
pub struct GridBufferSet {
    slots: Vec<Grid>,
    roles: [SlotIndex; GridRole::COUNT],
    resolution: UVec3,
    released: bool,
}

impl GridBufferSet {
    /// Allocate one zeroed grid per role at `resolution`.
    pub fn new(resolution: UVec3) -> Self {
        let slots = GridRole::ALL
            .iter()
            .map(|role| Grid::zeroed(role.format(), resolution))
            .collect();
        let mut roles = [SlotIndex(0); GridRole::COUNT];
        for (i, r) in roles.iter_mut().enumerate() {
            *r = SlotIndex(i as u8);
        }
        Self {
            slots,
            roles,
            resolution,
            released: false,
        }
    }

    /// Voxels per axis of every grid.
    pub fn resolution(&self) -> UVec3 {
        self.resolution
    }

    /// Whether [`release`](Self::release) has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn check_live(&self) -> Result<(), GridError> {
        if self.released {
            Err(GridError::Released)
        } else {
            Ok(())
        }
    }

    /// Slot currently playing `role`.
    pub fn slot(&self, role: GridRole) -> SlotIndex {
        self.roles[role.index()]
    }

    /// Grid currently playing `role`.
    pub fn grid(&self, role: GridRole) -> Result<&Grid, GridError> {
        self.check_live()?;
        let slot = self.slot(role);
        self.slots
            .get(slot.index())
            .ok_or(GridError::UnknownSlot { slot })
    }

    /// Mutable grid currently playing `role`.
    pub fn grid_mut(&mut self, role: GridRole) -> Result<&mut Grid, GridError> {
        self.check_live()?;
        let slot = self.slot(role);
        self.slots
            .get_mut(slot.index())
            .ok_or(GridError::UnknownSlot { slot })
    }

    /// Exchange the slots behind two roles. O(1); no voxel data moves.
    pub fn swap(&mut self, a: GridRole, b: GridRole) -> Result<(), GridError> {
        self.check_live()?;
        if a.format() != b.format() {
            return Err(GridError::FormatMismatch {
                a,
                a_format: a.format(),
                b,
                b_format: b.format(),
            });
        }
        self.roles.swap(a.index(), b.index());
        Ok(())
    }

    /// Free every grid. A second call fails with [`GridError::Released`].
    pub fn release(&mut self) -> Result<(), GridError> {
        self.check_live()?;
        self.slots = Vec::new();
        self.released = true;
        Ok(())
    }

    /// Bytes held across all slots. Zero after release.
    pub fn memory_bytes(&self) -> usize {
        self.slots.iter().map(Grid::bytes).sum()
    }

    /// Bytes held by the grid playing each role.
    pub fn role_bytes(&self) -> Vec<(GridRole, usize)> {
        GridRole::ALL
            .iter()
            .map(|&r| (r, self.grid(r).map(Grid::bytes).unwrap_or(0)))
            .collect()
    }

    /// Storage address of every slot, in slot order.
    ///
    /// Swaps never change this list; only release empties it.
    pub fn buffer_addresses(&self) -> Vec<usize> {
        self.slots.iter().map(Grid::address).collect()
    }

    /// Borrow `outputs` mutably and every other slot immutably.
    pub fn kernel_io(&mut self, outputs: &[SlotIndex]) -> Result<KernelIo<'_>, GridError> {
        self.check_live()?;
        for (i, &slot) in outputs.iter().enumerate() {
            if slot.index() >= self.slots.len() {
                return Err(GridError::UnknownSlot { slot });
            }
            if outputs[..i].contains(&slot) {
                return Err(GridError::DuplicateOutput { slot });
            }
        }

        let mut inputs = SmallVec::new();
        let mut writable = SmallVec::new();
        for (i, grid) in self.slots.iter_mut().enumerate() {
            let slot = SlotIndex(i as u8);
            if outputs.contains(&slot) {
                writable.push((slot, grid));
            } else {
                let grid: &Grid = grid;
                inputs.push((slot, grid));
            }
        }
        Ok(KernelIo::new(inputs, writable))
    }
}
