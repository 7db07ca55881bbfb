//! Grid storage error types.

use std::error::Error;
use std::fmt;

use plume_core::{GridFormat, SlotIndex, StepError};

use crate::role::GridRole;

/// Errors from [`GridBufferSet`](crate::GridBufferSet) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The set was released; every grid is gone.
    Released,
    /// Two roles with different per-voxel formats were swapped.
    FormatMismatch {
        /// First role.
        a: GridRole,
        /// Its format.
        a_format: GridFormat,
        /// Second role.
        b: GridRole,
        /// Its format.
        b_format: GridFormat,
    },
    /// A slot index outside the set was requested.
    UnknownSlot {
        /// The missing slot.
        slot: SlotIndex,
    },
    /// The same slot was listed twice as a kernel output.
    DuplicateOutput {
        /// The repeated slot.
        slot: SlotIndex,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Released => write!(f, "grid buffers have been released"),
            Self::FormatMismatch {
                a,
                a_format,
                b,
                b_format,
            } => write!(
                f,
                "cannot swap {a} ({a_format}) with {b} ({b_format}): formats differ"
            ),
            Self::UnknownSlot { slot } => write!(f, "no grid in slot {slot}"),
            Self::DuplicateOutput { slot } => {
                write!(f, "slot {slot} listed twice as an output")
            }
        }
    }
}

impl Error for GridError {}

impl From<GridError> for StepError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::Released => StepError::UseAfterRelease,
            other => StepError::InvalidConfig {
                reason: other.to_string(),
            },
        }
    }
}
