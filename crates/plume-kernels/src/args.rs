//! Typed access to one dispatch's bindings and grids.

use glam::{Mat4, Vec3};
use plume_core::{DispatchFailure, GridFormat};
use plume_grid::{Grid, KernelIo};
use plume_kernel::Bindings;

/// Bindings plus split grid borrows, with format checking.
pub(crate) struct Args<'b, 'a> {
    bindings: &'b Bindings,
    io: KernelIo<'a>,
}

fn require(name: &str, grid: &Grid, expected: GridFormat) -> Result<(), DispatchFailure> {
    if grid.format() == expected {
        Ok(())
    } else {
        Err(DispatchFailure::FormatMismatch {
            name: name.into(),
            expected,
            found: grid.format(),
        })
    }
}

impl<'b, 'a> Args<'b, 'a> {
    pub(crate) fn new(bindings: &'b Bindings, io: KernelIo<'a>) -> Self {
        Self { bindings, io }
    }

    /// Input grid of any format.
    pub(crate) fn input(&self, name: &str) -> Result<&'a Grid, DispatchFailure> {
        self.io.input(self.bindings.input(name)?)
    }

    /// Input grid that must be `format`.
    pub(crate) fn input_as(&self, name: &str, format: GridFormat) -> Result<&'a Grid, DispatchFailure> {
        let g = self.input(name)?;
        require(name, g, format)?;
        Ok(g)
    }

    /// Input grid that may be left unbound.
    pub(crate) fn optional_input_as(
        &self,
        name: &str,
        format: GridFormat,
    ) -> Result<Option<&'a Grid>, DispatchFailure> {
        match self.bindings.get(name) {
            None => Ok(None),
            Some(_) => self.input_as(name, format).map(Some),
        }
    }

    /// Output grid of any format.
    pub(crate) fn output(&mut self, name: &str) -> Result<&'a mut Grid, DispatchFailure> {
        let slot = self.bindings.output(name)?;
        self.io.take_output(slot)
    }

    /// Output grid that must be `format`.
    pub(crate) fn output_as(
        &mut self,
        name: &str,
        format: GridFormat,
    ) -> Result<&'a mut Grid, DispatchFailure> {
        let g = self.output(name)?;
        require(name, g, format)?;
        Ok(g)
    }

    pub(crate) fn float(&self, name: &str) -> Result<f32, DispatchFailure> {
        self.bindings.float(name)
    }

    pub(crate) fn int(&self, name: &str) -> Result<i32, DispatchFailure> {
        self.bindings.int(name)
    }

    pub(crate) fn vec3(&self, name: &str) -> Result<Vec3, DispatchFailure> {
        self.bindings.vec3(name)
    }

    pub(crate) fn mat4(&self, name: &str) -> Result<Mat4, DispatchFailure> {
        self.bindings.mat4(name)
    }
}
