//! Named kernel arguments.

use glam::{Mat4, UVec3, Vec3};
use indexmap::IndexMap;
use plume_core::{DispatchFailure, SlotIndex};
use smallvec::SmallVec;

/// One named kernel argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Binding {
    /// Grid read by the kernel.
    Input(SlotIndex),
    /// Grid written by the kernel.
    Output(SlotIndex),
    /// Scalar constant.
    Float(f32),
    /// Integer constant.
    Int(i32),
    /// Vector constant.
    Vec3(Vec3),
    /// Unsigned vector constant.
    UVec3(UVec3),
    /// Matrix constant.
    Mat4(Mat4),
}

impl Binding {
    /// Short description of the value kind, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Input(_) => "input grid",
            Self::Output(_) => "output grid",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Vec3(_) => "vec3",
            Self::UVec3(_) => "uvec3",
            Self::Mat4(_) => "mat4",
        }
    }
}

/// Ordered set of named arguments for one dispatch.
///
/// Built fresh per dispatch with the `with_*` builders:
///
/// ```
/// use plume_core::SlotIndex;
/// use plume_kernel::Bindings;
///
/// let b = Bindings::new()
///     .with_input("source", SlotIndex(0))
///     .with_output("output", SlotIndex(1))
///     .with_float("dt", 0.5);
/// assert_eq!(b.float("dt"), Ok(0.5));
/// assert!(b.int("dt").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    entries: IndexMap<&'static str, Binding>,
}

impl Bindings {
    /// Empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing any earlier value.
    pub fn set(&mut self, name: &'static str, binding: Binding) {
        self.entries.insert(name, binding);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: &'static str, binding: Binding) -> Self {
        self.set(name, binding);
        self
    }

    /// Bind a grid for reading.
    pub fn with_input(self, name: &'static str, slot: SlotIndex) -> Self {
        self.with(name, Binding::Input(slot))
    }

    /// Bind a grid for writing.
    pub fn with_output(self, name: &'static str, slot: SlotIndex) -> Self {
        self.with(name, Binding::Output(slot))
    }

    /// Bind a float.
    pub fn with_float(self, name: &'static str, v: f32) -> Self {
        self.with(name, Binding::Float(v))
    }

    /// Bind an int.
    pub fn with_int(self, name: &'static str, v: i32) -> Self {
        self.with(name, Binding::Int(v))
    }

    /// Bind a vector.
    pub fn with_vec3(self, name: &'static str, v: Vec3) -> Self {
        self.with(name, Binding::Vec3(v))
    }

    /// Bind an unsigned vector.
    pub fn with_uvec3(self, name: &'static str, v: UVec3) -> Self {
        self.with(name, Binding::UVec3(v))
    }

    /// Bind a matrix.
    pub fn with_mat4(self, name: &'static str, m: Mat4) -> Self {
        self.with(name, Binding::Mat4(m))
    }

    /// Raw lookup.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.entries.get(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Binding)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Every slot bound as an input.
    pub fn input_slots(&self) -> SmallVec<[SlotIndex; 8]> {
        self.entries
            .values()
            .filter_map(|b| match b {
                Binding::Input(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Every slot bound as an output.
    pub fn output_slots(&self) -> SmallVec<[SlotIndex; 2]> {
        self.entries
            .values()
            .filter_map(|b| match b {
                Binding::Output(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn lookup(&self, name: &str) -> Result<&Binding, DispatchFailure> {
        self.entries
            .get(name)
            .ok_or_else(|| DispatchFailure::MissingBinding { name: name.into() })
    }

    fn mismatch(name: &str, expected: &'static str, found: &Binding) -> DispatchFailure {
        DispatchFailure::BindingMismatch {
            name: name.into(),
            expected,
            found: found.kind_name(),
        }
    }

    /// Input grid slot bound as `name`.
    pub fn input(&self, name: &str) -> Result<SlotIndex, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Input(s) => Ok(*s),
            other => Err(Self::mismatch(name, "input grid", other)),
        }
    }

    /// Output grid slot bound as `name`.
    pub fn output(&self, name: &str) -> Result<SlotIndex, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Output(s) => Ok(*s),
            other => Err(Self::mismatch(name, "output grid", other)),
        }
    }

    /// Float bound as `name`.
    pub fn float(&self, name: &str) -> Result<f32, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Float(v) => Ok(*v),
            other => Err(Self::mismatch(name, "float", other)),
        }
    }

    /// Int bound as `name`.
    pub fn int(&self, name: &str) -> Result<i32, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, "int", other)),
        }
    }

    /// Vector bound as `name`.
    pub fn vec3(&self, name: &str) -> Result<Vec3, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Vec3(v) => Ok(*v),
            other => Err(Self::mismatch(name, "vec3", other)),
        }
    }

    /// Unsigned vector bound as `name`.
    pub fn uvec3(&self, name: &str) -> Result<UVec3, DispatchFailure> {
        match self.lookup(name)? {
            Binding::UVec3(v) => Ok(*v),
            other => Err(Self::mismatch(name, "uvec3", other)),
        }
    }

    /// Matrix bound as `name`.
    pub fn mat4(&self, name: &str) -> Result<Mat4, DispatchFailure> {
        match self.lookup(name)? {
            Binding::Mat4(m) => Ok(*m),
            other => Err(Self::mismatch(name, "mat4", other)),
        }
    }
}
