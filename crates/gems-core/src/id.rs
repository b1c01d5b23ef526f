//! Identity types for tracked fields
//!
//! A field handle is only meaningful for the model load that issued it.
//! Every load bumps the generation, so handles kept across a reload are
//! detected instead of silently addressing a field of the new model.

use std::fmt;

/// Which model attribute a tracked field mirrors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Animatable model parameter with model-declared bounds
    Parameter,
    /// Part opacity, always within [0, 1]
    PartOpacity,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Parameter => "parameter",
            FieldKind::PartOpacity => "part",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field handle - slot index plus the load generation it was issued for
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldId {
    index: u32,
    generation: u32,
}

impl FieldId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        FieldId { index, generation }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}:{})", self.generation, self.index)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}
