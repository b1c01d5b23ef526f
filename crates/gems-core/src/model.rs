//! Model access seam
//!
//! The host animation runtime owns the live parameter values and part
//! opacities. The viewer only sees them through `ModelAccess`, which a host
//! implements for its model type. `ModelSnapshot` is an in-memory model for
//! hosts without a live runtime and for tests.

use crate::{Bounds, FieldKind};

/// Parameter as declared by a model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterInfo<'a> {
    pub id: &'a str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

/// Readable/writable view of a loaded model
pub trait ModelAccess {
    fn parameter_count(&self) -> usize;

    fn parameter(&self, index: usize) -> Option<ParameterInfo<'_>>;

    fn parameter_value(&self, index: usize) -> f32;

    fn set_parameter_value(&mut self, index: usize, value: f32);

    fn part_count(&self) -> usize;

    fn part_id(&self, index: usize) -> Option<&str>;

    fn part_opacity(&self, index: usize) -> f32;

    fn set_part_opacity(&mut self, index: usize, value: f32);

    /// Whether the model came with a physics rig
    fn has_physics(&self) -> bool {
        false
    }

    /// Number of attributes of the given kind
    fn field_count(&self, kind: FieldKind) -> usize {
        match kind {
            FieldKind::Parameter => self.parameter_count(),
            FieldKind::PartOpacity => self.part_count(),
        }
    }

    /// Read the live value of an attribute
    fn read(&self, kind: FieldKind, index: usize) -> f32 {
        match kind {
            FieldKind::Parameter => self.parameter_value(index),
            FieldKind::PartOpacity => self.part_opacity(index),
        }
    }

    /// Write the live value of an attribute
    fn write(&mut self, kind: FieldKind, index: usize, value: f32) {
        match kind {
            FieldKind::Parameter => self.set_parameter_value(index, value),
            FieldKind::PartOpacity => self.set_part_opacity(index, value),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SnapshotParameter {
    id: String,
    bounds: Bounds,
    default: f32,
    value: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct SnapshotPart {
    id: String,
    opacity: f32,
}

/// In-memory model
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSnapshot {
    parameters: Vec<SnapshotParameter>,
    parts: Vec<SnapshotPart>,
    physics: bool,
}

impl ModelSnapshot {
    pub fn new() -> Self {
        ModelSnapshot::default()
    }

    /// Add a parameter; its value starts at the default
    pub fn with_parameter(mut self, id: &str, min: f32, max: f32, default: f32) -> Self {
        self.parameters.push(SnapshotParameter {
            id: id.to_string(),
            bounds: Bounds::new(min, max),
            default,
            value: default,
        });
        self
    }

    pub fn with_part(mut self, id: &str, opacity: f32) -> Self {
        self.parts.push(SnapshotPart {
            id: id.to_string(),
            opacity,
        });
        self
    }

    /// Mark the model as shipping a physics rig
    pub fn with_physics(mut self) -> Self {
        self.physics = true;
        self
    }

    pub fn parameter_index(&self, id: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.id == id)
    }

    pub fn part_index(&self, id: &str) -> Option<usize> {
        self.parts.iter().position(|p| p.id == id)
    }

    /// Look up a parameter value by id
    pub fn value_of(&self, id: &str) -> Option<f32> {
        self.parameter_index(id).map(|i| self.parameters[i].value)
    }

    /// Look up a part opacity by id
    pub fn opacity_of(&self, id: &str) -> Option<f32> {
        self.part_index(id).map(|i| self.parts[i].opacity)
    }
}

impl ModelAccess for ModelSnapshot {
    fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    fn parameter(&self, index: usize) -> Option<ParameterInfo<'_>> {
        self.parameters.get(index).map(|p| ParameterInfo {
            id: &p.id,
            min: p.bounds.min,
            max: p.bounds.max,
            default: p.default,
        })
    }

    fn parameter_value(&self, index: usize) -> f32 {
        self.parameters.get(index).map_or(0.0, |p| p.value)
    }

    fn set_parameter_value(&mut self, index: usize, value: f32) {
        if let Some(p) = self.parameters.get_mut(index) {
            p.value = value;
        }
    }

    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn part_id(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(|p| p.id.as_str())
    }

    fn part_opacity(&self, index: usize) -> f32 {
        self.parts.get(index).map_or(0.0, |p| p.opacity)
    }

    fn set_part_opacity(&mut self, index: usize, value: f32) {
        if let Some(p) = self.parts.get_mut(index) {
            p.opacity = value;
        }
    }

    fn has_physics(&self) -> bool {
        self.physics
    }
}
