//! Value bounds of a tracked field

use crate::{GemsError, GemsResult};

/// Closed value range of a field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    /// Part opacity range
    pub const OPACITY: Bounds = Bounds { min: 0.0, max: 1.0 };

    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Bounds { min, max }
    }

    /// Validate bounds and default as declared by a model
    pub fn validated(name: &str, min: f32, max: f32, default: f32) -> GemsResult<Self> {
        let bounds = Bounds { min, max };
        if bounds.is_valid() && default.is_finite() {
            Ok(bounds)
        } else {
            Err(GemsError::InvalidBounds {
                name: name.to_string(),
                min,
                max,
                default,
            })
        }
    }

    /// Finite and not inverted
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Clamp into the range without panicking on unvalidated bounds.
    /// Inverted bounds yield `max`; NaN limits are ignored.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return value;
        }
        value.max(self.min).min(self.max)
    }

    /// Min and max label text, shortest plain decimal form
    pub fn labels(&self) -> (String, String) {
        (self.min.to_string(), self.max.to_string())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::OPACITY
    }
}
