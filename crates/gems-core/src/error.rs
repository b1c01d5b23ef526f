//! Error types for the viewer crates

use thiserror::Error;

use crate::{FieldId, FieldKind};

/// Viewer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GemsError {
    // Field errors
    #[error("Field not found: {kind} {id}")]
    FieldNotFound { kind: FieldKind, id: FieldId },

    #[error("No {kind} named {name:?}")]
    UnknownField { kind: FieldKind, name: String },

    #[error("Stale field handle {id}: current generation is {current}")]
    StaleField { id: FieldId, current: u32 },

    #[error("Invalid bounds for {name}: min {min}, max {max}, default {default}")]
    InvalidBounds {
        name: String,
        min: f32,
        max: f32,
        default: f32,
    },

    // Playback errors
    #[error("Invalid frame rate: {0:?}")]
    InvalidFrameRate(String),

    #[error("No motion loaded")]
    NoMotionLoaded,

    #[error("Already recording")]
    AlreadyRecording,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for viewer operations
pub type GemsResult<T> = Result<T, GemsError>;
