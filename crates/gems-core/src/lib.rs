//! Cubism Gems Core - Fundamental types shared by the viewer crates
//!
//! This crate defines:
//! - Field identities (FieldId, FieldKind)
//! - Value bounds and their labels
//! - Readout text formatting
//! - The model access seam (ModelAccess) and an in-memory model
//! - The error type

pub mod id;
pub mod bounds;
pub mod readout;
pub mod model;
pub mod error;

pub use id::*;
pub use bounds::*;
pub use readout::*;
pub use model::*;
pub use error::*;
