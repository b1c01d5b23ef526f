//! Cubism Gems State - Override reconciliation for slider panels
//!
//! This crate implements the Override Reconciliation Engine:
//! - Tracked fields (one per parameter or part)
//! - Field set arena, rebuilt wholesale on model load
//! - Display control seam with echo suppression
//! - Once-per-frame reconciliation pass
//! - Reset and override-reset protocol

pub mod field;
pub mod control;
pub mod reconcile;

pub use field::*;
pub use control::*;
pub use reconcile::*;
