//! Cubism Gems Runtime - Viewer orchestration and frame loop
//!
//! Per frame the host:
//! 1. Reads the time scale and advances its animation
//! 2. Forwards control notifications (observe / override toggles / resets)
//! 3. Calls `end_frame` once all external writes for the frame are done:
//!    - Reconcile parameter panel
//!    - Reconcile part panel
//!    - Advance recording progress

pub mod config;
pub mod logging;
pub mod viewer;

pub use config::*;
pub use logging::*;
pub use viewer::*;
