//! Cubism Gems Playback - Viewer-side playback controls
//!
//! Animation playback itself belongs to the host runtime. This crate keeps
//! the state the viewer controls around it:
//! - Playback speed (time scale) with scroll adjustment
//! - Motion playlist built from dropped motion files
//! - Recording session settings and progress
//! - Physics toggle for models that ship a physics rig

pub mod speed;
pub mod playlist;
pub mod recording;
pub mod physics;

pub use speed::*;
pub use playlist::*;
pub use recording::*;
pub use physics::*;
