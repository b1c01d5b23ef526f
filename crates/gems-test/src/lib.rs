//! Cubism Gems Test Harness - UI simulation and override fuzzing
//!
//! This crate provides:
//! - Echoing slider controls that queue change notifications like a UI toolkit
//! - A headless UI harness driving a `Viewer` frame by frame
//! - Randomized override fuzzing with invariant checks
//! - End-to-end panel scenarios

pub mod harness;
pub mod fuzzer;
pub mod scenarios;

pub use harness::*;
pub use fuzzer::*;
pub use scenarios::*;
