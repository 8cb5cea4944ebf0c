//! Exercise module - modes, biomechanical profiles, fallback motion
//!
//! Re-exports only. All logic in submodules.

mod mode;
mod procedural;

pub use mode::{ExerciseMode, ExerciseProfile};
pub use procedural::{procedural_clip, PROCEDURAL_DURATION};
