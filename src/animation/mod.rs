//! Animation module - clips, easing, phases, and keyframe interpolation
//!
//! Re-exports only. All logic in submodules.

mod clip;
mod clock;
mod easing;
mod interpolator;
mod phase;

pub use clip::{AnimationClip, Keyframe};
pub use clock::ClipClock;
pub use easing::{quartic_in_out, smootherstep, smoothstep, Easing};
pub use interpolator::{interpolate, Interpolated};
pub use phase::{
    ExercisePhase, PhaseChange, PhaseResolver, PhaseTracker, PhaseWindow, ResolvedPhase,
    CONCENTRIC_START, HOLD_START,
};
