//! Pose module - per-joint rotations, world positions, base postures
//!
//! Re-exports only. All logic in submodules.

mod base;
mod joint_pose;
mod positions;

pub use base::BodyPosition;
pub use joint_pose::{Pose, Rotation};
pub use positions::JointPositions;
