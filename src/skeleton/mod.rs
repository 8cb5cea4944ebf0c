//! Skeleton module - joint identifiers and static per-joint tables
//!
//! Re-exports only. All logic in submodules.

mod joint;
mod tables;

pub use joint::{JointId, JointImportance, JOINT_COUNT};
pub use tables::{
    couplings, joint_physics, physics_table, rom_limits, supported_mass_fraction,
    Coupling, JointPhysics, RomLimits,
};
