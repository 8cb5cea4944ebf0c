//! Anatomical constraints - clamp joint rotations to range of motion
//!
//! Each axis is clamped independently. Joints without a limit entry pass
//! through untouched.

use crate::pose::Pose;
use crate::skeleton::{rom_limits, JointId, RomLimits, JOINT_COUNT};

/// Clamps poses to per-joint anatomical limits
#[derive(Clone, Debug)]
pub struct ConstraintEnforcer {
    limits: [Option<RomLimits>; JOINT_COUNT],
}

impl ConstraintEnforcer {
    /// Enforcer loaded with the rig's anatomical limit table
    pub fn new() -> Self {
        Self {
            limits: JointId::ALL.map(rom_limits),
        }
    }

    /// Enforcer with no limits at all
    pub fn unconstrained() -> Self {
        Self {
            limits: [None; JOINT_COUNT],
        }
    }

    /// Replace (or remove, with `None`) the limits of one joint
    pub fn set_limits(&mut self, joint: JointId, limits: Option<RomLimits>) {
        self.limits[joint.index()] = limits;
    }

    pub fn limits(&self, joint: JointId) -> Option<&RomLimits> {
        self.limits[joint.index()].as_ref()
    }

    pub fn apply(&self, pose: &Pose) -> Pose {
        let mut out = pose.clone();
        self.apply_in_place(&mut out);
        out
    }

    pub fn apply_in_place(&self, pose: &mut Pose) {
        for joint in JointId::ALL {
            if let (Some(limits), Some(rotation)) = (self.limits(joint), pose.get(joint)) {
                pose.set(joint, limits.clamp(rotation));
            }
        }
    }
}

impl Default for ConstraintEnforcer {
    fn default() -> Self {
        Self::new()
    }
}
