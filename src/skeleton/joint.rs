//! Joint identifiers for the 20-joint humanoid rig
//!
//! Names follow the humanoid bone naming the avatar's bone map uses
//! (camelCase, `left`/`right` prefixes).

use serde::{Deserialize, Serialize};

/// A joint of the avatar skeleton. Doubles as an index into per-joint arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointId {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
}

/// Number of joints in the rig
pub const JOINT_COUNT: usize = 20;

/// How essential a joint is to reading the exercise; drives LOD coverage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointImportance {
    /// Always updated
    Critical,
    /// Updated at medium and high LOD
    Important,
    /// Updated at high LOD only
    Peripheral,
}

impl JointId {
    /// Every joint, in index order
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::Hips,
        JointId::Spine,
        JointId::Chest,
        JointId::UpperChest,
        JointId::Neck,
        JointId::Head,
        JointId::LeftShoulder,
        JointId::LeftUpperArm,
        JointId::LeftLowerArm,
        JointId::LeftHand,
        JointId::RightShoulder,
        JointId::RightUpperArm,
        JointId::RightLowerArm,
        JointId::RightHand,
        JointId::LeftUpperLeg,
        JointId::LeftLowerLeg,
        JointId::LeftFoot,
        JointId::RightUpperLeg,
        JointId::RightLowerLeg,
        JointId::RightFoot,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            JointId::Hips => "hips",
            JointId::Spine => "spine",
            JointId::Chest => "chest",
            JointId::UpperChest => "upperChest",
            JointId::Neck => "neck",
            JointId::Head => "head",
            JointId::LeftShoulder => "leftShoulder",
            JointId::LeftUpperArm => "leftUpperArm",
            JointId::LeftLowerArm => "leftLowerArm",
            JointId::LeftHand => "leftHand",
            JointId::RightShoulder => "rightShoulder",
            JointId::RightUpperArm => "rightUpperArm",
            JointId::RightLowerArm => "rightLowerArm",
            JointId::RightHand => "rightHand",
            JointId::LeftUpperLeg => "leftUpperLeg",
            JointId::LeftLowerLeg => "leftLowerLeg",
            JointId::LeftFoot => "leftFoot",
            JointId::RightUpperLeg => "rightUpperLeg",
            JointId::RightLowerLeg => "rightLowerLeg",
            JointId::RightFoot => "rightFoot",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.name() == name)
    }

    pub fn importance(self) -> JointImportance {
        use JointId::*;
        match self {
            Hips | Spine | Chest | LeftUpperLeg | LeftLowerLeg | RightUpperLeg | RightLowerLeg => {
                JointImportance::Critical
            }
            UpperChest | Neck | LeftUpperArm | LeftLowerArm | RightUpperArm | RightLowerArm
            | LeftFoot | RightFoot => JointImportance::Important,
            Head | LeftShoulder | RightShoulder | LeftHand | RightHand => {
                JointImportance::Peripheral
            }
        }
    }
}
