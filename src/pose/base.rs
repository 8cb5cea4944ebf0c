//! Base poses keyed by body position
//!
//! The animated pose is layered over one of these, so joints an exercise
//! clip never mentions still hold a sensible posture.

use serde::{Deserialize, Serialize};

use super::joint_pose::{Pose, Rotation};
use crate::error::{EngineError, Result};
use crate::skeleton::JointId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPosition {
    #[default]
    Standing,
    Seated,
    Supine,
    Kneeling,
}

impl BodyPosition {
    pub const ALL: [BodyPosition; 4] = [
        BodyPosition::Standing,
        BodyPosition::Seated,
        BodyPosition::Supine,
        BodyPosition::Kneeling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BodyPosition::Standing => "standing",
            BodyPosition::Seated => "seated",
            BodyPosition::Supine => "supine",
            BodyPosition::Kneeling => "kneeling",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| EngineError::UnknownBodyPosition(name.to_string()))
    }

    /// Posture of every joint before animation is applied
    pub fn base_pose(self) -> Pose {
        let mut pose = Pose::from_pairs(JointId::ALL.map(|j| (j, Rotation::zeros())));

        // Arms hang at the sides in every position
        pose.set(JointId::LeftUpperArm, Rotation::new(0.0, 0.0, 1.2));
        pose.set(JointId::RightUpperArm, Rotation::new(0.0, 0.0, -1.2));
        pose.set(JointId::LeftLowerArm, Rotation::new(0.1, 0.0, 0.0));
        pose.set(JointId::RightLowerArm, Rotation::new(0.1, 0.0, 0.0));

        match self {
            BodyPosition::Standing | BodyPosition::Supine => {}
            BodyPosition::Seated => {
                for joint in [JointId::LeftUpperLeg, JointId::RightUpperLeg] {
                    pose.set(joint, Rotation::new(-1.5, 0.0, 0.0));
                }
                for joint in [JointId::LeftLowerLeg, JointId::RightLowerLeg] {
                    pose.set(joint, Rotation::new(1.5, 0.0, 0.0));
                }
            }
            BodyPosition::Kneeling => {
                for joint in [JointId::LeftLowerLeg, JointId::RightLowerLeg] {
                    pose.set(joint, Rotation::new(1.5, 0.0, 0.0));
                }
                for joint in [JointId::LeftFoot, JointId::RightFoot] {
                    pose.set(joint, Rotation::new(0.4, 0.0, 0.0));
                }
            }
        }
        pose
    }
}
