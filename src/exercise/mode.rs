//! Exercise modes and their biomechanical profiles

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::pose::BodyPosition;
use crate::skeleton::JointId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseMode {
    #[default]
    Rest,
    Squat,
    Lunge,
    ShoulderPress,
    BicepCurl,
    GluteBridge,
}

/// Which joints carry the exercise and which assist it
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProfile {
    pub primary_joints: Vec<JointId>,
    pub secondary_joints: Vec<JointId>,
}

impl ExerciseProfile {
    pub fn new(primary_joints: Vec<JointId>, secondary_joints: Vec<JointId>) -> Self {
        Self {
            primary_joints,
            secondary_joints,
        }
    }

    pub fn is_primary(&self, joint: JointId) -> bool {
        self.primary_joints.contains(&joint)
    }
}

impl ExerciseMode {
    pub const ALL: [ExerciseMode; 6] = [
        ExerciseMode::Rest,
        ExerciseMode::Squat,
        ExerciseMode::Lunge,
        ExerciseMode::ShoulderPress,
        ExerciseMode::BicepCurl,
        ExerciseMode::GluteBridge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExerciseMode::Rest => "rest",
            ExerciseMode::Squat => "squat",
            ExerciseMode::Lunge => "lunge",
            ExerciseMode::ShoulderPress => "shoulderPress",
            ExerciseMode::BicepCurl => "bicepCurl",
            ExerciseMode::GluteBridge => "gluteBridge",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| EngineError::UnknownExerciseMode(name.to_string()))
    }

    /// Body position the exercise is performed in
    pub fn body_position(self) -> BodyPosition {
        match self {
            ExerciseMode::GluteBridge => BodyPosition::Supine,
            _ => BodyPosition::Standing,
        }
    }

    pub fn profile(self) -> ExerciseProfile {
        use JointId::*;
        let (primary, secondary): (&[JointId], &[JointId]) = match self {
            ExerciseMode::Rest => (&[], &[]),
            ExerciseMode::Squat => (
                &[LeftUpperLeg, RightUpperLeg, LeftLowerLeg, RightLowerLeg],
                &[Hips, Spine, LeftFoot, RightFoot],
            ),
            ExerciseMode::Lunge => (
                &[LeftUpperLeg, LeftLowerLeg, RightLowerLeg],
                &[Hips, Spine, RightUpperLeg],
            ),
            ExerciseMode::ShoulderPress => (
                &[LeftUpperArm, RightUpperArm, LeftLowerArm, RightLowerArm],
                &[Chest, UpperChest, LeftShoulder, RightShoulder],
            ),
            ExerciseMode::BicepCurl => (
                &[LeftLowerArm, RightLowerArm],
                &[LeftUpperArm, RightUpperArm, LeftHand, RightHand],
            ),
            ExerciseMode::GluteBridge => (
                &[Hips, LeftUpperLeg, RightUpperLeg],
                &[Spine, LeftLowerLeg, RightLowerLeg],
            ),
        };
        ExerciseProfile::new(primary.to_vec(), secondary.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_resolve() {
        for mode in ExerciseMode::ALL {
            assert_eq!(ExerciseMode::from_name(mode.name()).unwrap(), mode);
        }
        assert!(matches!(
            ExerciseMode::from_name("deadlift"),
            Err(EngineError::UnknownExerciseMode(_))
        ));
    }

    #[test]
    fn test_primary_and_secondary_disjoint() {
        for mode in ExerciseMode::ALL {
            let profile = mode.profile();
            for joint in &profile.secondary_joints {
                assert!(!profile.is_primary(*joint), "{} {}", mode.name(), joint.name());
            }
        }
    }
}
