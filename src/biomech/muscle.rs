//! Muscle activation by exercise mode and phase
//!
//! Activation is a table lookup: each mode carries a fixed vector over the
//! muscle groups for each exerting phase. Idle resolves to a flat baseline.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::animation::ExercisePhase;
use crate::exercise::ExerciseMode;
use crate::pose::Pose;
use crate::skeleton::JointId;

pub const MUSCLE_COUNT: usize = 9;

/// Resting tone of every group outside an exercise phase
pub const IDLE_BASELINE: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Quadriceps,
    Hamstrings,
    Glutes,
    Calves,
    Core,
    LowerBack,
    Deltoids,
    Biceps,
    Triceps,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; MUSCLE_COUNT] = [
        MuscleGroup::Quadriceps,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::Core,
        MuscleGroup::LowerBack,
        MuscleGroup::Deltoids,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::Quadriceps => "quadriceps",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Core => "core",
            MuscleGroup::LowerBack => "lowerBack",
            MuscleGroup::Deltoids => "deltoids",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
        }
    }

    /// Left/right joint pair whose motion drives this group, if bilateral
    pub fn bilateral_joints(self) -> Option<(JointId, JointId)> {
        use JointId::*;
        match self {
            MuscleGroup::Quadriceps | MuscleGroup::Hamstrings => Some((LeftLowerLeg, RightLowerLeg)),
            MuscleGroup::Glutes => Some((LeftUpperLeg, RightUpperLeg)),
            MuscleGroup::Calves => Some((LeftFoot, RightFoot)),
            MuscleGroup::Deltoids => Some((LeftUpperArm, RightUpperArm)),
            MuscleGroup::Biceps | MuscleGroup::Triceps => Some((LeftLowerArm, RightLowerArm)),
            MuscleGroup::Core | MuscleGroup::LowerBack => None,
        }
    }
}

/// Activation level in `[0, 1]` for every muscle group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MuscleActivation {
    levels: [f32; MUSCLE_COUNT],
}

impl MuscleActivation {
    pub fn new(levels: [f32; MUSCLE_COUNT]) -> Self {
        Self {
            levels: levels.map(|a| a.clamp(0.0, 1.0)),
        }
    }

    pub fn baseline() -> Self {
        Self::new([IDLE_BASELINE; MUSCLE_COUNT])
    }

    /// Table lookup for a mode in a phase
    pub fn for_phase(mode: ExerciseMode, phase: ExercisePhase) -> Self {
        match activation_table(mode, phase) {
            Some(levels) => Self::new(levels),
            None => Self::baseline(),
        }
    }

    pub fn get(&self, group: MuscleGroup) -> f32 {
        self.levels[group.index()]
    }

    pub fn mean(&self) -> f32 {
        self.levels.iter().sum::<f32>() / MUSCLE_COUNT as f32
    }

    pub fn max(&self) -> f32 {
        self.levels.iter().copied().fold(0.0, f32::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MuscleGroup, f32)> + '_ {
        MuscleGroup::ALL.iter().map(move |g| (*g, self.levels[g.index()]))
    }

    pub fn to_array(&self) -> [f32; MUSCLE_COUNT] {
        self.levels
    }
}

impl Default for MuscleActivation {
    fn default() -> Self {
        Self::baseline()
    }
}

impl Serialize for MuscleActivation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MUSCLE_COUNT))?;
        for (group, level) in self.iter() {
            map.serialize_entry(group.name(), &level)?;
        }
        map.end()
    }
}

// ============================================================================
// Activation table
// ============================================================================
//
// Column order: quadriceps, hamstrings, glutes, calves, core, lowerBack,
// deltoids, biceps, triceps.

fn activation_table(mode: ExerciseMode, phase: ExercisePhase) -> Option<[f32; MUSCLE_COUNT]> {
    use ExercisePhase::*;
    let levels = match (mode, phase) {
        (_, Idle) | (ExerciseMode::Rest, _) => return None,

        (ExerciseMode::Squat, Eccentric) => [0.70, 0.30, 0.55, 0.20, 0.45, 0.40, 0.05, 0.05, 0.05],
        (ExerciseMode::Squat, Hold) => [0.80, 0.35, 0.60, 0.25, 0.55, 0.45, 0.05, 0.05, 0.05],
        (ExerciseMode::Squat, Concentric) => [0.90, 0.40, 0.80, 0.30, 0.50, 0.40, 0.05, 0.05, 0.05],

        (ExerciseMode::Lunge, Eccentric) => [0.65, 0.35, 0.60, 0.30, 0.50, 0.30, 0.05, 0.05, 0.05],
        (ExerciseMode::Lunge, Hold) => [0.75, 0.40, 0.65, 0.35, 0.60, 0.35, 0.05, 0.05, 0.05],
        (ExerciseMode::Lunge, Concentric) => [0.85, 0.45, 0.80, 0.40, 0.55, 0.35, 0.05, 0.05, 0.05],

        (ExerciseMode::ShoulderPress, Eccentric) => [0.05, 0.05, 0.05, 0.05, 0.40, 0.30, 0.65, 0.15, 0.50],
        (ExerciseMode::ShoulderPress, Hold) => [0.05, 0.05, 0.05, 0.05, 0.45, 0.35, 0.75, 0.15, 0.60],
        (ExerciseMode::ShoulderPress, Concentric) => [0.05, 0.05, 0.05, 0.05, 0.45, 0.30, 0.90, 0.20, 0.80],

        (ExerciseMode::BicepCurl, Eccentric) => [0.05, 0.05, 0.05, 0.05, 0.25, 0.20, 0.20, 0.70, 0.15],
        (ExerciseMode::BicepCurl, Hold) => [0.05, 0.05, 0.05, 0.05, 0.30, 0.20, 0.25, 0.80, 0.15],
        (ExerciseMode::BicepCurl, Concentric) => [0.05, 0.05, 0.05, 0.05, 0.30, 0.20, 0.25, 0.90, 0.10],

        (ExerciseMode::GluteBridge, Eccentric) => [0.20, 0.45, 0.65, 0.10, 0.40, 0.35, 0.05, 0.05, 0.05],
        (ExerciseMode::GluteBridge, Hold) => [0.25, 0.55, 0.85, 0.10, 0.50, 0.45, 0.05, 0.05, 0.05],
        (ExerciseMode::GluteBridge, Concentric) => [0.25, 0.55, 0.90, 0.10, 0.45, 0.40, 0.05, 0.05, 0.05],
    };
    Some(levels)
}

// ============================================================================
// Left/right split
// ============================================================================

/// Per-side activation split and the resulting asymmetry score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LateralActivation {
    pub left: [f32; MUSCLE_COUNT],
    pub right: [f32; MUSCLE_COUNT],
    /// Activation-weighted mean of `|l - r| / (l + r)` over bilateral groups
    pub asymmetry: f32,
}

/// Below this combined rotation magnitude a pair counts as symmetric
const SPLIT_EPSILON: f32 = 1e-4;

/// Split bilateral groups across sides by the rotation magnitude of their
/// driving joint pair
pub fn lateral_split(activation: &MuscleActivation, pose: &Pose) -> LateralActivation {
    let mut left = activation.to_array();
    let mut right = activation.to_array();
    let mut weighted = 0.0;
    let mut weight = 0.0;

    for group in MuscleGroup::ALL {
        let Some((l_joint, r_joint)) = group.bilateral_joints() else {
            continue;
        };
        let level = activation.get(group);
        let l = pose.rotation(l_joint).norm();
        let r = pose.rotation(r_joint).norm();
        let total = l + r;
        if total < SPLIT_EPSILON {
            continue;
        }

        let idx = group.index();
        left[idx] = (level * 2.0 * l / total).min(1.0);
        right[idx] = (level * 2.0 * r / total).min(1.0);
        weighted += level * (l - r).abs() / total;
        weight += level;
    }

    let asymmetry = if weight > 0.0 {
        (weighted / weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    LateralActivation {
        left,
        right,
        asymmetry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_idle_is_flat_baseline() {
        for mode in ExerciseMode::ALL {
            let activation = MuscleActivation::for_phase(mode, ExercisePhase::Idle);
            assert!(activation.iter().all(|(_, a)| a == IDLE_BASELINE));
        }
    }

    #[test]
    fn test_squat_drives_legs_over_arms() {
        let activation = MuscleActivation::for_phase(ExerciseMode::Squat, ExercisePhase::Concentric);
        assert!(activation.get(MuscleGroup::Quadriceps) > activation.get(MuscleGroup::Biceps));
        assert_relative_eq!(activation.max(), 0.9);
    }

    #[test]
    fn test_all_levels_in_unit_range() {
        let phases = [ExercisePhase::Eccentric, ExercisePhase::Hold, ExercisePhase::Concentric];
        for mode in ExerciseMode::ALL {
            for phase in phases {
                let activation = MuscleActivation::for_phase(mode, phase);
                assert!(activation.iter().all(|(_, a)| (0.0..=1.0).contains(&a)));
            }
        }
    }

    #[test]
    fn test_symmetric_pose_has_no_asymmetry() {
        let activation = MuscleActivation::for_phase(ExerciseMode::Squat, ExercisePhase::Hold);
        let pose = Pose::from_pairs([
            (JointId::LeftLowerLeg, Rotation::new(1.2, 0.0, 0.0)),
            (JointId::RightLowerLeg, Rotation::new(1.2, 0.0, 0.0)),
        ]);
        let split = lateral_split(&activation, &pose);
        assert_relative_eq!(split.asymmetry, 0.0);
        let quads = MuscleGroup::Quadriceps.index();
        assert_relative_eq!(split.left[quads], split.right[quads]);
    }

    #[test]
    fn test_one_sided_motion_is_asymmetric() {
        let activation = MuscleActivation::for_phase(ExerciseMode::Lunge, ExercisePhase::Hold);
        let pose = Pose::from_pairs([
            (JointId::LeftLowerLeg, Rotation::new(1.5, 0.0, 0.0)),
            (JointId::RightLowerLeg, Rotation::new(0.5, 0.0, 0.0)),
        ]);
        let split = lateral_split(&activation, &pose);
        assert!(split.asymmetry > 0.0 && split.asymmetry <= 1.0);
        let quads = MuscleGroup::Quadriceps.index();
        assert!(split.left[quads] > split.right[quads]);
    }

    #[test]
    fn test_serializes_as_named_map() {
        let json = serde_json::to_value(MuscleActivation::baseline()).unwrap();
        assert_eq!(json["lowerBack"], serde_json::json!(IDLE_BASELINE));
    }
}
