//! Procedural fallback clips used when no authored clip is loaded
//!
//! Each mode moves its joints from the base posture to a peak offset and
//! back. Keyframes sit on the phase thresholds (0, 0.6, 0.8, 1) so the
//! threshold phase rule matches the motion: descend, hold, return.

use super::mode::ExerciseMode;
use crate::animation::{AnimationClip, Keyframe, PhaseWindow, CONCENTRIC_START, HOLD_START};
use crate::pose::{Pose, Rotation};
use crate::skeleton::JointId;

/// Cycle length of procedural clips (seconds)
pub const PROCEDURAL_DURATION: f32 = 4.0;

/// Peak rotation offsets from the base posture
fn peak_offsets(mode: ExerciseMode) -> &'static [(JointId, [f32; 3])] {
    use JointId::*;
    match mode {
        ExerciseMode::Rest => &[],
        ExerciseMode::Squat => &[
            (LeftUpperLeg, [-1.3, 0.0, 0.0]),
            (RightUpperLeg, [-1.3, 0.0, 0.0]),
            (LeftLowerLeg, [1.6, 0.0, 0.0]),
            (RightLowerLeg, [1.6, 0.0, 0.0]),
            (LeftFoot, [-0.3, 0.0, 0.0]),
            (RightFoot, [-0.3, 0.0, 0.0]),
            (Spine, [0.3, 0.0, 0.0]),
        ],
        ExerciseMode::Lunge => &[
            (LeftUpperLeg, [-1.2, 0.0, 0.0]),
            (LeftLowerLeg, [1.4, 0.0, 0.0]),
            (RightUpperLeg, [0.3, 0.0, 0.0]),
            (RightLowerLeg, [1.3, 0.0, 0.0]),
            (Spine, [0.1, 0.0, 0.0]),
        ],
        ExerciseMode::ShoulderPress => &[
            (LeftUpperArm, [0.2, 0.0, -0.9]),
            (RightUpperArm, [0.2, 0.0, 0.9]),
            (LeftLowerArm, [1.4, 0.0, 0.0]),
            (RightLowerArm, [1.4, 0.0, 0.0]),
        ],
        ExerciseMode::BicepCurl => &[
            (LeftLowerArm, [1.9, 0.0, 0.0]),
            (RightLowerArm, [1.9, 0.0, 0.0]),
            (LeftUpperArm, [0.15, 0.0, 0.0]),
            (RightUpperArm, [0.15, 0.0, 0.0]),
        ],
        ExerciseMode::GluteBridge => &[
            (Hips, [0.4, 0.0, 0.0]),
            (LeftUpperLeg, [0.4, 0.0, 0.0]),
            (RightUpperLeg, [0.4, 0.0, 0.0]),
            (LeftLowerLeg, [0.3, 0.0, 0.0]),
            (RightLowerLeg, [0.3, 0.0, 0.0]),
            (Spine, [-0.2, 0.0, 0.0]),
        ],
    }
}

/// Vertical root travel at the peak (metres)
fn peak_root_y(mode: ExerciseMode) -> Option<f32> {
    match mode {
        ExerciseMode::Squat => Some(-0.35),
        ExerciseMode::Lunge => Some(-0.3),
        ExerciseMode::GluteBridge => Some(0.2),
        _ => None,
    }
}

/// Build the fallback clip for `mode` around `base`
pub fn procedural_clip(mode: ExerciseMode, base: &Pose) -> AnimationClip {
    let offsets = peak_offsets(mode);
    if offsets.is_empty() {
        return AnimationClip::new(1.0, vec![Keyframe::new(0.0, Pose::new())])
            .with_phases(vec![PhaseWindow::new("rest", 0.0, 1.0)]);
    }

    let neutral = Pose::from_pairs(offsets.iter().map(|(j, _)| (*j, base.rotation(*j))));
    let peak = Pose::from_pairs(
        offsets
            .iter()
            .map(|(j, off)| (*j, base.rotation(*j) + Rotation::from(*off))),
    );

    let key = |time: f32, pose: &Pose, root_y: f32| {
        let kf = Keyframe::new(time, pose.clone());
        match peak_root_y(mode) {
            Some(_) => kf.with_root_y(root_y),
            None => kf,
        }
    };
    let root_drop = peak_root_y(mode).unwrap_or(0.0);

    AnimationClip::new(
        PROCEDURAL_DURATION,
        vec![
            key(0.0, &neutral, 0.0),
            key(HOLD_START, &peak, root_drop),
            key(CONCENTRIC_START, &peak, root_drop),
            key(1.0, &neutral, 0.0),
        ],
    )
}
