//! Form score from tracking error and fatigue
//!
//! `score = 100 - 200 · meanDeviation - 30 · fatigue`, clamped to `[0, 100]`,
//! where `meanDeviation` is the mean rotation distance (radians) between the
//! intended target and the filtered output over the primary joints.

use crate::pose::Pose;
use crate::skeleton::JointId;

const DEVIATION_PENALTY: f32 = 200.0;
const FATIGUE_PENALTY: f32 = 30.0;

pub const PERFECT_FORM: f32 = 100.0;

/// Mean rotation distance over joints present in both poses, 0 if none
pub fn mean_deviation(target: &Pose, actual: &Pose, joints: &[JointId]) -> f32 {
    let mut sum = 0.0;
    let mut count = 0;
    for &joint in joints {
        if let (Some(t), Some(a)) = (target.get(joint), actual.get(joint)) {
            sum += (t - a).norm();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

pub fn form_score(target: &Pose, actual: &Pose, primary: &[JointId], fatigue: f32) -> f32 {
    let deviation = mean_deviation(target, actual, primary);
    (PERFECT_FORM - DEVIATION_PENALTY * deviation - FATIGUE_PENALTY * fatigue.clamp(0.0, 1.0))
        .clamp(0.0, PERFECT_FORM)
}
