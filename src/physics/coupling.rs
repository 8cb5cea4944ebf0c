//! Kinematic coupling - secondary motion that follows a driving joint
//!
//! Corrections are computed from the incoming pose in full before any of
//! them is applied, so drivers never read partially-updated joints and
//! contributions from several drivers to one joint simply sum.

use nalgebra::Vector3;

use crate::pose::Pose;
use crate::skeleton::{couplings, JointId, JOINT_COUNT};

pub struct CouplingPropagator {
    /// Global attenuation of every coupling ratio
    scale: f32,
}

impl CouplingPropagator {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Per-joint additive corrections implied by `pose`
    pub fn corrections(&self, pose: &Pose) -> [Vector3<f32>; JOINT_COUNT] {
        let mut buffer = [Vector3::zeros(); JOINT_COUNT];
        for (driver, rotation) in pose.iter() {
            for coupling in couplings(driver) {
                buffer[coupling.joint.index()] += rotation * (coupling.ratio * self.scale);
            }
        }
        buffer
    }

    /// Apply corrections to joints already present in the pose
    pub fn apply(&self, pose: &Pose) -> Pose {
        let buffer = self.corrections(pose);
        let mut out = pose.clone();
        for joint in JointId::ALL {
            out.add_if_present(joint, buffer[joint.index()]);
        }
        out
    }
}

impl Default for CouplingPropagator {
    fn default() -> Self {
        Self::new(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_follower_gets_scaled_ratio() {
        let pose = Pose::from_pairs([
            (JointId::Neck, Rotation::new(0.4, 0.0, 0.0)),
            (JointId::Head, Rotation::zeros()),
        ]);
        let out = CouplingPropagator::new(0.1).apply(&pose);
        // neck -> head at ratio 0.5
        assert_relative_eq!(out.rotation(JointId::Head).x, 0.4 * 0.5 * 0.1);
        assert_relative_eq!(out.rotation(JointId::Neck).x, 0.4);
    }

    #[test]
    fn test_missing_follower_not_created() {
        let pose = Pose::from_pairs([(JointId::Neck, Rotation::new(0.4, 0.0, 0.0))]);
        let out = CouplingPropagator::new(0.1).apply(&pose);
        assert!(!out.contains(JointId::Head));
    }

    #[test]
    fn test_contributions_from_two_drivers_sum() {
        // Both upper legs drive the hips at 0.15
        let pose = Pose::from_pairs([
            (JointId::Hips, Rotation::zeros()),
            (JointId::LeftUpperLeg, Rotation::new(-1.0, 0.0, 0.0)),
            (JointId::RightUpperLeg, Rotation::new(-0.6, 0.0, 0.0)),
        ]);
        let out = CouplingPropagator::new(0.1).apply(&pose);
        assert_relative_eq!(out.rotation(JointId::Hips).x, -1.6 * 0.15 * 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_uses_pre_correction_driver_values() {
        // hips drives spine, spine drives hips: each reads the other's input value
        let pose = Pose::from_pairs([
            (JointId::Hips, Rotation::new(1.0, 0.0, 0.0)),
            (JointId::Spine, Rotation::new(0.0, 0.0, 0.0)),
        ]);
        let out = CouplingPropagator::new(0.1).apply(&pose);
        assert_relative_eq!(out.rotation(JointId::Spine).x, 0.05);
        assert_relative_eq!(out.rotation(JointId::Hips).x, 1.0);
    }
}
