//! Balance and ground-reaction estimation
//!
//! Centre of mass is the mass-weighted centroid of joint world positions.
//! The ground-reaction force is a phenomenological estimate derived from the
//! exercise phase, root vertical velocity and balance offset; there is no
//! force sensor behind it.

use nalgebra::{Vector2, Vector3};
use serde::Serialize;

use crate::animation::ExercisePhase;
use crate::config::{BalanceConfig, BodyConfig};
use crate::pose::JointPositions;
use crate::skeleton::{physics_table, JointId, JointPhysics, JOINT_COUNT};

/// Centre-of-mass state relative to the base of support
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub center_of_mass: [f32; 3],
    /// COM minus the reference base position
    pub offset: [f32; 3],
    /// 1 when centred over the base, 0 at the support radius or beyond
    pub stability: f32,
}

/// Estimated ground-reaction force (newtons)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundReaction {
    pub vertical: f32,
    pub anterior_posterior: f32,
    pub medio_lateral: f32,
    /// Centre of pressure relative to the base (x = lateral, y = forward)
    pub center_of_pressure: [f32; 2],
}

/// Mass-weighted centroid; falls back to the origin when total mass is zero
pub fn center_of_mass(positions: &JointPositions, masses: &[JointPhysics; JOINT_COUNT]) -> Vector3<f32> {
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for (joint, position) in positions.iter() {
        let mass = masses[joint.index()].mass;
        weighted += position * mass;
        total += mass;
    }
    if total > 0.0 {
        weighted / total
    } else {
        Vector3::zeros()
    }
}

/// Midpoint of the two feet, projected to the ground plane
pub fn support_base(positions: &JointPositions) -> Vector3<f32> {
    let mid = (positions.get(JointId::LeftFoot) + positions.get(JointId::RightFoot)) * 0.5;
    Vector3::new(mid.x, 0.0, mid.z)
}

/// Vertical GRF as a multiple of body weight
///
/// Descent unloads the feet, concentric drive loads them, and an isometric
/// hold adds load in proportion to muscle tension.
pub fn vertical_multiplier(phase: ExercisePhase, root_velocity_y: f32, tension: f32) -> f32 {
    match phase {
        ExercisePhase::Eccentric => 1.0 - ((-root_velocity_y).max(0.0) * 0.5).min(0.3),
        ExercisePhase::Concentric => 1.1 + (root_velocity_y.max(0.0) * 0.8).min(0.5),
        ExercisePhase::Hold => 1.0 + 0.2 * tension.clamp(0.0, 1.0),
        ExercisePhase::Idle => 1.0,
    }
}

pub struct BalanceEstimator {
    masses: [JointPhysics; JOINT_COUNT],
    body: BodyConfig,
    config: BalanceConfig,
}

impl BalanceEstimator {
    pub fn new(body: BodyConfig, config: BalanceConfig) -> Self {
        Self {
            masses: physics_table(),
            body,
            config,
        }
    }

    pub fn balance(&self, positions: &JointPositions) -> BalanceSnapshot {
        let com = center_of_mass(positions, &self.masses);
        let offset = com - support_base(positions);
        let horizontal = Vector2::new(offset.x, offset.z).norm();
        let stability = (1.0 - horizontal / self.config.support_radius).clamp(0.0, 1.0);

        BalanceSnapshot {
            center_of_mass: com.into(),
            offset: offset.into(),
            stability,
        }
    }

    pub fn ground_reaction(
        &self,
        phase: ExercisePhase,
        root_velocity_y: f32,
        tension: f32,
        offset: Vector3<f32>,
        external_load_kg: f32,
    ) -> GroundReaction {
        let weight = (self.body.mass_kg + external_load_kg.max(0.0)) * self.body.gravity;
        let shear = weight * self.config.shear_gain;

        GroundReaction {
            vertical: weight * vertical_multiplier(phase, root_velocity_y, tension),
            anterior_posterior: shear * offset.z,
            medio_lateral: shear * offset.x,
            center_of_pressure: [
                offset.x * self.config.cop_scale,
                offset.z * self.config.cop_scale,
            ],
        }
    }
}

impl Default for BalanceEstimator {
    fn default() -> Self {
        Self::new(BodyConfig::default(), BalanceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standing_positions(shift_x: f32) -> JointPositions {
        let mut positions = [Vector3::zeros(); JOINT_COUNT];
        for (i, joint) in JointId::ALL.iter().enumerate() {
            let height = match joint {
                JointId::LeftFoot | JointId::RightFoot => 0.05,
                JointId::LeftLowerLeg | JointId::RightLowerLeg => 0.5,
                _ => 1.2,
            };
            let side = match joint.name() {
                n if n.starts_with("left") => -0.1,
                n if n.starts_with("right") => 0.1,
                _ => 0.0,
            };
            let x = if height > 1.0 { side + shift_x } else { side };
            positions[i] = Vector3::new(x, height, 0.0);
        }
        JointPositions::new(positions)
    }

    #[test]
    fn test_com_is_mass_weighted() {
        let mut positions = [Vector3::zeros(); JOINT_COUNT];
        positions[JointId::Hips.index()] = Vector3::new(1.0, 0.0, 0.0);
        let masses = physics_table();
        let com = center_of_mass(&JointPositions::new(positions), &masses);
        let total: f32 = masses.iter().map(|m| m.mass).sum();
        assert_relative_eq!(com.x, masses[JointId::Hips.index()].mass / total, epsilon = 1e-6);
    }

    #[test]
    fn test_centred_body_is_stable() {
        let estimator = BalanceEstimator::default();
        let snapshot = estimator.balance(&standing_positions(0.0));
        assert_relative_eq!(snapshot.offset[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(snapshot.stability, 1.0);
    }

    #[test]
    fn test_lean_reduces_stability_and_shifts_force() {
        let estimator = BalanceEstimator::default();
        let snapshot = estimator.balance(&standing_positions(0.2));
        assert!(snapshot.offset[0] > 0.0);
        assert!(snapshot.stability < 1.0);

        let offset = Vector3::from(snapshot.offset);
        let grf = estimator.ground_reaction(ExercisePhase::Idle, 0.0, 0.0, offset, 0.0);
        assert!(grf.medio_lateral > 0.0);
        assert_relative_eq!(grf.anterior_posterior, 0.0);
        assert_relative_eq!(grf.vertical, 70.0 * 9.81, epsilon = 1e-2);
    }

    #[test]
    fn test_vertical_multiplier_by_phase() {
        assert!(vertical_multiplier(ExercisePhase::Eccentric, -0.5, 0.0) < 1.0);
        assert!(vertical_multiplier(ExercisePhase::Concentric, 0.5, 0.0) > 1.0);
        assert_relative_eq!(vertical_multiplier(ExercisePhase::Hold, 0.0, 0.5), 1.1);
        assert_relative_eq!(vertical_multiplier(ExercisePhase::Eccentric, -10.0, 0.0), 0.7);
    }

    #[test]
    fn test_external_load_adds_weight() {
        let estimator = BalanceEstimator::default();
        let grf = estimator.ground_reaction(ExercisePhase::Idle, 0.0, 0.0, Vector3::zeros(), 10.0);
        assert_relative_eq!(grf.vertical, 80.0 * 9.81, epsilon = 1e-2);
    }
}
