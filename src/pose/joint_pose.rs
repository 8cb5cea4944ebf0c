//! Joint-rotation pose stored as a flat array indexed by `JointId`
//!
//! A joint may be absent from a pose. Absent joints read as the zero rotation
//! when blending, but coupling never creates them.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::skeleton::{JointId, JOINT_COUNT};

/// Euler rotation (radians) of a single joint
pub type Rotation = Vector3<f32>;

/// Per-joint rotations for one frame
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PoseRepr", into = "PoseRepr")]
pub struct Pose {
    rotations: [Option<Rotation>; JOINT_COUNT],
}

impl Pose {
    /// Empty pose (reads as the neutral zero pose)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I: IntoIterator<Item = (JointId, Rotation)>>(pairs: I) -> Self {
        let mut pose = Self::new();
        for (joint, rotation) in pairs {
            pose.set(joint, rotation);
        }
        pose
    }

    pub fn get(&self, joint: JointId) -> Option<Rotation> {
        self.rotations[joint.index()]
    }

    /// Rotation of `joint`, zero when absent
    pub fn rotation(&self, joint: JointId) -> Rotation {
        self.get(joint).unwrap_or_else(Rotation::zeros)
    }

    pub fn set(&mut self, joint: JointId, rotation: Rotation) {
        self.rotations[joint.index()] = Some(rotation);
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.rotations[joint.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.rotations.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.iter().all(Option::is_none)
    }

    /// Present joints with their rotations, in index order
    pub fn iter(&self) -> impl Iterator<Item = (JointId, Rotation)> + '_ {
        JointId::ALL
            .iter()
            .zip(self.rotations.iter())
            .filter_map(|(joint, rotation)| rotation.map(|r| (*joint, r)))
    }

    /// Add `delta` to a joint only if it is already present
    pub fn add_if_present(&mut self, joint: JointId, delta: Rotation) {
        if let Some(rotation) = self.rotations[joint.index()].as_mut() {
            *rotation += delta;
        }
    }

    /// `self` with every joint of `top` written over it
    pub fn overlay(&self, top: &Pose) -> Pose {
        let mut out = self.clone();
        for (joint, rotation) in top.iter() {
            out.set(joint, rotation);
        }
        out
    }

    /// Linear blend over the union of joints; a side missing a joint
    /// contributes the zero rotation.
    ///
    /// Written as `a·(1−t) + b·t` so `t = 0` and `t = 1` reproduce the
    /// endpoints exactly.
    pub fn blend(a: &Pose, b: &Pose, t: f32) -> Pose {
        let mut out = Pose::new();
        for joint in JointId::ALL {
            if a.contains(joint) || b.contains(joint) {
                out.set(joint, a.rotation(joint) * (1.0 - t) + b.rotation(joint) * t);
            }
        }
        out
    }

    /// Flat `[x, y, z]` triples for every rig joint, zeros for absent joints
    pub fn to_flat(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(JOINT_COUNT * 3);
        for joint in JointId::ALL {
            flat.extend_from_slice(self.rotation(joint).as_slice());
        }
        flat
    }
}

// ============================================================================
// JSON REPRESENTATION: { "jointName": { "x": .., "y": .., "z": .. } }
// ============================================================================

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
struct Axes {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct PoseRepr(BTreeMap<String, Axes>);

impl From<PoseRepr> for Pose {
    fn from(repr: PoseRepr) -> Self {
        let mut pose = Pose::new();
        for (name, axes) in repr.0 {
            match JointId::from_name(&name) {
                Some(joint) => pose.set(joint, Rotation::new(axes.x, axes.y, axes.z)),
                None => tracing::warn!(joint = %name, "ignoring unknown joint in pose"),
            }
        }
        pose
    }
}

impl From<Pose> for PoseRepr {
    fn from(pose: Pose) -> Self {
        PoseRepr(
            pose.iter()
                .map(|(joint, r)| (joint.name().to_string(), Axes { x: r.x, y: r.y, z: r.z }))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_blend_uses_union_of_joints() {
        let a = Pose::from_pairs([(JointId::Hips, Rotation::new(1.0, 0.0, 0.0))]);
        let b = Pose::from_pairs([(JointId::Spine, Rotation::new(0.0, 2.0, 0.0))]);
        let mid = Pose::blend(&a, &b, 0.5);
        assert_relative_eq!(mid.rotation(JointId::Hips).x, 0.5);
        assert_relative_eq!(mid.rotation(JointId::Spine).y, 1.0);
        assert!(!mid.contains(JointId::Head));
    }

    #[test]
    fn test_blend_endpoints_exact() {
        let a = Pose::from_pairs([(JointId::Neck, Rotation::new(0.1, 0.2, 0.3))]);
        let b = Pose::from_pairs([(JointId::Neck, Rotation::new(0.7, -0.4, 0.9))]);
        assert_eq!(Pose::blend(&a, &b, 0.0), a);
        assert_eq!(Pose::blend(&a, &b, 1.0), b);
    }

    #[test]
    fn test_add_if_present_never_creates() {
        let mut pose = Pose::from_pairs([(JointId::Chest, Rotation::zeros())]);
        pose.add_if_present(JointId::Chest, Rotation::new(0.1, 0.0, 0.0));
        pose.add_if_present(JointId::Head, Rotation::new(0.1, 0.0, 0.0));
        assert_relative_eq!(pose.rotation(JointId::Chest).x, 0.1);
        assert!(!pose.contains(JointId::Head));
    }

    #[test]
    fn test_json_skips_unknown_joints() {
        let pose: Pose =
            serde_json::from_str(r#"{"leftUpperLeg": {"x": 0.5}, "tail": {"x": 1.0}}"#).unwrap();
        assert_eq!(pose.len(), 1);
        assert_relative_eq!(pose.rotation(JointId::LeftUpperLeg).x, 0.5);
    }
}
