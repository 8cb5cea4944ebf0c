//! Per-joint load estimate
//!
//! `load = g · (supportedFraction · bodyMass + externalShare) · (1 + gain · |ω|)`
//!
//! The external load is shared evenly across the exercise's primary joints.
//! `|ω|` is the joint's current spring angular speed.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::BodyConfig;
use crate::exercise::ExerciseProfile;
use crate::skeleton::{supported_mass_fraction, JointId, JOINT_COUNT};

/// Load (newtons) through every joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLoads {
    loads: [f32; JOINT_COUNT],
}

impl JointLoads {
    pub fn get(&self, joint: JointId) -> f32 {
        self.loads[joint.index()]
    }

    /// Heaviest joint load, 0 for an empty map
    pub fn max(&self) -> f32 {
        self.loads.iter().copied().fold(0.0, f32::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, f32)> + '_ {
        JointId::ALL.iter().map(move |j| (*j, self.loads[j.index()]))
    }

    pub fn to_array(&self) -> [f32; JOINT_COUNT] {
        self.loads
    }
}

impl Default for JointLoads {
    fn default() -> Self {
        Self {
            loads: [0.0; JOINT_COUNT],
        }
    }
}

impl Serialize for JointLoads {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(JOINT_COUNT))?;
        for (joint, load) in self.iter() {
            map.serialize_entry(joint.name(), &load)?;
        }
        map.end()
    }
}

pub struct LoadEstimator {
    body: BodyConfig,
    velocity_gain: f32,
}

impl LoadEstimator {
    pub fn new(body: BodyConfig, velocity_gain: f32) -> Self {
        Self { body, velocity_gain }
    }

    /// Estimate loads; `speed` yields each joint's angular speed (rad/s)
    pub fn estimate<F>(&self, profile: &ExerciseProfile, external_load_kg: f32, speed: F) -> JointLoads
    where
        F: Fn(JointId) -> f32,
    {
        let external_share = if profile.primary_joints.is_empty() {
            0.0
        } else {
            external_load_kg.max(0.0) / profile.primary_joints.len() as f32
        };

        let mut loads = [0.0; JOINT_COUNT];
        for joint in JointId::ALL {
            let mut mass = supported_mass_fraction(joint) * self.body.mass_kg;
            if profile.is_primary(joint) {
                mass += external_share;
            }
            let dynamic = 1.0 + self.velocity_gain * speed(joint).abs();
            loads[joint.index()] = self.body.gravity * mass * dynamic;
        }

        JointLoads { loads }
    }
}

impl Default for LoadEstimator {
    fn default() -> Self {
        Self::new(BodyConfig::default(), 0.1)
    }
}
