//! Static per-joint tables: spring physiology, range of motion, coupling,
//! and supported body mass.

use nalgebra::Vector3;

use super::joint::{JointId, JOINT_COUNT};

/// Spring parameters of a joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointPhysics {
    /// Effective rotational mass (also used as the centre-of-mass weight)
    pub mass: f32,
    /// Linear damping coefficient
    pub damping: f32,
    /// Spring stiffness toward the target rotation
    pub stiffness: f32,
}

impl JointPhysics {
    pub const fn new(mass: f32, damping: f32, stiffness: f32) -> Self {
        Self { mass, damping, stiffness }
    }
}

/// Anatomical range of motion per axis (radians)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RomLimits {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl RomLimits {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self {
            min: Vector3::from(min),
            max: Vector3::from(max),
        }
    }

    /// Clamp each axis independently
    pub fn clamp(&self, rotation: Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            rotation.x.clamp(self.min.x, self.max.x),
            rotation.y.clamp(self.min.y, self.max.y),
            rotation.z.clamp(self.min.z, self.max.z),
        )
    }

    pub fn contains(&self, rotation: &Vector3<f32>) -> bool {
        (0..3).all(|i| rotation[i] >= self.min[i] && rotation[i] <= self.max[i])
    }
}

/// A joint that follows a driving joint by a fixed ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coupling {
    pub joint: JointId,
    pub ratio: f32,
}

const fn coupled(joint: JointId, ratio: f32) -> Coupling {
    Coupling { joint, ratio }
}

/// Physiological spring table. Trunk joints are heavy and slow, distal
/// joints light and stiff.
pub fn joint_physics(joint: JointId) -> JointPhysics {
    use JointId::*;
    match joint {
        Hips => JointPhysics::new(2.0, 30.0, 120.0),
        Spine => JointPhysics::new(1.8, 28.0, 130.0),
        Chest => JointPhysics::new(1.6, 26.0, 140.0),
        UpperChest => JointPhysics::new(1.4, 24.0, 150.0),
        Neck => JointPhysics::new(0.8, 18.0, 160.0),
        Head => JointPhysics::new(1.0, 20.0, 150.0),
        LeftShoulder | RightShoulder => JointPhysics::new(0.8, 18.0, 170.0),
        LeftUpperArm | RightUpperArm => JointPhysics::new(1.0, 20.0, 170.0),
        LeftLowerArm | RightLowerArm => JointPhysics::new(0.8, 17.0, 180.0),
        LeftHand | RightHand => JointPhysics::new(0.4, 12.0, 200.0),
        LeftUpperLeg | RightUpperLeg => JointPhysics::new(1.8, 28.0, 140.0),
        LeftLowerLeg | RightLowerLeg => JointPhysics::new(1.4, 24.0, 150.0),
        LeftFoot | RightFoot => JointPhysics::new(0.6, 14.0, 190.0),
    }
}

/// Anatomical limits. Every joint of the rig has one.
pub fn rom_limits(joint: JointId) -> Option<RomLimits> {
    use JointId::*;
    let limits = match joint {
        Hips => RomLimits::new([-0.5, -0.6, -0.4], [0.5, 0.6, 0.4]),
        Spine => RomLimits::new([-0.5, -0.5, -0.4], [0.8, 0.5, 0.4]),
        Chest => RomLimits::new([-0.3, -0.4, -0.3], [0.5, 0.4, 0.3]),
        UpperChest => RomLimits::new([-0.2, -0.3, -0.2], [0.3, 0.3, 0.2]),
        Neck => RomLimits::new([-0.8, -1.2, -0.6], [0.8, 1.2, 0.6]),
        Head => RomLimits::new([-0.5, -0.6, -0.4], [0.5, 0.6, 0.4]),
        LeftShoulder | RightShoulder => RomLimits::new([-0.3, -0.3, -0.4], [0.3, 0.3, 0.4]),
        LeftUpperArm | RightUpperArm => RomLimits::new([-1.0, -1.5, -1.6], [3.0, 1.5, 1.6]),
        // Elbow and knee cannot hyperextend
        LeftLowerArm | RightLowerArm => RomLimits::new([0.0, -1.4, -0.1], [2.6, 1.4, 0.1]),
        LeftHand | RightHand => RomLimits::new([-1.2, -0.4, -0.6], [1.2, 0.4, 0.6]),
        LeftUpperLeg | RightUpperLeg => RomLimits::new([-2.1, -0.6, -0.5], [0.5, 0.6, 0.8]),
        LeftLowerLeg | RightLowerLeg => RomLimits::new([0.0, -0.2, -0.1], [2.4, 0.2, 0.1]),
        LeftFoot | RightFoot => RomLimits::new([-0.9, -0.5, -0.4], [0.4, 0.5, 0.4]),
    };
    Some(limits)
}

static HIPS_COUPLING: [Coupling; 3] = [
    coupled(JointId::Spine, 0.5),
    coupled(JointId::LeftUpperLeg, 0.3),
    coupled(JointId::RightUpperLeg, 0.3),
];
static SPINE_COUPLING: [Coupling; 2] = [coupled(JointId::Chest, 0.6), coupled(JointId::Hips, 0.2)];
static CHEST_COUPLING: [Coupling; 2] = [
    coupled(JointId::UpperChest, 0.5),
    coupled(JointId::Neck, 0.2),
];
static NECK_COUPLING: [Coupling; 1] = [coupled(JointId::Head, 0.5)];
static LEFT_UPPER_ARM_COUPLING: [Coupling; 2] = [
    coupled(JointId::LeftShoulder, 0.3),
    coupled(JointId::LeftLowerArm, 0.2),
];
static RIGHT_UPPER_ARM_COUPLING: [Coupling; 2] = [
    coupled(JointId::RightShoulder, 0.3),
    coupled(JointId::RightLowerArm, 0.2),
];
static LEFT_UPPER_LEG_COUPLING: [Coupling; 2] = [
    coupled(JointId::LeftLowerLeg, 0.4),
    coupled(JointId::Hips, 0.15),
];
static RIGHT_UPPER_LEG_COUPLING: [Coupling; 2] = [
    coupled(JointId::RightLowerLeg, 0.4),
    coupled(JointId::Hips, 0.15),
];
static LEFT_LOWER_LEG_COUPLING: [Coupling; 1] = [coupled(JointId::LeftFoot, 0.3)];
static RIGHT_LOWER_LEG_COUPLING: [Coupling; 1] = [coupled(JointId::RightFoot, 0.3)];

/// Joints driven by `driver`, with their follow ratios
pub fn couplings(driver: JointId) -> &'static [Coupling] {
    use JointId::*;
    match driver {
        Hips => &HIPS_COUPLING,
        Spine => &SPINE_COUPLING,
        Chest => &CHEST_COUPLING,
        Neck => &NECK_COUPLING,
        LeftUpperArm => &LEFT_UPPER_ARM_COUPLING,
        RightUpperArm => &RIGHT_UPPER_ARM_COUPLING,
        LeftUpperLeg => &LEFT_UPPER_LEG_COUPLING,
        RightUpperLeg => &RIGHT_UPPER_LEG_COUPLING,
        LeftLowerLeg => &LEFT_LOWER_LEG_COUPLING,
        RightLowerLeg => &RIGHT_LOWER_LEG_COUPLING,
        _ => &[],
    }
}

/// Fraction of total body mass a joint bears when standing upright
pub fn supported_mass_fraction(joint: JointId) -> f32 {
    use JointId::*;
    match joint {
        Hips => 0.536,
        Spine => 0.397,
        Chest => 0.29,
        UpperChest => 0.18,
        Neck => 0.081,
        Head => 0.069,
        LeftShoulder | RightShoulder => 0.05,
        LeftUpperArm | RightUpperArm => 0.044,
        LeftLowerArm | RightLowerArm => 0.022,
        LeftHand | RightHand => 0.006,
        LeftUpperLeg | RightUpperLeg => 0.34,
        LeftLowerLeg | RightLowerLeg => 0.44,
        LeftFoot | RightFoot => 0.49,
    }
}

/// Spring parameters for every joint, in index order
pub fn physics_table() -> [JointPhysics; JOINT_COUNT] {
    JointId::ALL.map(joint_physics)
}
