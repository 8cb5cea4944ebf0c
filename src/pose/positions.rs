//! World-space joint positions supplied by the skeleton's bone map

use nalgebra::Vector3;

use crate::error::{EngineError, Result};
use crate::skeleton::{JointId, JOINT_COUNT};

/// World position (metres) of every rig joint
#[derive(Clone, Debug, PartialEq)]
pub struct JointPositions {
    positions: [Vector3<f32>; JOINT_COUNT],
}

impl JointPositions {
    pub fn new(positions: [Vector3<f32>; JOINT_COUNT]) -> Self {
        Self { positions }
    }

    /// Parse a flat `[x, y, z]` array in joint index order
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        let expected = JOINT_COUNT * 3;
        if data.len() != expected {
            return Err(EngineError::InvalidPositionData {
                got: data.len(),
                expected,
            });
        }

        let mut positions = [Vector3::zeros(); JOINT_COUNT];
        for (i, chunk) in data.chunks_exact(3).enumerate() {
            positions[i] = Vector3::new(chunk[0], chunk[1], chunk[2]);
        }
        Ok(Self { positions })
    }

    pub fn get(&self, joint: JointId) -> Vector3<f32> {
        self.positions[joint.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, Vector3<f32>)> + '_ {
        JointId::ALL.iter().map(move |j| (*j, self.positions[j.index()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_rejects_wrong_length() {
        let err = JointPositions::from_flat(&[0.0; 10]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidPositionData { got: 10, expected: 60 }
        ));
    }

    #[test]
    fn test_from_flat_orders_by_joint_index() {
        let mut data = vec![0.0; JOINT_COUNT * 3];
        data[JointId::Head.index() * 3 + 1] = 1.7;
        let positions = JointPositions::from_flat(&data).unwrap();
        assert_eq!(positions.get(JointId::Head).y, 1.7);
        assert_eq!(positions.get(JointId::Hips).y, 0.0);
    }
}
