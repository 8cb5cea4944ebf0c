//! Authored keyframe animation clips

use serde::{Deserialize, Serialize};

use super::phase::{PhaseResolver, PhaseWindow};
use crate::error::{EngineError, Result};
use crate::pose::Pose;

/// A pose pinned to a normalized time in the cycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Normalized time in [0, 1]
    pub time: f32,
    pub pose: Pose,
    /// Vertical root offset (metres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_y: Option<f32>,
}

impl Keyframe {
    pub fn new(time: f32, pose: Pose) -> Self {
        Self { time, pose, root_y: None }
    }

    pub fn with_root_y(mut self, root_y: f32) -> Self {
        self.root_y = Some(root_y);
        self
    }
}

/// One repetition of an exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationClip {
    /// Cycle length (seconds)
    pub duration: f32,
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub phases: Vec<PhaseWindow>,
}

impl AnimationClip {
    pub fn new(duration: f32, keyframes: Vec<Keyframe>) -> Self {
        Self {
            duration,
            keyframes,
            phases: Vec::new(),
        }
    }

    pub fn with_phases(mut self, phases: Vec<PhaseWindow>) -> Self {
        self.phases = phases;
        self
    }

    /// Parse and validate clip JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let clip: Self = serde_json::from_str(json)?;
        clip.validate()?;
        Ok(clip)
    }

    /// Keyframe times must be non-decreasing and inside [0, 1]
    pub fn validate(&self) -> Result<()> {
        if !(self.duration > 0.0) {
            return Err(EngineError::invalid_clip(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }

        for (i, kf) in self.keyframes.iter().enumerate() {
            if !(0.0..=1.0).contains(&kf.time) {
                return Err(EngineError::invalid_clip(format!(
                    "keyframe {} time {} outside [0, 1]",
                    i, kf.time
                )));
            }
        }

        if let Some(i) = self
            .keyframes
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(EngineError::invalid_clip(format!(
                "keyframe {} precedes keyframe {}",
                i + 1,
                i
            )));
        }

        for window in &self.phases {
            if window.end_time < window.start_time {
                return Err(EngineError::invalid_clip(format!(
                    "phase window '{}' ends before it starts",
                    window.name
                )));
            }
        }

        Ok(())
    }

    pub fn phase_resolver(&self) -> PhaseResolver<'_> {
        PhaseResolver::for_windows(&self.phases)
    }
}
