//! Per-tick input and output
//!
//! Outputs are plain snapshots; nothing in them refers back into the engine.

use serde::Serialize;

use crate::animation::{AnimationClip, PhaseChange};
use crate::biomech::{InjuryRiskFactors, JointLoads, MuscleActivation, RiskLevel};
use crate::exercise::ExerciseProfile;
use crate::physics::{BalanceSnapshot, GroundReaction};
use crate::pose::{JointPositions, Pose};
use crate::scheduler::LodLevel;

/// Everything the host supplies for one frame
#[derive(Clone, Copy, Debug)]
pub struct TickInput<'a> {
    /// Authored clip; the mode's procedural clip is used when `None`
    pub clip: Option<&'a AnimationClip>,
    /// Normalized clip time in `[0, 1)`
    pub clip_time: f32,
    /// Measured wall-clock frame delta (seconds), unclamped
    pub frame_delta: f32,
    pub camera_distance: f32,
    /// Overrides the base pose of the current body position
    pub base_pose: Option<&'a Pose>,
    /// Overrides the current exercise mode's profile
    pub profile: Option<&'a ExerciseProfile>,
    pub external_load_kg: f32,
    /// World joint positions from the skeleton; balance is skipped without them
    pub joint_positions: Option<&'a JointPositions>,
    /// Externally measured form score (0..=100); estimated when `None`
    pub form_score: Option<f32>,
}

impl<'a> TickInput<'a> {
    pub fn new(clip_time: f32, frame_delta: f32) -> Self {
        Self {
            clip: None,
            clip_time,
            frame_delta,
            camera_distance: 0.0,
            base_pose: None,
            profile: None,
            external_load_kg: 0.0,
            joint_positions: None,
            form_score: None,
        }
    }

    pub fn with_clip(mut self, clip: &'a AnimationClip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }

    pub fn with_joint_positions(mut self, positions: &'a JointPositions) -> Self {
        self.joint_positions = Some(positions);
        self
    }

    pub fn with_external_load(mut self, kg: f32) -> Self {
        self.external_load_kg = kg;
        self
    }
}

/// Result of one tick
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutput {
    /// Final joint rotations for the renderer
    pub pose: Pose,
    /// Vertical root offset (metres)
    pub root_y: f32,
    pub phase_name: String,
    /// Set only on the tick a new phase begins
    pub phase_change: Option<PhaseChange>,
    pub lod: LodLevel,
    /// False when the scheduler skipped this frame and `pose` is the last one
    pub processed: bool,

    // Overlay snapshots; `None` on skipped frames and at low LOD
    pub activation: Option<MuscleActivation>,
    pub loads: Option<JointLoads>,
    pub risk: Option<InjuryRiskFactors>,
    pub balance: Option<BalanceSnapshot>,
    pub ground_reaction: Option<GroundReaction>,

    pub risk_level: RiskLevel,
    pub fatigue: f32,
    /// Newest minus oldest sample of the recent fatigue history
    pub fatigue_trend: f32,
    /// Mean of the recent fatigue history
    pub fatigue_mean: f32,
    pub slowdown_factor: f32,
    pub form_score: f32,
    pub asymmetry: f32,
}

impl TickOutput {
    /// Copy of a previous output for a skipped frame
    pub(super) fn skipped(previous: &TickOutput, lod: LodLevel) -> Self {
        Self {
            phase_change: None,
            lod,
            processed: false,
            activation: None,
            loads: None,
            risk: None,
            balance: None,
            ground_reaction: None,
            ..previous.clone()
        }
    }
}

impl Default for TickOutput {
    fn default() -> Self {
        Self {
            pose: Pose::new(),
            root_y: 0.0,
            phase_name: String::new(),
            phase_change: None,
            lod: LodLevel::High,
            processed: false,
            activation: None,
            loads: None,
            risk: None,
            balance: None,
            ground_reaction: None,
            risk_level: RiskLevel::Low,
            fatigue: 0.0,
            fatigue_trend: 0.0,
            fatigue_mean: 0.0,
            slowdown_factor: 1.0,
            form_score: 100.0,
            asymmetry: 0.0,
        }
    }
}
