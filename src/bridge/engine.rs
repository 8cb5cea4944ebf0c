//! AvatarEngine - the JS-facing handle around one simulation
//!
//! JavaScript owns the instance and calls `tick` once per rendered frame,
//! then reads flat arrays for the skeleton and the overlays.

use wasm_bindgen::prelude::*;

use crate::animation::{AnimationClip, ClipClock, PhaseChange};
use crate::biomech::{MUSCLE_COUNT, PERFECT_FORM};
use crate::config::EngineConfig;
use crate::engine::{SimulationState, TickInput};
use crate::error::EngineError;
use crate::exercise::ExerciseMode;
use crate::pose::{BodyPosition, JointPositions};
use crate::skeleton::JOINT_COUNT;

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen]
pub struct AvatarEngine {
    state: SimulationState,
    clip: Option<AnimationClip>,
    clock: ClipClock,
    positions: Option<JointPositions>,
    external_load_kg: f32,
    form_score: Option<f32>,
    pending_change: Option<PhaseChange>,

    // Last emitted overlay snapshots, held through skipped frames and zeroed
    // while the LOD hides overlays
    activation: [f32; MUSCLE_COUNT],
    loads: [f32; JOINT_COUNT],
    risk: [f32; 6],
}

#[wasm_bindgen]
impl AvatarEngine {
    /// Engine with default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> AvatarEngine {
        Self::from_config(EngineConfig::default())
    }

    /// Engine from (partial) JSON configuration
    pub fn with_config(json: &str) -> Result<AvatarEngine, JsValue> {
        let config = EngineConfig::from_json(json)?;
        Ok(Self::from_config(config))
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Load an authored clip; replaces the procedural motion
    pub fn load_clip_json(&mut self, json: &str) -> Result<(), JsValue> {
        let clip = AnimationClip::from_json(json)?;
        web_sys::console::log_1(
            &format!(
                "Clip loaded: {} keyframes, {:.1}s, {} phase windows",
                clip.keyframes.len(),
                clip.duration,
                clip.phases.len()
            )
            .into(),
        );
        self.clip = Some(clip);
        self.clock.reset();
        Ok(())
    }

    /// Fall back to the procedural clip of the current mode
    pub fn clear_clip(&mut self) {
        self.clip = None;
        self.clock.reset();
    }

    pub fn set_exercise_mode(&mut self, name: &str) -> Result<(), JsValue> {
        let mode = ExerciseMode::from_name(name)?;
        self.state.set_exercise_mode(mode);
        self.clock.reset();
        self.pending_change = None;
        web_sys::console::log_1(&format!("Exercise mode: {}", mode.name()).into());
        Ok(())
    }

    pub fn set_body_position(&mut self, name: &str) -> Result<(), JsValue> {
        let position = BodyPosition::from_name(name)?;
        self.state.set_body_position(position);
        Ok(())
    }

    /// World positions from the skeleton, flat `[x, y, z]` per joint
    pub fn set_joint_positions(&mut self, data: &[f32]) {
        match JointPositions::from_flat(data) {
            Ok(positions) => self.positions = Some(positions),
            Err(err) => {
                web_sys::console::warn_1(&err.to_string().into());
            }
        }
    }

    pub fn clear_joint_positions(&mut self) {
        self.positions = None;
    }

    pub fn set_external_load(&mut self, kg: f32) {
        self.external_load_kg = kg.max(0.0);
    }

    /// Measured form score (0-100); a negative value restores the estimate
    pub fn set_form_score(&mut self, score: f32) {
        self.form_score = if score < 0.0 {
            None
        } else {
            Some(score.min(PERFECT_FORM))
        };
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// Advance one frame. Returns false when the scheduler skipped it.
    pub fn tick(&mut self, dt: f32, camera_distance: f32) -> bool {
        let duration = self
            .clip
            .as_ref()
            .map_or(self.state.procedural_clip().duration, |c| c.duration);
        let speed = self.state.last_output().slowdown_factor;
        let clip_time = self.clock.advance(dt, duration, speed);

        let input = TickInput {
            clip: self.clip.as_ref(),
            clip_time,
            frame_delta: dt,
            camera_distance,
            base_pose: None,
            profile: None,
            external_load_kg: self.external_load_kg,
            joint_positions: self.positions.as_ref(),
            form_score: self.form_score,
        };
        let out = self.state.tick(&input);

        if let Some(change) = &out.phase_change {
            self.pending_change = Some(change.clone());
        }
        if !out.lod.shows_overlays() {
            let processed = out.processed;
            self.clear_overlays();
            return processed;
        }
        if let Some(activation) = &out.activation {
            self.activation = activation.to_array();
        }
        if let Some(loads) = &out.loads {
            self.loads = loads.to_array();
        }
        if let Some(risk) = &out.risk {
            self.risk = risk.to_array();
        }
        out.processed
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    /// Final rotations, flat `[x, y, z]` per joint
    pub fn pose(&self) -> Vec<f32> {
        self.state.last_output().pose.to_flat()
    }

    pub fn root_y(&self) -> f32 {
        self.state.last_output().root_y
    }

    /// Muscle activation per group; all zero while the LOD hides overlays
    pub fn activation(&self) -> Vec<f32> {
        self.activation.to_vec()
    }

    pub fn loads(&self) -> Vec<f32> {
        self.loads.to_vec()
    }

    /// overload, fatigue, form, asymmetry, velocity, overall
    pub fn risk(&self) -> Vec<f32> {
        self.risk.to_vec()
    }

    pub fn risk_level(&self) -> String {
        self.state.last_output().risk_level.name().to_string()
    }

    pub fn phase_name(&self) -> String {
        self.state.last_output().phase_name.clone()
    }

    /// Most recent phase transition as JSON, cleared once read
    pub fn take_phase_change(&mut self) -> Option<String> {
        let change = self.pending_change.take()?;
        serde_json::to_string(&change).ok()
    }

    pub fn lod(&self) -> String {
        self.state.last_output().lod.name().to_string()
    }

    pub fn fatigue(&self) -> f32 {
        self.state.last_output().fatigue
    }

    /// Change of fatigue across the recent history; positive while tiring
    pub fn fatigue_trend(&self) -> f32 {
        self.state.last_output().fatigue_trend
    }

    pub fn slowdown_factor(&self) -> f32 {
        self.state.last_output().slowdown_factor
    }

    pub fn form_score(&self) -> f32 {
        self.state.last_output().form_score
    }

    pub fn normalized_time(&self) -> f32 {
        self.clock.normalized()
    }

    /// Completed repetitions of the current clip
    pub fn repetitions(&self) -> u32 {
        self.clock.cycles()
    }

    /// Whole last tick output as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.last_output())
            .map_err(|e| JsValue::from(EngineError::from(e)))
    }

    // ========================================================================
    // SESSION
    // ========================================================================

    /// Clear all state including fatigue
    pub fn reset(&mut self) {
        self.state.reset();
        self.clock.reset();
        self.pending_change = None;
        self.clear_overlays();
        web_sys::console::log_1(&"Avatar engine reset".into());
    }

    pub fn reset_fatigue(&mut self) {
        self.state.reset_fatigue();
    }
}

impl AvatarEngine {
    fn clear_overlays(&mut self) {
        self.activation = [0.0; MUSCLE_COUNT];
        self.loads = [0.0; JOINT_COUNT];
        self.risk = [0.0; 6];
    }

    fn from_config(config: EngineConfig) -> Self {
        Self {
            state: SimulationState::new(config),
            clip: None,
            clock: ClipClock::new(),
            positions: None,
            external_load_kg: 0.0,
            form_score: None,
            pending_change: None,
            activation: [0.0; MUSCLE_COUNT],
            loads: [0.0; JOINT_COUNT],
            risk: [0.0; 6],
        }
    }
}

impl Default for AvatarEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_overlays_cleared_at_low_lod() {
        let mut engine = AvatarEngine::new();
        engine.tick(DT, 1.0);
        assert!(engine.activation().iter().all(|&a| a > 0.0));

        // Past the 200 ms re-evaluation throttle
        for _ in 0..20 {
            engine.tick(DT, 12.0);
        }
        assert_eq!(engine.lod(), "low");
        assert!(engine.activation().iter().all(|&a| a == 0.0));
        assert!(engine.risk().iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_nan_frame_delta_keeps_pose_finite() {
        let mut engine = AvatarEngine::new();
        engine.tick(f32::NAN, 1.0);
        for _ in 0..120 {
            engine.tick(DT, 1.0);
        }
        assert!(engine.normalized_time().is_finite());
        assert!(engine.pose().iter().all(|v| v.is_finite()));
    }
}
