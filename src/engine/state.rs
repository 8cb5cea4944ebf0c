//! Simulation state and the per-frame tick
//!
//! Pipeline per processed frame:
//!
//! ```text
//! scheduler -> interpolate -> base overlay -> constrain -> couple -> delay
//!           -> activation / fatigue / loads / balance (off the delayed pose)
//!           -> tremor -> spring -> clamp -> form score -> injury risk
//! ```
//!
//! Skipped frames return the previous pose and carry their time over to the
//! next processed frame, so fatigue and springs integrate the same span at
//! every level of detail.

use nalgebra::Vector3;
use tracing::debug;

use super::io::{TickInput, TickOutput};
use crate::animation::{interpolate, AnimationClip, PhaseTracker};
use crate::biomech::{
    form_score, lateral_split, FatigueModel, InjuryRiskAssessor, LoadEstimator, MuscleActivation,
    NoiseSource, RiskInputs, SeededNoise, PERFECT_FORM,
};
use crate::config::EngineConfig;
use crate::exercise::{procedural_clip, ExerciseMode, ExerciseProfile};
use crate::physics::{
    clamp_dt, BalanceEstimator, ConstraintEnforcer, CouplingPropagator, NeuromuscularDelay,
    SpringFilter,
};
use crate::pose::{BodyPosition, Pose};
use crate::scheduler::LodScheduler;

/// Owned engine state for one avatar
pub struct SimulationState<N: NoiseSource = SeededNoise> {
    config: EngineConfig,
    mode: ExerciseMode,
    profile: ExerciseProfile,
    body_position: BodyPosition,
    base_pose: Pose,
    procedural: AnimationClip,

    constraints: ConstraintEnforcer,
    coupling: CouplingPropagator,
    delay: NeuromuscularDelay,
    springs: SpringFilter,
    balance: BalanceEstimator,
    loads: LoadEstimator,
    fatigue: FatigueModel,
    injury: InjuryRiskAssessor,
    scheduler: LodScheduler,
    phases: PhaseTracker,
    noise: N,

    /// Wall-clock session time (seconds), drives the delay buffer
    session_time: f64,
    /// Clamped time of frames not yet integrated
    pending_dt: f32,
    /// Last finite normalized clip time
    clip_time: f32,
    previous_root_y: Option<f32>,
    last: TickOutput,
}

impl SimulationState<SeededNoise> {
    pub fn new(config: EngineConfig) -> Self {
        let noise = SeededNoise::new(config.noise_seed);
        Self::with_noise(config, noise)
    }
}

impl Default for SimulationState<SeededNoise> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<N: NoiseSource> SimulationState<N> {
    /// Engine with an injected tremor noise source
    pub fn with_noise(config: EngineConfig, noise: N) -> Self {
        let mode = ExerciseMode::default();
        let body_position = mode.body_position();
        let base_pose = body_position.base_pose();

        Self {
            mode,
            profile: mode.profile(),
            body_position,
            procedural: procedural_clip(mode, &base_pose),
            base_pose,

            constraints: ConstraintEnforcer::new(),
            coupling: CouplingPropagator::new(config.coupling.scale),
            delay: NeuromuscularDelay::new(config.delay.delay_ms, config.delay.capacity),
            springs: SpringFilter::new(config.spring.max_dt),
            balance: BalanceEstimator::new(config.body.clone(), config.balance.clone()),
            loads: LoadEstimator::new(config.body.clone(), config.injury.velocity_load_gain),
            fatigue: FatigueModel::new(config.fatigue.clone()),
            injury: InjuryRiskAssessor::new(config.injury.clone()),
            scheduler: LodScheduler::new(config.lod.clone()),
            phases: PhaseTracker::new(),
            noise,

            session_time: 0.0,
            pending_dt: 0.0,
            clip_time: 0.0,
            previous_root_y: None,
            last: TickOutput::default(),
            config,
        }
    }

    // ========================================================================
    // Session control
    // ========================================================================

    /// Switch exercise. Motion state restarts; fatigue carries over.
    pub fn set_exercise_mode(&mut self, mode: ExerciseMode) {
        debug!(from = self.mode.name(), to = mode.name(), "exercise mode changed");
        self.mode = mode;
        self.profile = mode.profile();
        self.body_position = mode.body_position();
        self.base_pose = self.body_position.base_pose();
        self.rebuild_procedural();
        self.restart_motion();
    }

    pub fn set_body_position(&mut self, position: BodyPosition) {
        if position == self.body_position {
            return;
        }
        debug!(position = position.name(), "body position changed");
        self.body_position = position;
        self.base_pose = position.base_pose();
        self.rebuild_procedural();
    }

    /// Clear all state including fatigue
    pub fn reset(&mut self) {
        debug!("simulation reset");
        self.restart_motion();
        self.fatigue.reset();
        self.scheduler.reset();
        self.session_time = 0.0;
        self.pending_dt = 0.0;
        self.clip_time = 0.0;
        self.last = TickOutput::default();
    }

    pub fn reset_fatigue(&mut self) {
        debug!(level = self.fatigue.level(), "fatigue reset");
        self.fatigue.reset();
    }

    fn restart_motion(&mut self) {
        self.springs.reset();
        self.delay.clear();
        self.phases.reset();
        self.injury.reset();
        self.previous_root_y = None;
    }

    fn rebuild_procedural(&mut self) {
        self.procedural = procedural_clip(self.mode, &self.base_pose);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> ExerciseMode {
        self.mode
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn body_position(&self) -> BodyPosition {
        self.body_position
    }

    pub fn procedural_clip(&self) -> &AnimationClip {
        &self.procedural
    }

    pub fn fatigue(&self) -> &FatigueModel {
        &self.fatigue
    }

    pub fn springs(&self) -> &SpringFilter {
        &self.springs
    }

    pub fn last_output(&self) -> &TickOutput {
        &self.last
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput<'_>) -> &TickOutput {
        let raw_dt = if input.frame_delta.is_finite() {
            input.frame_delta.max(0.0)
        } else {
            0.0
        };
        self.session_time += f64::from(raw_dt);

        // Each frame is clamped on its own; skipped frames bank their share
        self.pending_dt += clamp_dt(raw_dt, self.config.spring.max_dt);

        let gate = self.scheduler.tick(raw_dt, input.camera_distance);
        if !gate.process {
            self.last = TickOutput::skipped(&self.last, gate.level);
            return &self.last;
        }

        let dt = std::mem::take(&mut self.pending_dt);
        if input.clip_time.is_finite() {
            self.clip_time = input.clip_time;
        }
        let t = self.clip_time;

        // Sample the clip and track phase transitions
        let clip = input.clip.unwrap_or(&self.procedural);
        let sample = interpolate(clip, t);
        let phase = sample.phase.kind;
        let phase_name = sample.phase.name.to_string();
        let phase_change = self.phases.observe(&sample.phase, t);
        if let Some(change) = &phase_change {
            debug!(phase = %change.phase_name, t = change.normalized_time, "phase changed");
        }
        let root_y = sample.root_y.unwrap_or(0.0);
        let animated = sample.pose;

        let base = input.base_pose.unwrap_or(&self.base_pose);
        let mut target = base.overlay(&animated);
        self.constraints.apply_in_place(&mut target);
        let coupled = self.coupling.apply(&target);

        self.delay.add_value(self.session_time, coupled.clone());
        let delayed = self.delay.get_value(self.session_time).unwrap_or(coupled);

        // Biomechanics off the delayed pose
        let profile = input.profile.unwrap_or(&self.profile);
        let activation = MuscleActivation::for_phase(self.mode, phase);
        let lateral = lateral_split(&activation, &delayed);
        let fatigue = self.fatigue.update(phase.is_exerting(), activation.mean(), dt);

        let root_velocity = match self.previous_root_y {
            Some(previous) if dt > 0.0 => (root_y - previous) / dt,
            _ => 0.0,
        };
        self.previous_root_y = Some(root_y);

        let springs = &self.springs;
        let loads = self
            .loads
            .estimate(profile, input.external_load_kg, |joint| springs.speed(joint));

        let balance = input.joint_positions.map(|p| self.balance.balance(p));
        let offset = balance.map_or(Vector3::zeros(), |b| Vector3::from(b.offset));
        let ground_reaction = self.balance.ground_reaction(
            phase,
            root_velocity,
            activation.max(),
            offset,
            input.external_load_kg,
        );

        // Tremor on primary joints while exerting
        let mut driven = delayed.clone();
        if phase.is_exerting() && fatigue > 0.0 {
            for &joint in &profile.primary_joints {
                let tremor = Vector3::new(
                    self.fatigue.tremor(&mut self.noise),
                    self.fatigue.tremor(&mut self.noise),
                    self.fatigue.tremor(&mut self.noise),
                );
                driven.add_if_present(joint, tremor);
            }
        }

        // Coupling and tremor may push past a limit; the output never does
        let lod = gate.level;
        let mut pose = self
            .springs
            .update(&driven, dt, |joint| lod.updates(joint.importance()));
        self.constraints.apply_in_place(&mut pose);

        let form = match input.form_score {
            Some(score) => score.clamp(0.0, PERFECT_FORM),
            None => form_score(&delayed, &pose, &profile.primary_joints, fatigue),
        };

        let risk = self.injury.assess(&RiskInputs {
            max_joint_load: loads.max(),
            fatigue,
            form_score: form,
            asymmetry: lateral.asymmetry,
            peak_speed: self.springs.peak_speed(),
        });

        let overlays = lod.shows_overlays();
        self.last = TickOutput {
            pose,
            root_y,
            phase_name,
            phase_change,
            lod,
            processed: true,
            activation: overlays.then_some(activation),
            loads: overlays.then_some(loads),
            risk: overlays.then_some(risk),
            balance: balance.filter(|_| overlays),
            ground_reaction: overlays.then_some(ground_reaction),
            risk_level: self.injury.level(),
            fatigue,
            fatigue_trend: self.fatigue.trend(),
            fatigue_mean: self.fatigue.history_mean(),
            slowdown_factor: self.fatigue.slowdown_factor(),
            form_score: form,
            asymmetry: lateral.asymmetry,
        };
        &self.last
    }
}
