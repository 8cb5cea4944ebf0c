//! Engine configuration
//!
//! Every tunable constant of the tick pipeline lives here. JSON input may be
//! partial; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub spring: SpringConfig,
    pub coupling: CouplingConfig,
    pub delay: DelayConfig,
    pub fatigue: FatigueConfig,
    pub injury: InjuryConfig,
    pub lod: LodConfig,
    pub body: BodyConfig,
    pub balance: BalanceConfig,
    /// Seed for the tremor noise source
    pub noise_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringConfig {
    /// Integration step ceiling (seconds)
    pub max_dt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CouplingConfig {
    /// Global scale applied to every coupling ratio
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelayConfig {
    /// Simulated neuromuscular latency (milliseconds)
    pub delay_ms: f32,
    /// Maximum number of queued poses
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FatigueConfig {
    /// Fatigue gained per second at full mean activation
    pub fatigue_rate: f32,
    /// Fatigue lost per second while resting
    pub recovery_rate: f32,
    /// Peak-to-peak tremor amplitude (radians) at full fatigue
    pub tremor_scale: f32,
    /// Speed penalty at full fatigue
    pub slowdown_scale: f32,
    /// Rolling fatigue history length (samples)
    pub history_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InjuryConfig {
    /// Joint load (newtons) that maps to full overload risk
    pub load_ceiling: f32,
    /// Joint angular speed (rad/s) above which velocity risk may fire
    pub velocity_threshold: f32,
    /// Fatigue level above which velocity risk may fire
    pub fatigue_threshold: f32,
    pub history_len: usize,
    /// Number of most recent samples averaged for the risk level
    pub level_window: usize,
    /// Load amplification per rad/s of joint angular speed
    pub velocity_load_gain: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodConfig {
    /// Camera distance below which distance LOD is high
    pub high_distance: f32,
    /// Camera distance below which distance LOD is medium
    pub medium_distance: f32,
    /// Average frame time (ms) below which performance LOD is high
    pub high_frame_ms: f32,
    /// Average frame time (ms) below which performance LOD is medium
    pub medium_frame_ms: f32,
    /// Minimum time between LOD re-evaluations (ms)
    pub throttle_ms: f32,
    /// Frame-time window length (samples)
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyConfig {
    pub mass_kg: f32,
    pub gravity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalanceConfig {
    /// Horizontal force per metre of balance offset, as a fraction of body weight
    pub shear_gain: f32,
    /// Centre-of-pressure offset per metre of balance offset
    pub cop_scale: f32,
    /// Horizontal offset (m) at which stability reaches zero
    pub support_radius: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            coupling: CouplingConfig::default(),
            delay: DelayConfig::default(),
            fatigue: FatigueConfig::default(),
            injury: InjuryConfig::default(),
            lod: LodConfig::default(),
            body: BodyConfig::default(),
            balance: BalanceConfig::default(),
            noise_seed: 0x5EED,
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self { max_dt: 0.05 }
    }
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self { scale: 0.1 }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            delay_ms: 80.0,
            capacity: 10,
        }
    }
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            fatigue_rate: 0.02,
            recovery_rate: 0.01,
            tremor_scale: 0.05,
            slowdown_scale: 0.3,
            history_len: 120,
        }
    }
}

impl Default for InjuryConfig {
    fn default() -> Self {
        Self {
            load_ceiling: 1200.0,
            velocity_threshold: 3.0,
            fatigue_threshold: 0.6,
            history_len: 20,
            level_window: 5,
            velocity_load_gain: 0.1,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            high_distance: 3.0,
            medium_distance: 6.0,
            high_frame_ms: 20.0,
            medium_frame_ms: 33.0,
            throttle_ms: 200.0,
            window: 30,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass_kg: 70.0,
            gravity: 9.81,
        }
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            shear_gain: 0.5,
            cop_scale: 0.8,
            support_radius: 0.15,
        }
    }
}

fn ensure(ok: bool, reason: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(EngineError::invalid_config(reason))
    }
}

impl EngineConfig {
    /// Parse (possibly partial) JSON and validate the result
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the integrator or the classifiers
    pub fn validate(&self) -> Result<()> {
        ensure(self.spring.max_dt > 0.0, "spring.maxDt must be positive")?;
        ensure(self.coupling.scale >= 0.0, "coupling.scale must be non-negative")?;
        ensure(self.delay.delay_ms >= 0.0, "delay.delayMs must be non-negative")?;
        ensure(self.delay.capacity > 0, "delay.capacity must be at least 1")?;

        let f = &self.fatigue;
        ensure(f.fatigue_rate > 0.0, "fatigue.fatigueRate must be positive")?;
        ensure(f.recovery_rate > 0.0, "fatigue.recoveryRate must be positive")?;
        ensure(f.tremor_scale >= 0.0, "fatigue.tremorScale must be non-negative")?;
        ensure(
            (0.0..=1.0).contains(&f.slowdown_scale),
            "fatigue.slowdownScale must be within [0, 1]",
        )?;
        ensure(f.history_len > 0, "fatigue.historyLen must be at least 1")?;

        let i = &self.injury;
        ensure(i.load_ceiling > 0.0, "injury.loadCeiling must be positive")?;
        ensure(i.velocity_threshold >= 0.0, "injury.velocityThreshold must be non-negative")?;
        ensure(
            (0.0..=1.0).contains(&i.fatigue_threshold),
            "injury.fatigueThreshold must be within [0, 1]",
        )?;
        ensure(i.history_len > 0, "injury.historyLen must be at least 1")?;
        ensure(
            i.level_window > 0 && i.level_window <= i.history_len,
            "injury.levelWindow must be within [1, historyLen]",
        )?;

        let l = &self.lod;
        ensure(
            l.high_distance > 0.0 && l.high_distance < l.medium_distance,
            "lod distances must satisfy 0 < highDistance < mediumDistance",
        )?;
        ensure(
            l.high_frame_ms > 0.0 && l.high_frame_ms < l.medium_frame_ms,
            "lod frame times must satisfy 0 < highFrameMs < mediumFrameMs",
        )?;
        ensure(l.throttle_ms >= 0.0, "lod.throttleMs must be non-negative")?;
        ensure(l.window > 0, "lod.window must be at least 1")?;

        ensure(self.body.mass_kg > 0.0, "body.massKg must be positive")?;
        ensure(self.body.gravity > 0.0, "body.gravity must be positive")?;
        ensure(self.balance.support_radius > 0.0, "balance.supportRadius must be positive")?;

        Ok(())
    }
}
