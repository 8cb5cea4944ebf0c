//! Cumulative fatigue, tremor, and slowdown
//!
//! ```text
//! exerting:  fatigue += fatigueRate · dt · meanActivation     (≤ 1)
//! resting:   fatigue -= recoveryRate · dt                     (≥ 0)
//! tremor   = fatigue · tremorScale · (noise - 0.5)
//! slowdown = 1 - fatigue · slowdownScale
//! ```

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::FatigueConfig;

// ============================================================================
// Noise
// ============================================================================

/// Uniform noise in `[0, 1)` driving tremor
pub trait NoiseSource {
    fn sample(&mut self) -> f32;
}

/// Seeded pseudo-random noise; identical seeds give identical tremor
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Constant noise; `FixedNoise(0.5)` silences tremor entirely
#[derive(Clone, Copy, Debug)]
pub struct FixedNoise(pub f32);

impl NoiseSource for FixedNoise {
    fn sample(&mut self) -> f32 {
        self.0
    }
}

// ============================================================================
// State
// ============================================================================

/// Fatigue level in `[0, 1]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FatigueState {
    pub level: f32,
}

impl FatigueState {
    /// Advance by `dt` seconds
    pub fn update(self, exerting: bool, mean_activation: f32, dt: f32, config: &FatigueConfig) -> Self {
        let dt = dt.max(0.0);
        let level = if exerting {
            self.level + config.fatigue_rate * dt * mean_activation.clamp(0.0, 1.0)
        } else {
            self.level - config.recovery_rate * dt
        };
        Self {
            level: level.clamp(0.0, 1.0),
        }
    }

    /// Signed tremor offset (radians) for one noise sample
    pub fn tremor(self, tremor_scale: f32, noise: f32) -> f32 {
        self.level * tremor_scale * (noise - 0.5)
    }

    /// Multiplicative speed penalty in `[1 - slowdown_scale, 1]`
    pub fn slowdown(self, slowdown_scale: f32) -> f32 {
        1.0 - self.level * slowdown_scale
    }
}

/// Fatigue state plus a bounded history of recent levels
pub struct FatigueModel {
    state: FatigueState,
    history: VecDeque<f32>,
    config: FatigueConfig,
}

impl FatigueModel {
    pub fn new(config: FatigueConfig) -> Self {
        Self {
            state: FatigueState::default(),
            history: VecDeque::with_capacity(config.history_len),
            config,
        }
    }

    pub fn update(&mut self, exerting: bool, mean_activation: f32, dt: f32) -> f32 {
        self.state = self.state.update(exerting, mean_activation, dt, &self.config);

        if self.history.len() >= self.config.history_len.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(self.state.level);

        self.state.level
    }

    pub fn state(&self) -> FatigueState {
        self.state
    }

    pub fn level(&self) -> f32 {
        self.state.level
    }

    /// One tremor sample; zero when fatigue is zero
    pub fn tremor<N: NoiseSource>(&self, noise: &mut N) -> f32 {
        self.state.tremor(self.config.tremor_scale, noise.sample())
    }

    pub fn slowdown_factor(&self) -> f32 {
        self.state.slowdown(self.config.slowdown_scale)
    }

    /// Mean of the history, 0 when empty
    pub fn history_mean(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Newest minus oldest sample; positive while fatiguing
    pub fn trend(&self) -> f32 {
        match (self.history.front(), self.history.back()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.state = FatigueState::default();
        self.history.clear();
    }
}

impl Default for FatigueModel {
    fn default() -> Self {
        Self::new(FatigueConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ten_seconds_of_half_activation() {
        let mut model = FatigueModel::default();
        for _ in 0..10 {
            model.update(true, 0.5, 1.0);
        }
        assert_relative_eq!(model.level(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_monotone_and_bounded() {
        let mut model = FatigueModel::default();
        let mut previous = model.level();
        for _ in 0..200 {
            let level = model.update(true, 1.0, 1.0);
            assert!(level >= previous && level <= 1.0);
            previous = level;
        }
        assert_relative_eq!(model.level(), 1.0);
        assert!(model.trend() > 0.0);

        for _ in 0..200 {
            let level = model.update(false, 1.0, 1.0);
            assert!(level <= previous && level >= 0.0);
            previous = level;
        }
        assert_relative_eq!(model.level(), 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = FatigueConfig {
            history_len: 4,
            ..FatigueConfig::default()
        };
        let mut model = FatigueModel::new(config);
        for _ in 0..10 {
            model.update(true, 1.0, 1.0);
        }
        assert_eq!(model.history.len(), 4);
        assert!(model.history_mean() > 0.0);
    }

    #[test]
    fn test_tremor_within_bound() {
        let mut model = FatigueModel::default();
        for _ in 0..30 {
            model.update(true, 1.0, 1.0);
        }
        let mut noise = SeededNoise::new(7);
        let bound = model.level() * model.config.tremor_scale * 0.5;
        for _ in 0..1000 {
            assert!(model.tremor(&mut noise).abs() <= bound);
        }
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = SeededNoise::new(42);
        let mut b = SeededNoise::new(42);
        for _ in 0..16 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_centred_noise_silences_tremor() {
        let mut model = FatigueModel::default();
        model.update(true, 1.0, 20.0);
        assert_eq!(model.tremor(&mut FixedNoise(0.5)), 0.0);
        assert!(model.tremor(&mut FixedNoise(1.0)) > 0.0);
    }

    #[test]
    fn test_slowdown_tracks_fatigue() {
        let mut model = FatigueModel::default();
        assert_relative_eq!(model.slowdown_factor(), 1.0);
        for _ in 0..100 {
            model.update(true, 1.0, 1.0);
        }
        assert_relative_eq!(model.slowdown_factor(), 1.0 - 0.3);
    }
}
