//! Composite injury risk
//!
//! Five sub-factors, each in `[0, 1]`, combined by fixed weights. A bounded
//! history of the composite feeds the risk level: the mean of the most
//! recent samples mapped onto four bands.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::InjuryConfig;

/// overload, fatigue, form, asymmetry, velocity
pub const RISK_WEIGHTS: [f32; 5] = [0.30, 0.25, 0.25, 0.15, 0.05];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn classify(risk: f32) -> Self {
        if risk < 0.3 {
            RiskLevel::Low
        } else if risk < 0.5 {
            RiskLevel::Medium
        } else if risk < 0.7 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// Raw measurements the assessor scores
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RiskInputs {
    /// Newtons
    pub max_joint_load: f32,
    pub fatigue: f32,
    /// 0..=100
    pub form_score: f32,
    pub asymmetry: f32,
    /// Fastest joint angular speed (rad/s)
    pub peak_speed: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryRiskFactors {
    pub overload_risk: f32,
    pub fatigue_risk: f32,
    pub form_degradation: f32,
    pub asymmetry_risk: f32,
    pub velocity_risk: f32,
    pub overall_risk: f32,
}

impl InjuryRiskFactors {
    /// Clamp each sub-factor and compute the weighted composite
    pub fn compose(overload: f32, fatigue: f32, form: f32, asymmetry: f32, velocity: f32) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let factors = [unit(overload), unit(fatigue), unit(form), unit(asymmetry), unit(velocity)];
        let overall = factors
            .iter()
            .zip(RISK_WEIGHTS.iter())
            .map(|(f, w)| f * w)
            .sum::<f32>();

        Self {
            overload_risk: factors[0],
            fatigue_risk: factors[1],
            form_degradation: factors[2],
            asymmetry_risk: factors[3],
            velocity_risk: factors[4],
            overall_risk: unit(overall),
        }
    }

    pub fn to_array(&self) -> [f32; 6] {
        [
            self.overload_risk,
            self.fatigue_risk,
            self.form_degradation,
            self.asymmetry_risk,
            self.velocity_risk,
            self.overall_risk,
        ]
    }
}

pub struct InjuryRiskAssessor {
    config: InjuryConfig,
    history: VecDeque<f32>,
}

impl InjuryRiskAssessor {
    pub fn new(config: InjuryConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_len),
            config,
        }
    }

    /// Score one tick and record the composite
    pub fn assess(&mut self, inputs: &RiskInputs) -> InjuryRiskFactors {
        let c = &self.config;
        let overload = (inputs.max_joint_load.max(0.0) / c.load_ceiling).min(1.0);
        let fatigue = inputs.fatigue.clamp(0.0, 1.0);
        let form = ((100.0 - inputs.form_score) / 100.0).max(0.0);
        let velocity = if inputs.peak_speed > c.velocity_threshold && fatigue > c.fatigue_threshold {
            1.0
        } else {
            0.0
        };

        let factors =
            InjuryRiskFactors::compose(overload, fatigue * fatigue, form, inputs.asymmetry, velocity);

        if self.history.len() >= c.history_len.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(factors.overall_risk);

        factors
    }

    /// Mean of the most recent `level_window` composites, 0 when empty
    pub fn smoothed_risk(&self) -> f32 {
        let window = self.config.level_window.max(1).min(self.history.len());
        if window == 0 {
            return 0.0;
        }
        self.history.iter().rev().take(window).sum::<f32>() / window as f32
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::classify(self.smoothed_risk())
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for InjuryRiskAssessor {
    fn default() -> Self {
        Self::new(InjuryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn inputs(load: f32, fatigue: f32, form: f32, asymmetry: f32, speed: f32) -> RiskInputs {
        RiskInputs {
            max_joint_load: load,
            fatigue,
            form_score: form,
            asymmetry,
            peak_speed: speed,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_abs_diff_eq!(RISK_WEIGHTS.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_all_factors_bounded() {
        let samples = [0.0_f32, 0.3, 1.0, 7.5, 1e6];
        for &a in &samples {
            for &b in &samples {
                let risk = InjuryRiskFactors::compose(a, b, a, b, a);
                assert!(risk.to_array().iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
        let mut assessor = InjuryRiskAssessor::default();
        let risk = assessor.assess(&inputs(1e9, 5.0, -500.0, 9.0, 1e3));
        assert!(risk.to_array().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_relative_eq!(risk.overall_risk, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fatigue_risk_is_quadratic() {
        let mut assessor = InjuryRiskAssessor::default();
        let risk = assessor.assess(&inputs(0.0, 0.5, 100.0, 0.0, 0.0));
        assert_relative_eq!(risk.fatigue_risk, 0.25);
        assert_relative_eq!(risk.overall_risk, 0.25 * 0.25);
    }

    #[test]
    fn test_velocity_risk_needs_both_conditions() {
        let mut assessor = InjuryRiskAssessor::default();
        assert_eq!(assessor.assess(&inputs(0.0, 0.9, 100.0, 0.0, 1.0)).velocity_risk, 0.0);
        assert_eq!(assessor.assess(&inputs(0.0, 0.1, 100.0, 0.0, 9.0)).velocity_risk, 0.0);
        assert_eq!(assessor.assess(&inputs(0.0, 0.9, 100.0, 0.0, 9.0)).velocity_risk, 1.0);
    }

    #[test]
    fn test_level_uses_recent_window() {
        let mut assessor = InjuryRiskAssessor::default();
        assert_eq!(assessor.level(), RiskLevel::Low);

        for _ in 0..10 {
            assessor.assess(&inputs(1e9, 1.0, 0.0, 1.0, 9.0));
        }
        assert_eq!(assessor.level(), RiskLevel::Critical);

        for _ in 0..5 {
            assessor.assess(&inputs(0.0, 0.0, 100.0, 0.0, 0.0));
        }
        assert_eq!(assessor.level(), RiskLevel::Low);
        assert_eq!(assessor.history.len(), 15);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut assessor = InjuryRiskAssessor::default();
        for _ in 0..50 {
            assessor.assess(&RiskInputs::default());
        }
        assert_eq!(assessor.history.len(), 20);
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(RiskLevel::classify(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.69), RiskLevel::High);
        assert_eq!(RiskLevel::classify(0.7), RiskLevel::Critical);
        assert!(RiskLevel::Low < RiskLevel::Critical);
    }
}
