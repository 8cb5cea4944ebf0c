//! Biomech module - muscle activation, fatigue, loads, form, and injury risk
//!
//! Re-exports only. All logic in submodules.

mod fatigue;
mod form;
mod injury;
mod load;
mod muscle;

pub use fatigue::{FatigueModel, FatigueState, FixedNoise, NoiseSource, SeededNoise};
pub use form::{form_score, mean_deviation, PERFECT_FORM};
pub use injury::{InjuryRiskAssessor, InjuryRiskFactors, RiskInputs, RiskLevel, RISK_WEIGHTS};
pub use load::{JointLoads, LoadEstimator};
pub use muscle::{
    lateral_split, LateralActivation, MuscleActivation, MuscleGroup, IDLE_BASELINE, MUSCLE_COUNT,
};
