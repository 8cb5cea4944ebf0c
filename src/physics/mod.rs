//! Physics module - constraints, coupling, delay, springs, and balance
//!
//! Re-exports only. All logic in submodules.

mod balance;
mod constraints;
mod coupling;
mod delay;
mod spring;

pub use balance::{
    center_of_mass, support_base, vertical_multiplier, BalanceEstimator, BalanceSnapshot,
    GroundReaction,
};
pub use constraints::ConstraintEnforcer;
pub use coupling::CouplingPropagator;
pub use delay::NeuromuscularDelay;
pub use spring::{clamp_dt, substeps, SpringFilter, SpringState};
