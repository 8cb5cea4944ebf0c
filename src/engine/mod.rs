//! Engine module - simulation state and the per-frame tick pipeline
//!
//! Re-exports only. All logic in submodules.

mod io;
mod state;

pub use io::{TickInput, TickOutput};
pub use state::SimulationState;
