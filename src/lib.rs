//! Rehab Motion Web - procedural motion and biomechanics for a physiotherapy avatar
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod animation;
pub mod biomech;
mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod exercise;
pub mod physics;
pub mod pose;
pub mod scheduler;
pub mod skeleton;

use wasm_bindgen::prelude::*;

pub use bridge::AvatarEngine;
pub use config::EngineConfig;
pub use engine::{SimulationState, TickInput, TickOutput};
pub use error::{EngineError, Result};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
///
/// Routes panics and `tracing` events to the browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    if tracing_wasm::try_set_as_global_default().is_err() {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}

/// Crate version, for the host's about screen
#[wasm_bindgen]
pub fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
