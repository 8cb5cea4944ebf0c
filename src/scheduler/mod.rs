//! Scheduler module - LOD selection and frame gating
//!
//! Re-exports only. All logic in submodules.

mod lod;

pub use lod::{FrameGate, LodLevel, LodScheduler};
