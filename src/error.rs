//! Engine error type
//!
//! Only boundary operations fail (config, clip loading, name lookups).
//! Ticking never returns an error.

use thiserror::Error;

/// Errors raised when feeding the engine invalid input
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid clip: {0}")]
    InvalidClip(String),

    #[error("unknown exercise mode: {0}")]
    UnknownExerciseMode(String),

    #[error("unknown body position: {0}")]
    UnknownBodyPosition(String),

    #[error("invalid position data: got {got} values, expected {expected}")]
    InvalidPositionData { got: usize, expected: usize },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    pub fn invalid_clip(reason: impl Into<String>) -> Self {
        Self::InvalidClip(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
