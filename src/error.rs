//! Error types for match setup
//!
//! Only setup can fail. Once a match is running every tick is infallible.

use thiserror::Error;

use crate::physics::PhysicsError;

/// Reasons a match refuses to start
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Population must split evenly across the three kinds
    #[error("Population must be a positive multiple of 3, got {0}")]
    InvalidPopulation(u32),

    /// Viewport leaves no usable arena
    #[error("Arena too small: viewport {width}x{height} leaves a {size} unit square")]
    DegenerateArena { width: f32, height: f32, size: f32 },

    /// A tuning value is out of range
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Physics collaborator could not be brought up (fatal)
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Tuning file did not parse
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArenaError {
    /// Creates a tuning error.
    pub fn tuning(msg: impl Into<String>) -> Self {
        Self::InvalidTuning(msg.into())
    }
}
