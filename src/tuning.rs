//! Data-driven match constants
//!
//! Every number the simulation uses lives here so hosts can load a JSON
//! override. Missing fields fall back to the reference values in
//! [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArenaError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Setup ===
    /// Total particles, split evenly across kinds
    pub population: u32,
    pub viewport_margin: f32,
    pub wall_thickness: f32,
    pub particle_radius: f32,
    pub spawn_padding: f32,
    pub launch_speed: f32,

    // === Corrective pass ===
    pub min_speed: f32,
    pub stall_epsilon: f32,
    pub containment_buffer: f32,
    pub containment_inset: f32,
    pub recovery_speed: f32,
    pub boost_after_secs: f32,
    pub boost_factor: f32,
    pub boost_wall_impact: f32,
    pub wall_impact_decay: f32,

    // === Feedback ===
    pub dominance_threshold: f32,
    pub spawn_cue_every: u32,
    pub spawn_cue_stagger_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            population: POPULATION,
            viewport_margin: VIEWPORT_MARGIN,
            wall_thickness: WALL_THICKNESS,
            particle_radius: PARTICLE_RADIUS,
            spawn_padding: SPAWN_PADDING,
            launch_speed: LAUNCH_SPEED,

            min_speed: MIN_SPEED,
            stall_epsilon: STALL_EPSILON,
            containment_buffer: CONTAINMENT_BUFFER,
            containment_inset: CONTAINMENT_INSET,
            recovery_speed: RECOVERY_SPEED,
            boost_after_secs: BOOST_AFTER_SECS,
            boost_factor: BOOST_FACTOR,
            boost_wall_impact: BOOST_WALL_IMPACT,
            wall_impact_decay: WALL_IMPACT_DECAY,

            dominance_threshold: DOMINANCE_THRESHOLD,
            spawn_cue_every: SPAWN_CUE_EVERY,
            spawn_cue_stagger_ms: SPAWN_CUE_STAGGER_MS,
        }
    }
}

impl Tuning {
    /// Parse from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ArenaError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject configurations a match cannot run with
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.population == 0 || self.population % 3 != 0 {
            return Err(ArenaError::InvalidPopulation(self.population));
        }

        let non_negative = [
            ("viewport_margin", self.viewport_margin),
            ("wall_thickness", self.wall_thickness),
            ("spawn_padding", self.spawn_padding),
            ("launch_speed", self.launch_speed),
            ("stall_epsilon", self.stall_epsilon),
            ("containment_buffer", self.containment_buffer),
            ("containment_inset", self.containment_inset),
            ("boost_after_secs", self.boost_after_secs),
            ("wall_impact_decay", self.wall_impact_decay),
            ("spawn_cue_stagger_ms", self.spawn_cue_stagger_ms),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ArenaError::tuning(format!("{name} must be >= 0, got {value}")));
            }
        }

        let positive = [
            ("particle_radius", self.particle_radius),
            ("min_speed", self.min_speed),
            ("recovery_speed", self.recovery_speed),
            ("boost_factor", self.boost_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ArenaError::tuning(format!("{name} must be > 0, got {value}")));
            }
        }

        if self.stall_epsilon >= self.min_speed {
            return Err(ArenaError::tuning("stall_epsilon must be below min_speed"));
        }
        // Above 0.5 at most one kind can be dominant at a time
        if !(self.dominance_threshold > 0.5 && self.dominance_threshold < 1.0) {
            return Err(ArenaError::tuning(format!(
                "dominance_threshold must be in (0.5, 1), got {}",
                self.dominance_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.boost_wall_impact) {
            return Err(ArenaError::tuning("boost_wall_impact must be in [0, 1]"));
        }
        if self.spawn_cue_every == 0 {
            return Err(ArenaError::tuning("spawn_cue_every must be >= 1"));
        }
        Ok(())
    }

    /// Particles of each kind at match start
    pub fn per_kind(&self) -> u32 {
        self.population / 3
    }
}
