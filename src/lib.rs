//! RPS Arena - rock/paper/scissors elimination on 2D rigid bodies
//!
//! Core modules:
//! - `sim`: Per-tick decision layer (interactions, corrective pass, dominance, win)
//! - `physics`: Physics collaborator seam plus a small reference world
//! - `audio`: Audio collaborator seam (cues only, no synthesis in the core)
//! - `runner`: Fixed-timestep frame scheduling
//! - `tuning`: Data-driven match constants

pub mod audio;
pub mod error;
pub mod physics;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, Cue, CueLog, NullAudio};
pub use error::ArenaError;
pub use physics::{BodyHandle, CollisionPair, PhysicsEngine, PhysicsError, World};
pub use runner::Runner;
pub use settings::Settings;
pub use sim::{Arena, ArenaSnapshot, Counts, Kind, MatchState, TickReport};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Reference match constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Particles per match (33 of each kind)
    pub const POPULATION: u32 = 99;
    /// Gap between viewport edge and arena square
    pub const VIEWPORT_MARGIN: f32 = 50.0;
    pub const WALL_THICKNESS: f32 = 10.0;
    pub const PARTICLE_RADIUS: f32 = 12.0;
    /// Spawn inset from the arena edge
    pub const SPAWN_PADDING: f32 = 20.0;
    /// Initial speed (units/tick)
    pub const LAUNCH_SPEED: f32 = 3.0;

    /// Anti-stall floor (units/tick)
    pub const MIN_SPEED: f32 = 2.0;
    /// Below this a body has no usable direction
    pub const STALL_EPSILON: f32 = 0.1;

    /// Tolerance outside the arena before a body counts as escaped
    pub const CONTAINMENT_BUFFER: f32 = 50.0;
    /// Where escaped bodies are put back, measured inward from the edge
    pub const CONTAINMENT_INSET: f32 = 20.0;
    /// Speed toward the center after a teleport (units/tick)
    pub const RECOVERY_SPEED: f32 = 5.0;

    /// Match time before the one-shot speed boost (seconds)
    pub const BOOST_AFTER_SECS: f32 = 50.0;
    pub const BOOST_FACTOR: f32 = 1.5;
    /// Wall impact set by the boost (feedback only)
    pub const BOOST_WALL_IMPACT: f32 = 1.0;
    /// Linear wall impact decay per tick
    pub const WALL_IMPACT_DECAY: f32 = 0.05;

    /// Population share a kind must exceed to count as dominant
    pub const DOMINANCE_THRESHOLD: f32 = 0.7;

    /// Only every Nth spawn plays a cue
    pub const SPAWN_CUE_EVERY: u32 = 10;
    /// Cue delay per spawn index (milliseconds)
    pub const SPAWN_CUE_STAGGER_MS: f32 = 5.0;
}

/// Axis-aligned rectangle (origin at top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow (positive) or shrink (negative) by `amount` on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.w + amount * 2.0,
            self.h + amount * 2.0,
        )
    }

    /// Closed containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Nearest point of the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Uniformly distributed direction of length `r`
pub fn random_direction<R: rand::Rng>(rng: &mut R, r: f32) -> Vec2 {
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    polar_to_cartesian(r, theta)
}
